//! Session startup and the interactive keypad loop.
//!
//! Builds the authentication state machine from configuration, probes the
//! biometric hardware once, then drives the keypad from line-based input.
//! Each input line is either a run of digits or one command:
//!
//! - `<` deletes the last digit
//! - `b` asks for biometric authentication (only when hardware is present)
//! - `logout`, `status`, `metrics`, `quit`

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

use crate::auth::AuthError;
use crate::config::ConfigV1;
use crate::keypad::{submit_entry, EntryOutcome, PinPad};
use crate::state::SessionState;

const TITLE: &str = "Ingresá tu clave";
const WRONG_PIN: &str = "PIN incorrecto. Inténtalo de nuevo.";
const WELCOME: &str = "Acceso concedido. Bienvenido a TUBANK.";
const BUSY: &str = "Verificando, esperá un momento...";

/// Runs a session on stdin/stdout.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let session = SessionState::from_config(config);
    info!(
        "Starting keypad session on platform '{}'",
        session.auth.platform_name()
    );

    session.auth.probe_hardware().await;

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&session, stdin, tokio::io::stdout()).await?;

    info!("Keypad session ended.");
    Ok(())
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

/// Drive the keypad from `input`, writing screen text to `output`, until
/// `quit` or end of input. Probing the hardware is left to the caller.
pub async fn run_session<R, W>(
    session: &SessionState,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let auth = &session.auth;
    let mut pad = PinPad::new(session.config.pin.length);
    let mut lines = input.lines();

    say(&mut output, TITLE).await?;
    if auth.snapshot().has_hardware {
        say(&mut output, "Escribí 'b' para usar biometría.").await?;
    }
    say(&mut output, &pad.masked()).await?;

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "status" => {
                let status = serde_json::json!({
                    "phase": auth.phase(),
                    "state": auth.snapshot(),
                });
                say(&mut output, &status.to_string()).await?;
            }
            "metrics" => {
                output.write_all(session.metrics.render().as_bytes()).await?;
                output.flush().await?;
            }
            "logout" => {
                auth.logout();
                pad.clear();
                say(&mut output, "Sesión cerrada.").await?;
                say(&mut output, TITLE).await?;
                say(&mut output, &pad.masked()).await?;
            }
            "<" => {
                if !auth.snapshot().is_loading {
                    pad.delete();
                }
                say(&mut output, &pad.masked()).await?;
            }
            "b" => {
                if !auth.snapshot().has_hardware {
                    say(&mut output, "Biometría no disponible en este dispositivo.").await?;
                    continue;
                }
                match auth.submit_biometric().await {
                    Ok(true) => say(&mut output, WELCOME).await?,
                    Ok(false) => say(&mut output, "No se pudo verificar tu identidad.").await?,
                    Err(AuthError::AttemptInFlight) => say(&mut output, BUSY).await?,
                }
            }
            keys => {
                for key in keys.chars() {
                    match submit_entry(&mut pad, auth, key).await {
                        EntryOutcome::Pending => {}
                        EntryOutcome::Authenticated => {
                            say(&mut output, WELCOME).await?;
                            pad.clear();
                            break;
                        }
                        EntryOutcome::Rejected => {
                            say(&mut output, WRONG_PIN).await?;
                            break;
                        }
                        EntryOutcome::Busy => {
                            say(&mut output, BUSY).await?;
                            break;
                        }
                    }
                }
                say(&mut output, &pad.masked()).await?;
            }
        }
    }

    Ok(())
}
