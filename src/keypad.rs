//! The PIN keypad's entry buffer.
//!
//! Digits accumulate up to the configured length; the press that fills the
//! buffer hands back the complete PIN for submission. After a rejected PIN
//! the caller clears the buffer so the user starts over.

use tracing::debug;

use crate::auth::{AuthError, LocalAuth};
use crate::config::PinConfig;

/// What a key press did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadEvent {
    /// The digit was added; carries the new length.
    Updated(usize),
    /// The digit filled the buffer; carries the full PIN.
    Completed(String),
    /// The press was not a digit, or the buffer was already full.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PinPad {
    digits: String,
    capacity: usize,
}

impl Default for PinPad {
    fn default() -> Self {
        Self::new(PinConfig::default().length)
    }
}

impl PinPad {
    pub fn new(capacity: usize) -> Self {
        Self {
            digits: String::with_capacity(capacity),
            capacity,
        }
    }

    pub fn press_digit(&mut self, key: char) -> KeypadEvent {
        if !key.is_ascii_digit() || self.is_full() {
            return KeypadEvent::Ignored;
        }
        self.digits.push(key);
        if self.is_full() {
            KeypadEvent::Completed(self.digits.clone())
        } else {
            KeypadEvent::Updated(self.digits.len())
        }
    }

    /// Remove the last digit. Returns false when there was nothing to remove.
    pub fn delete(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// One flag per PIN slot, true where a digit has been entered.
    pub fn filled_dots(&self) -> Vec<bool> {
        (0..self.capacity).map(|i| i < self.digits.len()).collect()
    }

    /// The dot row as text, e.g. `●●○○○○`.
    pub fn masked(&self) -> String {
        self.filled_dots()
            .into_iter()
            .map(|filled| if filled { '●' } else { '○' })
            .collect()
    }
}

/// Result of feeding one key into the keypad flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Still collecting digits (or the key was ignored).
    Pending,
    Authenticated,
    /// The PIN was wrong; the buffer has been cleared.
    Rejected,
    /// A check is in flight; the key was not accepted.
    Busy,
}

/// Feed a key press into `pad`, submitting to `auth` once the PIN is complete.
///
/// While a check is in flight the keypad is locked and the key is dropped.
/// A rejected PIN clears the buffer; an accepted one leaves it for the caller.
pub async fn submit_entry(pad: &mut PinPad, auth: &LocalAuth, key: char) -> EntryOutcome {
    if auth.snapshot().is_loading {
        return EntryOutcome::Busy;
    }

    let pin = match pad.press_digit(key) {
        KeypadEvent::Completed(pin) => pin,
        KeypadEvent::Updated(len) => {
            debug!("Keypad holds {} of {} digits", len, pad.capacity());
            return EntryOutcome::Pending;
        }
        KeypadEvent::Ignored => return EntryOutcome::Pending,
    };

    match auth.submit_pin(&pin).await {
        Ok(true) => EntryOutcome::Authenticated,
        Ok(false) => {
            pad.clear();
            EntryOutcome::Rejected
        }
        Err(AuthError::AttemptInFlight) => {
            pad.clear();
            EntryOutcome::Busy
        }
    }
}
