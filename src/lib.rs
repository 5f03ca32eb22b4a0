//! Library exports for tubank-auth, shared between the binary and tests.

pub mod auth;
pub mod config;
pub mod delay;
pub mod keypad;
pub mod metrics;
pub mod models;
pub mod platform;
pub mod startup;
pub mod state;
pub mod utils;
