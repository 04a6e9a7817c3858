//! Billbook tracks personal expenses and subscriptions: what repeats, when it
//! is next due, and what has been paid.
//!
//! The crate splits into calendar logic ([`recurrence`]), amount handling
//! ([`money`]), the SQLite store ([`storage`]), the workflows that tie them
//! together ([`core::services`]), and the one-shot command front end
//! ([`cli`]).

use std::sync::Once;

pub mod cli;
pub mod core;
pub mod domain;
pub mod errors;
pub mod money;
pub mod recurrence;
pub mod storage;

static INIT: Once = Once::new();

/// Initializes tracing output once per process. Safe to call repeatedly.
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("billbook=info".parse().unwrap()),
            )
            .with_target(false)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
