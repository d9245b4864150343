#![doc(test(attr(deny(warnings))))]

//! Tontine ties the ledger calculator to its collaborators: snapshot files,
//! persisted preferences and a line-oriented command shell.

pub mod cli;
pub mod errors;
pub mod snapshot;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("tontine tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
