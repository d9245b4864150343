//! tontine-core
//!
//! The ledger calculator for tontine groups: member debt status, payment
//! waterfall simulation, daily aggregates, payout rotation and settlement.
//! Depends on tontine-domain. Pure functions over caller-supplied snapshots:
//! no CLI, no terminal I/O, no storage.

pub mod error;
pub mod history_service;
pub mod payment_service;
pub mod payout_service;
pub mod public_api;
pub mod settlement_service;
pub mod status_service;
pub mod summary_service;
pub mod time;
pub mod validation;

pub use error::CoreError;
pub use history_service::*;
pub use payment_service::*;
pub use payout_service::*;
pub use settlement_service::*;
pub use status_service::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use validation::validate_group;
