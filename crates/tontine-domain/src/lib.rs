//! tontine-domain
//!
//! Pure domain models (GroupConfig, Member, AttendanceRecord, PotDistribution, LedgerRules).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod attendance;
pub mod common;
pub mod group;
pub mod member;
pub mod payout;
pub mod rules;

pub use attendance::*;
pub use common::*;
pub use group::*;
pub use member::*;
pub use payout::*;
pub use rules::*;
