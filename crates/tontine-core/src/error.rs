use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),
    #[error("Payout not found: {0}")]
    PayoutNotFound(Uuid),
    #[error("Invalid group configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
