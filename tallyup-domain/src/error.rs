use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{Money, UserId};

/// Rejections raised while turning a split rule into concrete amounts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplitError {
    #[error("split values sum to {actual}, expected {expected}")]
    SumMismatch { expected: Money, actual: Money },
    #[error("percentages sum to {actual}, expected {expected}")]
    PercentageSumMismatch { expected: Decimal, actual: Decimal },
    #[error("total share weight must be greater than zero")]
    ZeroTotalShares,
    #[error("split has no participants")]
    NoParticipants,
    #[error("percentage for {user} must be between 0 and 100 (got {value})")]
    PercentageOutOfRange { user: UserId, value: Decimal },
    #[error("split amount for {user} must not be negative (got {value})")]
    NegativeAmount { user: UserId, value: Money },
    #[error("share weight for {user} must not be negative (got {value})")]
    NegativeShareWeight { user: UserId, value: Decimal },
    #[error("{user} appears more than once in the split")]
    DuplicateParticipant { user: UserId },
}

/// Rejections raised by the pre-flight expense checks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpenseError {
    #[error("expense amount must be positive (got {amount})")]
    NonPositiveAmount { amount: Money },
    #[error("expense amount {amount} is not representable in whole cents")]
    SubCentAmount { amount: Money },
    #[error("expense has no payer entries")]
    NoPayers,
    #[error("payer amount for {user} must not be negative (got {paid})")]
    NegativePayerAmount { user: UserId, paid: Money },
    #[error("payer amounts sum to {actual}, expected {expected}")]
    PayerSumMismatch { expected: Money, actual: Money },
    #[error("{user} is not a member of the group")]
    UnknownMember { user: UserId },
    #[error(transparent)]
    Split(#[from] SplitError),
}
