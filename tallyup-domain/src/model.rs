use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub Uuid);

/// A decimal money amount. Positive in a balance means the member is owed
/// by the group, negative means the member owes the group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    /// One cent, the atomic unit for USD-style amounts. Also the
    /// reconciliation tolerance for payer and split totals.
    pub fn cent() -> Self {
        Self(Decimal::new(1, 2))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Drops sub-cent precision toward zero.
    pub fn floor_to_cents(self) -> Self {
        Self(self.0.round_dp_with_strategy(2, RoundingStrategy::ToZero))
    }

    pub fn is_whole_cents(self) -> bool {
        self.0.round_dp(2) == self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// How an expense total is divided among its participants.
///
/// Input order is significant for `Equal`, `Percentage` and `Share`: the
/// leftover cents from rounding are handed out in that order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SplitMethod {
    /// Every participant owes the same amount.
    Equal { participants: Vec<UserId> },
    /// Exact per-member amounts; must reconcile with the expense total.
    Unequal { amounts: Vec<(UserId, Money)> },
    /// Per-member percentages of the total; must sum to 100.
    Percentage { percentages: Vec<(UserId, Decimal)> },
    /// Proportional weights; each member owes `total * weight / sum`.
    Share { shares: Vec<(UserId, Decimal)> },
}

impl SplitMethod {
    /// Participants referenced by the split, in input order.
    pub fn participants(&self) -> Vec<UserId> {
        match self {
            Self::Equal { participants } => participants.clone(),
            Self::Unequal { amounts } => amounts.iter().map(|(user, _)| *user).collect(),
            Self::Percentage { percentages } => {
                percentages.iter().map(|(user, _)| *user).collect()
            }
            Self::Share { shares } => shares.iter().map(|(user, _)| *user).collect(),
        }
    }
}

/// How much a member physically paid toward an expense.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayerEntry {
    pub user: UserId,
    pub paid: Money,
}

/// How much a member is responsible for (owes) for an expense.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub user: UserId,
    pub owed: Money,
}

/// One shared cost event, as handed over by the data-access layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group: GroupId,
    pub title: String,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub payers: Vec<PayerEntry>,
    pub split: SplitMethod,
}

/// An expense that passed validation and had its split resolved to
/// concrete per-member amounts. The only input the aggregator accepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedExpense {
    pub id: ExpenseId,
    pub payers: Vec<PayerEntry>,
    pub shares: Vec<ShareEntry>,
}

/// A direct repayment between two members: `from` hands `amount` to `to`,
/// raising `from`'s balance and lowering `to`'s by the same amount.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}

/// A member's net position within a group. Derived, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub user: UserId,
    pub amount: Money,
}

/// Keyed by `UserId` (a BTreeMap) so iteration order is stable.
pub type MemberBalances = BTreeMap<UserId, Money>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_to_cents_drops_sub_cent_precision() {
        assert_eq!(Money::new(33333, 4).floor_to_cents(), Money::new(333, 2));
        assert_eq!(Money::new(10, 1).floor_to_cents(), Money::new(10, 1));
    }

    #[test]
    fn whole_cent_check_ignores_trailing_zeros() {
        assert!(Money::new(1050, 2).is_whole_cents());
        assert!(Money::new(105000, 4).is_whole_cents());
        assert!(!Money::new(10501, 3).is_whole_cents());
    }
}
