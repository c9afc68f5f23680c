//! Turns one expense's split rule into concrete per-member amounts.
//!
//! For the computed methods (equal, percentage, share) the raw shares are
//! floored to whole cents and the leftover cents are handed out one at a
//! time in input order, so the outputs always sum exactly to the expense
//! amount. Exact-amount splits pass through untouched and are only
//! tolerance-checked.

use fxhash::FxHashSet;
use rust_decimal::Decimal;

use crate::{
    error::SplitError,
    model::{Money, ShareEntry, SplitMethod, UserId},
};

/// Reconciliation tolerance for user-entered totals: one cent.
pub(crate) fn within_one_cent(a: Money, b: Money) -> bool {
    (a - b).abs() <= Money::cent()
}

/// Computes the amount each participant owes for an expense.
///
/// `amount` must be positive and expressed in whole cents; the expense
/// validator enforces that before calling in.
pub fn compute_shares(amount: Money, split: &SplitMethod) -> Result<Vec<ShareEntry>, SplitError> {
    debug_assert!(amount.is_whole_cents());

    match split {
        SplitMethod::Equal { participants } => equal_shares(amount, participants),
        SplitMethod::Unequal { amounts } => exact_shares(amount, amounts),
        SplitMethod::Percentage { percentages } => percentage_shares(amount, percentages),
        SplitMethod::Share { shares } => weighted_shares(amount, shares),
    }
}

fn equal_shares(amount: Money, participants: &[UserId]) -> Result<Vec<ShareEntry>, SplitError> {
    if participants.is_empty() {
        return Err(SplitError::NoParticipants);
    }
    reject_duplicates(participants.iter().copied())?;

    let weights: Vec<(UserId, Decimal)> = participants
        .iter()
        .map(|&user| (user, Decimal::ONE))
        .collect();
    Ok(allocate(amount, &weights, Decimal::from(participants.len() as u64)))
}

fn exact_shares(amount: Money, amounts: &[(UserId, Money)]) -> Result<Vec<ShareEntry>, SplitError> {
    if amounts.is_empty() {
        return Err(SplitError::NoParticipants);
    }
    reject_duplicates(amounts.iter().map(|(user, _)| *user))?;

    for &(user, value) in amounts {
        if value < Money::ZERO {
            return Err(SplitError::NegativeAmount { user, value });
        }
    }

    let total: Money = amounts.iter().map(|(_, value)| *value).sum();
    if !within_one_cent(total, amount) {
        return Err(SplitError::SumMismatch {
            expected: amount,
            actual: total,
        });
    }

    Ok(amounts
        .iter()
        .map(|&(user, owed)| ShareEntry { user, owed })
        .collect())
}

fn percentage_shares(
    amount: Money,
    percentages: &[(UserId, Decimal)],
) -> Result<Vec<ShareEntry>, SplitError> {
    if percentages.is_empty() {
        return Err(SplitError::NoParticipants);
    }
    reject_duplicates(percentages.iter().map(|(user, _)| *user))?;

    let hundred = Decimal::ONE_HUNDRED;
    for &(user, value) in percentages {
        if value < Decimal::ZERO || value > hundred {
            return Err(SplitError::PercentageOutOfRange { user, value });
        }
    }

    // Tolerance is checked on the raw percentages, before any rounding.
    let total: Decimal = percentages.iter().map(|(_, value)| *value).sum();
    if (total - hundred).abs() > Decimal::new(1, 2) {
        return Err(SplitError::PercentageSumMismatch {
            expected: hundred,
            actual: total,
        });
    }

    Ok(allocate(amount, percentages, total))
}

fn weighted_shares(
    amount: Money,
    shares: &[(UserId, Decimal)],
) -> Result<Vec<ShareEntry>, SplitError> {
    if shares.is_empty() {
        return Err(SplitError::NoParticipants);
    }
    reject_duplicates(shares.iter().map(|(user, _)| *user))?;

    for &(user, value) in shares {
        if value < Decimal::ZERO {
            return Err(SplitError::NegativeShareWeight { user, value });
        }
    }

    let total: Decimal = shares.iter().map(|(_, value)| *value).sum();
    if total <= Decimal::ZERO {
        return Err(SplitError::ZeroTotalShares);
    }

    Ok(allocate(amount, shares, total))
}

/// Splits `amount` proportionally to `weights`, flooring each raw share to
/// whole cents and distributing the leftover cents in input order.
fn allocate(amount: Money, weights: &[(UserId, Decimal)], total_weight: Decimal) -> Vec<ShareEntry> {
    let mut entries: Vec<ShareEntry> = weights
        .iter()
        .map(|&(user, weight)| {
            let raw = amount.as_decimal() * weight / total_weight;
            ShareEntry {
                user,
                owed: Money::from_decimal(raw).floor_to_cents(),
            }
        })
        .collect();

    let allocated: Money = entries.iter().map(|entry| entry.owed).sum();
    let cent = Money::cent();
    let mut leftover = amount - allocated;
    let mut idx = 0;
    while leftover >= cent {
        entries[idx].owed += cent;
        leftover -= cent;
        idx = (idx + 1) % entries.len();
    }

    entries
}

fn reject_duplicates<I>(users: I) -> Result<(), SplitError>
where
    I: IntoIterator<Item = UserId>,
{
    let mut seen = FxHashSet::default();
    for user in users {
        if !seen.insert(user) {
            return Err(SplitError::DuplicateParticipant { user });
        }
    }
    Ok(())
}
