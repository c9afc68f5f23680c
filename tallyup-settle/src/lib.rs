//! Debt-settlement planning on top of the balance engine.
//!
//! Given a zero-sum balance list, constructs a deterministic list of
//! member-to-member transfers that clears every balance: creditors and
//! debtors are sorted by magnitude descending (ties by user id) and swept
//! against each other, transferring the smaller of the two outstanding
//! magnitudes at each step. For `n` members this needs at most `n - 1`
//! transfers.

#![warn(clippy::uninlined_format_args)]

mod model;

use tallyup_domain::{Balance, Money, UserId};
use thiserror::Error;

pub use model::Transfer;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("balances must sum to zero (found {0})")]
    ImbalancedTotal(Money),
}

/// Builds the transfer plan that settles `balances`.
///
/// The input must sum to exactly zero, which holds for any balance list
/// produced by the aggregator from reconciled expenses.
pub fn plan_transfers(balances: &[Balance]) -> Result<Vec<Transfer>, PlanError> {
    let total: Money = balances.iter().map(|balance| balance.amount).sum();
    if !total.is_zero() {
        return Err(PlanError::ImbalancedTotal(total));
    }

    // Outstanding magnitudes, largest first; ties broken by user id so the
    // plan is reproducible.
    let mut creditors: Vec<(UserId, Money)> = balances
        .iter()
        .filter(|balance| balance.amount > Money::ZERO)
        .map(|balance| (balance.user, balance.amount))
        .collect();
    let mut debtors: Vec<(UserId, Money)> = balances
        .iter()
        .filter(|balance| balance.amount < Money::ZERO)
        .map(|balance| (balance.user, -balance.amount))
        .collect();
    let by_magnitude_desc = |a: &(UserId, Money), b: &(UserId, Money)| {
        b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
    };
    creditors.sort_by(by_magnitude_desc);
    debtors.sort_by(by_magnitude_desc);

    let mut transfers = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut i, mut j) = (0, 0);
    while i < creditors.len() && j < debtors.len() {
        let amount = creditors[i].1.min(debtors[j].1);
        transfers.push(Transfer {
            from: debtors[j].0,
            to: creditors[i].0,
            amount,
        });
        creditors[i].1 -= amount;
        debtors[j].1 -= amount;
        if creditors[i].1.is_zero() {
            i += 1;
        }
        if debtors[j].1.is_zero() {
            j += 1;
        }
    }

    tracing::debug!(
        member_count = balances.len(),
        transfer_count = transfers.len(),
        "settlement plan built"
    );

    Ok(transfers)
}
