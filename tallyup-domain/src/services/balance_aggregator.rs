//! Net-balance computation over a group's resolved expense history.
//!
//! The aggregator never fails: it expects already-resolved expenses and
//! always produces a result. On reconciled input the output amounts sum
//! to exactly zero; feeding it unvalidated data is a caller error that
//! merely breaks that invariant.

use crate::model::{Balance, MemberBalances, Money, ResolvedExpense, Settlement};

/// Incremental form of the balance computation. Every member seen as a
/// payer, participant or settlement party is carried with an explicit
/// entry, even at zero.
#[derive(Debug, Default)]
pub struct BalanceAccumulator {
    balances: MemberBalances,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_expense(&mut self, expense: &ResolvedExpense) {
        for payer in &expense.payers {
            *self.balances.entry(payer.user).or_insert(Money::ZERO) += payer.paid;
        }
        for share in &expense.shares {
            *self.balances.entry(share.user).or_insert(Money::ZERO) -= share.owed;
        }
    }

    /// A settlement clears debt: the payer's balance rises by the amount,
    /// the receiver's falls by the same amount.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        *self.balances.entry(settlement.from).or_insert(Money::ZERO) += settlement.amount;
        *self.balances.entry(settlement.to).or_insert(Money::ZERO) -= settlement.amount;
    }

    pub fn balances(&self) -> &MemberBalances {
        &self.balances
    }

    pub fn into_balances(self) -> MemberBalances {
        self.balances
    }
}

/// Computes one net balance per member from a snapshot of resolved
/// expenses and settlements. A fresh, total recomputation on every call.
///
/// Output is sorted by amount descending (largest creditor first), ties
/// broken by user id ascending, so the result is fully deterministic.
pub fn calculate_balances(
    expenses: &[ResolvedExpense],
    settlements: &[Settlement],
) -> Vec<Balance> {
    let mut accumulator = BalanceAccumulator::new();
    for expense in expenses {
        accumulator.apply_expense(expense);
    }
    for settlement in settlements {
        accumulator.apply_settlement(settlement);
    }

    let mut balances: Vec<Balance> = accumulator
        .into_balances()
        .into_iter()
        .map(|(user, amount)| Balance { user, amount })
        .collect();
    balances.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.user.cmp(&b.user)));

    tracing::debug!(
        expense_count = expenses.len(),
        settlement_count = settlements.len(),
        member_count = balances.len(),
        "balances computed"
    );

    balances
}
