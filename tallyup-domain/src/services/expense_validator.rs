//! Pre-flight checks for an expense before it is stored or aggregated.
//!
//! The validator fails fast with a typed error naming the check and the
//! offending values, so the submitting layer can show a precise
//! correction message instead of a generic failure.

use fxhash::FxHashSet;

use crate::{
    error::ExpenseError,
    model::{Expense, Money, ResolvedExpense, UserId},
    services::split_calculator::{self, within_one_cent},
};

/// Validates an expense against the group roster and resolves its split
/// to concrete per-member amounts.
///
/// The roster is supplied by the caller; the engine only checks that every
/// referenced user is on it, it never fetches membership itself.
pub fn resolve_expense(
    expense: &Expense,
    roster: &[UserId],
) -> Result<ResolvedExpense, ExpenseError> {
    if expense.amount <= Money::ZERO {
        return Err(ExpenseError::NonPositiveAmount {
            amount: expense.amount,
        });
    }
    if !expense.amount.is_whole_cents() {
        return Err(ExpenseError::SubCentAmount {
            amount: expense.amount,
        });
    }
    if expense.payers.is_empty() {
        return Err(ExpenseError::NoPayers);
    }
    for payer in &expense.payers {
        if payer.paid < Money::ZERO {
            return Err(ExpenseError::NegativePayerAmount {
                user: payer.user,
                paid: payer.paid,
            });
        }
    }

    let paid_total: Money = expense.payers.iter().map(|payer| payer.paid).sum();
    if !within_one_cent(paid_total, expense.amount) {
        tracing::warn!(
            expense_id = %expense.id.0,
            expected = %expense.amount,
            actual = %paid_total,
            "expense rejected: payer total does not reconcile"
        );
        return Err(ExpenseError::PayerSumMismatch {
            expected: expense.amount,
            actual: paid_total,
        });
    }

    let members: FxHashSet<UserId> = roster.iter().copied().collect();
    for payer in &expense.payers {
        if !members.contains(&payer.user) {
            return Err(ExpenseError::UnknownMember { user: payer.user });
        }
    }
    for participant in expense.split.participants() {
        if !members.contains(&participant) {
            return Err(ExpenseError::UnknownMember { user: participant });
        }
    }

    let shares = split_calculator::compute_shares(expense.amount, &expense.split)?;

    tracing::debug!(
        expense_id = %expense.id.0,
        amount = %expense.amount,
        payer_count = expense.payers.len(),
        participant_count = shares.len(),
        "expense resolved"
    );

    Ok(ResolvedExpense {
        id: expense.id,
        payers: expense.payers.clone(),
        shares,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::SplitError,
        model::{Expense, ExpenseId, GroupId, PayerEntry, SplitMethod},
    };
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId(Uuid::from_u128(n))
    }

    fn usd(mantissa: i64) -> Money {
        Money::new(mantissa, 2)
    }

    fn dinner(amount: Money, payers: Vec<PayerEntry>, split: SplitMethod) -> Expense {
        Expense {
            id: ExpenseId(Uuid::from_u128(0xE1)),
            group: GroupId(Uuid::from_u128(0x61)),
            title: "dinner".to_owned(),
            amount,
            date: Utc.with_ymd_and_hms(2024, 6, 1, 19, 30, 0).unwrap(),
            payers,
            split,
        }
    }

    fn roster() -> Vec<UserId> {
        vec![user(1), user(2), user(3)]
    }

    #[test]
    fn resolves_valid_expense() {
        let expense = dinner(
            usd(6000),
            vec![PayerEntry {
                user: user(1),
                paid: usd(6000),
            }],
            SplitMethod::Equal {
                participants: vec![user(1), user(2), user(3)],
            },
        );

        let resolved = resolve_expense(&expense, &roster()).expect("expense should resolve");
        assert_eq!(resolved.id, expense.id);
        assert_eq!(resolved.payers, expense.payers);

        let owed_total: Money = resolved.shares.iter().map(|share| share.owed).sum();
        assert_eq!(owed_total, usd(6000));
    }

    #[rstest]
    #[case::zero(usd(0))]
    #[case::negative(usd(-500))]
    fn rejects_non_positive_amount(#[case] amount: Money) {
        let expense = dinner(
            amount,
            vec![PayerEntry {
                user: user(1),
                paid: amount,
            }],
            SplitMethod::Equal {
                participants: vec![user(1)],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::NonPositiveAmount { amount })
        );
    }

    #[test]
    fn rejects_sub_cent_amount() {
        let amount = Money::new(10001, 3);
        let expense = dinner(
            amount,
            vec![PayerEntry {
                user: user(1),
                paid: amount,
            }],
            SplitMethod::Equal {
                participants: vec![user(1)],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::SubCentAmount { amount })
        );
    }

    #[test]
    fn rejects_missing_payers() {
        let expense = dinner(
            usd(1000),
            vec![],
            SplitMethod::Equal {
                participants: vec![user(1)],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::NoPayers)
        );
    }

    #[test]
    fn rejects_payer_total_mismatch() {
        let expense = dinner(
            usd(1000),
            vec![
                PayerEntry {
                    user: user(1),
                    paid: usd(400),
                },
                PayerEntry {
                    user: user(2),
                    paid: usd(400),
                },
            ],
            SplitMethod::Equal {
                participants: vec![user(1), user(2)],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::PayerSumMismatch {
                expected: usd(1000),
                actual: usd(800),
            })
        );
    }

    #[test]
    fn accepts_multiple_payers_within_tolerance() {
        let expense = dinner(
            usd(1000),
            vec![
                PayerEntry {
                    user: user(1),
                    paid: usd(600),
                },
                PayerEntry {
                    user: user(2),
                    paid: usd(399),
                },
            ],
            SplitMethod::Equal {
                participants: vec![user(1), user(2)],
            },
        );

        assert!(resolve_expense(&expense, &roster()).is_ok());
    }

    #[test]
    fn rejects_payer_outside_roster() {
        let stranger = user(99);
        let expense = dinner(
            usd(1000),
            vec![PayerEntry {
                user: stranger,
                paid: usd(1000),
            }],
            SplitMethod::Equal {
                participants: vec![user(1)],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::UnknownMember { user: stranger })
        );
    }

    #[test]
    fn rejects_participant_outside_roster() {
        let stranger = user(99);
        let expense = dinner(
            usd(1000),
            vec![PayerEntry {
                user: user(1),
                paid: usd(1000),
            }],
            SplitMethod::Equal {
                participants: vec![user(1), stranger],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::UnknownMember { user: stranger })
        );
    }

    #[test]
    fn split_errors_propagate() {
        let expense = dinner(
            usd(1000),
            vec![PayerEntry {
                user: user(1),
                paid: usd(1000),
            }],
            SplitMethod::Unequal {
                amounts: vec![(user(1), usd(300)), (user(2), usd(300))],
            },
        );

        assert_eq!(
            resolve_expense(&expense, &roster()),
            Err(ExpenseError::Split(SplitError::SumMismatch {
                expected: usd(1000),
                actual: usd(600),
            }))
        );
    }
}
