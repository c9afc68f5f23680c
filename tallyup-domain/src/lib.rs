#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{ExpenseError, SplitError};
pub use model::{
    Balance, Expense, ExpenseId, GroupId, MemberBalances, Money, PayerEntry, ResolvedExpense,
    Settlement, ShareEntry, SplitMethod, UserId,
};
pub use services::{calculate_balances, compute_shares, resolve_expense, BalanceAccumulator};
