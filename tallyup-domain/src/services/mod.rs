pub mod balance_aggregator;
pub mod expense_validator;
pub mod split_calculator;

pub use balance_aggregator::{calculate_balances, BalanceAccumulator};
pub use expense_validator::resolve_expense;
pub use split_calculator::compute_shares;
