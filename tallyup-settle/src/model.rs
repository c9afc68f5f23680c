use serde::Serialize;
use tallyup_domain::{Money, UserId};

/// One suggested repayment: `from` pays `amount` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Transfer {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}
