pub mod balancer;
pub mod table;

pub use balancer::{BalanceResult, FootnoteBalancer, PreparedFootnote};
pub use table::{FootnoteEntry, FootnoteTable};
