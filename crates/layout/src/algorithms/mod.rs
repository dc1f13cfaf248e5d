pub mod balance;
pub mod pagination;
