pub mod consumers;
pub mod merchandise;
pub mod reports;
pub mod sales;
