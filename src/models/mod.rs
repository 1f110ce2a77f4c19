pub mod consumer;
pub mod merchandise;
pub mod sale;

// Re-export only the types we actually use
pub use consumer::{Consumer, ConsumerForm};
pub use merchandise::{MerchandiseForm, MerchandiseItem};
pub use sale::{NewSale, SaleRecord, SaleWithNames, Statistics};
