pub mod category;
pub mod transaction;

pub use category::CategoryTable;
pub use transaction::{classify_movement, MovementType, Transaction};
