pub mod transaction;
pub mod user;

pub use transaction::*;
pub use user::*;
