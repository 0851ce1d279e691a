pub mod position;
pub mod role;
pub mod status;

pub use position::{MAX_SHIRT_NUMBER, MIN_SHIRT_NUMBER, Position};
pub use role::{Permissions, Role};
pub use status::{CardStatus, MonthlyStatus, TransactionKind};

pub const SESSION_COOKIE: &str = "porto_session";
pub const MAX_RECEIPT_SIZE: usize = 10 * 1024 * 1024; // 10MB
pub const MIN_PASSWORD_LEN: usize = 6;
