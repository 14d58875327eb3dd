/// Session module: opaque token issuance and validation.
pub mod manager;
pub mod token;
pub mod types;

pub use manager::SessionManager;
pub use types::{ClientIds, Session, SessionToken, UserId};
