//! Authentication for Hearth
//!
//! Password hashing (Argon2id) and the on-disk session that carries the
//! current login between invocations.

pub mod password;
pub mod session;

pub use password::{generate_token, hash_password, verify_password, MIN_PASSWORD_LEN};
pub use session::Session;
