//! Authentication
//!
//! - `password`: bcrypt hashing and verification
//! - `token`: JWT issuance and verification
//! - `extractor`: bearer-token to account resolution for handlers

mod extractor;
mod password;
mod token;

pub use extractor::{resolve, CurrentAccount};
pub use password::PasswordHasher;
pub use token::{Claims, TokenError, TokenService};
