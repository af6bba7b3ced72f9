//! Request identity. Tokens are minted by the external auth service with a
//! shared secret; this service only verifies them.

mod claims;
pub mod jwt;

pub use jwt::AuthUser;
