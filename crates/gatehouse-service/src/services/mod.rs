//! Business logic services.

pub mod authenticator;

pub use authenticator::Authenticator;
