//! HTTP request handlers.

pub mod auth_handler;
pub mod hello_handler;

pub use auth_handler::{login, AppState, LoginRequest};
pub use hello_handler::hello;
