//! Gatehouse Service Library
//!
//! This library provides a minimal stateless bearer-token authentication
//! service: username/password login mints a signed JWT, and a request filter
//! validates bearer tokens on every subsequent request.
//!
//! # Modules
//!
//! - `clock` - Time source abstraction (injectable for tests)
//! - `config` - Service configuration
//! - `crypto` - Token codec (JWT signing and verification)
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer-token request filter
//! - `models` - Data models
//! - `routes` - Router assembly
//! - `services` - Business logic layer
//! - `store` - Credential store collaborator

pub mod clock;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
