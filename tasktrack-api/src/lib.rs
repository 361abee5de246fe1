//! # Tasktrack API Server Library
//!
//! HTTP surface of the Tasktrack task tracking service: configuration, the
//! axum router with bearer authentication, handlers and error mapping. All
//! domain logic lives in `tasktrack-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
