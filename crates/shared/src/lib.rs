//! Shared types, errors, and configuration for Recibo.
//!
//! This crate provides common types used across all other crates:
//! - Identity claims and the closed role enumeration
//! - JWT issuance and validation
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
