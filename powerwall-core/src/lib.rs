//! Core library for the `powerwall` CLI.
//!
//! This crate defines:
//! - The `Powerwall` capability trait and its HTTP adapter for the gateway's local API
//! - The session: connect, login, print capacity, print meters
//! - Shared domain models and configuration handling
//!
//! It is used by `powerwall-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

pub use client::{HttpPowerwall, Powerwall, connect};
pub use config::{Config, SessionSettings};
pub use error::{PowerwallError, Result};
pub use model::{Capacity, Credentials, Meter, MetersAggregates};

pub const DEFAULT_HOST: &str = "192.168.91.1";
pub const DEFAULT_PASSWORD: &str = "FTXMT";
pub const DEFAULT_EMAIL: &str = "nfarina@gmail.com";
