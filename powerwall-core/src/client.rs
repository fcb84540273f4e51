use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    model::{Capacity, MetersAggregates},
};

pub mod http;

pub use http::HttpPowerwall;

/// The capabilities a Powerwall gateway offers to a session.
///
/// `login` must succeed before either query is issued.
#[async_trait]
pub trait Powerwall: Send + Sync + Debug {
    async fn login(&mut self, password: &str, email: &str) -> Result<()>;

    /// Total energy storage capacity.
    async fn get_capacity(&self) -> Result<Capacity>;

    /// Current readings of every meter the gateway reports.
    async fn get_meters(&self) -> Result<MetersAggregates>;
}

/// Construct an unauthenticated gateway client bound to `host`.
///
/// No network I/O happens here; a malformed host is only rejected on the first request.
pub fn connect(host: &str) -> Result<HttpPowerwall> {
    HttpPowerwall::new(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_accepts_bare_address_without_io() {
        let powerwall = connect("192.168.91.1").expect("client should build");
        assert_eq!(powerwall.base_url(), "https://192.168.91.1/api/");
        assert!(!powerwall.is_authenticated());
    }

    #[test]
    fn connect_defers_malformed_host() {
        let powerwall = connect("not a host").expect("validation is deferred");
        assert_eq!(powerwall.base_url(), "https://not a host/api/");
    }
}
