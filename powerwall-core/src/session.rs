use std::io::Write;

use tracing::{info, instrument};

use crate::{client::Powerwall, error::Result, model::Credentials};

/// Run one session against the gateway at `host`.
///
/// Strictly sequential: connect, login, capacity, meters. Each query result is
/// written to `out` as its own line as soon as it arrives. The first failure
/// ends the session; nothing is retried.
#[instrument(skip_all, fields(host = %host))]
pub async fn run<P, F, W>(host: &str, credentials: &Credentials, connect: F, out: &mut W) -> Result<()>
where
    P: Powerwall,
    F: FnOnce(&str) -> Result<P>,
    W: Write,
{
    let mut powerwall = connect(host)?;

    powerwall.login(&credentials.password, &credentials.email).await?;

    let capacity = powerwall.get_capacity().await?;
    info!(%capacity, "got capacity");
    writeln!(out, "{capacity}")?;

    let meters = powerwall.get_meters().await?;
    info!(count = meters.len(), "got meters");
    writeln!(out, "{meters}")?;

    Ok(())
}
