use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = PowerwallError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PowerwallError {
    #[error("request to the Powerwall gateway failed")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode the Powerwall gateway response")]
    Decode(#[from] serde_json::Error),

    #[error("login rejected by the Powerwall gateway: {message}")]
    AuthenticationFailed { message: String },

    #[error("not logged in; call `login` before querying the gateway")]
    NotAuthenticated,

    #[error("access denied by the Powerwall gateway, the session may have expired")]
    AccessDenied,

    #[error("Powerwall gateway responded with status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to write the query result")]
    Output(#[from] std::io::Error),
}
