use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use inquire::{Password, Text};
use powerwall_core::{Config, DEFAULT_EMAIL, DEFAULT_HOST, connect, session};
use tracing::Level;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "powerwall",
    version,
    about = "Log into a Powerwall gateway and print its capacity and meter readings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log more to stderr; repeat for more detail.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the gateway host and credentials.
    Configure,

    /// Log in and print capacity, then meters. This is the default.
    Show,
}

/// Overrides for the stored configuration.
#[derive(Debug, Default, Args)]
pub struct ConnectionArgs {
    /// Gateway address, e.g. "192.168.91.1".
    #[arg(long, global = true, env = "POWERWALL_HOST")]
    pub host: Option<String>,

    /// Gateway password.
    #[arg(long, global = true, env = "POWERWALL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// E-mail used to log in.
    #[arg(long, global = true, env = "POWERWALL_EMAIL")]
    pub email: Option<String>,
}

impl ConnectionArgs {
    fn into_config(self) -> Config {
        Config { host: self.host, password: self.password, email: self.email }
    }
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Show) {
            Command::Configure => configure(),
            Command::Show => show(self.connection).await,
        }
    }
}

async fn show(connection: ConnectionArgs) -> anyhow::Result<()> {
    let settings = connection.into_config().or(Config::load()?).into_settings();

    let stdout = std::io::stdout();
    session::run(&settings.host, &settings.credentials, connect, &mut stdout.lock())
        .await
        .with_context(|| format!("Powerwall session with {} failed", settings.host))
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;

    let host = Text::new("Gateway host:")
        .with_default(current.host.as_deref().unwrap_or(DEFAULT_HOST))
        .prompt()?;

    let password = Password::new("Gateway password:")
        .without_confirmation()
        .with_help_message("Usually the last five characters of the gateway serial number")
        .prompt()?;

    let email = Text::new("E-mail:")
        .with_default(current.email.as_deref().unwrap_or(DEFAULT_EMAIL))
        .prompt()?;

    let updated = Config {
        host: Some(host),
        password: Some(password).filter(|p| !p.is_empty()).or(current.password),
        email: Some(email),
    };
    let path = updated.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_the_default_session() {
        let cli = Cli::try_parse_from(["powerwall"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn overrides_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "powerwall",
            "show",
            "--host",
            "10.0.0.5",
            "--password",
            "ABCDE",
            "-vv",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Command::Show)));
        assert_eq!(cli.connection.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(cli.connection.password.as_deref(), Some("ABCDE"));
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn connection_args_become_config_overrides() {
        let args = ConnectionArgs { email: Some("owner@example.com".into()), ..Default::default() };

        let settings = args.into_config().into_settings();

        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.credentials.email, "owner@example.com");
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["powerwall", "reboot"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
