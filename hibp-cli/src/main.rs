use std::io::{self, BufRead};
use std::time::Duration;

use clap::{Parser, Subcommand};
use hibp_client::{ClientConfig, HibpService, ServiceError, is_email};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod error;
mod output;

use error::Error;

const DEFAULT_USER_AGENT: &str = concat!("hibp-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Parser, Debug)]
#[command(name = "hibp")]
#[command(about = "Query Have I Been Pwned for breaches, pastes and exposed passwords")]
struct Args {
    /// User agent identifying this client to the service
    #[arg(long, env = "HIBP_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// API key, required for account and paste queries
    #[arg(long, env = "HIBP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Alternate host for breach and paste queries
    #[arg(long, env = "HIBP_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count how often a password appears in breaches (read from stdin if omitted)
    Password {
        password: Option<String>,

        /// Ask the service to pad the range response
        #[arg(long)]
        padding: bool,
    },

    /// List all breaches, or those of one domain
    Breaches {
        #[arg(long)]
        domain: Option<String>,
    },

    /// List the breaches an account appears in
    Account {
        account: String,

        #[arg(long)]
        include_unverified: bool,
    },

    /// List the pastes an email address appears in
    Pastes { email: String },
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.user_agent)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_padding(matches!(self.command, Command::Password { padding: true, .. }));
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let service = HibpService::new(args.client_config())?;
    let mut out = io::stdout().lock();
    let json = args.json;

    match args.command {
        Command::Password { password, .. } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            let count = service.password_count(&password)?.await?;
            output::password_count(&mut out, count, json)?;
        }
        Command::Breaches { domain } => {
            let pending = match &domain {
                Some(domain) => service.breaches_for_domain(domain)?,
                None => service.all_breaches()?,
            };
            match pending.await {
                Ok(breaches) => output::breaches(&mut out, &breaches, json)?,
                Err(ServiceError::NotFound) => output::no_results(&mut out, json)?,
                Err(err) => return Err(err.into()),
            }
        }
        Command::Account { account, include_unverified } => {
            warn_if_not_email(&account);
            match service.breaches_for_account(&account, include_unverified)?.await {
                Ok(breaches) => output::breaches(&mut out, &breaches, json)?,
                Err(ServiceError::NotFound) => output::no_results(&mut out, json)?,
                Err(err) => return Err(err.into()),
            }
        }
        Command::Pastes { email } => {
            warn_if_not_email(&email);
            match service.pastes_for_account(&email)?.await {
                Ok(pastes) => output::pastes(&mut out, &pastes, json)?,
                Err(ServiceError::NotFound) => output::no_results(&mut out, json)?,
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}

fn warn_if_not_email(account: &str) {
    if !is_email(account) {
        warn!(account, "Does not look like an email address, querying anyway");
    }
}

/// First line of stdin, without the line ending.
fn read_password() -> Result<String, Error> {
    io::stdin().lock().lines().next().transpose()?.ok_or(Error::MissingPassword)
}
