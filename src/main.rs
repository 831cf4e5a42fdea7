//! hostup-dns - manage Hostup DNS records from the command line.
//!
//! Besides the regular subcommands, the binary speaks lego's "exec" provider
//! protocol: `hostup-dns present <fqdn> <value>` and
//! `hostup-dns cleanup <fqdn> <value>`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hostup_dns::config::{self, PartialSettings};
use hostup_dns::hostup::HostupProvider;
use hostup_dns::types::{RecordRequest, DEFAULT_TTL};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "HOSTUP_LOG_LEVEL", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Connection settings; each overrides the config file and environment.
#[derive(Args)]
struct SettingsArgs {
    /// Account username
    #[arg(long, short = 'u', global = true)]
    username: Option<String>,

    /// Account password
    #[arg(long, short = 'p', global = true)]
    password: Option<String>,

    /// API root URL
    #[arg(long, global = true)]
    api_endpoint: Option<String>,

    /// Token cache file
    #[arg(long, global = true)]
    token_cache: Option<PathBuf>,

    /// Config file (TOML with a [settings] table)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List all DNS zones of the account
    Zones,
    /// Show the record with the given name
    Get {
        /// Fully-qualified record name
        name: String,
    },
    /// Add a record, replacing existing records of the same name
    Add(AddArgs),
    /// Delete all records with the given name
    Delete {
        /// Fully-qualified record name
        name: String,
    },
    /// List the records of a zone by service and zone ID
    Records { service_id: i64, domain_id: i64 },
    /// Delete a single record by ID
    DeleteId {
        service_id: i64,
        domain_id: i64,
        record_id: i64,
    },
    /// Invalidate and remove the cached token
    Logout,
    /// lego exec: publish an ACME challenge TXT record
    Present {
        fqdn: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// lego exec: remove ACME challenge TXT records
    Cleanup {
        fqdn: String,
        #[allow(dead_code)]
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

/// Options go before the content, which may itself start with `-`.
#[derive(Args)]
struct AddArgs {
    /// Fully-qualified record name
    name: String,
    /// Record content; several values create a multi-value record
    #[arg(required = true, allow_hyphen_values = true)]
    content: Vec<String>,
    /// Record type
    #[arg(long = "type", short = 't', default_value = "TXT")]
    record_type: String,
    /// Time to live in seconds
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: u32,
    /// Priority (MX, SRV)
    #[arg(long, default_value_t = 0)]
    priority: i64,
    /// Keep existing records with the same name
    #[arg(long)]
    keep_existing: bool,
}

impl AddArgs {
    /// The request to send and whether existing records are replaced.
    fn into_request(self) -> (RecordRequest, bool) {
        let request = RecordRequest::new(
            self.name,
            self.record_type,
            self.content,
            self.ttl,
            self.priority,
        );
        (request, !self.keep_existing)
    }
}

impl SettingsArgs {
    fn overrides(&self) -> PartialSettings {
        PartialSettings {
            username: self.username.clone(),
            password: self.password.clone(),
            api_endpoint: self.api_endpoint.clone(),
            token_cache_path: self.token_cache.clone(),
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hostup_dns={level},reqwest=warn")));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let credentials = config::resolve(
        cli.settings.config.as_deref(),
        cli.settings.overrides(),
        |key| std::env::var(key).ok(),
    )?;
    tracing::debug!(?credentials, "resolved settings");
    let provider = HostupProvider::new(credentials).context("failed to build HTTP client")?;

    match cli.command {
        Command::Zones => print_json(&provider.list_zones().await?),
        Command::Get { name } => match provider.get_record_by_name(&name).await? {
            Some(record) => print_json(&record),
            None => anyhow::bail!("no record named {}", name),
        },
        Command::Add(args) => {
            let (request, replace_existing) = args.into_request();
            print_json(&provider.add_record_by_name(&request, replace_existing).await?)
        }
        Command::Delete { name } => print_json(&provider.delete_record_by_name(&name).await?),
        Command::Records {
            service_id,
            domain_id,
        } => print_json(&provider.list_records(service_id, domain_id).await?),
        Command::DeleteId {
            service_id,
            domain_id,
            record_id,
        } => print_json(
            &provider
                .delete_record_by_id(service_id, domain_id, record_id)
                .await?,
        ),
        Command::Logout => Ok(provider.logout().await?),
        Command::Present { fqdn, value } => {
            print_json(&provider.present_challenge(&fqdn, &value).await?)
        }
        Command::Cleanup { fqdn, .. } => print_json(&provider.cleanup_challenge(&fqdn).await?),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
