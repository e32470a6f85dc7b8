//! Command Line Interface module
//!
//! Implements the CLI commands and argument parsing for PiWatch, routing
//! each subcommand to the matching client operation and serializing the
//! outcome as pretty JSON or a rendered text block.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::Config;
use crate::pihole::{ListKind, PiholeClient, QueryRecord};
use crate::render;

#[derive(Parser, Debug, Clone)]
#[command(name = "piwatch")]
#[command(about = "PiWatch Pi-hole terminal client")]
#[command(long_about = "Query and manage a Pi-hole DNS filtering appliance from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, default_value = "piwatch.toml")]
    pub config_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the appliance statistics summary
    Summary,

    /// Show top domains, permitted by default
    Top {
        /// Show blocked instead of permitted domains
        #[arg(long)]
        blocked: bool,

        /// Number of entries to request
        #[arg(short = 'n', long)]
        count: Option<i64>,

        /// Render as a bar chart instead of JSON
        #[arg(long)]
        chart: bool,
    },

    /// Show top clients by query count
    Clients {
        /// Number of entries to request
        #[arg(short = 'n', long)]
        count: Option<i64>,
    },

    /// Show the most recent query log entries
    Queries {
        /// Number of entries to request
        #[arg(short = 'n', long)]
        count: Option<i64>,
    },

    /// Inspect or toggle DNS blocking
    Blocking {
        #[command(subcommand)]
        action: BlockingAction,
    },

    /// Manage the exact-match allow list
    Allow {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Manage the exact-match deny list
    Deny {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Trigger a rebuild of the compiled blocklist
    Gravity,

    /// Flush the resolver's DNS cache
    Flush,

    /// Check whether the appliance is reachable and accepts the secret
    Probe,

    /// Render the full statistics dashboard
    Dashboard,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BlockingAction {
    /// Show the current blocking state
    Status,

    /// Turn blocking on
    Enable,

    /// Turn blocking off, optionally for a bounded time
    Disable {
        /// Seconds until blocking re-enables itself
        #[arg(long)]
        timer: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DomainAction {
    /// Add a domain to the list
    Add { domain: String },

    /// Remove a domain from the list
    Remove { domain: String },

    /// Show the domains on the list
    List,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Adjust log level based on verbose flag
    pub fn effective_log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }
}

/// Dispatch the parsed command against a configured client
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    if !config.render.enable_colors {
        colored::control::set_override(false);
    }

    let client = PiholeClient::new(config.api)?;

    match cli.command {
        Commands::Summary => {
            let summary = client.summary().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Top {
            blocked,
            count,
            chart,
        } => {
            let reply = client.top_domains(blocked, count).await?;
            if chart {
                let entries: Vec<(&str, u64)> = reply
                    .domains
                    .iter()
                    .map(|d| (d.domain.as_str(), d.count))
                    .collect();
                let title = if blocked {
                    "Top Blocked Domains"
                } else {
                    "Top Permitted Domains"
                };
                println!("{}", render::bar_chart(title, &entries, reply.total_queries));
            } else {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            }
        }
        Commands::Clients { count } => {
            let reply = client.top_clients(count).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Commands::Queries { count } => {
            let reply = client.recent_queries(count).await?;
            for record in &reply.queries {
                println!("{}", format_query_record(record));
            }
        }
        Commands::Blocking { action } => match action {
            BlockingAction::Status => {
                let status = client.blocking_status().await?;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            BlockingAction::Enable => {
                let status = client.enable_blocking().await?;
                if !status.is_enabled() {
                    anyhow::bail!("appliance reports blocking is {}", status.blocking);
                }
                println!("Blocking enabled");
            }
            BlockingAction::Disable { timer } => {
                let status = client.disable_blocking(timer).await?;
                if status.is_enabled() {
                    anyhow::bail!("appliance reports blocking is {}", status.blocking);
                }
                match timer {
                    Some(secs) => println!("Blocking disabled for {}s", secs),
                    None => println!("Blocking disabled"),
                }
            }
        },
        Commands::Allow { action } => run_domain_action(&client, ListKind::Allow, action).await?,
        Commands::Deny { action } => run_domain_action(&client, ListKind::Deny, action).await?,
        Commands::Gravity => {
            let reply = client.update_gravity().await?;
            if !reply.success {
                anyhow::bail!("appliance did not accept the gravity rebuild");
            }
            println!("Blocklist rebuild started");
        }
        Commands::Flush => {
            let reply = client.flush_cache().await?;
            if !reply.success {
                anyhow::bail!("appliance did not flush the cache");
            }
            println!("Resolver cache flushed");
        }
        Commands::Probe => {
            if client.probe().await {
                println!("Appliance reachable, credentials accepted");
            } else {
                println!("Appliance not reachable or credentials rejected");
            }
        }
        Commands::Dashboard => {
            // Fan out the reads; auxiliary fetches degrade to empty
            // sections instead of aborting the dashboard.
            let (summary, clients, blocked, permitted) = tokio::join!(
                client.summary(),
                client.top_clients(None),
                client.top_domains(true, None),
                client.top_domains(false, None),
            );

            let summary = summary?;
            let clients = clients
                .map(|r| r.clients)
                .unwrap_or_else(|err| {
                    warn!("Top clients fetch failed: {}", err);
                    Vec::new()
                });
            let blocked = blocked
                .map(|r| r.domains)
                .unwrap_or_else(|err| {
                    warn!("Top blocked fetch failed: {}", err);
                    Vec::new()
                });
            let permitted = permitted
                .map(|r| r.domains)
                .unwrap_or_else(|err| {
                    warn!("Top permitted fetch failed: {}", err);
                    Vec::new()
                });

            println!("{}", render::dashboard(&summary, &clients, &blocked, &permitted));
        }
    }

    Ok(())
}

async fn run_domain_action(
    client: &PiholeClient,
    kind: ListKind,
    action: DomainAction,
) -> Result<()> {
    match action {
        DomainAction::Add { domain } => {
            client.add_domain(kind, &domain).await?;
            println!("Added {} to {} list", domain, kind.as_path());
        }
        DomainAction::Remove { domain } => {
            client.remove_domain(kind, &domain).await?;
            println!("Removed {} from {} list", domain, kind.as_path());
        }
        DomainAction::List => {
            let domains = client.list_domains(kind).await?;
            if domains.is_empty() {
                println!("({} list is empty)", kind.as_path());
            } else {
                for domain in domains {
                    println!("{}", domain);
                }
            }
        }
    }
    Ok(())
}

/// One query log line: local time, type, domain, client, status
fn format_query_record(record: &QueryRecord) -> String {
    let time = DateTime::<Utc>::from_timestamp(record.time as i64, 0)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    let client = record
        .client
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or(record.client.ip.as_deref())
        .unwrap_or("-");

    format!(
        "{}  {:<6} {:<40} {:<20} {}",
        time,
        record.query_type.as_deref().unwrap_or("-"),
        record.domain,
        client,
        record.status.as_deref().unwrap_or("-")
    )
}
