//! `stats` command: row counts and storage sizes.

use anyhow::Context;
use clap::{Args, Subcommand};
use seed_populate::EntityStore;
use seed_populate_postgresql::args::PostgreSQLConnectionArgs;
use seed_populate_postgresql::PostgreSQLStore;

use crate::populate::mask_connection_password;

/// Store to read statistics from.
#[derive(Subcommand)]
pub enum StatsTarget {
    /// Read statistics from a PostgreSQL database
    #[command(name = "postgresql")]
    PostgreSQL {
        #[command(flatten)]
        connection: PostgreSQLConnectionArgs,

        #[command(flatten)]
        output: StatsOutputArgs,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct StatsOutputArgs {
    /// Print the statistics as JSON on stdout instead of logging them
    #[arg(long)]
    pub json: bool,
}

pub async fn run_stats(target: StatsTarget) -> anyhow::Result<()> {
    match target {
        StatsTarget::PostgreSQL { connection, output } => {
            tracing::info!(
                "Connecting to PostgreSQL at {}",
                mask_connection_password(&connection.postgresql_connection_string)
            );
            let store = PostgreSQLStore::connect(&connection.postgresql_connection_string)
                .await
                .context("Failed to connect to PostgreSQL")?;
            let statistics = store
                .statistics()
                .await
                .context("Failed to read table statistics")?;

            if output.json {
                println!("{}", serde_json::to_string_pretty(&statistics)?);
            } else {
                statistics.log();
            }
            Ok(())
        }
    }
}
