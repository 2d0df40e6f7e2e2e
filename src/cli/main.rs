use anyhow::Context;
use clap::{Parser, Subcommand};
use incident_intel::{
    config::Config,
    enrichment::{EngineOptions, EnrichmentEngine},
    llm::{GroqClient, LanguageModel},
    store::{IncidentStore, Query, TableApiStore},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "incident-intel-cli")]
#[command(about = "AI incident intelligence from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich an incident and append the intelligence to its work notes
    Enrich {
        /// Incident number, e.g. INC0012345
        #[arg(value_name = "NUMBER")]
        number: Option<String>,

        /// Address the incident by sys_id instead of number
        #[arg(long)]
        sys_id: Option<String>,

        /// Print the composed work note after enriching
        #[arg(long)]
        show_note: bool,
    },

    /// Probe connectivity to the incident table API
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    let store: Arc<dyn IncidentStore> = Arc::new(TableApiStore::from_config(&config.table_api)?);

    match cli.command {
        Commands::Enrich {
            number,
            sys_id,
            show_note,
        } => {
            let model: Arc<dyn LanguageModel> = Arc::new(GroqClient::from_config(&config.model)?);
            let engine = EnrichmentEngine::new(store, model, EngineOptions::from_config(&config));

            let outcome = match (number, sys_id) {
                (Some(number), None) => engine.enrich_by_number(&number).await?,
                (None, Some(sys_id)) => engine.enrich_by_sys_id(&sys_id).await?,
                _ => anyhow::bail!("pass an incident number or --sys-id, not both"),
            };

            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if show_note {
                println!();
                println!("{}", outcome.work_note);
            }
        }

        Commands::Ping => match store.query(&Query::new(), 1).await {
            Ok(_) => println!("Incident table API connection OK"),
            Err(e) => {
                eprintln!("Incident table API connection failed: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
