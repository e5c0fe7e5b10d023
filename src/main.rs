//! Crimecast CLI
//!
//! Command-line front-end for the prediction API:
//! - List selector metadata
//! - Locate a neighborhood
//! - Request a prediction and place it on the map
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use crimecast::config::{generate_default_config, Config};
use crimecast::directory::{CollisionPolicy, DirectoryLoader, Gazetteer};
use crimecast::http::ApiClient;
use crimecast::prediction::PredictionForm;
use crimecast::presenter::{ConsolePage, TerminalMap};
use crimecast::session::{Session, SubmitOutcome};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "crimecast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query crime probabilities by neighborhood and show them on a map")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./crimecast.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Prediction API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Duplicate neighborhood policy (last_write_wins, reject, per_city)
    #[arg(long, global = true)]
    pub policy: Option<CollisionPolicy>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List cities, neighborhoods and crime types
    Metadata,

    /// Show the coordinates of a neighborhood
    Locate {
        /// Neighborhood name (exact, case-sensitive)
        bairro: String,
        /// City, used only by the per_city policy
        #[arg(long, default_value = "")]
        cidade: String,
    },

    /// Request a crime probability
    Predict {
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        dia: String,
        /// Time (HH:MM), defaults to the configured sentinel
        #[arg(long, default_value = "")]
        hora: String,
        /// City
        #[arg(long)]
        cidade: String,
        /// Neighborhood
        #[arg(long)]
        bairro: String,
        /// Crime type
        #[arg(long)]
        tipo_crime: String,
        /// Write the resulting marker as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(policy) = cli.policy {
        config.directory.collision_policy = policy;
    }

    crimecast::logging::init(&config.logging);
    tracing::info!("Crimecast v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let mut loader = DirectoryLoader::new(config.directory.collision_policy);
    if let Some(path) = &config.directory.gazetteer {
        loader = loader.with_gazetteer(Gazetteer::from_path(path)?);
    }

    let client = Arc::new(ApiClient::new(&config.api)?);
    let mut session = Session::new(
        client.clone(),
        client,
        loader,
        config.map.to_settings(),
        config.form.default_hora.clone(),
    );

    let mut page = ConsolePage::stdio();

    match cli.command {
        Commands::Metadata => {
            let mut map = TerminalMap::new(std::io::sink());
            if session.on_page_load(&mut page, &mut map).await.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Locate { bairro, cidade } => {
            let mut map = TerminalMap::new(std::io::sink());
            let mut quiet = ConsolePage::new(std::io::sink(), std::io::stderr());
            if session.on_page_load(&mut quiet, &mut map).await.is_err() {
                std::process::exit(1);
            }

            match session.directory().lookup(&cidade, &bairro) {
                Some(record) => {
                    let city = record.city.as_deref().unwrap_or("-");
                    println!("{} ({}): {}", record.name, city, record.coordinates());
                }
                None => {
                    eprintln!("Coordinates for neighborhood '{}' not found.", bairro);
                    std::process::exit(1);
                }
            }
        }

        Commands::Predict {
            dia,
            hora,
            cidade,
            bairro,
            tipo_crime,
            geojson,
        } => {
            let mut map = TerminalMap::new(std::io::stdout());
            let mut quiet = ConsolePage::new(std::io::sink(), std::io::stderr());
            if session.on_page_load(&mut quiet, &mut map).await.is_err() {
                std::process::exit(1);
            }

            let form = PredictionForm {
                dia,
                hora,
                cidade,
                bairro,
                tipo_crime,
            };

            match session.on_submit(form, &mut page, &mut map).await {
                Ok(SubmitOutcome::Shown { placed: None, .. }) => {
                    tracing::warn!("Result shown without a map marker");
                }
                Ok(_) => {}
                Err(_) => std::process::exit(1),
            }

            if let Some(path) = geojson {
                let content = serde_json::to_string_pretty(&map.to_geojson())?;
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Marker written to {:?}", path);
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}
