//! filebundle Binary Entry Point
//!
//! Bundles the configured project files into a single text document.
//! Core functionality is provided by the `filebundle` library crate.

use clap::Parser;
use filebundle::{
    collector::Collector,
    config::{AppConfig, UnreadablePolicy},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// filebundle - Project File Bundler
#[derive(Parser, Debug)]
#[command(name = "filebundle", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, env = "FILEBUNDLE_CONFIG")]
    config: Option<String>,

    /// Base directory listed paths are resolved against (overrides config file)
    #[arg(short, long, env = "FILEBUNDLE_BASE_DIR")]
    base_dir: Option<String>,

    /// Output file (overrides config file)
    #[arg(short, long, env = "FILEBUNDLE_OUTPUT")]
    output: Option<String>,

    /// Handling of files that exist but cannot be read (overrides config file)
    #[arg(long, value_enum, env = "FILEBUNDLE_ON_UNREADABLE")]
    on_unreadable: Option<UnreadablePolicy>,

    /// Relative paths to collect, in order (replaces the configured list)
    files: Vec<String>,
}

impl Cli {
    /// Resolve the effective configuration (CLI > ENV > config file > defaults).
    fn into_config(self) -> Result<AppConfig, filebundle::ConfigError> {
        let mut config = match self.config {
            Some(ref path) => {
                tracing::info!("Loading configuration from: {}", path);
                AppConfig::load(path)?
            }
            None => AppConfig::default(),
        };

        if let Some(base_dir) = self.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(output) = self.output {
            config.output_file = output;
        }
        if let Some(policy) = self.on_unreadable {
            config.on_unreadable = policy;
        }
        if !self.files.is_empty() {
            config.files = self.files;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for the confirmation line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,filebundle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config()?;
    let output_file = config.output_file.clone();

    Collector::new(config).run()?;

    println!("All specified files have been saved in {}", output_file);
    Ok(())
}
