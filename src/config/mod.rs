pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::LotConfig;
    use crate::utils::error::Result;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "lotkeeper")]
    #[command(about = "Track a parking lot's slots and bill vehicles on exit")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Number of slots (overrides the configuration file)
        #[arg(long)]
        pub capacity: Option<usize>,

        /// Record store location (overrides the configuration file)
        #[arg(long)]
        pub data_file: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Park a vehicle in the lowest free slot
        Park {
            license: String,
            /// Vehicle type, e.g. Car, Bike, Truck
            vehicle_type: String,
        },
        /// Remove a vehicle and print its fee
        Remove { license: String },
        /// Show every slot
        Status {
            #[arg(long)]
            json: bool,
        },
    }

    impl CliConfig {
        /// File configuration (or defaults) with command line overrides applied.
        pub fn lot_config(&self) -> Result<LotConfig> {
            let mut config = match &self.config {
                Some(path) => LotConfig::from_file(path)?,
                None => LotConfig::default(),
            };

            if let Some(capacity) = self.capacity {
                config.lot.capacity = capacity;
            }
            if let Some(data_file) = &self.data_file {
                config.lot.data_file = data_file.clone();
            }
            Ok(config)
        }
    }

}
