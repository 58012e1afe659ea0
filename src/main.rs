use clap::Parser;
use lotkeeper::utils::error::ErrorSeverity;
use lotkeeper::utils::{logger, validation::Validate};
use lotkeeper::{
    CliConfig, Command, CsvRecordStore, ParkingEngine, ParkingError, SystemClock, Vehicle,
};

fn run(cli: &CliConfig) -> Result<(), ParkingError> {
    let config = cli.lot_config()?;
    config.validate()?;
    tracing::debug!("Lot config: {:?}", config);

    let store = CsvRecordStore::new(config.data_file());
    let mut engine = ParkingEngine::with_options(
        config.capacity(),
        store,
        config.fee_schedule(),
        SystemClock,
    )?;

    match &cli.command {
        Command::Park {
            license,
            vehicle_type,
        } => {
            let slot = engine.park(Vehicle::new(license.as_str(), vehicle_type.as_str()))?;
            println!("Vehicle parked in slot {}", slot);
        }
        Command::Remove { license } => {
            let receipt = engine.remove(license)?;
            println!(
                "Vehicle {} removed after {:.2} hour(s). Parking fee: {}",
                receipt.license, receipt.hours, receipt.fee
            );
        }
        Command::Status { json } => {
            let status = engine.status();
            if *json {
                let rendered = serde_json::to_string_pretty(&status)
                    .map_err(|e| ParkingError::Io(e.into()))?;
                println!("{}", rendered);
            } else {
                for slot in &status {
                    println!("{}", slot);
                }
                println!("{} of {} slots free", engine.available(), engine.capacity());
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(&cli) {
        tracing::error!(
            "{} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}
