use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkingError {
    #[error("Vehicle {license} is already parked")]
    AlreadyParked { license: String },

    #[error("Parking lot is full ({capacity} slots occupied)")]
    LotFull { capacity: usize },

    #[error("Vehicle {license} is not parked")]
    NotParked { license: String },

    #[error("Invalid slot {slot} (lot has {capacity} slots)")]
    InvalidSlot { slot: usize, capacity: usize },

    #[error("Record store is corrupt: {message}")]
    CorruptStore { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vehicle {field} '{value}': {reason}")]
    InvalidVehicle {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} '{value}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// csv wraps both I/O failures and malformed rows; only the latter mean the
/// store content itself is bad.
impl From<csv::Error> for ParkingError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => ParkingError::Io(io),
            _ => ParkingError::CorruptStore { message },
        }
    }
}

impl From<toml::de::Error> for ParkingError {
    fn from(err: toml::de::Error) -> Self {
        ParkingError::ConfigError {
            message: format!("TOML parsing error: {}", err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Occupancy,
    Input,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ParkingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParkingError::AlreadyParked { .. }
            | ParkingError::LotFull { .. }
            | ParkingError::NotParked { .. }
            | ParkingError::InvalidSlot { .. } => ErrorCategory::Occupancy,
            ParkingError::InvalidVehicle { .. } => ErrorCategory::Input,
            ParkingError::CorruptStore { .. } | ParkingError::Io(_) => ErrorCategory::Storage,
            ParkingError::ConfigError { .. } | ParkingError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ParkingError::AlreadyParked { .. } => ErrorSeverity::Low,
            ParkingError::LotFull { .. }
            | ParkingError::NotParked { .. }
            | ParkingError::InvalidVehicle { .. } => ErrorSeverity::Medium,
            ParkingError::InvalidSlot { .. }
            | ParkingError::ConfigError { .. }
            | ParkingError::InvalidConfigValue { .. } => ErrorSeverity::High,
            ParkingError::CorruptStore { .. } | ParkingError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ParkingError::AlreadyParked { license } => {
                format!("Vehicle {} is already parked.", license)
            }
            ParkingError::LotFull { .. } => "Parking full!".to_string(),
            ParkingError::NotParked { license } => format!("Vehicle {} not found!", license),
            ParkingError::InvalidSlot { slot, .. } => format!("Slot {} does not exist or is empty.", slot),
            ParkingError::CorruptStore { message } => {
                format!("The parking data file is damaged: {}", message)
            }
            ParkingError::Io(e) => format!("Could not read or write the parking data file: {}", e),
            ParkingError::InvalidVehicle { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            ParkingError::ConfigError { message } => format!("Configuration problem: {}", message),
            ParkingError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value {} is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ParkingError::AlreadyParked { .. } => "Remove the vehicle first if it is leaving",
            ParkingError::LotFull { .. } => "Wait for a vehicle to leave and try again",
            ParkingError::NotParked { .. } => "Check the license plate with the status command",
            ParkingError::InvalidSlot { .. } => "Use a slot number between 1 and the lot capacity",
            ParkingError::CorruptStore { .. } => {
                "Inspect the data file; every row needs license,type,slot,time with integer slot and time"
            }
            ParkingError::Io(_) => "Check that the data file's directory exists and is writable",
            ParkingError::InvalidVehicle { .. } => {
                "License plates must be non-empty; commas, quotes and line breaks are not supported"
            }
            ParkingError::ConfigError { .. } | ParkingError::InvalidConfigValue { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ParkingError>;
