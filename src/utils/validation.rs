use crate::utils::error::{ParkingError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Characters the record store format cannot represent inside a field.
const UNSUPPORTED_FIELD_CHARS: [char; 4] = [',', '"', '\r', '\n'];

pub fn validate_store_field(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ParkingError::InvalidVehicle {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }

    if value.trim() != value {
        return Err(ParkingError::InvalidVehicle {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot start or end with whitespace".to_string(),
        });
    }

    if let Some(c) = value.chars().find(|c| UNSUPPORTED_FIELD_CHARS.contains(c)) {
        return Err(ParkingError::InvalidVehicle {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Character {:?} is not supported by the data file format", c),
        });
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ParkingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ParkingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ParkingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}
