use crate::adapters::csv_store::DEFAULT_DATA_FILE;
use crate::core::fee::{FeeSchedule, DEFAULT_BASE_FEE, DEFAULT_HOURLY_RATE};
use crate::utils::error::{ParkingError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotConfig {
    pub lot: LotSection,
    pub pricing: PricingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotSection {
    pub capacity: usize,
    pub data_file: String,
}

impl Default for LotSection {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    pub base_fee: u64,
    pub hourly_rate: u64,
}

impl Default for PricingSection {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            hourly_rate: DEFAULT_HOURLY_RATE,
        }
    }
}

impl LotConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with environment values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// Unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ParkingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn capacity(&self) -> usize {
        self.lot.capacity
    }

    pub fn data_file(&self) -> &str {
        &self.lot.data_file
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            base_fee: self.pricing.base_fee,
            hourly_rate: self.pricing.hourly_rate,
        }
    }
}

impl Validate for LotConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("lot.capacity", self.lot.capacity as u64, 1)?;
        validate_path("lot.data_file", &self.lot.data_file)?;
        validate_positive_number("pricing.hourly_rate", self.pricing.hourly_rate, 1)?;
        Ok(())
    }
}
