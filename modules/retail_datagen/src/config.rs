//! Configuration for a generation run
//!
//! Layered with figment: built-in defaults, then an optional YAML file, then
//! environment variables (`NUM_CUSTOMERS`, `NUM_ORDERS`, `START_DATE`,
//! `END_DATE`, `DATABASE`, `DATABASE_URL`, `REFERENCE_DATA_PATH`,
//! `PRODUCT_DATA_PATH`, `SEED`). Raw values are validated into
//! [`GenerationSettings`] before anything touches the sink.

use crate::contract::DatagenError;
use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables read by [`Config::figment`]
pub const ENV_KEYS: [&str; 9] = [
    "num_customers",
    "num_orders",
    "start_date",
    "end_date",
    "database",
    "database_url",
    "reference_data_path",
    "product_data_path",
    "seed",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw run configuration, as read from the providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of customers to generate
    #[serde(default = "default_num_customers")]
    pub num_customers: i64,

    /// Number of orders to generate
    #[serde(default = "default_num_orders")]
    pub num_orders: i64,

    /// First day of the order date window (inclusive, `YYYY-MM-DD`)
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Last day of the order date window (inclusive, `YYYY-MM-DD`)
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// Target namespace inside the document store
    #[serde(default = "default_database")]
    pub database: String,

    /// Connection string of the document store
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Store/year reference catalog
    #[serde(default = "default_reference_data_path")]
    pub reference_data_path: PathBuf,

    /// Category/product catalog
    #[serde(default = "default_product_data_path")]
    pub product_data_path: PathBuf,

    /// Fixes the random source when set
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_customers: default_num_customers(),
            num_orders: default_num_orders(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            database: default_database(),
            database_url: default_database_url(),
            reference_data_path: default_reference_data_path(),
            product_data_path: default_product_data_path(),
            seed: None,
        }
    }
}

fn default_num_customers() -> i64 {
    25_000
}

fn default_num_orders() -> i64 {
    100_000
}

fn default_start_date() -> String {
    "2022-12-09".to_string()
}

fn default_end_date() -> String {
    "2025-12-09".to_string()
}

fn default_database() -> String {
    "retail-demo".to_string()
}

fn default_database_url() -> String {
    "sqlite://retail-demo.db?mode=rwc".to_string()
}

fn default_reference_data_path() -> PathBuf {
    PathBuf::from("data/reference_data.json")
}

fn default_product_data_path() -> PathBuf {
    PathBuf::from("data/product_data.json")
}

/// Validated settings consumed by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub num_customers: u64,
    pub num_orders: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub database: String,
    pub database_url: String,
    pub reference_data_path: PathBuf,
    pub product_data_path: PathBuf,
    pub seed: Option<u64>,
}

impl Config {
    /// Provider stack: defaults, optional YAML file, environment
    pub fn figment(yaml: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = yaml {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::raw().only(&ENV_KEYS))
    }

    /// Extract a configuration from any figment
    pub fn from_figment(figment: &Figment) -> Result<Self, DatagenError> {
        figment.extract().map_err(|e| {
            let key = if e.path.is_empty() {
                "config".to_string()
            } else {
                e.path.join(".")
            };
            DatagenError::config(key, e.to_string())
        })
    }

    /// Load from defaults, the optional YAML file and the environment
    pub fn load(yaml: Option<&Path>) -> Result<Self, DatagenError> {
        Self::from_figment(&Self::figment(yaml))
    }

    /// Validate raw values into [`GenerationSettings`]
    pub fn validate(&self) -> Result<GenerationSettings, DatagenError> {
        let num_customers = positive("NUM_CUSTOMERS", self.num_customers)?;
        let num_orders = positive("NUM_ORDERS", self.num_orders)?;
        let start_date = parse_date("START_DATE", &self.start_date)?;
        let end_date = parse_date("END_DATE", &self.end_date)?;

        if end_date < start_date {
            return Err(DatagenError::config(
                "END_DATE",
                format!("{} is before START_DATE {}", end_date, start_date),
            ));
        }

        if self.database.trim().is_empty() {
            return Err(DatagenError::config("DATABASE", "namespace cannot be empty"));
        }

        if self.database_url.trim().is_empty() {
            return Err(DatagenError::config("DATABASE_URL", "cannot be empty"));
        }

        Ok(GenerationSettings {
            num_customers,
            num_orders,
            start_date,
            end_date,
            database: self.database.clone(),
            database_url: self.database_url.clone(),
            reference_data_path: self.reference_data_path.clone(),
            product_data_path: self.product_data_path.clone(),
            seed: self.seed,
        })
    }
}

fn positive(key: &str, value: i64) -> Result<u64, DatagenError> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            DatagenError::config(key, format!("must be a positive integer, got {}", value))
        })
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, DatagenError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        DatagenError::config(key, format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
    })
}
