/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub sim: SimConfig,
    pub building: BuildingConfig,
    #[serde(rename = "elevator")]
    pub elevators: Vec<ElevatorConfig>,
    #[serde(default, rename = "ride")]
    pub rides: Vec<RideConfig>,
}

#[derive(Deserialize, Clone, Copy)]
pub struct SimConfig {
    /// One abstract time unit in milliseconds; the minimum tick delay.
    #[serde(default = "default_precision")]
    pub precision: u64,
    #[serde(default = "default_max_txn_retries")]
    pub max_txn_retries: u32,
    /// First retry backoff in milliseconds.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: u64,
}

#[derive(Deserialize, Clone)]
pub struct BuildingConfig {
    pub id: String,
    pub floor_count: u8,
    /// Door-accessibility mask, padded with accessible floors when shorter
    /// than `floor_count`.
    #[serde(default)]
    pub doors: Vec<bool>,
}

#[derive(Deserialize, Clone)]
pub struct ElevatorConfig {
    pub name: String,
    /// Requested mask; the effective mask is the intersection with the
    /// building's. Empty inherits the building's mask.
    #[serde(default)]
    pub doors: Vec<bool>,
    pub speed_per_floor: u64,
    pub docking_speed: u64,
    pub time_on_dock: u64,
}

/// Ride submitted at startup, mainly for demo runs.
#[derive(Deserialize, Clone, Copy)]
pub struct RideConfig {
    pub pickup: u8,
    pub dropoff: u8,
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            precision: default_precision(),
            max_txn_retries: default_max_txn_retries(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

fn default_precision() -> u64 {
    100
}

fn default_max_txn_retries() -> u32 {
    5
}

fn default_retry_backoff() -> u64 {
    10
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Config {
    let config_str = fs::read_to_string(path).expect("Failed to read configuration file");
    toml::from_str(&config_str).expect("Failed to parse configuration file")
}
