use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MAX_BASIS_POINTS: i64 = 10_000;
pub const DEFAULT_DENOM: &str = "umtr";
pub const LATEST_PARAMS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamName {
    /// Blocks between validator reward payouts; zero disables rewards.
    ValidatorPayoutCycle,
    /// Divisor applied to the reserve to get the yearly emission.
    EmissionCurve,
    BlocksPerYear,
    /// Share of every settled debt routed to the reserve, in basis points.
    ReserveTax,
    MaxBasisPoints,
}

impl ParamName {
    pub const ALL: [ParamName; 5] = [
        ParamName::ValidatorPayoutCycle,
        ParamName::EmissionCurve,
        ParamName::BlocksPerYear,
        ParamName::ReserveTax,
        ParamName::MaxBasisPoints,
    ];
}

pub trait ParamSourcePort: Send + Sync {
    fn version(&self) -> u32;

    fn param(&self, name: ParamName) -> i64;

    fn denom(&self) -> String;
}

/// Parameter values frozen for one engine session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub version: u32,
    pub denom: String,
    values: BTreeMap<ParamName, i64>,
}

impl ParamSnapshot {
    pub fn resolve(source: &dyn ParamSourcePort) -> Self {
        let values = ParamName::ALL
            .iter()
            .map(|name| (*name, source.param(*name)))
            .collect();
        Self {
            version: source.version(),
            denom: source.denom(),
            values,
        }
    }

    pub fn defaults_for(version: u32) -> Self {
        let values = ParamName::ALL
            .iter()
            .map(|name| (*name, default_value(version, *name)))
            .collect();
        Self {
            version,
            denom: DEFAULT_DENOM.to_string(),
            values,
        }
    }

    pub fn get(&self, name: ParamName) -> i64 {
        self.values.get(&name).copied().unwrap_or(0)
    }

    pub fn with_value(mut self, name: ParamName, value: i64) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn with_denom(mut self, denom: impl Into<String>) -> Self {
        self.denom = denom.into();
        self
    }
}

impl ParamSourcePort for ParamSnapshot {
    fn version(&self) -> u32 {
        self.version
    }

    fn param(&self, name: ParamName) -> i64 {
        self.get(name)
    }

    fn denom(&self) -> String {
        self.denom.clone()
    }
}

fn default_value(version: u32, name: ParamName) -> i64 {
    match version {
        1 => version_one_default(name),
        // unknown versions read the newest table, currently version 1
        _ => version_one_default(name),
    }
}

fn version_one_default(name: ParamName) -> i64 {
    match name {
        ParamName::ValidatorPayoutCycle => 5_256,
        ParamName::EmissionCurve => 6,
        ParamName::BlocksPerYear => 5_256_000,
        ParamName::ReserveTax => 1_000,
        ParamName::MaxBasisPoints => MAX_BASIS_POINTS,
    }
}

pub fn is_supported_version(version: u32) -> bool {
    (1..=LATEST_PARAMS_VERSION).contains(&version)
}

/// Versioned defaults with per-key overrides, as read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticParams {
    #[serde(default = "default_params_version")]
    pub version: u32,
    #[serde(default)]
    pub denom: Option<String>,
    #[serde(default)]
    pub overrides: BTreeMap<ParamName, i64>,
}

fn default_params_version() -> u32 {
    LATEST_PARAMS_VERSION
}

impl Default for StaticParams {
    fn default() -> Self {
        Self {
            version: default_params_version(),
            denom: None,
            overrides: BTreeMap::new(),
        }
    }
}

impl ParamSourcePort for StaticParams {
    fn version(&self) -> u32 {
        self.version
    }

    fn param(&self, name: ParamName) -> i64 {
        self.overrides
            .get(&name)
            .copied()
            .unwrap_or_else(|| default_value(self.version, name))
    }

    fn denom(&self) -> String {
        self.denom
            .clone()
            .unwrap_or_else(|| DEFAULT_DENOM.to_string())
    }
}
