// Node configuration
// Network selection, logging and regtest deployment overrides

use crate::chainparams::ChainParamsError;
use crate::consensus::DeploymentId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable that overrides the configured network
pub const NETWORK_ENV: &str = "KINDCOIN_NETWORK";
/// Environment variable that overrides the configured log level
pub const LOG_ENV: &str = "KINDCOIN_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];

    /// Identifier string used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }

    /// Identify a network from the message start bytes of a P2P frame
    pub fn from_magic(magic: [u8; 4]) -> Option<Network> {
        Network::ALL
            .into_iter()
            .find(|network| network.magic() == magic)
    }

    /// 4-byte message start prefix
    pub fn magic(&self) -> [u8; 4] {
        match self {
            Network::Main => [0xd5, 0xf3, 0x42, 0x1c],
            Network::Test => [0x0e, 0x8f, 0x1e, 0x71],
            Network::Regtest => [0xd5, 0xf3, 0x42, 0x06],
        }
    }

    /// Default P2P listen port
    pub fn default_port(&self) -> u16 {
        match self {
            Network::Main => 21538,
            Network::Test => 31538,
            Network::Regtest => 35714,
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Main
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ChainParamsError::UnknownNetwork(other.to_string())),
        }
    }
}

/// A `name:start:timeout` override for a regtest version-bits deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentOverride {
    pub deployment: DeploymentId,
    pub start_time: i64,
    pub timeout: i64,
}

impl FromStr for DeploymentOverride {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(ChainParamsError::InvalidConstant(format!(
                "deployment override must be name:start:timeout, got {}",
                s
            )));
        }

        let deployment = parts[0].parse::<DeploymentId>()?;
        let parse_time = |value: &str| {
            value.parse::<i64>().map_err(|e| {
                ChainParamsError::InvalidConstant(format!("invalid time {} in {}: {}", value, s, e))
            })
        };

        Ok(Self {
            deployment,
            start_time: parse_time(parts[1])?,
            timeout: parse_time(parts[2])?,
        })
    }
}

impl TryFrom<String> for DeploymentOverride {
    type Error = ChainParamsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeploymentOverride> for String {
    fn from(value: DeploymentOverride) -> Self {
        format!("{}:{}:{}", value.deployment, value.start_time, value.timeout)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: Network,
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Only honoured on regtest
    pub deployment_overrides: Vec<DeploymentOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Main,
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            deployment_overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        if let Ok(network) = std::env::var(NETWORK_ENV) {
            config.network = network
                .parse()
                .with_context(|| format!("{} is not a valid network", NETWORK_ENV))?;
        }
        if let Ok(level) = std::env::var(LOG_ENV) {
            config.log_level = level;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            data_dir: PathBuf::from("./data").join(network.as_str()),
            ..Config::default()
        }
    }

    pub fn is_regtest(&self) -> bool {
        matches!(self.network, Network::Regtest)
    }
}
