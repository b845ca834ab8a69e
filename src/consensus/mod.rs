// Consensus rules and parameters
// This module provides consensus-related parameters for the Kindcoin networks

pub mod params;

pub use params::{
    Bip9Deployment, ConsensusParams, DeploymentId, MAINNET_GENESIS_HASH,
    MAX_VERSION_BITS_DEPLOYMENTS, TESTNET_GENESIS_HASH,
};

use crate::chainparams::ChainParamsError;
use crate::config::Network;

/// Get consensus parameters for a specific network
pub fn get_consensus_params(network: Network) -> Result<ConsensusParams, ChainParamsError> {
    match network {
        Network::Main => ConsensusParams::mainnet(),
        Network::Test => ConsensusParams::testnet(),
        Network::Regtest => ConsensusParams::regtest(),
    }
}
