// Error types for network parameter selection and construction

use crate::config::Network;
use crate::genesis::GenesisError;
use bitcoin::{BlockHash, TxMerkleNode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainParamsError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
    #[error("No network selected")]
    NoNetworkSelected,
    #[error("Network registry has not been installed")]
    NotInstalled,
    #[error("Network registry already installed")]
    AlreadyInstalled,
    #[error(
        "Genesis mismatch on {network}: hash {actual_hash} (expected {expected_hash}), \
         merkle root {actual_merkle_root} (expected {expected_merkle_root})"
    )]
    GenesisMismatch {
        network: Network,
        expected_hash: BlockHash,
        actual_hash: BlockHash,
        expected_merkle_root: TxMerkleNode,
        actual_merkle_root: TxMerkleNode,
    },
    #[error("Deployment overrides are only permitted on regtest, not {0}")]
    OverrideNotPermitted(Network),
    #[error("Unknown deployment: {0}")]
    UnknownDeployment(String),
    #[error("Invalid constant: {0}")]
    InvalidConstant(String),
    #[error("Genesis error: {0}")]
    Genesis(#[from] GenesisError),
}
