// Chain parameters
// Everything that distinguishes one Kindcoin network from another, plus the registry that selects one

use crate::config::Network;
use crate::consensus::ConsensusParams;
use crate::devfund::{self, DevFundError};
use crate::genesis::{self, GenesisBlock, GenesisError, SearchControl};
use bitcoin::block::Header;
use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, ScriptBuf, TxMerkleNode};
use std::collections::BTreeMap;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};
use tracing::{debug, warn};

pub mod error;
pub mod networks;
pub mod registry;

pub use error::ChainParamsError;
pub use registry::NetworkRegistry;

/// Kinds of base58 payload prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
}

impl Base58Type {
    pub const ALL: [Base58Type; 5] = [
        Base58Type::PubkeyAddress,
        Base58Type::ScriptAddress,
        Base58Type::SecretKey,
        Base58Type::ExtPublicKey,
        Base58Type::ExtSecretKey,
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A DNS seed: operator name and the hostname to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsSeed {
    pub name: &'static str,
    pub host: &'static str,
}

/// A pre-resolved peer address compiled into the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSpec {
    pub addr: Ipv6Addr,
    pub port: u16,
}

impl SeedSpec {
    pub fn socket_addr(&self) -> SocketAddr {
        match self.addr.to_ipv4_mapped() {
            Some(v4) => SocketAddr::from((v4, self.port)),
            None => SocketAddr::V6(SocketAddrV6::new(self.addr, self.port, 0, 0)),
        }
    }
}

/// Trusted block hashes and the chain statistics at the last of them
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointData {
    pub checkpoints: BTreeMap<u32, BlockHash>,
    /// UNIX timestamp of the last checkpoint block
    pub last_checkpoint_time: i64,
    /// Total number of transactions between genesis and the last checkpoint
    pub transactions_at_checkpoint: u64,
    /// Estimated number of transactions per day after the checkpoint
    pub transactions_per_day: f64,
}

/// How construction reacts when the rebuilt genesis block does not match the constants
#[derive(Debug, Clone, Default)]
pub enum GenesisCheck {
    /// Fail construction
    #[default]
    Enforce,
    /// Search for a valid nonce and log it, then fail construction anyway
    Regenerate(SearchControl),
}

/// The full parameter bundle for one network
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub network: Network,
    pub consensus: ConsensusParams,
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub prune_after_height: u64,
    pub genesis: GenesisBlock,
    pub dns_seeds: Vec<DnsSeed>,
    pub fixed_seeds: Vec<SeedSpec>,
    pub base58_prefixes: [&'static [u8]; 5],
    pub cashaddr_prefix: &'static str,
    pub checkpoint_data: CheckpointData,
    /// Dev fund payout addresses, the first one is active
    pub devfund_addresses: Vec<&'static str>,
    pub mining_requires_peers: bool,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    /// Whether RPC still reports the deprecated `testnet` field
    pub testnet_to_be_deprecated_field_rpc: bool,
}

impl ChainParams {
    /// Mainnet parameters; fails if the genesis block does not hash to the published constants
    pub fn main() -> Result<Self, ChainParamsError> {
        networks::main_params(&GenesisCheck::Enforce)
    }

    pub fn test() -> Result<Self, ChainParamsError> {
        networks::test_params(&GenesisCheck::Enforce)
    }

    pub fn regtest() -> Result<Self, ChainParamsError> {
        networks::regtest_params(&GenesisCheck::Enforce)
    }

    pub fn for_network(network: Network, check: &GenesisCheck) -> Result<Self, ChainParamsError> {
        match network {
            Network::Main => networks::main_params(check),
            Network::Test => networks::test_params(check),
            Network::Regtest => networks::regtest_params(check),
        }
    }

    pub fn network_id(&self) -> &'static str {
        self.network.as_str()
    }

    pub fn genesis_block(&self) -> &GenesisBlock {
        &self.genesis
    }

    pub fn genesis_hash(&self) -> BlockHash {
        self.consensus.genesis_hash
    }

    pub fn is_genesis_hash(&self, hash: &BlockHash) -> bool {
        *hash == self.consensus.genesis_hash
    }

    /// Check if a header is the genesis header for this network
    pub fn is_genesis_header(&self, header: &Header) -> Result<bool, GenesisError> {
        Ok(header.prev_blockhash == BlockHash::all_zeros()
            && self.is_genesis_hash(&genesis::pow_hash(header)?))
    }

    pub fn base58_prefix(&self, kind: Base58Type) -> &'static [u8] {
        self.base58_prefixes[kind.index()]
    }

    pub fn checkpoint(&self, height: u32) -> Option<&BlockHash> {
        self.checkpoint_data.checkpoints.get(&height)
    }

    pub fn last_checkpoint(&self) -> Option<(u32, &BlockHash)> {
        self.checkpoint_data
            .checkpoints
            .iter()
            .next_back()
            .map(|(height, hash)| (*height, hash))
    }

    /// The active dev fund address
    pub fn devfund_address(&self) -> Result<&'static str, DevFundError> {
        self.devfund_addresses
            .first()
            .copied()
            .ok_or(DevFundError::MissingAddress(self.network))
    }

    /// Locking script paying the active dev fund address
    pub fn devfund_payout_script(&self) -> Result<ScriptBuf, DevFundError> {
        devfund::resolve_payout_script(self)
    }
}

/// Compare a freshly built genesis block against the published constants
pub(crate) fn verify_genesis(
    network: Network,
    block: GenesisBlock,
    expected_hash: BlockHash,
    expected_merkle_root: TxMerkleNode,
    check: &GenesisCheck,
) -> Result<GenesisBlock, ChainParamsError> {
    let actual_hash = block.block_hash()?;
    let actual_merkle_root = block.merkle_root();

    if actual_hash == expected_hash && actual_merkle_root == expected_merkle_root {
        debug!("Verified {} genesis block {}", network, actual_hash);
        return Ok(block);
    }

    warn!(
        "{} genesis block hashes to {} with merkle root {}, expected {} and {}",
        network, actual_hash, actual_merkle_root, expected_hash, expected_merkle_root
    );

    if let GenesisCheck::Regenerate(control) = check {
        genesis::search::regenerate(network.as_str(), &block, control)?;
    }

    Err(ChainParamsError::GenesisMismatch {
        network,
        expected_hash,
        actual_hash,
        expected_merkle_root,
        actual_merkle_root,
    })
}
