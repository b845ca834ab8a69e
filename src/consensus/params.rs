// Network parameters and consensus rules
// This module defines the consensus parameters for the Kindcoin networks

use crate::chainparams::ChainParamsError;
use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, Target, Work};
use std::fmt;
use std::str::FromStr;

/// Version-bits soft-fork deployments known to this chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentId {
    TestDummy,
}

/// Number of entries in the deployment table
pub const MAX_VERSION_BITS_DEPLOYMENTS: usize = 1;

impl DeploymentId {
    pub const ALL: [DeploymentId; MAX_VERSION_BITS_DEPLOYMENTS] = [DeploymentId::TestDummy];

    pub fn index(&self) -> usize {
        match self {
            DeploymentId::TestDummy => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeploymentId::TestDummy => "testdummy",
        }
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeploymentId {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| ChainParamsError::UnknownDeployment(s.to_string()))
    }
}

/// BIP9 signalling window for one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip9Deployment {
    /// Bit position in the block version (0-31)
    pub bit: u8,
    /// Median time past at which signalling may begin
    pub start_time: i64,
    /// Median time past after which the deployment fails
    pub timeout: i64,
}

impl Bip9Deployment {
    /// The January 2008 test window shared by every network
    pub const TEST_DUMMY: Bip9Deployment = Bip9Deployment {
        bit: 28,
        start_time: 1_199_145_601,
        timeout: 1_230_767_999,
    };

    /// Version mask this deployment signals with
    pub fn mask(&self) -> u32 {
        1u32 << self.bit
    }
}

/// Consensus parameters for a specific Kindcoin network
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusParams {
    /// Genesis block hash for this network
    pub genesis_hash: BlockHash,
    /// Deepest reorganization a node will follow
    pub max_reorganization_depth: u32,
    pub majority_enforce_block_upgrade: u32,
    pub majority_reject_block_outdated: u32,
    pub majority_window: u32,
    /// Maximum allowed proof-of-work target (minimum difficulty)
    pub pow_limit: Target,
    pub pos_limit: Target,
    pub pos_limit_v2: Target,
    /// Target timespan for difficulty adjustment in seconds
    pub target_timespan: u32,
    /// Block spacing before protocol v2
    pub target_spacing_v1: u32,
    pub target_spacing: u32,
    /// Height at which BIP34 activated, `None` if it never did
    pub bip34_height: Option<u32>,
    pub bip34_hash: BlockHash,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,
    pub pos_no_retargeting: bool,
    /// The best chain should have at least this much work
    pub minimum_chain_work: Work,
    pub protocol_v1_retargeting_fixed_time: u32,
    pub protocol_v2_time: u32,
    pub protocol_v3_time: u32,
    pub protocol_v3_1_time: u32,
    /// Last height at which proof-of-work blocks are accepted
    pub last_pow_block: u32,
    /// Stake timestamps must have these bits clear
    pub stake_timestamp_mask: u32,
    pub coinbase_maturity: u32,
    /// Blocks in a window that must signal for a deployment to lock in
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub deployments: [Bip9Deployment; MAX_VERSION_BITS_DEPLOYMENTS],
}

/// Mainnet genesis block hash
pub const MAINNET_GENESIS_HASH: &str =
    "00000b798a1040f831d48d2ca7099cd7d7ebb1565a8c7f10811b8a91bd014265";
/// Testnet and regtest share a genesis block
pub const TESTNET_GENESIS_HASH: &str =
    "0000ab09572ccda6fc69e6aebce56316efc11b33245594aac80b1257c0f254ce";

const LIMIT_20_BITS: &str = "00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
const LIMIT_16_BITS: &str = "0000ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Parse a displayed (byte-reversed) hash constant
pub(crate) fn hash_from_hex<T>(hex: &str) -> Result<T, ChainParamsError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    T::from_str(hex).map_err(|e| ChainParamsError::InvalidConstant(format!("{}: {}", hex, e)))
}

fn be_bytes_from_hex(hex: &str) -> Result<[u8; 32], ChainParamsError> {
    let bytes = hex::decode(hex)
        .map_err(|e| ChainParamsError::InvalidConstant(format!("{}: {}", hex, e)))?;
    bytes
        .try_into()
        .map_err(|_| ChainParamsError::InvalidConstant(format!("{}: expected 32 bytes", hex)))
}

pub(crate) fn target_from_hex(hex: &str) -> Result<Target, ChainParamsError> {
    be_bytes_from_hex(hex).map(Target::from_be_bytes)
}

pub(crate) fn work_from_hex(hex: &str) -> Result<Work, ChainParamsError> {
    be_bytes_from_hex(hex).map(Work::from_be_bytes)
}

impl ConsensusParams {
    /// Get consensus parameters for Kindcoin mainnet
    pub fn mainnet() -> Result<Self, ChainParamsError> {
        Ok(Self {
            genesis_hash: hash_from_hex(MAINNET_GENESIS_HASH)?,
            max_reorganization_depth: 500,
            majority_enforce_block_upgrade: 750,
            majority_reject_block_outdated: 950,
            majority_window: 1000,
            pow_limit: target_from_hex(LIMIT_20_BITS)?,
            pos_limit: target_from_hex(LIMIT_20_BITS)?,
            pos_limit_v2: target_from_hex(LIMIT_20_BITS)?,
            target_timespan: 10 * 60, // 10 minutes
            target_spacing_v1: 5 * 60,
            target_spacing: 5 * 60,
            bip34_height: None,
            bip34_hash: BlockHash::all_zeros(),
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            pos_no_retargeting: false,
            minimum_chain_work: work_from_hex(
                "0000000000000000000000000000000000000000000000000000000000100001",
            )?,
            protocol_v1_retargeting_fixed_time: 1_736_503_869,
            protocol_v2_time: 1_736_503_870,
            protocol_v3_time: 1_736_503_871,
            protocol_v3_1_time: 4_102_437_600,
            last_pow_block: 1_000_000,
            stake_timestamp_mask: 0xf,
            coinbase_maturity: 20,
            rule_change_activation_threshold: 2, // 95% of 2
            miner_confirmation_window: 2,        // target_timespan / target_spacing
            deployments: [Bip9Deployment::TEST_DUMMY],
        })
    }

    /// Get consensus parameters for Kindcoin testnet
    pub fn testnet() -> Result<Self, ChainParamsError> {
        Ok(Self {
            genesis_hash: hash_from_hex(TESTNET_GENESIS_HASH)?,
            max_reorganization_depth: 500,
            majority_enforce_block_upgrade: 750,
            majority_reject_block_outdated: 950,
            majority_window: 1000,
            pow_limit: target_from_hex(LIMIT_16_BITS)?,
            pos_limit: target_from_hex(LIMIT_20_BITS)?,
            pos_limit_v2: target_from_hex(LIMIT_20_BITS)?,
            target_timespan: 10 * 60,
            target_spacing_v1: 5 * 60,
            target_spacing: 5 * 60,
            bip34_height: None,
            bip34_hash: BlockHash::all_zeros(),
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: false,
            pos_no_retargeting: false,
            minimum_chain_work: work_from_hex(
                "0000000000000000000000000000000000000000000000302f630a91c2ec0230",
            )?,
            protocol_v1_retargeting_fixed_time: 1_736_503_869,
            protocol_v2_time: 1_736_503_870,
            protocol_v3_time: 1_736_503_871,
            protocol_v3_1_time: 1_736_503_872,
            last_pow_block: 0x7fff_ffff,
            stake_timestamp_mask: 0xf,
            coinbase_maturity: 10,
            rule_change_activation_threshold: 1512, // 75% for testchains
            miner_confirmation_window: 2,
            deployments: [Bip9Deployment::TEST_DUMMY],
        })
    }

    /// Get consensus parameters for the local regression test network
    pub fn regtest() -> Result<Self, ChainParamsError> {
        Ok(Self {
            genesis_hash: hash_from_hex(TESTNET_GENESIS_HASH)?,
            max_reorganization_depth: 50,
            majority_enforce_block_upgrade: 51,
            majority_reject_block_outdated: 75,
            majority_window: 100,
            pow_limit: target_from_hex(LIMIT_16_BITS)?,
            pos_limit: target_from_hex(LIMIT_20_BITS)?,
            pos_limit_v2: target_from_hex(LIMIT_20_BITS)?,
            target_timespan: 10 * 60,
            target_spacing_v1: 64,
            target_spacing: 5 * 60,
            // BIP34 has not necessarily activated on regtest
            bip34_height: None,
            bip34_hash: BlockHash::all_zeros(),
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: true,
            pos_no_retargeting: true,
            minimum_chain_work: Work::from_be_bytes([0; 32]),
            protocol_v1_retargeting_fixed_time: 1_736_503_869,
            protocol_v2_time: 1_736_503_870,
            protocol_v3_time: 1_736_503_871,
            protocol_v3_1_time: 4_102_437_600,
            last_pow_block: 1000,
            stake_timestamp_mask: 0xf,
            coinbase_maturity: 10,
            rule_change_activation_threshold: 108, // 75% of 144
            miner_confirmation_window: 144,
            deployments: [Bip9Deployment::TEST_DUMMY],
        })
    }

    /// Get the maximum allowed target as a Target type
    pub fn pow_limit_target(&self) -> Target {
        self.pow_limit
    }

    /// Check if a target is within the network's PoW limit
    pub fn is_target_valid(&self, target: &Target) -> bool {
        *target <= self.pow_limit
    }

    /// Number of blocks between difficulty adjustments
    pub fn difficulty_adjustment_interval(&self) -> u32 {
        self.target_timespan / self.target_spacing
    }

    /// Get the expected time for a difficulty adjustment period
    pub fn expected_timespan(&self) -> u32 {
        self.difficulty_adjustment_interval() * self.target_spacing
    }

    pub fn deployment(&self, id: DeploymentId) -> &Bip9Deployment {
        &self.deployments[id.index()]
    }

    pub fn is_protocol_v2(&self, time: u32) -> bool {
        time > self.protocol_v2_time
    }

    pub fn is_protocol_v3(&self, time: u32) -> bool {
        time > self.protocol_v3_time
    }

    pub fn is_protocol_v3_1(&self, time: u32) -> bool {
        time > self.protocol_v3_1_time
    }

    /// Whether a proof-of-work block is still acceptable at this height
    pub fn is_pow_allowed(&self, height: u32) -> bool {
        height <= self.last_pow_block
    }

    pub fn is_valid_stake_timestamp(&self, time: u32) -> bool {
        time & self.stake_timestamp_mask == 0
    }

    /// Block spacing in force at the given time
    pub fn target_spacing_at(&self, time: u32) -> u32 {
        if self.is_protocol_v2(time) {
            self.target_spacing
        } else {
            self.target_spacing_v1
        }
    }
}
