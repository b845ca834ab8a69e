// Literal parameter tables for main, test and regtest
//
// What makes a good checkpoint block?
// + Is surrounded by blocks with reasonable timestamps
//   (no blocks before with a timestamp after, none after with
//    timestamp before)
// + Contains no strange transactions

use super::{
    verify_genesis, ChainParams, ChainParamsError, CheckpointData, DnsSeed, GenesisCheck,
};
use crate::config::Network;
use crate::consensus::get_consensus_params;
use crate::consensus::params::hash_from_hex;
use crate::genesis::{create_genesis_block, GenesisBlock, GenesisError};
use bitcoin::{Amount, BlockHash, CompactTarget, ScriptBuf, TxMerkleNode};
use std::collections::BTreeMap;

/// Every network shares the same coinbase, so they share a merkle root
pub const GENESIS_MERKLE_ROOT: &str =
    "eac59731a14e59c0ee4c50bff2aed54f9690ec71d811b13d26c0e2301744246c";

const GENESIS_TIME: u32 = 1_736_503_869;
const GENESIS_VERSION: i32 = 1;

const MAIN_DEVFUND_ADDRESS: &str = "KFZFbZ2zYoDzA6CAzf1ffAdT53mqWr93AF";
const TEST_DEVFUND_ADDRESS: &str = "TBdSApTarJSCFY7JjdFnX4Yry3yajMtTeP";

/// Raw inputs a network's genesis block is built from, before any hash check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenesisInputs {
    pub time: u32,
    pub nonce: u32,
    pub bits: CompactTarget,
    pub version: i32,
    pub reward: Amount,
}

impl GenesisInputs {
    /// Build with the default message and an empty output script
    pub fn draft(&self) -> Result<GenesisBlock, GenesisError> {
        create_genesis_block(self.time, self.nonce, self.bits, self.version, self.reward)
    }

    /// Build with a custom coinbase message and output script
    pub fn build(
        &self,
        message: &[u8],
        output_script: ScriptBuf,
    ) -> Result<GenesisBlock, GenesisError> {
        crate::genesis::build(
            message,
            output_script,
            self.time,
            self.nonce,
            self.bits,
            self.version,
            self.reward,
        )
    }
}

/// The hard-coded genesis inputs of a network. Nothing here is verified, so a
/// maintainer can rebuild a draft after editing them.
pub fn genesis_inputs(network: Network) -> GenesisInputs {
    let (nonce, bits) = match network {
        Network::Main => (1_229_846, 0x1e0fffff),
        Network::Test | Network::Regtest => (7048, 0x1f00ffff),
    };
    GenesisInputs {
        time: GENESIS_TIME,
        nonce,
        bits: CompactTarget::from_consensus(bits),
        version: GENESIS_VERSION,
        reward: Amount::ZERO,
    }
}

fn genesis_checkpoints(genesis_hash: BlockHash) -> CheckpointData {
    CheckpointData {
        checkpoints: BTreeMap::from([(0, genesis_hash)]),
        last_checkpoint_time: GENESIS_TIME as i64,
        transactions_at_checkpoint: 0,
        transactions_per_day: 0.0,
    }
}

pub fn main_params(check: &GenesisCheck) -> Result<ChainParams, ChainParamsError> {
    let consensus = get_consensus_params(Network::Main)?;

    let genesis = genesis_inputs(Network::Main).draft()?;
    let genesis = verify_genesis(
        Network::Main,
        genesis,
        consensus.genesis_hash,
        hash_from_hex::<TxMerkleNode>(GENESIS_MERKLE_ROOT)?,
        check,
    )?;

    Ok(ChainParams {
        network: Network::Main,
        checkpoint_data: genesis_checkpoints(consensus.genesis_hash),
        consensus,
        message_start: Network::Main.magic(),
        default_port: Network::Main.default_port(),
        prune_after_height: 100_000,
        genesis,
        dns_seeds: vec![DnsSeed {
            name: "walletbuilders.com",
            host: "node3.walletbuilders.com",
        }],
        fixed_seeds: Vec::new(),
        base58_prefixes: [
            &[45],
            &[46],
            &[173],
            &[0x04, 0x88, 0xb2, 0x1e],
            &[0x04, 0x88, 0xad, 0xe4],
        ],
        cashaddr_prefix: "kindcoin",
        devfund_addresses: vec![MAIN_DEVFUND_ADDRESS],
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: true,
        mine_blocks_on_demand: false,
        testnet_to_be_deprecated_field_rpc: false,
    })
}

pub fn test_params(check: &GenesisCheck) -> Result<ChainParams, ChainParamsError> {
    let consensus = get_consensus_params(Network::Test)?;

    let genesis = genesis_inputs(Network::Test).draft()?;
    let genesis = verify_genesis(
        Network::Test,
        genesis,
        consensus.genesis_hash,
        hash_from_hex::<TxMerkleNode>(GENESIS_MERKLE_ROOT)?,
        check,
    )?;

    Ok(ChainParams {
        network: Network::Test,
        checkpoint_data: genesis_checkpoints(consensus.genesis_hash),
        consensus,
        message_start: Network::Test.magic(),
        default_port: Network::Test.default_port(),
        prune_after_height: 1000,
        genesis,
        dns_seeds: Vec::new(),
        fixed_seeds: Vec::new(),
        base58_prefixes: [
            &[65],
            &[66],
            &[239],
            &[0x04, 0x35, 0x87, 0xcf],
            &[0x04, 0x35, 0x83, 0x94],
        ],
        cashaddr_prefix: "kccctest",
        devfund_addresses: vec![TEST_DEVFUND_ADDRESS],
        mining_requires_peers: true,
        default_consistency_checks: false,
        require_standard: true,
        mine_blocks_on_demand: false,
        testnet_to_be_deprecated_field_rpc: true,
    })
}

pub fn regtest_params(check: &GenesisCheck) -> Result<ChainParams, ChainParamsError> {
    let consensus = get_consensus_params(Network::Regtest)?;

    let genesis = genesis_inputs(Network::Regtest).draft()?;
    let genesis = verify_genesis(
        Network::Regtest,
        genesis,
        consensus.genesis_hash,
        hash_from_hex::<TxMerkleNode>(GENESIS_MERKLE_ROOT)?,
        check,
    )?;

    Ok(ChainParams {
        network: Network::Regtest,
        checkpoint_data: genesis_checkpoints(consensus.genesis_hash),
        consensus,
        message_start: Network::Regtest.magic(),
        default_port: Network::Regtest.default_port(),
        prune_after_height: 100_000,
        genesis,
        // Regtest mode doesn't have any DNS or fixed seeds
        dns_seeds: Vec::new(),
        fixed_seeds: Vec::new(),
        base58_prefixes: [
            &[65],
            &[66],
            &[193],
            &[0x04, 0x88, 0xb2, 0x1e],
            &[0x04, 0x88, 0xad, 0xe4],
        ],
        cashaddr_prefix: "kcccreg",
        // Same pubkey-hash prefix as testnet, so the testnet address is valid here
        devfund_addresses: vec![TEST_DEVFUND_ADDRESS],
        mining_requires_peers: false,
        default_consistency_checks: true,
        require_standard: false,
        mine_blocks_on_demand: true,
        testnet_to_be_deprecated_field_rpc: false,
    })
}
