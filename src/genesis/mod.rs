// Genesis block construction
// Builds the fixed coinbase transaction and header every Kindcoin network starts from

use bitcoin::absolute::LockTime;
use bitcoin::block::{Header, Version};
use bitcoin::consensus::encode::{self, Encodable};
use bitcoin::hashes::{sha256d, Hash};
use bitcoin::opcodes::all::OP_CHECKSIG;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::{
    io, merkle_tree, Amount, BlockHash, CompactTarget, OutPoint, ScriptBuf, Sequence,
    TxIn, TxMerkleNode, TxOut, Txid, Witness,
};
use thiserror::Error;

pub mod pow;
pub mod search;

pub use pow::{hash_to_target, pow_hash};
pub use search::{search, SearchControl, SearchOutcome};

/// Message embedded in the genesis coinbase
pub const GENESIS_MESSAGE: &str = "SEE NO EVIL HEAR NO EVIL SPEAK NO EVIL";

/// Public key the genesis reward was meant for
pub const GENESIS_PUBKEY_HEX: &str = "047264d7de167b8037b26e29699949d66d3698d82e2022a2fc904bc7c2e914d6bcf2019e3d4653d556c3cd6cbb3f218d6b53687c69b767f99cc8a13016a84fdc2d";

/// Small integer pushed after OP_0 in the genesis scriptSig
const GENESIS_SCRIPT_MARKER: i64 = 42;

#[derive(Error, Debug)]
pub enum GenesisError {
    #[error("Genesis message does not fit in a script push: {0}")]
    MessageTooLong(String),
    #[error("Invalid genesis public key: {0}")]
    InvalidPublicKey(String),
    #[error("Proof-of-work hash failed: {0}")]
    PowHash(String),
    #[error("Block has no transactions")]
    EmptyBlock,
    #[error("Target search cancelled at nonce {nonce}, time {time}")]
    SearchCancelled { nonce: u32, time: u32 },
    #[error("Target search timed out after {0} attempts")]
    SearchTimedOut(u64),
    #[error("Target search stopped after {0} attempts")]
    SearchLimitReached(u64),
    #[error("Target search exhausted every nonce and timestamp")]
    SearchExhausted,
}

/// Timestamped transaction layout used by Kindcoin
///
/// Identical to a legacy Bitcoin transaction except for a `time` field
/// serialized right after the version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinbaseTx {
    pub version: i32,
    pub time: u32,
    pub input: Vec<TxIn>,
    pub output: Vec<TxOut>,
    pub lock_time: LockTime,
}

impl Encodable for CoinbaseTx {
    fn consensus_encode<W: io::Write + ?Sized>(&self, writer: &mut W) -> Result<usize, io::Error> {
        let mut len = self.version.consensus_encode(writer)?;
        len += self.time.consensus_encode(writer)?;
        len += self.input.consensus_encode(writer)?;
        len += self.output.consensus_encode(writer)?;
        len += self.lock_time.consensus_encode(writer)?;
        Ok(len)
    }
}

impl CoinbaseTx {
    pub fn txid(&self) -> Txid {
        Txid::from_raw_hash(sha256d::Hash::hash(&encode::serialize(self)))
    }

    pub fn is_coinbase(&self) -> bool {
        self.input.len() == 1 && self.input[0].previous_output == OutPoint::null()
    }
}

/// The height-0 block of a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisBlock {
    pub header: Header,
    pub coinbase: CoinbaseTx,
}

impl GenesisBlock {
    /// Scrypt proof-of-work hash, which is also the block's identity
    pub fn block_hash(&self) -> Result<BlockHash, GenesisError> {
        pow_hash(&self.header)
    }

    pub fn merkle_root(&self) -> TxMerkleNode {
        self.header.merkle_root
    }

    pub fn txdata(&self) -> &[CoinbaseTx] {
        std::slice::from_ref(&self.coinbase)
    }
}

/// Pay-to-pubkey script for the genesis public key
pub fn genesis_pubkey_script() -> Result<ScriptBuf, GenesisError> {
    let pubkey = hex::decode(GENESIS_PUBKEY_HEX)
        .map_err(|e| GenesisError::InvalidPublicKey(e.to_string()))?;
    let pubkey = PushBytesBuf::try_from(pubkey)
        .map_err(|e| GenesisError::InvalidPublicKey(e.to_string()))?;

    Ok(Builder::new()
        .push_slice(pubkey)
        .push_opcode(OP_CHECKSIG)
        .into_script())
}

fn coinbase_script_sig(message: &[u8]) -> Result<ScriptBuf, GenesisError> {
    let message = PushBytesBuf::try_from(message.to_vec())
        .map_err(|e| GenesisError::MessageTooLong(e.to_string()))?;

    Ok(Builder::new()
        .push_int(0)
        .push_int(GENESIS_SCRIPT_MARKER)
        .push_slice(message)
        .into_script())
}

/// Build a genesis block from explicit inputs
pub fn build(
    message: &[u8],
    output_script: ScriptBuf,
    time: u32,
    nonce: u32,
    bits: CompactTarget,
    version: i32,
    reward: Amount,
) -> Result<GenesisBlock, GenesisError> {
    let coinbase = CoinbaseTx {
        version: 1,
        time,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig: coinbase_script_sig(message)?,
            sequence: Sequence::MAX,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: reward,
            script_pubkey: output_script,
        }],
        lock_time: LockTime::ZERO,
    };

    let leaves = std::iter::once(TxMerkleNode::from_raw_hash(coinbase.txid().to_raw_hash()));
    let merkle_root = merkle_tree::calculate_root(leaves).ok_or(GenesisError::EmptyBlock)?;

    let header = Header {
        version: Version::from_consensus(version),
        prev_blockhash: BlockHash::all_zeros(),
        merkle_root,
        time,
        bits,
        nonce,
    };

    Ok(GenesisBlock { header, coinbase })
}

/// Build the Kindcoin genesis block for the given header fields
///
/// The coinbase output is left with an empty locking script; the published
/// merkle root commits to that empty script, not to the genesis public key.
pub fn create_genesis_block(
    time: u32,
    nonce: u32,
    bits: CompactTarget,
    version: i32,
    reward: Amount,
) -> Result<GenesisBlock, GenesisError> {
    build(
        GENESIS_MESSAGE.as_bytes(),
        ScriptBuf::new(),
        time,
        nonce,
        bits,
        version,
        reward,
    )
}
