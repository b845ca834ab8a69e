// Dev fund payout resolution
// Turns a network's configured dev fund address into the locking script coinbases pay to

use crate::chainparams::{Base58Type, ChainParams};
use crate::config::Network;
use bitcoin::base58;
use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, ScriptBuf, ScriptHash};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevFundError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Destination has no script encoding: {0}")]
    UnsupportedDestination(String),
    #[error("No dev fund address configured for {0}")]
    MissingAddress(Network),
}

/// What an address pays to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    PubkeyHash(PubkeyHash),
    ScriptHash(ScriptHash),
    /// Decoded to nothing spendable
    None,
}

/// Address string <-> destination <-> script conversions
pub trait AddressCodec {
    fn decode(&self, address: &str) -> Result<Destination, DevFundError>;
    fn encode_script(&self, destination: &Destination) -> Result<ScriptBuf, DevFundError>;
}

/// Base58check addresses using a network's prefix table
pub struct Base58Codec<'a> {
    params: &'a ChainParams,
}

impl<'a> Base58Codec<'a> {
    pub fn new(params: &'a ChainParams) -> Self {
        Self { params }
    }

    /// Encode a destination as a base58check address for this network
    pub fn encode_address(&self, destination: &Destination) -> Result<String, DevFundError> {
        let (prefix, payload) = match destination {
            Destination::PubkeyHash(hash) => (
                self.params.base58_prefix(Base58Type::PubkeyAddress),
                hash.to_byte_array(),
            ),
            Destination::ScriptHash(hash) => (
                self.params.base58_prefix(Base58Type::ScriptAddress),
                hash.to_byte_array(),
            ),
            Destination::None => {
                return Err(DevFundError::UnsupportedDestination(format!("{:?}", destination)))
            }
        };

        let mut data = prefix.to_vec();
        data.extend_from_slice(&payload);
        Ok(base58::encode_check(&data))
    }
}

fn hash160_payload(data: &[u8], prefix: &[u8]) -> Option<[u8; 20]> {
    data.strip_prefix(prefix)
        .and_then(|payload| <[u8; 20]>::try_from(payload).ok())
}

impl AddressCodec for Base58Codec<'_> {
    fn decode(&self, address: &str) -> Result<Destination, DevFundError> {
        let invalid = |reason: String| DevFundError::InvalidAddress {
            address: address.to_string(),
            reason,
        };

        let data = base58::decode_check(address).map_err(|e| invalid(e.to_string()))?;

        if let Some(hash) = hash160_payload(&data, self.params.base58_prefix(Base58Type::PubkeyAddress)) {
            return Ok(Destination::PubkeyHash(PubkeyHash::from_byte_array(hash)));
        }
        if let Some(hash) = hash160_payload(&data, self.params.base58_prefix(Base58Type::ScriptAddress)) {
            return Ok(Destination::ScriptHash(ScriptHash::from_byte_array(hash)));
        }

        Err(invalid(format!(
            "unrecognized prefix for {} network",
            self.params.network
        )))
    }

    fn encode_script(&self, destination: &Destination) -> Result<ScriptBuf, DevFundError> {
        match destination {
            Destination::PubkeyHash(hash) => Ok(ScriptBuf::new_p2pkh(hash)),
            Destination::ScriptHash(hash) => Ok(ScriptBuf::new_p2sh(hash)),
            Destination::None => Err(DevFundError::UnsupportedDestination(format!(
                "{:?}",
                destination
            ))),
        }
    }
}

/// Locking script for the network's active dev fund address
pub fn resolve_payout_script(params: &ChainParams) -> Result<ScriptBuf, DevFundError> {
    resolve_payout_script_with(params, &Base58Codec::new(params))
}

/// Same as [`resolve_payout_script`] with a caller-supplied codec
pub fn resolve_payout_script_with<C: AddressCodec + ?Sized>(
    params: &ChainParams,
    codec: &C,
) -> Result<ScriptBuf, DevFundError> {
    let address = params.devfund_address()?;
    let destination = codec.decode(address)?;
    codec.encode_script(&destination)
}
