// Scrypt proof-of-work hashing for block headers

use super::GenesisError;
use bitcoin::block::Header;
use bitcoin::consensus::encode;
use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, Target};

/// scrypt cost parameter, N = 2^10
pub const SCRYPT_LOG_N: u8 = 10;
pub const SCRYPT_R: u32 = 1;
pub const SCRYPT_P: u32 = 1;

/// Hash the 80-byte header with scrypt(N=1024, r=1, p=1), using it as both password and salt
pub fn pow_hash(header: &Header) -> Result<BlockHash, GenesisError> {
    let data = encode::serialize(header);
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32)
        .map_err(|e| GenesisError::PowHash(e.to_string()))?;

    let mut output = [0u8; 32];
    scrypt::scrypt(&data, &data, &params, &mut output)
        .map_err(|e| GenesisError::PowHash(e.to_string()))?;

    Ok(BlockHash::from_byte_array(output))
}

/// Interpret a block hash as a 256-bit integer for comparison against a target
pub fn hash_to_target(hash: &BlockHash) -> Target {
    Target::from_le_bytes(hash.to_byte_array())
}

/// Check whether a header's scrypt hash is at or below the target
pub fn meets_target(header: &Header, target: &Target) -> Result<bool, GenesisError> {
    let hash = pow_hash(header)?;
    Ok(hash_to_target(&hash) <= *target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::create_genesis_block;
    use bitcoin::{Amount, CompactTarget};

    #[test]
    fn test_header_serializes_to_80_bytes() {
        let block = create_genesis_block(
            1_736_503_869,
            7048,
            CompactTarget::from_consensus(0x1f00ffff),
            1,
            Amount::ZERO,
        )
        .unwrap();
        assert_eq!(encode::serialize(&block.header).len(), 80);
    }

    #[test]
    fn test_pow_hash_differs_from_double_sha() {
        let block = create_genesis_block(
            1_736_503_869,
            7048,
            CompactTarget::from_consensus(0x1f00ffff),
            1,
            Amount::ZERO,
        )
        .unwrap();

        let hash = pow_hash(&block.header).unwrap();
        assert_ne!(hash, block.header.block_hash());
        assert_eq!(
            hash.to_string(),
            "0000ab09572ccda6fc69e6aebce56316efc11b33245594aac80b1257c0f254ce"
        );
    }

    #[test]
    fn test_meets_target() {
        let block = create_genesis_block(
            1_736_503_869,
            7048,
            CompactTarget::from_consensus(0x1f00ffff),
            1,
            Amount::ZERO,
        )
        .unwrap();

        let target = Target::from_compact(block.header.bits);
        assert!(meets_target(&block.header, &target).unwrap());

        let harder = Target::from_compact(CompactTarget::from_consensus(0x1e00ffff));
        assert!(!meets_target(&block.header, &harder).unwrap());
    }

    #[test]
    fn test_hash_to_target_reads_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        let hash = BlockHash::from_byte_array(bytes);

        let mut expected = [0u8; 32];
        expected[31] = 0x01;
        assert_eq!(hash_to_target(&hash), Target::from_be_bytes(expected));
    }
}
