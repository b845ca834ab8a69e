// Target search for regenerating genesis constants
// Maintenance utility only; nothing on the startup path calls it implicitly

use super::pow::{hash_to_target, pow_hash};
use super::{GenesisBlock, GenesisError};
use bitcoin::block::Header;
use bitcoin::{BlockHash, CompactTarget, Target};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How often the deadline is polled, in attempts
const DEADLINE_POLL_INTERVAL: u64 = 256;

/// Cancellation and limits for a running search
///
/// Clones share the cancellation flag, so one clone can be handed to a
/// signal handler while the search owns another.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
    max_attempts: Option<u64>,
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn check(&self, attempts: u64, header: &Header) -> Result<(), GenesisError> {
        if self.is_cancelled() {
            return Err(GenesisError::SearchCancelled {
                nonce: header.nonce,
                time: header.time,
            });
        }
        if let Some(max) = self.max_attempts {
            if attempts >= max {
                return Err(GenesisError::SearchLimitReached(attempts));
            }
        }
        if attempts % DEADLINE_POLL_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(GenesisError::SearchTimedOut(attempts));
                }
            }
        }
        Ok(())
    }
}

/// Result of a successful target search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub nonce: u32,
    pub time: u32,
    pub hash: BlockHash,
    pub attempts: u64,
}

/// Find the first (time, nonce) pair, starting at nonce 0 and the draft's time,
/// whose header hash does not exceed the target expanded from `bits`.
///
/// Nonces are tried in increasing order; once every nonce has failed the time
/// is bumped by one second and the nonce restarts at zero.
pub fn search(
    bits: CompactTarget,
    draft: &Header,
    control: &SearchControl,
) -> Result<SearchOutcome, GenesisError> {
    let target = Target::from_compact(bits);
    let mut header = *draft;
    header.bits = bits;
    header.nonce = 0;

    debug!(
        "Searching for nonce below target bits {:08x} from time {}",
        bits.to_consensus(),
        header.time
    );

    let mut attempts = 0u64;
    loop {
        let hash = pow_hash(&header)?;
        attempts += 1;

        if hash_to_target(&hash) <= target {
            return Ok(SearchOutcome {
                nonce: header.nonce,
                time: header.time,
                hash,
                attempts,
            });
        }

        control.check(attempts, &header)?;

        next_candidate(&mut header)?;
    }
}

/// Step to the next nonce; once the nonce wraps, move the timestamp forward
fn next_candidate(header: &mut Header) -> Result<(), GenesisError> {
    header.nonce = header.nonce.wrapping_add(1);
    if header.nonce == 0 {
        header.time = header.time.checked_add(1).ok_or(GenesisError::SearchExhausted)?;
        debug!("Nonce space exhausted, advancing time to {}", header.time);
    }
    Ok(())
}

/// Re-run the search for a genesis block whose constants no longer hash correctly,
/// logging the values a maintainer has to hard-code
pub fn regenerate(
    network: &str,
    block: &GenesisBlock,
    control: &SearchControl,
) -> Result<GenesisBlock, GenesisError> {
    info!("Calculating {} genesis block...", network);

    let outcome = search(block.header.bits, &block.header, control)?;

    let mut found = block.clone();
    found.header.nonce = outcome.nonce;
    found.header.time = outcome.time;

    info!("Genesis block found for {} after {} attempts", network, outcome.attempts);
    info!("nonce: {}", outcome.nonce);
    info!("time: {}", outcome.time);
    info!("blockhash: {}", outcome.hash);
    info!("merklehash: {}", found.header.merkle_root);

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::create_genesis_block;
    use bitcoin::Amount;

    fn draft(bits: u32) -> Header {
        create_genesis_block(
            1_736_503_869,
            0,
            CompactTarget::from_consensus(bits),
            1,
            Amount::ZERO,
        )
        .unwrap()
        .header
    }

    #[test]
    fn test_trivial_target_accepts_first_nonce() {
        let header = draft(0x207fffff);
        let outcome = search(header.bits, &header, &SearchControl::new()).unwrap();

        assert_eq!(outcome.nonce, 0);
        assert_eq!(outcome.time, header.time);
        assert_eq!(outcome.attempts, 1);
    }

    #[test]
    fn test_search_ignores_draft_nonce() {
        let mut header = draft(0x207fffff);
        header.nonce = 12345;
        let outcome = search(header.bits, &header, &SearchControl::new()).unwrap();
        assert_eq!(outcome.nonce, 0);
    }

    #[test]
    fn test_cancelled_search_stops() {
        // Regtest difficulty needs thousands of attempts
        let header = draft(0x1f00ffff);
        let control = SearchControl::new();
        control.cancel();

        let result = search(header.bits, &header, &control);
        assert!(matches!(
            result,
            Err(GenesisError::SearchCancelled { nonce: 0, .. })
        ));
    }

    #[test]
    fn test_attempt_limit() {
        let header = draft(0x1f00ffff);
        let control = SearchControl::new().with_max_attempts(5);

        let result = search(header.bits, &header, &control);
        assert!(matches!(result, Err(GenesisError::SearchLimitReached(5))));
    }

    #[test]
    fn test_timeout() {
        let header = draft(0x1f00ffff);
        let control = SearchControl::new().with_timeout(Duration::ZERO);

        let result = search(header.bits, &header, &control);
        assert!(matches!(result, Err(GenesisError::SearchTimedOut(256))));
    }

    #[test]
    fn test_next_candidate_increments_nonce() {
        let mut header = draft(0x1f00ffff);
        header.nonce = 41;
        next_candidate(&mut header).unwrap();
        assert_eq!((header.nonce, header.time), (42, 1_736_503_869));
    }

    #[test]
    fn test_nonce_wrap_advances_time() {
        let mut header = draft(0x1f00ffff);
        header.nonce = u32::MAX;
        next_candidate(&mut header).unwrap();
        assert_eq!((header.nonce, header.time), (0, 1_736_503_870));
    }

    #[test]
    fn test_exhausted_at_max_time() {
        let mut header = draft(0x1f00ffff);
        header.nonce = u32::MAX;
        header.time = u32::MAX;
        assert!(matches!(
            next_candidate(&mut header),
            Err(GenesisError::SearchExhausted)
        ));
    }

    #[test]
    fn test_clones_share_cancellation() {
        let control = SearchControl::new();
        let handle = control.clone();
        handle.cancel();
        assert!(control.is_cancelled());
    }
}
