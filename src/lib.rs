// Kindcoin Rust - network parameters for the Kindcoin networks
// This is the library crate that exposes the public API

pub mod config;
pub mod consensus;
pub mod genesis;
pub mod chainparams;
pub mod devfund;

pub use chainparams::{ChainParams, ChainParamsError, GenesisCheck, NetworkRegistry};
pub use config::{Config, Network};
pub use consensus::ConsensusParams;
pub use devfund::{resolve_payout_script, DevFundError};
