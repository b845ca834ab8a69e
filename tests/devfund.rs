// Dev fund resolution tests
// Payout scripts must match the kind of address each network configures

use bitcoin::base58;
use kindcoin_rust::chainparams::Base58Type;
use kindcoin_rust::devfund::{AddressCodec, Base58Codec, Destination};
use kindcoin_rust::{resolve_payout_script, ChainParams, DevFundError, Network, NetworkRegistry};

#[test]
fn test_payout_script_matches_address_prefix() {
    let registry = NetworkRegistry::new().unwrap();

    for network in Network::ALL {
        let params = registry.params(network);
        let address = params.devfund_address().unwrap();
        let version = base58::decode_check(address).unwrap()[0];
        let script = resolve_payout_script(params).unwrap();

        if version == params.base58_prefix(Base58Type::PubkeyAddress)[0] {
            assert!(script.is_p2pkh(), "{} dev fund should be pay-to-pubkey-hash", network);
        } else if version == params.base58_prefix(Base58Type::ScriptAddress)[0] {
            assert!(script.is_p2sh(), "{} dev fund should be pay-to-script-hash", network);
        } else {
            panic!("{} dev fund address has foreign prefix {}", network, version);
        }
    }
}

#[test]
fn test_payout_script_round_trips_to_address() {
    let registry = NetworkRegistry::new().unwrap();

    for network in Network::ALL {
        let params = registry.params(network);
        let codec = Base58Codec::new(params);
        let address = params.devfund_address().unwrap();

        let destination = codec.decode(address).unwrap();
        assert!(matches!(destination, Destination::PubkeyHash(_)));
        assert_eq!(codec.encode_address(&destination).unwrap(), address);
        assert_eq!(
            codec.encode_script(&destination).unwrap(),
            params.devfund_payout_script().unwrap()
        );
    }
}

#[test]
fn test_testnet_payout_script_bytes() {
    let params = ChainParams::test().unwrap();
    let script = params.devfund_payout_script().unwrap();

    assert_eq!(
        hex::encode(script.as_bytes()),
        "76a9141232ecb63e620c1c85adf12809dee61343e1072788ac"
    );
}

#[test]
fn test_malformed_addresses_rejected() {
    let params = ChainParams::main().unwrap();
    let codec = Base58Codec::new(&params);

    for address in ["", "0OIl", "KFZFbZ2zYoDzA6CAzf1ff", "kindcoin:qq0000"] {
        let err = codec.decode(address).unwrap_err();
        assert!(
            matches!(err, DevFundError::InvalidAddress { .. }),
            "{:?} should be rejected",
            address
        );
    }
}

#[test]
fn test_resolution_leaves_params_untouched() {
    let params = ChainParams::main().unwrap();
    let before = params.clone();

    resolve_payout_script(&params).unwrap();
    assert_eq!(params.devfund_addresses, before.devfund_addresses);
    assert_eq!(params.consensus, before.consensus);
}
