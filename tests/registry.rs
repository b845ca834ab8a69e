// Network registry integration tests
// Selection, cross-network lookup, regtest overrides and process-wide publication

use kindcoin_rust::chainparams::registry;
use kindcoin_rust::consensus::{Bip9Deployment, DeploymentId};
use kindcoin_rust::{ChainParamsError, Network, NetworkRegistry};
use std::collections::HashSet;

#[test]
fn test_select_each_network() {
    let mut registry = NetworkRegistry::new().expect("registry builds");

    for name in ["main", "test", "regtest"] {
        let selected = registry.select(name).unwrap().network;
        assert_eq!(selected.as_str(), name);
        assert_eq!(registry.current().unwrap().network_id(), name);
    }
}

#[test]
fn test_unknown_network_is_configuration_error() {
    let mut registry = NetworkRegistry::new().unwrap();

    // Nothing selected yet, and a bad name does not change that
    let err = registry.select("signet").unwrap_err();
    assert!(matches!(err, ChainParamsError::UnknownNetwork(ref name) if name == "signet"));
    assert!(matches!(registry.current(), Err(ChainParamsError::NoNetworkSelected)));

    registry.select("main").unwrap();
    assert!(registry.select("").is_err());
    assert!(registry.select("MAIN").is_err());
    assert_eq!(registry.current().unwrap().network, Network::Main);
}

#[test]
fn test_select_is_idempotent() {
    let mut registry = NetworkRegistry::new().unwrap();

    let first = registry.select("test").unwrap().clone();
    let second = registry.select("test").unwrap();

    assert_eq!(first.consensus, second.consensus);
    assert_eq!(first.genesis, second.genesis);
    assert_eq!(first.checkpoint_data, second.checkpoint_data);
    assert_eq!(first.base58_prefixes, second.base58_prefixes);
    assert_eq!(first.devfund_addresses, second.devfund_addresses);
}

#[test]
fn test_get_reads_other_networks() {
    let mut registry = NetworkRegistry::new().unwrap();
    registry.select("test").unwrap();

    let main = registry.get("main").unwrap();
    assert_eq!(main.default_port, 21538);
    assert!(registry.get("mainnet").is_err());
    assert_eq!(registry.current().unwrap().network, Network::Test);
}

#[test]
fn test_networks_are_distinct() {
    let registry = NetworkRegistry::new().unwrap();
    let all: Vec<_> = Network::ALL.iter().map(|n| registry.params(*n)).collect();

    let ids: HashSet<_> = all.iter().map(|p| p.network_id()).collect();
    let magics: HashSet<_> = all.iter().map(|p| p.message_start).collect();
    let ports: HashSet<_> = all.iter().map(|p| p.default_port).collect();

    assert_eq!(ids.len(), 3);
    assert_eq!(magics.len(), 3);
    assert_eq!(ports.len(), 3);
    assert!(all.iter().all(|p| p.message_start != [0; 4]));
    assert!(all.iter().all(|p| !p.devfund_addresses.is_empty()));
}

#[test]
fn test_network_from_magic_matches_params() {
    let registry = NetworkRegistry::new().unwrap();
    for network in Network::ALL {
        let params = registry.params(network);
        assert_eq!(Network::from_magic(params.message_start), Some(network));
    }
}

/// Overriding a regtest deployment touches only that deployment's window
#[test]
fn test_override_changes_only_target_deployment() {
    let mut registry = NetworkRegistry::new().unwrap();
    let before = registry.params(Network::Regtest).consensus.clone();
    let main_before = registry.params(Network::Main).consensus.clone();

    registry
        .override_deployment(Network::Regtest, DeploymentId::TestDummy, 0, 999_999_999_999)
        .unwrap();

    let after = &registry.params(Network::Regtest).consensus;
    assert_eq!(
        *after.deployment(DeploymentId::TestDummy),
        Bip9Deployment {
            bit: 28,
            start_time: 0,
            timeout: 999_999_999_999,
        }
    );

    let mut expected = before.clone();
    expected.deployments[DeploymentId::TestDummy.index()].start_time = 0;
    expected.deployments[DeploymentId::TestDummy.index()].timeout = 999_999_999_999;
    assert_eq!(*after, expected);

    assert_eq!(registry.params(Network::Main).consensus, main_before);
}

#[test]
fn test_override_refused_on_test_network() {
    let mut registry = NetworkRegistry::new().unwrap();
    let err = registry
        .override_deployment(Network::Test, DeploymentId::TestDummy, 1, 2)
        .unwrap_err();
    assert!(matches!(err, ChainParamsError::OverrideNotPermitted(Network::Test)));
}

/// Only one registry can be published; later installs are rejected
#[test]
fn test_install_publishes_once() {
    assert!(matches!(registry::params(), Err(ChainParamsError::NotInstalled)));

    let mut first = NetworkRegistry::new().unwrap();
    first.select("regtest").unwrap();
    first
        .override_deployment(Network::Regtest, DeploymentId::TestDummy, 10, 20)
        .unwrap();
    let installed = registry::install(first).unwrap();
    assert_eq!(installed.current_network(), Some(Network::Regtest));

    let mut second = NetworkRegistry::new().unwrap();
    second.select("main").unwrap();
    assert!(matches!(
        registry::install(second),
        Err(ChainParamsError::AlreadyInstalled)
    ));

    let params = registry::params().unwrap();
    assert_eq!(params.network, Network::Regtest);
    assert_eq!(params.consensus.deployment(DeploymentId::TestDummy).start_time, 10);

    // Published parameters are shareable across threads
    let handle = std::thread::spawn(|| registry::params().unwrap().default_port);
    assert_eq!(handle.join().unwrap(), 35714);
}
