// Network registry
// Owns the three parameter bundles and tracks which one the process runs on

use super::{ChainParams, ChainParamsError, GenesisCheck};
use crate::config::{DeploymentOverride, Network};
use crate::consensus::DeploymentId;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::info;

static INSTALLED: OnceLock<NetworkRegistry> = OnceLock::new();

/// All network parameter bundles plus the current selection
///
/// Mutation (`select`, `override_deployment`) needs `&mut self`, so it can only
/// happen while the registry is still privately owned. Once handed to
/// [`install`] it is read-only for the rest of the process.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    main: ChainParams,
    test: ChainParams,
    regtest: ChainParams,
    current: Option<Network>,
}

impl NetworkRegistry {
    /// Build every network, failing if any genesis block does not match its constants
    pub fn new() -> Result<Self, ChainParamsError> {
        Self::with_genesis_check(&GenesisCheck::Enforce)
    }

    pub fn with_genesis_check(check: &GenesisCheck) -> Result<Self, ChainParamsError> {
        let registry = Self {
            main: ChainParams::for_network(Network::Main, check)?,
            test: ChainParams::for_network(Network::Test, check)?,
            regtest: ChainParams::for_network(Network::Regtest, check)?,
            current: None,
        };
        registry.check_distinct()?;
        Ok(registry)
    }

    fn check_distinct(&self) -> Result<(), ChainParamsError> {
        let all = self.all();
        let magics: HashSet<[u8; 4]> = all.iter().map(|p| p.message_start).collect();
        let ports: HashSet<u16> = all.iter().map(|p| p.default_port).collect();

        if magics.len() != all.len() || all.iter().any(|p| p.message_start == [0; 4]) {
            return Err(ChainParamsError::InvalidConstant(
                "network magic must be unique and non-zero".to_string(),
            ));
        }
        if ports.len() != all.len() {
            return Err(ChainParamsError::InvalidConstant(
                "default ports must be unique".to_string(),
            ));
        }
        Ok(())
    }

    fn all(&self) -> [&ChainParams; 3] {
        [&self.main, &self.test, &self.regtest]
    }

    /// Select the network the process runs on by identifier
    ///
    /// An unknown name leaves the previous selection untouched.
    pub fn select(&mut self, name: &str) -> Result<&ChainParams, ChainParamsError> {
        let network = name.parse::<Network>()?;
        Ok(self.select_network(network))
    }

    pub fn select_network(&mut self, network: Network) -> &ChainParams {
        info!("Selected {} network", network);
        self.current = Some(network);
        self.params(network)
    }

    /// Parameters of the selected network
    pub fn current(&self) -> Result<&ChainParams, ChainParamsError> {
        self.current
            .map(|network| self.params(network))
            .ok_or(ChainParamsError::NoNetworkSelected)
    }

    pub fn current_network(&self) -> Option<Network> {
        self.current
    }

    /// Parameters of any network by identifier, without changing the selection
    pub fn get(&self, name: &str) -> Result<&ChainParams, ChainParamsError> {
        Ok(self.params(name.parse::<Network>()?))
    }

    pub fn params(&self, network: Network) -> &ChainParams {
        match network {
            Network::Main => &self.main,
            Network::Test => &self.test,
            Network::Regtest => &self.regtest,
        }
    }

    /// Rewrite a regtest deployment window so tests can simulate activation timing
    ///
    /// Refused on every other network. Call before consensus code starts reading
    /// the parameters; once installed the registry can no longer be mutated.
    pub fn override_deployment(
        &mut self,
        network: Network,
        deployment: DeploymentId,
        start_time: i64,
        timeout: i64,
    ) -> Result<(), ChainParamsError> {
        if network != Network::Regtest {
            return Err(ChainParamsError::OverrideNotPermitted(network));
        }

        let entry = &mut self.regtest.consensus.deployments[deployment.index()];
        entry.start_time = start_time;
        entry.timeout = timeout;

        info!(
            "Overriding regtest deployment {}: start {}, timeout {}",
            deployment, start_time, timeout
        );
        Ok(())
    }

    /// Apply configured overrides to the selected network
    pub fn apply_overrides(&mut self, overrides: &[DeploymentOverride]) -> Result<(), ChainParamsError> {
        if overrides.is_empty() {
            return Ok(());
        }
        let network = self.current.ok_or(ChainParamsError::NoNetworkSelected)?;
        for o in overrides {
            self.override_deployment(network, o.deployment, o.start_time, o.timeout)?;
        }
        Ok(())
    }
}

/// Publish the registry for the rest of the process
///
/// Fails if a registry has already been installed; the first one stays in place.
pub fn install(registry: NetworkRegistry) -> Result<&'static NetworkRegistry, ChainParamsError> {
    let mut published = false;
    let installed = INSTALLED.get_or_init(|| {
        published = true;
        registry
    });

    if published {
        Ok(installed)
    } else {
        Err(ChainParamsError::AlreadyInstalled)
    }
}

/// The registry published by [`install`]
pub fn installed() -> Result<&'static NetworkRegistry, ChainParamsError> {
    INSTALLED.get().ok_or(ChainParamsError::NotInstalled)
}

/// Parameters of the network selected in the installed registry
pub fn params() -> Result<&'static ChainParams, ChainParamsError> {
    installed()?.current()
}
