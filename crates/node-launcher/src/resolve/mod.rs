//! # Configuration Resolution
//!
//! Turns a validated option table into a frozen `NodeConfig`.
//!
//! ## Pipeline
//!
//! ```text
//! OptionTable ──► validate ──► chain ──► network (peers) ──► node ──► add-ons
//!                               │
//!                               └── cache budget
//! ```
//!
//! Every applier copies a value only when its option was explicitly set; the
//! compiled-in default stands otherwise. Nothing here reads ambient state:
//! the option table is the only input.

pub mod addons;
pub mod cache;
pub mod chain;
pub mod network;
pub mod node;
pub mod peers;

pub use cache::{resolve_cache_budget, CacheAllotment, CacheBudgetInput};
pub use peers::{resolve_peer_topology, PeerTopology, PeerTopologyInput};

use tracing::info;

use crate::container::{ConfigError, ConfigResult, NodeConfig};
use crate::options::OptionTable;
use crate::validation::validate;

/// Validate `options` and build the node configuration from them.
pub fn resolve_config(options: &OptionTable) -> ConfigResult<NodeConfig> {
    validate(options)?;

    let mut config = NodeConfig::default();
    chain::apply_chain(options, &mut config.chain)?;
    chain::apply_tx_pool(options, &mut config.tx_pool)?;
    chain::apply_gas_oracle(options, &mut config.gas_oracle)?;
    network::apply_network(options, &config.chain, &mut config.network)?;
    node::apply_node(options, &mut config.node)?;
    node::apply_accounts(options, &mut config.accounts)?;
    node::apply_console(options, &mut config.console)?;
    addons::apply_messaging(options, &mut config.messaging)?;
    config.stats = addons::stats_endpoint(options)?;

    info!(
        "Configuration resolved: sync_mode={}, light_serve={}%, max_peers={}, data_dir={}",
        config.chain.sync_mode,
        config.chain.light_serve,
        config.network.max_peers,
        config.node.data_dir.display()
    );
    Ok(config)
}

/// Narrow a range-checked integer option.
pub(crate) fn narrow<T: TryFrom<i64>>(
    options: &OptionTable,
    name: &'static str,
) -> ConfigResult<T> {
    let value = options.int(name)?;
    T::try_from(value).map_err(|_| ConfigError::range(name, value.to_string(), "a value in range"))
}
