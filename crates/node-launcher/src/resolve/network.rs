//! P2P networking settings, including the peer split.

use tracing::{debug, warn};

use super::narrow;
use super::peers::{resolve_peer_topology, PeerTopologyInput};
use crate::container::config::DEFAULT_MAX_PEERS;
use crate::container::{
    BootstrapNode, ChainConfig, ConfigResult, NatMode, NetMask, NetworkConfig, NodeKeySource,
    PeerSlots,
};
use crate::options::descriptor::*;
use crate::options::OptionTable;
use crate::validation::split_and_trim;

/// Apply networking options. `chain` must already be resolved: the peer
/// split and discovery depend on the node's light-protocol role.
pub fn apply_network(
    options: &OptionTable,
    chain: &ChainConfig,
    network: &mut NetworkConfig,
) -> ConfigResult<()> {
    if options.is_set(LISTEN_PORT) {
        network.listen_addr = format!(":{}", options.int(LISTEN_PORT)?);
    }

    let explicit_max_peers = if options.is_set(MAX_PEERS) {
        Some(narrow(options, MAX_PEERS)?)
    } else {
        None
    };
    let topology = resolve_peer_topology(
        PeerTopologyInput {
            explicit_max_peers,
            light_client: chain.is_light_client(),
            light_server: chain.is_light_server(),
            light_peers: chain.light_peers,
            light_peers_explicit: options.is_set(LIGHT_PEERS),
        },
        DEFAULT_MAX_PEERS,
    );
    network.max_peers = topology.total;
    network.peer_slots = PeerSlots {
        full: topology.full_slots,
        light: topology.light_slots,
    };
    if options.is_set(MAX_PENDING_PEERS) {
        network.max_pending_peers = narrow(options, MAX_PENDING_PEERS)?;
    }

    if options.bool(NO_DISCOVER)? || chain.is_light_client() {
        network.no_discovery = true;
    }
    if options.is_set(NAT) {
        network.nat = NatMode::parse(&options.string(NAT)?)?;
    }
    if let Some(urls) = bootstrap_urls(options)? {
        network.bootstrap_nodes = parse_bootstrap_nodes(&urls);
    }
    if options.is_set(NET_RESTRICT) {
        network.net_restrict = split_and_trim(&options.string(NET_RESTRICT)?)
            .iter()
            .map(|mask| NetMask::parse(mask))
            .collect::<ConfigResult<_>>()?;
    }

    if options.is_set(NODE_KEY_FILE) {
        network.node_key = NodeKeySource::File(options.path(NODE_KEY_FILE)?);
    } else if options.is_set(NODE_KEY_HEX) {
        network.node_key = NodeKeySource::parse_hex(&options.string(NODE_KEY_HEX)?)?;
    }

    debug!(
        "Network: listen={}, nat={}, bootnodes={}, discovery={}",
        network.listen_addr,
        network.nat,
        network.bootstrap_nodes.len(),
        !network.no_discovery
    );
    Ok(())
}

/// The v4 list wins over the generic one; `None` keeps the built-in list.
fn bootstrap_urls(options: &OptionTable) -> ConfigResult<Option<Vec<String>>> {
    for name in [BOOTNODES_V4, BOOTNODES] {
        if options.is_set(name) {
            return Ok(Some(split_and_trim(&options.string(name)?)));
        }
    }
    Ok(None)
}

fn parse_bootstrap_nodes(urls: &[String]) -> Vec<BootstrapNode> {
    urls.iter()
        .filter_map(|url| match BootstrapNode::parse(url) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Bootstrap URL invalid, skipping {}: {}", url, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SyncMode;

    fn network_of(options: &OptionTable, chain: &ChainConfig) -> NetworkConfig {
        let mut network = NetworkConfig::default();
        apply_network(options, chain, &mut network).unwrap();
        network
    }

    #[test]
    fn test_listen_port() {
        let network = network_of(
            &OptionTable::defaults().with(LISTEN_PORT, "40404"),
            &ChainConfig::default(),
        );
        assert_eq!(network.listen_addr, ":40404");
    }

    #[test]
    fn test_v4_bootnodes_win() {
        let options = OptionTable::defaults()
            .with(BOOTNODES, "aa@10.0.0.1:30303")
            .with(BOOTNODES_V4, "bb@10.0.0.2:30303, cc@10.0.0.3:30303");
        let network = network_of(&options, &ChainConfig::default());
        assert_eq!(network.bootstrap_nodes.len(), 2);
        assert_eq!(network.bootstrap_nodes[0].id, vec![0xbb]);
    }

    #[test]
    fn test_invalid_bootnodes_are_skipped() {
        let options =
            OptionTable::defaults().with(BOOTNODES, "aa@10.0.0.1:30303,garbage,bb@nowhere");
        let network = network_of(&options, &ChainConfig::default());
        assert_eq!(network.bootstrap_nodes.len(), 1);
    }

    #[test]
    fn test_discovery_off_for_light_client() {
        let chain = ChainConfig {
            sync_mode: SyncMode::Light,
            ..ChainConfig::default()
        };
        let network = network_of(&OptionTable::defaults(), &chain);
        assert!(network.no_discovery);
        assert_eq!(network.peer_slots.full, 0);
        assert_eq!(network.peer_slots.light, 25);

        let network = network_of(
            &OptionTable::defaults().with(NO_DISCOVER, "true"),
            &ChainConfig::default(),
        );
        assert!(network.no_discovery);
    }

    #[test]
    fn test_net_restrict_and_node_key() {
        let options = OptionTable::defaults()
            .with(NET_RESTRICT, "10.0.0.0/8, 192.168.0.0/16")
            .with(NODE_KEY_FILE, "/etc/qc/nodekey");
        let network = network_of(&options, &ChainConfig::default());
        assert_eq!(network.net_restrict.len(), 2);
        assert_eq!(
            network.node_key,
            NodeKeySource::File("/etc/qc/nodekey".into())
        );
    }
}
