//! # Peer Topology
//!
//! Splits the total peer budget between the full-sync and light protocol
//! families.
//!
//! A light client spends its whole budget on the light protocol. A light
//! server reserves light slots on top of its full-protocol budget, unless the
//! user sized `maxpeers` explicitly while leaving `lightpeers` alone.

use tracing::info;

use crate::container::config::DEFAULT_LIGHT_PEERS;

/// Inputs of the peer split. All values are range-checked beforehand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerTopologyInput {
    /// `maxpeers`, when explicitly set.
    pub explicit_max_peers: Option<usize>,
    /// Sync mode is light.
    pub light_client: bool,
    /// Light-serve percentage is non-zero.
    pub light_server: bool,
    /// `lightpeers`, explicit or default.
    pub light_peers: usize,
    pub light_peers_explicit: bool,
}

/// Resolved peer budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerTopology {
    pub total: usize,
    pub full_slots: usize,
    pub light_slots: usize,
}

/// Resolve the peer split. `builtin_default` is the total used when
/// `maxpeers` was not given.
///
/// When the node takes part in the light protocol the total never drops below
/// the light slot count, even under an explicit `maxpeers`.
#[must_use]
pub fn resolve_peer_topology(input: PeerTopologyInput, builtin_default: usize) -> PeerTopology {
    let mut total = match input.explicit_max_peers {
        Some(explicit) => {
            let mut total = explicit;
            if input.light_server && !input.light_peers_explicit {
                total = total.saturating_add(DEFAULT_LIGHT_PEERS);
            }
            total
        }
        None => {
            let mut total = builtin_default;
            if input.light_server {
                total = total.saturating_add(input.light_peers);
            }
            if input.light_client && input.light_peers_explicit && total < input.light_peers {
                total = input.light_peers;
            }
            total
        }
    };

    let uses_light_protocol = input.light_client || input.light_server;
    let light_slots = if uses_light_protocol {
        input.light_peers
    } else {
        0
    };
    if uses_light_protocol {
        total = total.max(light_slots);
    }
    let full_slots = if input.light_client {
        0
    } else {
        total - light_slots
    };

    info!(
        "Peer topology resolved: full={} light={} total={}",
        full_slots, light_slots, total
    );
    PeerTopology {
        total,
        full_slots,
        light_slots,
    }
}
