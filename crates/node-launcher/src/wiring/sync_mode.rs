//! # Chain Service Selection
//!
//! Picks the chain engine from the sync mode:
//!
//! - `light` builds one light client, never a sidecar
//! - `full` / `fast` build one full node, plus a light-serving sidecar when
//!   `lightserv > 0`
//!
//! The light client / light server combination never reaches this point:
//! validation rejects `--lightserv` together with `--syncmode=light`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::container::ChainConfig;
use crate::ports::ServiceBackend;
use crate::registry::{RegistryError, ServiceFactory, ServiceHandle, ServiceRegistry};

pub const FULL_NODE_SERVICE: &str = "full-node";
pub const LIGHT_CLIENT_SERVICE: &str = "light-client";

/// Chain service decided for a resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainServicePlan {
    LightClient,
    FullNode { light_server: bool },
}

impl ChainServicePlan {
    /// Registry name of the primary service.
    #[must_use]
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::LightClient => LIGHT_CLIENT_SERVICE,
            Self::FullNode { .. } => FULL_NODE_SERVICE,
        }
    }
}

/// Decide the chain service. Depends only on the sync mode literal and the
/// light-serve percentage.
#[must_use]
pub fn select_chain_service(chain: &ChainConfig) -> ChainServicePlan {
    if chain.sync_mode.is_full_family() {
        ChainServicePlan::FullNode {
            light_server: chain.is_light_server(),
        }
    } else {
        ChainServicePlan::LightClient
    }
}

/// Register the chain service factory and return its registry name.
///
/// Failing to build the primary service aborts startup. Failing to build the
/// light-serving sidecar is logged and the full node runs without it.
pub fn register_chain_service(
    registry: &mut ServiceRegistry,
    backend: Arc<dyn ServiceBackend>,
    chain: &ChainConfig,
) -> Result<&'static str, RegistryError> {
    let plan = select_chain_service(chain);
    info!("Chain service selected: {:?} (sync_mode={})", plan, chain.sync_mode);

    let factory = match plan {
        ChainServicePlan::LightClient => ServiceFactory::new(LIGHT_CLIENT_SERVICE, move |ctx| {
            backend
                .light_client(ctx.config())
                .map(ServiceHandle::LightClient)
        }),
        ChainServicePlan::FullNode { light_server } => {
            ServiceFactory::new(FULL_NODE_SERVICE, move |ctx| {
                let full_node = backend.full_node(ctx.config())?;
                if light_server {
                    match backend.light_server(&full_node, ctx.config()) {
                        Ok(server) => {
                            info!(
                                "Light server attached to {} ({}% serve time)",
                                full_node.name(),
                                server.serve_percent()
                            );
                            full_node.attach_light_server(server);
                        }
                        Err(e) => {
                            warn!("Failed to create light server, continuing without it: {}", e);
                        }
                    }
                }
                Ok(ServiceHandle::FullNode(full_node))
            })
        }
    };
    registry.register(factory)?;
    Ok(plan.service_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SyncMode;

    fn chain(sync_mode: SyncMode, light_serve: u8) -> ChainConfig {
        ChainConfig {
            sync_mode,
            light_serve,
            ..ChainConfig::default()
        }
    }

    #[test]
    fn test_light_mode_selects_light_client() {
        assert_eq!(
            select_chain_service(&chain(SyncMode::Light, 0)),
            ChainServicePlan::LightClient
        );
    }

    #[test]
    fn test_full_family_selects_full_node() {
        for mode in [SyncMode::Full, SyncMode::Fast] {
            assert_eq!(
                select_chain_service(&chain(mode, 0)),
                ChainServicePlan::FullNode {
                    light_server: false
                }
            );
            assert_eq!(
                select_chain_service(&chain(mode, 10)),
                ChainServicePlan::FullNode { light_server: true }
            );
        }
    }

    #[test]
    fn test_service_names() {
        assert_eq!(ChainServicePlan::LightClient.service_name(), "light-client");
        assert_eq!(
            ChainServicePlan::FullNode { light_server: true }.service_name(),
            "full-node"
        );
    }
}
