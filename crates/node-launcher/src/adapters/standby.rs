//! # Standby Backend
//!
//! In-process stand-ins for the external services. They carry their
//! configuration and track their lifecycle so the launcher can be run end to
//! end without a chain engine linked in.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::container::{MessagingConfig, NodeConfig, StatsEndpoint};
use crate::ports::{
    FullNodeService, LightClientService, LightServerService, MessagingService, Service,
    ServiceBackend, ServiceError, ServiceStatus, StatsReporterService,
};
use crate::registry::ServiceHandle;

/// Lifecycle bookkeeping shared by every standby service.
struct Lifecycle {
    name: &'static str,
    status: RwLock<ServiceStatus>,
}

impl Lifecycle {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            status: RwLock::new(ServiceStatus::Constructed),
        }
    }

    fn start(&self) -> Result<(), ServiceError> {
        let mut status = self.status.write();
        if *status == ServiceStatus::Running {
            return Err(ServiceError::new(self.name, "already running"));
        }
        *status = ServiceStatus::Starting;
        debug!("[{}] starting", self.name);
        *status = ServiceStatus::Running;
        info!("[{}] running", self.name);
        Ok(())
    }

    fn stop(&self) -> Result<(), ServiceError> {
        let mut status = self.status.write();
        if *status != ServiceStatus::Running {
            return Err(ServiceError::new(self.name, "not running"));
        }
        *status = ServiceStatus::Stopped;
        info!("[{}] stopped", self.name);
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        *self.status.read()
    }
}

macro_rules! standby_service {
    ($ty:ty) => {
        #[async_trait]
        impl Service for $ty {
            fn name(&self) -> &'static str {
                self.lifecycle.name
            }

            async fn start(&self) -> Result<(), ServiceError> {
                self.lifecycle.start()?;
                self.on_start().await
            }

            async fn stop(&self) -> Result<(), ServiceError> {
                self.on_stop().await?;
                self.lifecycle.stop()
            }

            fn status(&self) -> ServiceStatus {
                self.lifecycle.status()
            }
        }
    };
}

// =============================================================================
// CHAIN ENGINES
// =============================================================================

/// Full-sync engine stand-in. Starts and stops its attached light server.
pub struct StandbyFullNode {
    lifecycle: Lifecycle,
    config: Arc<NodeConfig>,
    light_server: RwLock<Option<Arc<dyn LightServerService>>>,
}

impl StandbyFullNode {
    #[must_use]
    pub fn new(config: Arc<NodeConfig>) -> Self {
        Self {
            lifecycle: Lifecycle::new("full-node"),
            config,
            light_server: RwLock::new(None),
        }
    }

    async fn on_start(&self) -> Result<(), ServiceError> {
        info!(
            "[full-node] network_id={}, sync_mode={}, peers={} (full={}, light={})",
            self.config.chain.network_id,
            self.config.chain.sync_mode,
            self.config.network.max_peers,
            self.config.network.peer_slots.full,
            self.config.network.peer_slots.light
        );
        let server = self.light_server.read().clone();
        match server {
            Some(server) => server.start().await,
            None => Ok(()),
        }
    }

    async fn on_stop(&self) -> Result<(), ServiceError> {
        let server = self.light_server.read().clone();
        match server {
            Some(server) => server.stop().await,
            None => Ok(()),
        }
    }
}

standby_service!(StandbyFullNode);

impl FullNodeService for StandbyFullNode {
    fn attach_light_server(&self, server: Arc<dyn LightServerService>) {
        *self.light_server.write() = Some(server);
    }

    fn light_server(&self) -> Option<Arc<dyn LightServerService>> {
        self.light_server.read().clone()
    }
}

/// Light-serving sidecar stand-in.
pub struct StandbyLightServer {
    lifecycle: Lifecycle,
    serve_percent: u8,
    light_peers: usize,
}

impl StandbyLightServer {
    #[must_use]
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            lifecycle: Lifecycle::new("light-server"),
            serve_percent: config.chain.light_serve,
            light_peers: config.network.peer_slots.light,
        }
    }

    async fn on_start(&self) -> Result<(), ServiceError> {
        info!(
            "[light-server] serving {} light peers at {}% serve time",
            self.light_peers, self.serve_percent
        );
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

standby_service!(StandbyLightServer);

impl LightServerService for StandbyLightServer {
    fn serve_percent(&self) -> u8 {
        self.serve_percent
    }
}

/// Light-client engine stand-in.
pub struct StandbyLightClient {
    lifecycle: Lifecycle,
    network_id: u64,
    light_peers: usize,
}

impl StandbyLightClient {
    #[must_use]
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            lifecycle: Lifecycle::new("light-client"),
            network_id: config.chain.network_id,
            light_peers: config.network.peer_slots.light,
        }
    }

    async fn on_start(&self) -> Result<(), ServiceError> {
        info!(
            "[light-client] network_id={}, light peers={}",
            self.network_id, self.light_peers
        );
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

standby_service!(StandbyLightClient);

impl LightClientService for StandbyLightClient {
    fn network_id(&self) -> u64 {
        self.network_id
    }
}

// =============================================================================
// ADD-ONS
// =============================================================================

/// Stats reporter stand-in.
pub struct StandbyStatsReporter {
    lifecycle: Lifecycle,
    endpoint: StatsEndpoint,
    chain: &'static str,
}

impl StandbyStatsReporter {
    async fn on_start(&self) -> Result<(), ServiceError> {
        info!("[stats] reporting {} to {}", self.chain, self.endpoint);
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

standby_service!(StandbyStatsReporter);

impl StatsReporterService for StandbyStatsReporter {
    fn endpoint(&self) -> &StatsEndpoint {
        &self.endpoint
    }
}

/// Messaging overlay stand-in.
pub struct StandbyMessaging {
    lifecycle: Lifecycle,
    config: MessagingConfig,
}

impl StandbyMessaging {
    async fn on_start(&self) -> Result<(), ServiceError> {
        info!(
            "[shh] max message size {} bytes, minimum PoW {}",
            self.config.max_message_size, self.config.minimum_pow
        );
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

standby_service!(StandbyMessaging);

impl MessagingService for StandbyMessaging {
    fn max_message_size(&self) -> u32 {
        self.config.max_message_size
    }
}

// =============================================================================
// BACKEND
// =============================================================================

/// Builds standby services.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandbyBackend;

impl ServiceBackend for StandbyBackend {
    fn full_node(
        &self,
        config: &Arc<NodeConfig>,
    ) -> Result<Arc<dyn FullNodeService>, ServiceError> {
        Ok(Arc::new(StandbyFullNode::new(Arc::clone(config))))
    }

    fn light_client(
        &self,
        config: &Arc<NodeConfig>,
    ) -> Result<Arc<dyn LightClientService>, ServiceError> {
        Ok(Arc::new(StandbyLightClient::new(config)))
    }

    fn light_server(
        &self,
        _full_node: &Arc<dyn FullNodeService>,
        config: &Arc<NodeConfig>,
    ) -> Result<Arc<dyn LightServerService>, ServiceError> {
        Ok(Arc::new(StandbyLightServer::new(config)))
    }

    fn stats_reporter(
        &self,
        endpoint: &StatsEndpoint,
        chain: &ServiceHandle,
    ) -> Result<Arc<dyn StatsReporterService>, ServiceError> {
        Ok(Arc::new(StandbyStatsReporter {
            lifecycle: Lifecycle::new("stats"),
            endpoint: endpoint.clone(),
            chain: chain.name(),
        }))
    }

    fn messaging(
        &self,
        config: &MessagingConfig,
    ) -> Result<Arc<dyn MessagingService>, ServiceError> {
        Ok(Arc::new(StandbyMessaging {
            lifecycle: Lifecycle::new("shh"),
            config: config.clone(),
        }))
    }
}
