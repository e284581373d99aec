//! # Service Ports
//!
//! Contracts between the launcher and the long-running services it composes.
//! The launcher never names a concrete engine: it asks a [`ServiceBackend`]
//! to build each service and drives them through these traits.
//!
//! ## Services
//!
//! | Port | Built when |
//! |------|------------|
//! | [`FullNodeService`] | sync mode `full` or `fast` |
//! | [`LightServerService`] | full-family node with `lightserv > 0` (sidecar) |
//! | [`LightClientService`] | sync mode `light` |
//! | [`MessagingService`] | `shh` set |
//! | [`StatsReporterService`] | `ethstats` set |

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::container::{MessagingConfig, NodeConfig, StatsEndpoint};
use crate::registry::ServiceHandle;

/// Service lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Constructed, not started.
    Constructed,
    Starting,
    Running,
    /// Stopped gracefully.
    Stopped,
    Failed,
}

/// Error raised by a service or by its constructor.
#[derive(Debug, Clone, Error)]
#[error("[{service}] {message}")]
pub struct ServiceError {
    pub service: &'static str,
    pub message: String,
}

impl ServiceError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

/// Lifecycle shared by every service.
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &'static str;

    /// Begin processing. Called once, in registration order.
    async fn start(&self) -> Result<(), ServiceError>;

    /// Stop gracefully. Called in reverse registration order.
    async fn stop(&self) -> Result<(), ServiceError>;

    fn status(&self) -> ServiceStatus;
}

/// Full-sync chain engine.
pub trait FullNodeService: Service {
    /// Bind a light-serving sidecar so the node answers both protocol
    /// families. The full node owns the sidecar's lifecycle from then on.
    fn attach_light_server(&self, server: Arc<dyn LightServerService>);

    fn light_server(&self) -> Option<Arc<dyn LightServerService>>;
}

/// Light-protocol server running next to a full node.
pub trait LightServerService: Service {
    /// Share of time spent answering light clients, in percent.
    fn serve_percent(&self) -> u8;
}

/// Light-protocol client engine.
pub trait LightClientService: Service {
    fn network_id(&self) -> u64;
}

/// Stats reporter add-on.
pub trait StatsReporterService: Service {
    fn endpoint(&self) -> &StatsEndpoint;
}

/// Messaging overlay add-on.
pub trait MessagingService: Service {
    fn max_message_size(&self) -> u32;
}

/// Constructors for every external service.
pub trait ServiceBackend: Send + Sync {
    fn full_node(
        &self,
        config: &Arc<NodeConfig>,
    ) -> Result<Arc<dyn FullNodeService>, ServiceError>;

    fn light_client(
        &self,
        config: &Arc<NodeConfig>,
    ) -> Result<Arc<dyn LightClientService>, ServiceError>;

    /// Build the light-serving sidecar for an already constructed full node.
    fn light_server(
        &self,
        full_node: &Arc<dyn FullNodeService>,
        config: &Arc<NodeConfig>,
    ) -> Result<Arc<dyn LightServerService>, ServiceError>;

    /// Build the stats reporter; `chain` is the chain service it reports on.
    fn stats_reporter(
        &self,
        endpoint: &StatsEndpoint,
        chain: &ServiceHandle,
    ) -> Result<Arc<dyn StatsReporterService>, ServiceError>;

    fn messaging(
        &self,
        config: &MessagingConfig,
    ) -> Result<Arc<dyn MessagingService>, ServiceError>;
}
