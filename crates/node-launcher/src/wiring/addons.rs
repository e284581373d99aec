//! Add-on services registered after the chain service.

use std::sync::Arc;

use tracing::info;

use crate::container::NodeConfig;
use crate::ports::ServiceBackend;
use crate::registry::{RegistryError, ServiceFactory, ServiceHandle, ServiceRegistry};
use crate::wiring::sync_mode::register_chain_service;

pub const MESSAGING_SERVICE: &str = "shh";
pub const STATS_SERVICE: &str = "stats";

/// Register the messaging overlay if it is enabled.
pub fn register_messaging_service(
    registry: &mut ServiceRegistry,
    backend: Arc<dyn ServiceBackend>,
    config: &NodeConfig,
) -> Result<bool, RegistryError> {
    if !config.messaging.enabled {
        return Ok(false);
    }
    registry.register(ServiceFactory::new(MESSAGING_SERVICE, move |ctx| {
        backend
            .messaging(&ctx.config().messaging)
            .map(ServiceHandle::Messaging)
    }))?;
    Ok(true)
}

/// Register the stats reporter if a reporting URL is configured. It reports
/// on `chain_service`, which must be registered first.
pub fn register_stats_service(
    registry: &mut ServiceRegistry,
    backend: Arc<dyn ServiceBackend>,
    config: &NodeConfig,
    chain_service: &'static str,
) -> Result<bool, RegistryError> {
    let Some(endpoint) = config.stats.clone() else {
        return Ok(false);
    };
    let factory = ServiceFactory::new(STATS_SERVICE, move |ctx| {
        let chain = ctx.require(chain_service)?;
        backend
            .stats_reporter(&endpoint, chain)
            .map(ServiceHandle::StatsReporter)
    })
    .depends_on(chain_service);
    registry.register(factory)?;
    Ok(true)
}

/// Register every service the configuration asks for: chain service first,
/// then the add-ons that may depend on it.
pub fn register_services(
    registry: &mut ServiceRegistry,
    backend: Arc<dyn ServiceBackend>,
    config: &NodeConfig,
) -> Result<(), RegistryError> {
    let chain_service = register_chain_service(registry, Arc::clone(&backend), &config.chain)?;
    let messaging = register_messaging_service(registry, Arc::clone(&backend), config)?;
    let stats = register_stats_service(registry, backend, config, chain_service)?;
    info!(
        "Registered {} service(s): chain={}, messaging={}, stats={}",
        registry.len(),
        chain_service,
        messaging,
        stats
    );
    Ok(())
}
