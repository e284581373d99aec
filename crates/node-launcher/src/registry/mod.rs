//! # Service Registry
//!
//! Deferred, named service factories executed once at startup.
//!
//! Factories are recorded while the configuration is resolved and run later,
//! sequentially, in registration order. A factory may declare dependencies by
//! name; they are looked up among the services already constructed. The
//! registry never reorders factories: producers must be registered before
//! their consumers.
//!
//! ```text
//! register("full-node") ──► register("shh") ──► register("stats", deps=[full-node])
//!                                   │
//!                         construct_all(config)
//!                                   ▼
//!        [full-node] ──► [shh] ──► [stats ◄── lookup "full-node"]
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::container::NodeConfig;
use crate::ports::{
    FullNodeService, LightClientService, MessagingService, ServiceError, ServiceStatus,
    StatsReporterService,
};

/// Typed handle to a constructed service.
#[derive(Clone)]
pub enum ServiceHandle {
    FullNode(Arc<dyn FullNodeService>),
    LightClient(Arc<dyn LightClientService>),
    StatsReporter(Arc<dyn StatsReporterService>),
    Messaging(Arc<dyn MessagingService>),
}

impl ServiceHandle {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullNode(s) => s.name(),
            Self::LightClient(s) => s.name(),
            Self::StatsReporter(s) => s.name(),
            Self::Messaging(s) => s.name(),
        }
    }

    pub async fn start(&self) -> Result<(), ServiceError> {
        match self {
            Self::FullNode(s) => s.start().await,
            Self::LightClient(s) => s.start().await,
            Self::StatsReporter(s) => s.start().await,
            Self::Messaging(s) => s.start().await,
        }
    }

    pub async fn stop(&self) -> Result<(), ServiceError> {
        match self {
            Self::FullNode(s) => s.stop().await,
            Self::LightClient(s) => s.stop().await,
            Self::StatsReporter(s) => s.stop().await,
            Self::Messaging(s) => s.stop().await,
        }
    }

    #[must_use]
    pub fn status(&self) -> ServiceStatus {
        match self {
            Self::FullNode(s) => s.status(),
            Self::LightClient(s) => s.status(),
            Self::StatsReporter(s) => s.status(),
            Self::Messaging(s) => s.status(),
        }
    }

    #[must_use]
    pub fn as_full_node(&self) -> Option<&Arc<dyn FullNodeService>> {
        match self {
            Self::FullNode(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_light_client(&self) -> Option<&Arc<dyn LightClientService>> {
        match self {
            Self::LightClient(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::FullNode(_) => "FullNode",
            Self::LightClient(_) => "LightClient",
            Self::StatsReporter(_) => "StatsReporter",
            Self::Messaging(_) => "Messaging",
        };
        write!(f, "{kind}({})", self.name())
    }
}

/// Registry errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("service {service} depends on {dependency}, which was not constructed before it")]
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },

    #[error("failed to construct service {service}: {source}")]
    Construction {
        service: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("service {name} registered twice")]
    DuplicateService { name: &'static str },
}

/// What a factory sees while it runs.
pub struct ServiceContext<'a> {
    service: &'static str,
    config: &'a Arc<NodeConfig>,
    constructed: &'a [(&'static str, ServiceHandle)],
}

impl<'a> ServiceContext<'a> {
    #[must_use]
    pub fn config(&self) -> &'a Arc<NodeConfig> {
        self.config
    }

    /// A service constructed by an earlier factory.
    #[must_use]
    pub fn dependency(&self, name: &str) -> Option<&'a ServiceHandle> {
        self.constructed
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, handle)| handle)
    }

    /// Like [`ServiceContext::dependency`], failing with a service error.
    pub fn require(&self, name: &str) -> Result<&'a ServiceHandle, ServiceError> {
        self.dependency(name).ok_or_else(|| {
            ServiceError::new(self.service, format!("dependency {name} not available"))
        })
    }
}

type Construct =
    Box<dyn FnOnce(&ServiceContext<'_>) -> Result<ServiceHandle, ServiceError> + Send>;

/// A named, deferred construction step.
pub struct ServiceFactory {
    name: &'static str,
    dependencies: Vec<&'static str>,
    construct: Construct,
}

impl ServiceFactory {
    pub fn new<F>(name: &'static str, construct: F) -> Self
    where
        F: FnOnce(&ServiceContext<'_>) -> Result<ServiceHandle, ServiceError> + Send + 'static,
    {
        Self {
            name,
            dependencies: Vec::new(),
            construct: Box::new(construct),
        }
    }

    /// Declare a service that must already be constructed when this one runs.
    #[must_use]
    pub fn depends_on(mut self, name: &'static str) -> Self {
        self.dependencies.push(name);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Ordered list of pending factories.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    factories: Vec<ServiceFactory>,
    names: HashSet<&'static str>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, factory: ServiceFactory) -> Result<(), RegistryError> {
        if !self.names.insert(factory.name) {
            return Err(RegistryError::DuplicateService { name: factory.name });
        }
        info!("[Registry] Registering service: {}", factory.name);
        self.factories.push(factory);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered service names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|f| f.name)
    }

    /// Run every factory in registration order. Stops at the first missing
    /// dependency or construction failure.
    pub fn construct_all(
        self,
        config: &Arc<NodeConfig>,
    ) -> Result<ConstructedServices, RegistryError> {
        let mut constructed: Vec<(&'static str, ServiceHandle)> =
            Vec::with_capacity(self.factories.len());

        for factory in self.factories {
            for &dependency in &factory.dependencies {
                if !constructed.iter().any(|(n, _)| *n == dependency) {
                    return Err(RegistryError::MissingDependency {
                        service: factory.name,
                        dependency,
                    });
                }
            }

            info!("[Registry] Constructing {}", factory.name);
            let ctx = ServiceContext {
                service: factory.name,
                config,
                constructed: &constructed,
            };
            let handle = (factory.construct)(&ctx).map_err(|source| {
                RegistryError::Construction {
                    service: factory.name,
                    source,
                }
            })?;
            debug!("[Registry] {} constructed as {:?}", factory.name, handle);
            constructed.push((factory.name, handle));
        }

        Ok(ConstructedServices {
            services: constructed,
        })
    }
}

/// Services produced by [`ServiceRegistry::construct_all`], in construction
/// order.
#[derive(Debug, Default)]
pub struct ConstructedServices {
    services: Vec<(&'static str, ServiceHandle)>,
}

impl ConstructedServices {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ServiceHandle> {
        self.services
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, handle)| handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ServiceHandle)> {
        self.services.iter().map(|(n, h)| (*n, h))
    }

    pub(crate) fn into_handles(self) -> Vec<ServiceHandle> {
        self.services.into_iter().map(|(_, h)| h).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Service;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct Overlay(&'static str);

    #[async_trait]
    impl Service for Overlay {
        fn name(&self) -> &'static str {
            self.0
        }
        async fn start(&self) -> Result<(), ServiceError> {
            Ok(())
        }
        async fn stop(&self) -> Result<(), ServiceError> {
            Ok(())
        }
        fn status(&self) -> ServiceStatus {
            ServiceStatus::Constructed
        }
    }

    impl MessagingService for Overlay {
        fn max_message_size(&self) -> u32 {
            1024
        }
    }

    fn overlay(name: &'static str) -> ServiceHandle {
        ServiceHandle::Messaging(Arc::new(Overlay(name)))
    }

    fn config() -> Arc<NodeConfig> {
        Arc::new(NodeConfig::default())
    }

    #[test]
    fn test_factories_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ServiceRegistry::new();
        for name in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            registry
                .register(ServiceFactory::new(name, move |_| {
                    order.lock().push(name);
                    Ok(overlay(name))
                }))
                .unwrap();
        }
        let services = registry.construct_all(&config()).unwrap();
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
        assert_eq!(services.len(), 3);
        assert_eq!(services.get("b").unwrap().name(), "b");
    }

    #[test]
    fn test_dependency_lookup() {
        let mut registry = ServiceRegistry::new();
        registry
            .register(ServiceFactory::new("producer", |_| Ok(overlay("producer"))))
            .unwrap();
        registry
            .register(
                ServiceFactory::new("consumer", |ctx| {
                    let producer = ctx.require("producer")?;
                    assert_eq!(producer.name(), "producer");
                    Ok(overlay("consumer"))
                })
                .depends_on("producer"),
            )
            .unwrap();
        assert!(registry.construct_all(&config()).is_ok());
    }

    #[test]
    fn test_consumer_before_producer_fails() {
        let mut registry = ServiceRegistry::new();
        registry
            .register(
                ServiceFactory::new("consumer", |_| Ok(overlay("consumer"))).depends_on("producer"),
            )
            .unwrap();
        registry
            .register(ServiceFactory::new("producer", |_| Ok(overlay("producer"))))
            .unwrap();
        let err = registry.construct_all(&config()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingDependency {
                service: "consumer",
                dependency: "producer"
            }
        ));
    }

    #[test]
    fn test_construction_failure_names_factory() {
        let mut registry = ServiceRegistry::new();
        registry
            .register(ServiceFactory::new("broken", |_| {
                Err(ServiceError::new("broken", "no disk"))
            }))
            .unwrap();
        let err = registry.construct_all(&config()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to construct service broken: [broken] no disk"
        );
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ServiceRegistry::new();
        registry
            .register(ServiceFactory::new("a", |_| Ok(overlay("a"))))
            .unwrap();
        assert!(matches!(
            registry.register(ServiceFactory::new("a", |_| Ok(overlay("a")))),
            Err(RegistryError::DuplicateService { name: "a" })
        ));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_handle_accessors() {
        let handle = overlay("shh");
        assert!(handle.as_full_node().is_none());
        assert!(handle.as_light_client().is_none());
        assert_eq!(format!("{handle:?}"), "Messaging(shh)");
    }
}
