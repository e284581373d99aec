//! # Node Runtime
//!
//! Drives the constructed services: starts them in registration order and
//! stops them in reverse order.

use parking_lot::Mutex;
use tracing::{error, info};

use crate::ports::{ServiceError, ServiceStatus};
use crate::registry::{ConstructedServices, ServiceHandle};

/// The running node.
pub struct NodeRuntime {
    services: Vec<ServiceHandle>,
    /// Number of leading services that started successfully.
    started: Mutex<usize>,
}

impl NodeRuntime {
    #[must_use]
    pub fn new(services: ConstructedServices) -> Self {
        Self {
            services: services.into_handles(),
            started: Mutex::new(0),
        }
    }

    /// Start every service in order. The first failure is fatal: services
    /// already started are stopped again and the error is returned.
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("===========================================");
        info!("  Quantum-Chain Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        for (index, service) in self.services.iter().enumerate() {
            info!("Starting {}", service.name());
            if let Err(e) = service.start().await {
                error!("Failed to start {}: {}", service.name(), e);
                self.shutdown().await;
                return Err(e);
            }
            *self.started.lock() = index + 1;
        }

        info!("Node started with {} service(s)", self.services.len());
        Ok(())
    }

    /// Stop started services in reverse order. Stop errors are logged and do
    /// not abort the shutdown.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let started = std::mem::take(&mut *self.started.lock());
        for service in self.services[..started].iter().rev() {
            info!("Stopping {}", service.name());
            if let Err(e) = service.stop().await {
                error!("Failed to stop {}: {}", service.name(), e);
            }
        }
        info!("Shutdown complete");
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<(&'static str, ServiceStatus)> {
        self.services
            .iter()
            .map(|s| (s.name(), s.status()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::container::NodeConfig;
    use crate::ports::{MessagingService, Service};
    use crate::registry::{ServiceFactory, ServiceRegistry};

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        fail_start: bool,
        fail_stop: bool,
        journal: Journal,
        status: Mutex<ServiceStatus>,
    }

    #[async_trait]
    impl Service for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn start(&self) -> Result<(), ServiceError> {
            self.journal.lock().push(format!("start {}", self.name));
            if self.fail_start {
                *self.status.lock() = ServiceStatus::Failed;
                return Err(ServiceError::new(self.name, "refused"));
            }
            *self.status.lock() = ServiceStatus::Running;
            Ok(())
        }

        async fn stop(&self) -> Result<(), ServiceError> {
            self.journal.lock().push(format!("stop {}", self.name));
            if self.fail_stop {
                return Err(ServiceError::new(self.name, "stuck"));
            }
            *self.status.lock() = ServiceStatus::Stopped;
            Ok(())
        }

        fn status(&self) -> ServiceStatus {
            *self.status.lock()
        }
    }

    impl MessagingService for Recorder {
        fn max_message_size(&self) -> u32 {
            0
        }
    }

    fn runtime(plan: &[(&'static str, bool, bool)], journal: &Journal) -> NodeRuntime {
        let mut registry = ServiceRegistry::new();
        for &(name, fail_start, fail_stop) in plan {
            let journal = Arc::clone(journal);
            registry
                .register(ServiceFactory::new(name, move |_| {
                    Ok(ServiceHandle::Messaging(Arc::new(Recorder {
                        name,
                        fail_start,
                        fail_stop,
                        journal,
                        status: Mutex::new(ServiceStatus::Constructed),
                    })))
                }))
                .unwrap();
        }
        let services = registry
            .construct_all(&Arc::new(NodeConfig::default()))
            .unwrap();
        NodeRuntime::new(services)
    }

    #[tokio::test]
    async fn test_start_in_order_stop_in_reverse() {
        let journal = Journal::default();
        let runtime = runtime(&[("a", false, false), ("b", false, false)], &journal);
        runtime.start().await.unwrap();
        runtime.shutdown().await;
        assert_eq!(
            *journal.lock(),
            vec!["start a", "start b", "stop b", "stop a"]
        );
        assert!(runtime
            .statuses()
            .iter()
            .all(|(_, s)| *s == ServiceStatus::Stopped));
    }

    #[tokio::test]
    async fn test_start_failure_unwinds_started_services() {
        let journal = Journal::default();
        let runtime = runtime(
            &[("a", false, false), ("b", true, false), ("c", false, false)],
            &journal,
        );
        let err = runtime.start().await.unwrap_err();
        assert_eq!(err.service, "b");
        assert_eq!(*journal.lock(), vec!["start a", "start b", "stop a"]);
    }

    #[tokio::test]
    async fn test_stop_errors_do_not_abort_shutdown() {
        let journal = Journal::default();
        let runtime = runtime(&[("a", false, false), ("b", false, true)], &journal);
        runtime.start().await.unwrap();
        runtime.shutdown().await;
        assert_eq!(
            *journal.lock(),
            vec!["start a", "start b", "stop b", "stop a"]
        );
    }

    #[tokio::test]
    async fn test_shutdown_twice_is_noop() {
        let journal = Journal::default();
        let runtime = runtime(&[("a", false, false)], &journal);
        runtime.start().await.unwrap();
        runtime.shutdown().await;
        runtime.shutdown().await;
        assert_eq!(*journal.lock(), vec!["start a", "stop a"]);
    }
}
