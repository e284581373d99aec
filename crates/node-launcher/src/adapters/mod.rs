//! # Adapter Implementations
//!
//! Concrete [`ServiceBackend`](crate::ports::ServiceBackend) implementations.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  OUTER LAYER (Adapters)   StandbyBackend, ...            │
//! │                    ↑ implements ↑                        │
//! │  MIDDLE LAYER (Ports)     ServiceBackend, Service traits │
//! │                    ↑ uses ↑                              │
//! │  INNER LAYER              resolve, registry, wiring      │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod standby;

pub use standby::{
    StandbyBackend, StandbyFullNode, StandbyLightClient, StandbyLightServer, StandbyMessaging,
    StandbyStatsReporter,
};
