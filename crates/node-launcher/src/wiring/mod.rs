//! # Service Wiring
//!
//! Turns the resolved configuration into registry entries.
//!
//! ```text
//! NodeConfig ──► select_chain_service ──► full-node (+ light server) | light-client
//!            ──► messaging overlay (if enabled)
//!            ──► stats reporter (depends on the chain service)
//! ```

pub mod addons;
pub mod sync_mode;

pub use addons::{
    register_messaging_service, register_services, register_stats_service, MESSAGING_SERVICE,
    STATS_SERVICE,
};
pub use sync_mode::{
    register_chain_service, select_chain_service, ChainServicePlan, FULL_NODE_SERVICE,
    LIGHT_CLIENT_SERVICE,
};
