//! # Node Launcher Library
//!
//! Startup configuration for the Quantum-Chain node: turns command-line
//! options into one validated `NodeConfig`, then decides which services the
//! node is composed of. The `qc-node` binary is a thin shell around it.
//!
//! ## Flow
//!
//! ```text
//! OptionTable ─► validate ─► resolve_config ─► NodeConfig (frozen, Arc)
//!                                                  │
//!                        register_services ◄───────┘
//!                                │
//!                 ServiceRegistry::construct_all ─► NodeRuntime
//! ```
//!
//! ## Architectural Patterns
//!
//! - **Pure resolution**: the option table is the only input, no ambient state
//! - **Hexagonal Architecture**: `ports` define service contracts, `adapters`
//!   implement them
//! - **Explicit wiring**: factories name their dependencies, the registry
//!   runs them strictly in registration order

#![allow(clippy::module_name_repetitions)]

pub mod accounts;
pub mod adapters;
pub mod console;
pub mod container;
pub mod options;
pub mod ports;
pub mod registry;
pub mod resolve;
pub mod runtime;
pub mod validation;
pub mod wiring;

pub use container::{ConfigError, ConfigResult, NodeConfig};
pub use options::{Invocation, OptionTable};
pub use registry::{
    ConstructedServices, RegistryError, ServiceContext, ServiceFactory, ServiceHandle,
    ServiceRegistry,
};
pub use resolve::resolve_config;
pub use runtime::NodeRuntime;
pub use validation::{
    builtin_exclusion_groups, check_mutually_exclusive, validate, MutualExclusionGroup,
};
pub use wiring::register_services;
