//! # Configuration Container
//!
//! The resolved node configuration, its value objects and the errors raised
//! while building it.
//!
//! ## Lifecycle
//!
//! - Default-valued from compiled-in constants
//! - Overridden by explicitly set options (see `resolve`)
//! - Frozen as `Arc<NodeConfig>` before service construction

pub mod config;
pub mod error;
pub mod values;

pub use config::{
    AccountsConfig, ChainConfig, ConsoleConfig, GasOracleConfig, HttpConfig, MessagingConfig,
    NetworkConfig, NodeConfig, NodeSettings, PeerSlots, TxPoolConfig, WsConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use values::{
    BootstrapNode, Coinbase, GcMode, NatMode, NetMask, NodeKeySource, StatsEndpoint, SyncMode,
};
