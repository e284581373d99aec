//! # Node Configuration
//!
//! The resolved configuration for every part of the node. Starts from the
//! compiled-in defaults below, is overridden by explicitly set options during
//! resolution, then frozen behind an `Arc` before any service is built.
//!
//! ## Defaults
//!
//! - Peer budget: 25 total, no light-protocol slots
//! - Caches: 768 MB database, 256 MB trie (service built-ins, only replaced
//!   when a cache option is touched)
//! - Sync mode: fast

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::container::values::{
    BootstrapNode, Coinbase, GcMode, NatMode, NetMask, NodeKeySource, StatsEndpoint, SyncMode,
};

/// Default total peer budget.
pub const DEFAULT_MAX_PEERS: usize = 25;
/// Default number of light-protocol peer slots.
pub const DEFAULT_LIGHT_PEERS: usize = 25;
/// Upper bound of the light-serve percentage.
pub const MAX_LIGHT_SERVE: u8 = 90;
pub const DEFAULT_LISTEN_PORT: u16 = 30303;
pub const DEFAULT_HTTP_PORT: u16 = 8545;
pub const DEFAULT_WS_PORT: u16 = 8546;
/// Database cache used when no cache option is given.
pub const DEFAULT_DATABASE_CACHE_MB: u64 = 768;
/// Trie cache used when no cache option is given.
pub const DEFAULT_TRIE_CACHE_MB: u64 = 256;
pub const DEFAULT_TRIE_CACHE_GENS: u16 = 120;
pub const DEFAULT_IPC_ENDPOINT: &str = "qc-node.ipc";

/// Complete node configuration.
#[derive(Debug, Clone, Serialize)]
pub struct NodeConfig {
    /// Data directories, identity and API endpoints.
    pub node: NodeSettings,
    /// P2P networking.
    pub network: NetworkConfig,
    /// Chain engine: sync mode, light protocol, caches, producer.
    pub chain: ChainConfig,
    /// Transaction pool (pass-through).
    pub tx_pool: TxPoolConfig,
    /// Gas price oracle (pass-through).
    pub gas_oracle: GasOracleConfig,
    /// Messaging overlay add-on.
    pub messaging: MessagingConfig,
    /// Stats reporter add-on; `None` disables it.
    pub stats: Option<StatsEndpoint>,
    /// Accounts to unlock at startup.
    pub accounts: AccountsConfig,
    /// Interactive console.
    pub console: ConsoleConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node: NodeSettings::default(),
            network: NetworkConfig::default(),
            chain: ChainConfig::default(),
            tx_pool: TxPoolConfig::default(),
            gas_oracle: GasOracleConfig::default(),
            messaging: MessagingConfig::default(),
            stats: None,
            accounts: AccountsConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Render as TOML (for `--dumpconfig`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Default data directory: `<home>/.quantum-chain`, empty when no home
/// directory is known.
///
/// The home directory comes from the environment first, then the user
/// database, so services started without `$HOME` still get a default.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".quantum-chain"))
        .unwrap_or_default()
}

// =============================================================================
// NODE
// =============================================================================

/// Node identity, directories and API endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSettings {
    pub data_dir: PathBuf,
    /// Keystore location; inside the data directory when `None`.
    pub keystore_dir: Option<PathBuf>,
    pub identity: Option<String>,
    pub lightweight_kdf: bool,
    /// IPC endpoint; `None` disables IPC.
    pub ipc_path: Option<PathBuf>,
    pub http: HttpConfig,
    pub ws: WsConfig,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            keystore_dir: None,
            identity: None,
            lightweight_kdf: false,
            ipc_path: Some(PathBuf::from(DEFAULT_IPC_ENDPOINT)),
            http: HttpConfig::default(),
            ws: WsConfig::default(),
        }
    }
}

impl NodeSettings {
    /// IPC endpoint location. Relative names live inside the data directory,
    /// absolute paths escape it.
    #[must_use]
    pub fn ipc_endpoint(&self) -> Option<PathBuf> {
        self.ipc_path.as_deref().map(|p| absolute_or_join(&self.data_dir, p))
    }
}

pub(crate) fn absolute_or_join(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// HTTP-RPC endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HttpConfig {
    /// Listening interface; `None` disables the endpoint.
    pub host: Option<String>,
    pub port: u16,
    pub cors: Vec<String>,
    pub virtual_hosts: Vec<String>,
    pub modules: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_HTTP_PORT,
            cors: Vec::new(),
            virtual_hosts: vec!["localhost".to_string()],
            modules: Vec::new(),
        }
    }
}

/// WebSocket-RPC endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WsConfig {
    /// Listening interface; `None` disables the endpoint.
    pub host: Option<String>,
    pub port: u16,
    pub origins: Vec<String>,
    pub modules: Vec<String>,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_WS_PORT,
            origins: Vec::new(),
            modules: Vec::new(),
        }
    }
}

// =============================================================================
// NETWORK
// =============================================================================

/// Peer slots per protocol family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeerSlots {
    /// Full-sync protocol peers.
    pub full: usize,
    /// Light protocol peers (served or consumed).
    pub light: usize,
}

/// P2P networking configuration.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfig {
    /// Listening address, `:<port>`.
    pub listen_addr: String,
    /// Total peer budget across both protocol families.
    pub max_peers: usize,
    /// Pending connection attempts; 0 keeps the transport default.
    pub max_pending_peers: usize,
    pub peer_slots: PeerSlots,
    pub no_discovery: bool,
    pub nat: NatMode,
    pub bootstrap_nodes: Vec<BootstrapNode>,
    /// Empty means unrestricted.
    pub net_restrict: Vec<NetMask>,
    pub node_key: NodeKeySource,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!(":{DEFAULT_LISTEN_PORT}"),
            max_peers: DEFAULT_MAX_PEERS,
            max_pending_peers: 0,
            peer_slots: PeerSlots {
                full: DEFAULT_MAX_PEERS,
                light: 0,
            },
            no_discovery: false,
            nat: NatMode::Any,
            bootstrap_nodes: Vec::new(),
            net_restrict: Vec::new(),
            node_key: NodeKeySource::Ephemeral,
        }
    }
}

// =============================================================================
// CHAIN
// =============================================================================

/// Chain engine configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ChainConfig {
    pub network_id: u64,
    pub sync_mode: SyncMode,
    /// Percentage of time spent serving light clients, 0..=90. 0 disables the
    /// light-serving sidecar.
    pub light_serve: u8,
    pub light_peers: usize,
    pub database_cache_mb: u64,
    pub trie_cache_mb: u64,
    pub gc_mode: GcMode,
    /// Archive mode keeps every trie node.
    pub no_pruning: bool,
    pub trie_cache_gens: u16,
    pub doc_root: PathBuf,
    pub extra_data: Option<String>,
    /// Minimum accepted gas price in wei.
    #[serde(serialize_with = "serialize_display")]
    pub gas_price: u128,
    pub enable_preimage_recording: bool,
    pub target_gas_limit: u64,
    pub producing: bool,
    pub coinbase: Option<Coinbase>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network_id: 1,
            sync_mode: SyncMode::Fast,
            light_serve: 0,
            light_peers: DEFAULT_LIGHT_PEERS,
            database_cache_mb: DEFAULT_DATABASE_CACHE_MB,
            trie_cache_mb: DEFAULT_TRIE_CACHE_MB,
            gc_mode: GcMode::Full,
            no_pruning: false,
            trie_cache_gens: DEFAULT_TRIE_CACHE_GENS,
            doc_root: dirs::home_dir().unwrap_or_default(),
            extra_data: None,
            gas_price: 18_000_000_000, // 18 gwei
            enable_preimage_recording: false,
            target_gas_limit: 4_712_388,
            producing: false,
            coinbase: None,
        }
    }
}

impl ChainConfig {
    /// Node consumes the light protocol instead of syncing full state.
    #[must_use]
    pub fn is_light_client(&self) -> bool {
        self.sync_mode == SyncMode::Light
    }

    /// Node answers light-protocol requests next to its full sync.
    #[must_use]
    pub fn is_light_server(&self) -> bool {
        self.light_serve != 0
    }
}

// =============================================================================
// POOL / ORACLE / ADD-ONS
// =============================================================================

/// Transaction pool configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TxPoolConfig {
    pub no_locals: bool,
    pub journal: String,
    #[serde(serialize_with = "serialize_duration")]
    pub rejournal: Duration,
    pub price_limit: u64,
    pub price_bump: u64,
    pub account_slots: u64,
    pub global_slots: u64,
    pub account_queue: u64,
    pub global_queue: u64,
    #[serde(serialize_with = "serialize_duration")]
    pub lifetime: Duration,
}

impl Default for TxPoolConfig {
    fn default() -> Self {
        Self {
            no_locals: false,
            journal: "transactions.rlp".to_string(),
            rejournal: Duration::from_secs(3600),
            price_limit: 1,
            price_bump: 10,
            account_slots: 16,
            global_slots: 4096,
            account_queue: 64,
            global_queue: 1024,
            lifetime: Duration::from_secs(3 * 3600),
        }
    }
}

/// Gas price oracle configuration.
#[derive(Debug, Clone, Serialize)]
pub struct GasOracleConfig {
    pub blocks: usize,
    pub percentile: usize,
}

impl Default for GasOracleConfig {
    fn default() -> Self {
        Self {
            blocks: 20,
            percentile: 60,
        }
    }
}

/// Messaging overlay configuration.
#[derive(Debug, Clone, Serialize)]
pub struct MessagingConfig {
    pub enabled: bool,
    pub max_message_size: u32,
    pub minimum_pow: f64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_message_size: 1024 * 1024,
            minimum_pow: 0.2,
        }
    }
}

/// Account unlocking configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountsConfig {
    pub unlock: Vec<String>,
    pub password_file: Option<PathBuf>,
}

/// Console configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleConfig {
    /// Root for relative preload paths.
    pub js_path: PathBuf,
    /// Absolute preload script paths.
    pub preload: Vec<PathBuf>,
    pub exec: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            js_path: PathBuf::from("."),
            preload: Vec::new(),
            exec: None,
        }
    }
}

fn serialize_display<T: Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

fn serialize_duration<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&humantime::format_duration(*value))
}
