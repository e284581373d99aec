//! # Option Descriptors
//!
//! The static table of every option the node understands. The command-line
//! front end is generated from this table and the resolvers only ever refer
//! to options through the name constants below.

/// Value kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free-form text.
    String,
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
    /// Human-friendly duration (`30s`, `1h`, `2h30m`).
    Duration,
    /// Floating point number.
    Float,
    /// Switch; present means `true`.
    Bool,
    /// Filesystem path.
    Path,
    /// Unsigned integer wider than 64 bits (wei amounts).
    BigInt,
}

impl OptionKind {
    /// Placeholder shown in help output.
    #[must_use]
    pub fn value_name(&self) -> &'static str {
        match self {
            Self::String => "VALUE",
            Self::Int | Self::Uint | Self::BigInt => "N",
            Self::Duration => "DURATION",
            Self::Float => "FLOAT",
            Self::Bool => "",
            Self::Path => "PATH",
        }
    }
}

/// Help-output grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionCategory {
    General,
    TxPool,
    Performance,
    Producer,
    Account,
    Api,
    Network,
    Console,
    GasOracle,
    Messaging,
    Stats,
}

impl OptionCategory {
    /// Heading used in `--help`.
    #[must_use]
    pub fn heading(&self) -> &'static str {
        match self {
            Self::General => "NODE OPTIONS",
            Self::TxPool => "TRANSACTION POOL OPTIONS",
            Self::Performance => "PERFORMANCE TUNING OPTIONS",
            Self::Producer => "BLOCK PRODUCER OPTIONS",
            Self::Account => "ACCOUNT OPTIONS",
            Self::Api => "API AND CONSOLE OPTIONS",
            Self::Network => "NETWORKING OPTIONS",
            Self::Console => "CONSOLE OPTIONS",
            Self::GasOracle => "GAS PRICE ORACLE OPTIONS",
            Self::Messaging => "MESSAGING OVERLAY OPTIONS",
            Self::Stats => "STATS REPORTING OPTIONS",
        }
    }
}

/// One entry of the option table.
#[derive(Debug, Clone, Copy)]
pub struct OptionDescriptor {
    /// Long flag name, without the leading dashes.
    pub name: &'static str,
    pub kind: OptionKind,
    /// Compiled-in default, rendered as the flag would be written.
    pub default: Option<&'static str>,
    pub usage: &'static str,
    pub category: OptionCategory,
}

impl OptionDescriptor {
    const fn new(
        name: &'static str,
        kind: OptionKind,
        default: Option<&'static str>,
        category: OptionCategory,
        usage: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            default,
            usage,
            category,
        }
    }

    /// Environment variable bound to this option (`QC_` + upper-cased name).
    #[must_use]
    pub fn env_var(&self) -> String {
        env_var_name(self.name)
    }
}

/// Environment variable name for an option name.
#[must_use]
pub fn env_var_name(name: &str) -> String {
    format!("QC_{}", name.to_uppercase().replace(['.', '-'], "_"))
}

// =============================================================================
// OPTION NAMES
// =============================================================================

// General
pub const DATA_DIR: &str = "datadir";
pub const KEYSTORE_DIR: &str = "keystore";
pub const NETWORK_ID: &str = "networkid";
pub const IDENTITY: &str = "identity";
pub const DOC_ROOT: &str = "docroot";
pub const SYNC_MODE: &str = "syncmode";
pub const GC_MODE: &str = "gcmode";
pub const LIGHT_SERVE: &str = "lightserv";
pub const LIGHT_PEERS: &str = "lightpeers";
pub const LIGHT_KDF: &str = "lightkdf";

// Transaction pool
pub const TXPOOL_NO_LOCALS: &str = "txpool.nolocals";
pub const TXPOOL_JOURNAL: &str = "txpool.journal";
pub const TXPOOL_REJOURNAL: &str = "txpool.rejournal";
pub const TXPOOL_PRICE_LIMIT: &str = "txpool.pricelimit";
pub const TXPOOL_PRICE_BUMP: &str = "txpool.pricebump";
pub const TXPOOL_ACCOUNT_SLOTS: &str = "txpool.accountslots";
pub const TXPOOL_GLOBAL_SLOTS: &str = "txpool.globalslots";
pub const TXPOOL_ACCOUNT_QUEUE: &str = "txpool.accountqueue";
pub const TXPOOL_GLOBAL_QUEUE: &str = "txpool.globalqueue";
pub const TXPOOL_LIFETIME: &str = "txpool.lifetime";

// Performance tuning
pub const CACHE: &str = "cache";
pub const CACHE_DATABASE: &str = "cache.database";
pub const CACHE_GC: &str = "cache.gc";
pub const TRIE_CACHE_GENS: &str = "trie-cache-gens";

// Block producer
pub const PRODUCE: &str = "produce";
pub const TARGET_GAS_LIMIT: &str = "targetgaslimit";
pub const COINBASE: &str = "coinbase";
pub const GAS_PRICE: &str = "gasprice";
pub const EXTRA_DATA: &str = "extradata";
pub const VM_DEBUG: &str = "vmdebug";

// Accounts
pub const UNLOCK: &str = "unlock";
pub const PASSWORD_FILE: &str = "password";

// RPC endpoints
pub const RPC_ENABLED: &str = "rpc";
pub const RPC_ADDR: &str = "rpcaddr";
pub const RPC_PORT: &str = "rpcport";
pub const RPC_CORS_DOMAIN: &str = "rpccorsdomain";
pub const RPC_VHOSTS: &str = "rpcvhosts";
pub const RPC_API: &str = "rpcapi";
pub const IPC_DISABLED: &str = "ipcdisable";
pub const IPC_PATH: &str = "ipcpath";
pub const WS_ENABLED: &str = "ws";
pub const WS_ADDR: &str = "wsaddr";
pub const WS_PORT: &str = "wsport";
pub const WS_API: &str = "wsapi";
pub const WS_ORIGINS: &str = "wsorigins";

// Console
pub const EXEC: &str = "exec";
pub const PRELOAD: &str = "preload";
pub const JS_PATH: &str = "jspath";

// Networking
pub const MAX_PEERS: &str = "maxpeers";
pub const MAX_PENDING_PEERS: &str = "maxpendpeers";
pub const LISTEN_PORT: &str = "port";
pub const BOOTNODES: &str = "bootnodes";
pub const BOOTNODES_V4: &str = "bootnodesv4";
pub const NODE_KEY_FILE: &str = "nodekey";
pub const NODE_KEY_HEX: &str = "nodekeyhex";
pub const NAT: &str = "nat";
pub const NO_DISCOVER: &str = "nodiscover";
pub const NET_RESTRICT: &str = "netrestrict";

// Gas price oracle
pub const GPO_BLOCKS: &str = "gpoblocks";
pub const GPO_PERCENTILE: &str = "gpopercentile";

// Messaging overlay
pub const MESSAGING_ENABLED: &str = "shh";
pub const MESSAGING_MAX_MESSAGE_SIZE: &str = "shh.maxmessagesize";
pub const MESSAGING_MIN_POW: &str = "shh.pow";

// Stats reporting
pub const STATS_URL: &str = "ethstats";

use OptionCategory as C;
use OptionKind as K;

/// Every option understood by the node, in help-output order.
pub const OPTIONS: &[OptionDescriptor] = &[
    // General
    OptionDescriptor::new(DATA_DIR, K::Path, None, C::General, "Data directory for the databases and keystore"),
    OptionDescriptor::new(KEYSTORE_DIR, K::Path, None, C::General, "Directory for the keystore (default = inside the datadir)"),
    OptionDescriptor::new(NETWORK_ID, K::Uint, Some("1"), C::General, "Network identifier (integer, 1=mainnet)"),
    OptionDescriptor::new(IDENTITY, K::String, None, C::General, "Custom node name"),
    OptionDescriptor::new(DOC_ROOT, K::Path, None, C::General, "Document root for the HTTP client file scheme"),
    OptionDescriptor::new(SYNC_MODE, K::String, Some("fast"), C::General, "Blockchain sync mode (\"fast\", \"full\", or \"light\")"),
    OptionDescriptor::new(GC_MODE, K::String, Some("full"), C::General, "Blockchain garbage collection mode (\"full\", \"archive\")"),
    OptionDescriptor::new(LIGHT_SERVE, K::Int, Some("0"), C::General, "Maximum percentage of time allowed for serving light client requests (0-90)"),
    OptionDescriptor::new(LIGHT_PEERS, K::Int, Some("25"), C::General, "Maximum number of light client peers"),
    OptionDescriptor::new(LIGHT_KDF, K::Bool, None, C::General, "Reduce key-derivation RAM & CPU usage at some expense of KDF strength"),
    // Transaction pool
    OptionDescriptor::new(TXPOOL_NO_LOCALS, K::Bool, None, C::TxPool, "Disables price exemptions for locally submitted transactions"),
    OptionDescriptor::new(TXPOOL_JOURNAL, K::String, Some("transactions.rlp"), C::TxPool, "Disk journal for local transaction to survive node restarts"),
    OptionDescriptor::new(TXPOOL_REJOURNAL, K::Duration, Some("1h"), C::TxPool, "Time interval to regenerate the local transaction journal"),
    OptionDescriptor::new(TXPOOL_PRICE_LIMIT, K::Uint, Some("1"), C::TxPool, "Minimum gas price limit to enforce for acceptance into the pool"),
    OptionDescriptor::new(TXPOOL_PRICE_BUMP, K::Uint, Some("10"), C::TxPool, "Price bump percentage to replace an already existing transaction"),
    OptionDescriptor::new(TXPOOL_ACCOUNT_SLOTS, K::Uint, Some("16"), C::TxPool, "Minimum number of executable transaction slots guaranteed per account"),
    OptionDescriptor::new(TXPOOL_GLOBAL_SLOTS, K::Uint, Some("4096"), C::TxPool, "Maximum number of executable transaction slots for all accounts"),
    OptionDescriptor::new(TXPOOL_ACCOUNT_QUEUE, K::Uint, Some("64"), C::TxPool, "Maximum number of non-executable transaction slots permitted per account"),
    OptionDescriptor::new(TXPOOL_GLOBAL_QUEUE, K::Uint, Some("1024"), C::TxPool, "Maximum number of non-executable transaction slots for all accounts"),
    OptionDescriptor::new(TXPOOL_LIFETIME, K::Duration, Some("3h"), C::TxPool, "Maximum amount of time non-executable transaction are queued"),
    // Performance tuning
    OptionDescriptor::new(CACHE, K::Int, Some("1024"), C::Performance, "Megabytes of memory allocated to internal caching"),
    OptionDescriptor::new(CACHE_DATABASE, K::Int, Some("75"), C::Performance, "Percentage of cache memory allowance to use for database io"),
    OptionDescriptor::new(CACHE_GC, K::Int, Some("25"), C::Performance, "Percentage of cache memory allowance to use for trie pruning"),
    OptionDescriptor::new(TRIE_CACHE_GENS, K::Int, Some("120"), C::Performance, "Number of trie node generations to keep in memory"),
    // Block producer
    OptionDescriptor::new(PRODUCE, K::Bool, None, C::Producer, "Enable block producing"),
    OptionDescriptor::new(TARGET_GAS_LIMIT, K::Uint, Some("4712388"), C::Producer, "Target gas limit sets the artificial target gas floor for the blocks to produce"),
    OptionDescriptor::new(COINBASE, K::String, Some("0"), C::Producer, "Public address for block producing rewards (default = first account created)"),
    OptionDescriptor::new(GAS_PRICE, K::BigInt, Some("18000000000"), C::Producer, "Minimal gas price to accept for producing a transaction"),
    OptionDescriptor::new(EXTRA_DATA, K::String, None, C::Producer, "Block extra data set by the block producer (default = client version)"),
    OptionDescriptor::new(VM_DEBUG, K::Bool, None, C::Producer, "Record information useful for VM and contract debugging"),
    // Accounts
    OptionDescriptor::new(UNLOCK, K::String, Some(""), C::Account, "Comma separated list of accounts to unlock"),
    OptionDescriptor::new(PASSWORD_FILE, K::Path, Some(""), C::Account, "Password file to use for non-interactive password input"),
    // RPC endpoints
    OptionDescriptor::new(RPC_ENABLED, K::Bool, None, C::Api, "Enable the HTTP-RPC server"),
    OptionDescriptor::new(RPC_ADDR, K::String, Some("localhost"), C::Api, "HTTP-RPC server listening interface"),
    OptionDescriptor::new(RPC_PORT, K::Int, Some("8545"), C::Api, "HTTP-RPC server listening port"),
    OptionDescriptor::new(RPC_CORS_DOMAIN, K::String, Some(""), C::Api, "Comma separated list of domains from which to accept cross origin requests (browser enforced)"),
    OptionDescriptor::new(RPC_VHOSTS, K::String, Some("localhost"), C::Api, "Comma separated list of virtual hostnames from which to accept requests (server enforced). Accepts '*' wildcard."),
    OptionDescriptor::new(RPC_API, K::String, Some(""), C::Api, "API's offered over the HTTP-RPC interface"),
    OptionDescriptor::new(IPC_DISABLED, K::Bool, None, C::Api, "Disable the IPC-RPC server"),
    OptionDescriptor::new(IPC_PATH, K::Path, None, C::Api, "Filename for IPC socket/pipe within the datadir (explicit paths escape it)"),
    OptionDescriptor::new(WS_ENABLED, K::Bool, None, C::Api, "Enable the WS-RPC server"),
    OptionDescriptor::new(WS_ADDR, K::String, Some("localhost"), C::Api, "WS-RPC server listening interface"),
    OptionDescriptor::new(WS_PORT, K::Int, Some("8546"), C::Api, "WS-RPC server listening port"),
    OptionDescriptor::new(WS_API, K::String, Some(""), C::Api, "API's offered over the WS-RPC interface"),
    OptionDescriptor::new(WS_ORIGINS, K::String, Some(""), C::Api, "Origins from which to accept websockets requests"),
    // Console
    OptionDescriptor::new(EXEC, K::String, None, C::Console, "Execute JavaScript statement"),
    OptionDescriptor::new(PRELOAD, K::String, None, C::Console, "Comma separated list of JavaScript files to preload into the console"),
    OptionDescriptor::new(JS_PATH, K::Path, Some("."), C::Console, "JavaScript root path for `loadScript`"),
    // Networking
    OptionDescriptor::new(MAX_PEERS, K::Int, Some("25"), C::Network, "Maximum number of network peers (network disabled if set to 0)"),
    OptionDescriptor::new(MAX_PENDING_PEERS, K::Int, Some("0"), C::Network, "Maximum number of pending connection attempts (defaults used if set to 0)"),
    OptionDescriptor::new(LISTEN_PORT, K::Int, Some("30303"), C::Network, "Network listening port"),
    OptionDescriptor::new(BOOTNODES, K::String, Some(""), C::Network, "Comma separated node URLs (id@host:port) for P2P discovery bootstrap"),
    OptionDescriptor::new(BOOTNODES_V4, K::String, Some(""), C::Network, "Comma separated node URLs (id@host:port) for P2P v4 discovery bootstrap (light server, full nodes)"),
    OptionDescriptor::new(NODE_KEY_FILE, K::Path, None, C::Network, "P2P node key file"),
    OptionDescriptor::new(NODE_KEY_HEX, K::String, None, C::Network, "P2P node key as hex (for testing)"),
    OptionDescriptor::new(NAT, K::String, Some("any"), C::Network, "NAT port mapping mechanism (any|none|upnp|pmp|extip:<IP>)"),
    OptionDescriptor::new(NO_DISCOVER, K::Bool, None, C::Network, "Disables the peer discovery mechanism (manual peer addition)"),
    OptionDescriptor::new(NET_RESTRICT, K::String, None, C::Network, "Restricts network communication to the given IP networks (CIDR masks)"),
    // Gas price oracle
    OptionDescriptor::new(GPO_BLOCKS, K::Int, Some("20"), C::GasOracle, "Number of recent blocks to check for gas prices"),
    OptionDescriptor::new(GPO_PERCENTILE, K::Int, Some("60"), C::GasOracle, "Suggested gas price is the given percentile of a set of recent transaction gas prices"),
    // Messaging overlay
    OptionDescriptor::new(MESSAGING_ENABLED, K::Bool, None, C::Messaging, "Enable the messaging overlay"),
    OptionDescriptor::new(MESSAGING_MAX_MESSAGE_SIZE, K::Int, Some("1048576"), C::Messaging, "Max message size accepted"),
    OptionDescriptor::new(MESSAGING_MIN_POW, K::Float, Some("0.2"), C::Messaging, "Minimum POW accepted"),
    // Stats reporting
    OptionDescriptor::new(STATS_URL, K::String, None, C::Stats, "Reporting URL of a stats service (nodename:secret@host:port)"),
];

/// Look up a descriptor by option name.
#[must_use]
pub fn descriptor(name: &str) -> Option<&'static OptionDescriptor> {
    OPTIONS.iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_option_names_are_unique() {
        let mut seen = HashSet::new();
        for d in OPTIONS {
            assert!(seen.insert(d.name), "duplicate option {}", d.name);
        }
    }

    #[test]
    fn test_bool_options_have_no_default() {
        for d in OPTIONS.iter().filter(|d| d.kind == OptionKind::Bool) {
            assert!(d.default.is_none(), "{} is a switch", d.name);
        }
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("txpool.pricelimit"), "QC_TXPOOL_PRICELIMIT");
        assert_eq!(env_var_name("trie-cache-gens"), "QC_TRIE_CACHE_GENS");
        assert_eq!(descriptor(SYNC_MODE).unwrap().env_var(), "QC_SYNCMODE");
    }

    #[test]
    fn test_descriptor_lookup() {
        assert_eq!(descriptor(MAX_PEERS).unwrap().default, Some("25"));
        assert!(descriptor("no-such-flag").is_none());
    }
}
