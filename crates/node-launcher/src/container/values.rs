//! # Config Value Objects
//!
//! Small parsed types carried by `NodeConfig`. Each parser reports failures
//! as `ConfigError::Range` against the option it was read from.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::container::error::{ConfigError, ConfigResult};
use crate::options::descriptor::{
    BOOTNODES, COINBASE, GC_MODE, NAT, NET_RESTRICT, NODE_KEY_HEX, STATS_URL, SYNC_MODE,
};

macro_rules! serialize_as_display {
    ($($ty:ty),*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    )*};
}

// =============================================================================
// SYNC MODE
// =============================================================================

/// Chain synchronization strategy. Only ever taken from the `syncmode`
/// literal, never inferred from other options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    Full,
    #[default]
    Fast,
    Light,
}

impl SyncMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Fast => "fast",
            Self::Light => "light",
        }
    }

    /// `Full` and `Fast` both run the full-node engine.
    #[must_use]
    pub fn is_full_family(&self) -> bool {
        !matches!(self, Self::Light)
    }

    pub fn parse(s: &str) -> ConfigResult<Self> {
        match s {
            "full" => Ok(Self::Full),
            "fast" => Ok(Self::Fast),
            "light" => Ok(Self::Light),
            _ => Err(ConfigError::range(
                SYNC_MODE,
                s,
                "one of \"full\", \"fast\", \"light\"",
            )),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// GC MODE
// =============================================================================

/// Trie garbage collection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GcMode {
    #[default]
    Full,
    Archive,
}

impl GcMode {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        match s {
            "full" => Ok(Self::Full),
            "archive" => Ok(Self::Archive),
            _ => Err(ConfigError::range(
                GC_MODE,
                s,
                "either \"full\" or \"archive\"",
            )),
        }
    }
}

// =============================================================================
// NAT
// =============================================================================

/// Port mapping mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NatMode {
    #[default]
    Any,
    None,
    Upnp,
    Pmp,
    /// Fixed external address, no mapping.
    ExtIp(IpAddr),
}

impl NatMode {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let err = || ConfigError::range(NAT, s, "any, none, upnp, pmp or extip:<IP>");
        let (mechanism, arg) = match s.split_once(':') {
            Some((m, a)) => (m, Some(a)),
            None => (s, None),
        };
        match (mechanism.to_lowercase().as_str(), arg) {
            ("" | "none" | "off", None) => Ok(Self::None),
            ("any" | "auto" | "on", None) => Ok(Self::Any),
            ("upnp", None) => Ok(Self::Upnp),
            ("pmp" | "natpmp" | "nat-pmp", None) => Ok(Self::Pmp),
            ("extip" | "ip", Some(ip)) => ip.parse().map(Self::ExtIp).map_err(|_| err()),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for NatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::None => f.write_str("none"),
            Self::Upnp => f.write_str("upnp"),
            Self::Pmp => f.write_str("pmp"),
            Self::ExtIp(ip) => write!(f, "extip:{ip}"),
        }
    }
}

// =============================================================================
// BOOTSTRAP NODES
// =============================================================================

/// A discovery bootstrap peer, written `<hex-id>@<ip>:<port>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapNode {
    pub id: Vec<u8>,
    pub addr: SocketAddr,
}

impl BootstrapNode {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let err = || ConfigError::range(BOOTNODES, s, "<hex-id>@<ip>:<port>");
        let (id, addr) = s.split_once('@').ok_or_else(err)?;
        let id = hex::decode(id.trim_start_matches("0x")).map_err(|_| err())?;
        if id.is_empty() {
            return Err(err());
        }
        let addr = addr.parse().map_err(|_| err())?;
        Ok(Self { id, addr })
    }
}

impl fmt::Display for BootstrapNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", hex::encode(&self.id), self.addr)
    }
}

// =============================================================================
// NETWORK RESTRICTION
// =============================================================================

/// CIDR mask limiting which peers may be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetMask {
    pub network: IpAddr,
    pub prefix: u8,
}

impl NetMask {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let err = || ConfigError::range(NET_RESTRICT, s, "CIDR masks such as 10.0.0.0/8");
        let (ip, prefix) = s.split_once('/').ok_or_else(err)?;
        let network: IpAddr = ip.parse().map_err(|_| err())?;
        let prefix: u8 = prefix.parse().map_err(|_| err())?;
        let max = if network.is_ipv4() { 32 } else { 128 };
        if prefix > max {
            return Err(err());
        }
        Ok(Self { network, prefix })
    }

    /// Whether `ip` falls inside this network.
    #[must_use]
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = u128::MAX.checked_shl(128 - u32::from(self.prefix)).unwrap_or(0);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

impl fmt::Display for NetMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

// =============================================================================
// NODE KEY
// =============================================================================

/// Where the P2P identity key comes from. Loading the key is the
/// transport's job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeKeySource {
    /// Generate a fresh key at startup.
    #[default]
    Ephemeral,
    File(PathBuf),
    Hex([u8; 32]),
}

impl NodeKeySource {
    pub fn parse_hex(s: &str) -> ConfigResult<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))
            .map_err(|_| ConfigError::range(NODE_KEY_HEX, s, "64 hex characters"))?;
        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ConfigError::range(NODE_KEY_HEX, s, "64 hex characters"))?;
        Ok(Self::Hex(key))
    }
}

impl fmt::Display for NodeKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ephemeral => f.write_str("ephemeral"),
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Hex(_) => f.write_str("hex:<redacted>"),
        }
    }
}

// =============================================================================
// COINBASE
// =============================================================================

/// Reward address, either literal or an index into the keystore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coinbase {
    Address([u8; 20]),
    /// Resolved against the keystore's account list at startup.
    KeystoreIndex(usize),
}

impl Coinbase {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let err = || ConfigError::range(COINBASE, s, "a hex address or a keystore index");
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() == 40 {
            let bytes = hex::decode(digits).map_err(|_| err())?;
            let address: [u8; 20] = bytes.try_into().map_err(|_| err())?;
            return Ok(Self::Address(address));
        }
        s.parse().map(Self::KeystoreIndex).map_err(|_| err())
    }
}

impl fmt::Display for Coinbase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "0x{}", hex::encode(address)),
            Self::KeystoreIndex(index) => write!(f, "{index}"),
        }
    }
}

// =============================================================================
// STATS ENDPOINT
// =============================================================================

/// Stats reporting target, written `nodename:secret@host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsEndpoint {
    pub node_name: String,
    pub secret: String,
    pub host: String,
    pub port: u16,
}

impl StatsEndpoint {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let err = || ConfigError::range(STATS_URL, s, "nodename:secret@host:port");
        let (credentials, address) = s.rsplit_once('@').ok_or_else(err)?;
        let (node_name, secret) = credentials.split_once(':').unwrap_or((credentials, ""));
        let (host, port) = address.rsplit_once(':').ok_or_else(err)?;
        if node_name.is_empty() || host.is_empty() {
            return Err(err());
        }
        Ok(Self {
            node_name: node_name.to_string(),
            secret: secret.to_string(),
            host: host.to_string(),
            port: port.parse().map_err(|_| err())?,
        })
    }
}

impl fmt::Display for StatsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.node_name, self.host, self.port)
    }
}

serialize_as_display!(
    SyncMode,
    NatMode,
    BootstrapNode,
    NetMask,
    NodeKeySource,
    Coinbase,
    StatsEndpoint
);

impl Serialize for GcMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Self::Full => "full",
            Self::Archive => "archive",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_literals() {
        assert_eq!(SyncMode::parse("full").unwrap(), SyncMode::Full);
        assert_eq!(SyncMode::parse("fast").unwrap(), SyncMode::Fast);
        assert_eq!(SyncMode::parse("light").unwrap(), SyncMode::Light);
        assert!(SyncMode::parse("Light").is_err());
        assert!(SyncMode::parse("warp").is_err());
        assert!(!SyncMode::Light.is_full_family());
        assert!(SyncMode::Fast.is_full_family());
    }

    #[test]
    fn test_nat_modes() {
        assert_eq!(NatMode::parse("any").unwrap(), NatMode::Any);
        assert_eq!(NatMode::parse("none").unwrap(), NatMode::None);
        assert_eq!(
            NatMode::parse("extip:1.2.3.4").unwrap(),
            NatMode::ExtIp("1.2.3.4".parse().unwrap())
        );
        assert!(NatMode::parse("extip:nope").is_err());
        assert!(NatMode::parse("stun").is_err());
    }

    #[test]
    fn test_bootstrap_node() {
        let node = BootstrapNode::parse("abcd@10.0.0.1:30303").unwrap();
        assert_eq!(node.id, vec![0xab, 0xcd]);
        assert_eq!(node.addr.port(), 30303);
        assert_eq!(node.to_string(), "abcd@10.0.0.1:30303");
        assert!(BootstrapNode::parse("10.0.0.1:30303").is_err());
        assert!(BootstrapNode::parse("zz@10.0.0.1:30303").is_err());
        assert!(BootstrapNode::parse("@10.0.0.1:30303").is_err());
    }

    #[test]
    fn test_net_mask() {
        let mask = NetMask::parse("10.0.0.0/8").unwrap();
        assert!(mask.contains("10.20.30.40".parse().unwrap()));
        assert!(!mask.contains("11.0.0.1".parse().unwrap()));
        assert!(NetMask::parse("0.0.0.0/0").unwrap().contains("8.8.8.8".parse().unwrap()));
        assert!(NetMask::parse("10.0.0.0/33").is_err());
        assert!(NetMask::parse("10.0.0.0").is_err());
    }

    #[test]
    fn test_node_key_hex() {
        let key = "11".repeat(32);
        assert_eq!(
            NodeKeySource::parse_hex(&key).unwrap(),
            NodeKeySource::Hex([0x11; 32])
        );
        assert!(NodeKeySource::parse_hex("1111").is_err());
        assert_eq!(NodeKeySource::Hex([0; 32]).to_string(), "hex:<redacted>");
    }

    #[test]
    fn test_coinbase() {
        let addr = format!("0x{}", "ab".repeat(20));
        assert_eq!(Coinbase::parse(&addr).unwrap(), Coinbase::Address([0xab; 20]));
        assert_eq!(Coinbase::parse("3").unwrap(), Coinbase::KeystoreIndex(3));
        assert!(Coinbase::parse("-1").is_err());
        assert!(Coinbase::parse("bob").is_err());
    }

    #[test]
    fn test_stats_endpoint() {
        let ep = StatsEndpoint::parse("node1:s3cret@stats.example.org:3000").unwrap();
        assert_eq!(ep.node_name, "node1");
        assert_eq!(ep.secret, "s3cret");
        assert_eq!(ep.host, "stats.example.org");
        assert_eq!(ep.port, 3000);
        assert_eq!(ep.to_string(), "node1@stats.example.org:3000");
        assert!(StatsEndpoint::parse("stats.example.org:3000").is_err());
        assert!(StatsEndpoint::parse(":secret@host:1").is_err());
    }

    #[test]
    fn test_stats_endpoint_requires_port() {
        for url in [
            "node@stats",
            "node:secret@stats:",
            "node@stats:http",
            "node@:3000",
            "node@stats:70000",
        ] {
            assert!(StatsEndpoint::parse(url).is_err(), "{url} should be rejected");
        }
    }
}
