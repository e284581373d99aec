//! # Option Validation
//!
//! Mutual-exclusion groups and value-range checks over the option table.
//! Runs once, before any resolver: the resolvers assume exclusivity and legal
//! ranges already hold.
//!
//! ## Groups
//!
//! | Group | Why |
//! |-------|-----|
//! | `lightserv` / `syncmode=light` | a light client cannot serve light clients |
//! | `ipcdisable` / `ipcpath` | disabling IPC and placing it contradict |
//! | `nodekey` / `nodekeyhex` | one node identity source |

use tracing::debug;

use crate::container::config::MAX_LIGHT_SERVE;
use crate::container::{
    Coinbase, ConfigError, ConfigResult, GcMode, NatMode, NetMask, NodeKeySource, StatsEndpoint,
    SyncMode,
};
use crate::options::descriptor::*;
use crate::options::OptionTable;

/// One member of a mutual-exclusion group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionMember {
    pub option: &'static str,
    /// When present, the member only counts if its current value equals this
    /// literal.
    pub qualifier: Option<&'static str>,
}

/// Ordered set of options of which at most one may be explicitly set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutualExclusionGroup {
    members: Vec<ExclusionMember>,
}

impl MutualExclusionGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member that counts whenever it is set.
    #[must_use]
    pub fn option(mut self, option: &'static str) -> Self {
        self.members.push(ExclusionMember {
            option,
            qualifier: None,
        });
        self
    }

    /// Add a member that counts only when set to `value`.
    #[must_use]
    pub fn option_eq(mut self, option: &'static str, value: &'static str) -> Self {
        self.members.push(ExclusionMember {
            option,
            qualifier: Some(value),
        });
        self
    }

    #[must_use]
    pub fn members(&self) -> &[ExclusionMember] {
        &self.members
    }
}

/// Fail when more than one qualifying member of `group` is explicitly set.
///
/// Every conflicting member is named; qualified ones as `--flag=value`.
pub fn check_mutually_exclusive(
    options: &OptionTable,
    group: &MutualExclusionGroup,
) -> ConfigResult<()> {
    let mut set = Vec::with_capacity(1);
    for member in group.members() {
        if !options.is_set(member.option) {
            continue;
        }
        match member.qualifier {
            None => set.push(format!("--{}", member.option)),
            Some(value) => {
                if options.string(member.option)? == value {
                    set.push(format!("--{}={}", member.option, value));
                }
            }
        }
    }
    if set.len() > 1 {
        return Err(ConfigError::MutualExclusion { flags: set });
    }
    Ok(())
}

/// Exclusion groups enforced on every startup.
#[must_use]
pub fn builtin_exclusion_groups() -> Vec<MutualExclusionGroup> {
    vec![
        MutualExclusionGroup::new()
            .option(LIGHT_SERVE)
            .option_eq(SYNC_MODE, "light"),
        MutualExclusionGroup::new()
            .option(IPC_DISABLED)
            .option(IPC_PATH),
        MutualExclusionGroup::new()
            .option(NODE_KEY_FILE)
            .option(NODE_KEY_HEX),
    ]
}

/// Check every exclusion group, then every value range.
pub fn validate(options: &OptionTable) -> ConfigResult<()> {
    for group in builtin_exclusion_groups() {
        check_mutually_exclusive(options, &group)?;
    }
    check_ranges(options)?;
    debug!("Option table validated");
    Ok(())
}

/// Value-range checks. Literals, intervals and formats only; the resolvers
/// parse the same values again and rely on these having passed.
pub fn check_ranges(options: &OptionTable) -> ConfigResult<()> {
    SyncMode::parse(&options.string(SYNC_MODE)?)?;
    GcMode::parse(&options.string(GC_MODE)?)?;
    NatMode::parse(&options.string(NAT)?)?;

    check_interval(options, LIGHT_SERVE, 0, i64::from(MAX_LIGHT_SERVE))?;
    check_interval(options, LIGHT_PEERS, 0, i64::MAX)?;
    check_interval(options, MAX_PEERS, 0, i64::MAX)?;
    check_interval(options, MAX_PENDING_PEERS, 0, i64::MAX)?;
    check_interval(options, CACHE, 0, i64::MAX)?;
    check_interval(options, CACHE_DATABASE, 0, 100)?;
    check_interval(options, CACHE_GC, 0, 100)?;
    check_interval(options, TRIE_CACHE_GENS, i64::MIN, i64::from(u16::MAX))?;
    check_interval(options, GPO_BLOCKS, 0, i64::MAX)?;
    check_interval(options, GPO_PERCENTILE, 0, 100)?;
    check_interval(options, MESSAGING_MAX_MESSAGE_SIZE, 0, i64::from(u32::MAX))?;
    for port in [LISTEN_PORT, RPC_PORT, WS_PORT] {
        check_interval(options, port, 0, i64::from(u16::MAX))?;
    }

    options.uint(NETWORK_ID)?;
    options.uint(TARGET_GAS_LIMIT)?;
    options.big(GAS_PRICE)?;
    options.float(MESSAGING_MIN_POW)?;
    for flag in [
        TXPOOL_PRICE_LIMIT,
        TXPOOL_PRICE_BUMP,
        TXPOOL_ACCOUNT_SLOTS,
        TXPOOL_GLOBAL_SLOTS,
        TXPOOL_ACCOUNT_QUEUE,
        TXPOOL_GLOBAL_QUEUE,
    ] {
        options.uint(flag)?;
    }
    options.duration(TXPOOL_REJOURNAL)?;
    options.duration(TXPOOL_LIFETIME)?;

    if options.is_set(NODE_KEY_HEX) {
        NodeKeySource::parse_hex(&options.string(NODE_KEY_HEX)?)?;
    }
    if options.is_set(COINBASE) {
        Coinbase::parse(&options.string(COINBASE)?)?;
    }
    for mask in split_and_trim(&options.string(NET_RESTRICT)?) {
        NetMask::parse(&mask)?;
    }
    let stats = options.string(STATS_URL)?;
    if !stats.is_empty() {
        StatsEndpoint::parse(&stats)?;
    }
    Ok(())
}

fn check_interval(
    options: &OptionTable,
    option: &'static str,
    min: i64,
    max: i64,
) -> ConfigResult<()> {
    let value = options.int(option)?;
    if value < min || value > max {
        let expected = if max == i64::MAX {
            format!("at least {min}")
        } else if min == i64::MIN {
            format!("at most {max}")
        } else {
            format!("{min}..={max}")
        };
        return Err(ConfigError::range(option, value.to_string(), expected));
    }
    Ok(())
}

/// Split on commas, trim whitespace and drop empty entries.
pub(crate) fn split_and_trim(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
