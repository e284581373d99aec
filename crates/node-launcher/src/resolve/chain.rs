//! Chain engine, transaction pool and gas price oracle settings.

use tracing::debug;

use super::cache::{resolve_cache_budget, CacheBudgetInput};
use super::narrow;
use crate::container::{
    ChainConfig, Coinbase, ConfigResult, GasOracleConfig, GcMode, SyncMode, TxPoolConfig,
};
use crate::options::descriptor::*;
use crate::options::OptionTable;

pub fn apply_chain(options: &OptionTable, chain: &mut ChainConfig) -> ConfigResult<()> {
    if options.is_set(NETWORK_ID) {
        chain.network_id = options.uint(NETWORK_ID)?;
    }
    chain.sync_mode = SyncMode::parse(&options.string(SYNC_MODE)?)?;
    if options.is_set(LIGHT_SERVE) {
        chain.light_serve = narrow(options, LIGHT_SERVE)?;
    }
    if options.is_set(LIGHT_PEERS) {
        chain.light_peers = narrow(options, LIGHT_PEERS)?;
    }

    let allotment = resolve_cache_budget(CacheBudgetInput {
        total_mb: narrow(options, CACHE)?,
        total_explicit: options.is_set(CACHE),
        database_percent: narrow(options, CACHE_DATABASE)?,
        database_explicit: options.is_set(CACHE_DATABASE),
        gc_percent: narrow(options, CACHE_GC)?,
        gc_explicit: options.is_set(CACHE_GC),
    });
    if let Some(mb) = allotment.database_mb {
        chain.database_cache_mb = mb;
    }
    if let Some(mb) = allotment.trie_mb {
        chain.trie_cache_mb = mb;
    }

    chain.gc_mode = GcMode::parse(&options.string(GC_MODE)?)?;
    chain.no_pruning = chain.gc_mode == GcMode::Archive;
    if options.is_set(TRIE_CACHE_GENS) {
        let gens = options.int(TRIE_CACHE_GENS)?;
        if gens > 0 {
            chain.trie_cache_gens = narrow(options, TRIE_CACHE_GENS)?;
        }
    }

    if options.is_set(DOC_ROOT) {
        chain.doc_root = options.path(DOC_ROOT)?;
    }
    if options.is_set(EXTRA_DATA) {
        chain.extra_data = Some(options.string(EXTRA_DATA)?);
    }
    if options.is_set(GAS_PRICE) {
        chain.gas_price = options.big(GAS_PRICE)?;
    }
    if options.is_set(VM_DEBUG) {
        chain.enable_preimage_recording = options.bool(VM_DEBUG)?;
    }
    if options.is_set(TARGET_GAS_LIMIT) {
        chain.target_gas_limit = options.uint(TARGET_GAS_LIMIT)?;
    }
    if options.is_set(PRODUCE) {
        chain.producing = options.bool(PRODUCE)?;
    }
    if options.is_set(COINBASE) {
        chain.coinbase = Some(Coinbase::parse(&options.string(COINBASE)?)?);
    }

    debug!(
        "Chain: network_id={}, sync_mode={}, database_cache={}MB, trie_cache={}MB",
        chain.network_id, chain.sync_mode, chain.database_cache_mb, chain.trie_cache_mb
    );
    Ok(())
}

pub fn apply_tx_pool(options: &OptionTable, pool: &mut TxPoolConfig) -> ConfigResult<()> {
    if options.is_set(TXPOOL_NO_LOCALS) {
        pool.no_locals = options.bool(TXPOOL_NO_LOCALS)?;
    }
    if options.is_set(TXPOOL_JOURNAL) {
        pool.journal = options.string(TXPOOL_JOURNAL)?;
    }
    if options.is_set(TXPOOL_REJOURNAL) {
        pool.rejournal = options.duration(TXPOOL_REJOURNAL)?;
    }
    if options.is_set(TXPOOL_LIFETIME) {
        pool.lifetime = options.duration(TXPOOL_LIFETIME)?;
    }
    for (name, field) in [
        (TXPOOL_PRICE_LIMIT, &mut pool.price_limit),
        (TXPOOL_PRICE_BUMP, &mut pool.price_bump),
        (TXPOOL_ACCOUNT_SLOTS, &mut pool.account_slots),
        (TXPOOL_GLOBAL_SLOTS, &mut pool.global_slots),
        (TXPOOL_ACCOUNT_QUEUE, &mut pool.account_queue),
        (TXPOOL_GLOBAL_QUEUE, &mut pool.global_queue),
    ] {
        if options.is_set(name) {
            *field = options.uint(name)?;
        }
    }
    Ok(())
}

pub fn apply_gas_oracle(options: &OptionTable, oracle: &mut GasOracleConfig) -> ConfigResult<()> {
    if options.is_set(GPO_BLOCKS) {
        oracle.blocks = narrow(options, GPO_BLOCKS)?;
    }
    if options.is_set(GPO_PERCENTILE) {
        oracle.percentile = narrow(options, GPO_PERCENTILE)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn chain_of(options: &OptionTable) -> ChainConfig {
        let mut chain = ChainConfig::default();
        apply_chain(options, &mut chain).unwrap();
        chain
    }

    #[test]
    fn test_untouched_options_keep_defaults() {
        let chain = chain_of(&OptionTable::defaults());
        let default = ChainConfig::default();
        assert_eq!(chain.network_id, default.network_id);
        assert_eq!(chain.gas_price, default.gas_price);
        assert_eq!(chain.trie_cache_gens, default.trie_cache_gens);
        assert!(chain.coinbase.is_none());
        assert!(!chain.no_pruning);
    }

    #[test]
    fn test_archive_disables_pruning() {
        let chain = chain_of(&OptionTable::defaults().with(GC_MODE, "archive"));
        assert_eq!(chain.gc_mode, GcMode::Archive);
        assert!(chain.no_pruning);
    }

    #[test]
    fn test_non_positive_trie_cache_gens_ignored() {
        let chain = chain_of(&OptionTable::defaults().with(TRIE_CACHE_GENS, "0"));
        assert_eq!(chain.trie_cache_gens, 120);
        let chain = chain_of(&OptionTable::defaults().with(TRIE_CACHE_GENS, "300"));
        assert_eq!(chain.trie_cache_gens, 300);
    }

    #[test]
    fn test_database_percentage_alone() {
        let chain = chain_of(&OptionTable::defaults().with(CACHE_DATABASE, "50"));
        assert_eq!(chain.database_cache_mb, 512);
        assert_eq!(chain.trie_cache_mb, ChainConfig::default().trie_cache_mb);
    }

    #[test]
    fn test_producer_options() {
        let options = OptionTable::defaults()
            .with(PRODUCE, "true")
            .with(COINBASE, "2")
            .with(GAS_PRICE, "1000000000000000000000")
            .with(EXTRA_DATA, "hello");
        let chain = chain_of(&options);
        assert!(chain.producing);
        assert_eq!(chain.coinbase, Some(Coinbase::KeystoreIndex(2)));
        assert_eq!(chain.gas_price, 1_000_000_000_000_000_000_000);
        assert_eq!(chain.extra_data.as_deref(), Some("hello"));
    }

    #[test]
    fn test_tx_pool_pass_through() {
        let options = OptionTable::defaults()
            .with(TXPOOL_GLOBAL_SLOTS, "8192")
            .with(TXPOOL_LIFETIME, "30m")
            .with(TXPOOL_NO_LOCALS, "true");
        let mut pool = TxPoolConfig::default();
        apply_tx_pool(&options, &mut pool).unwrap();
        assert_eq!(pool.global_slots, 8192);
        assert_eq!(pool.account_slots, 16);
        assert_eq!(pool.lifetime, Duration::from_secs(1800));
        assert!(pool.no_locals);
    }

    #[test]
    fn test_gas_oracle() {
        let options = OptionTable::defaults().with(GPO_PERCENTILE, "80");
        let mut oracle = GasOracleConfig::default();
        apply_gas_oracle(&options, &mut oracle).unwrap();
        assert_eq!(oracle.blocks, 20);
        assert_eq!(oracle.percentile, 80);
    }
}
