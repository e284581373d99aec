//! # Cache Budget
//!
//! Splits the `cache` memory budget between the database and the trie.
//! An allotment is only recomputed when the budget or its own percentage was
//! explicitly given; otherwise the chain engine keeps its built-in size.

use tracing::debug;

/// Cache budget inputs. Percentages are range-checked to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBudgetInput {
    pub total_mb: u64,
    pub total_explicit: bool,
    pub database_percent: u64,
    pub database_explicit: bool,
    pub gc_percent: u64,
    pub gc_explicit: bool,
}

/// Recomputed allotments; `None` leaves the built-in size in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheAllotment {
    pub database_mb: Option<u64>,
    pub trie_mb: Option<u64>,
}

#[must_use]
pub fn resolve_cache_budget(input: CacheBudgetInput) -> CacheAllotment {
    let database_mb = (input.total_explicit || input.database_explicit)
        .then(|| percent_of(input.total_mb, input.database_percent));
    let trie_mb = (input.total_explicit || input.gc_explicit)
        .then(|| percent_of(input.total_mb, input.gc_percent));
    debug!(?database_mb, ?trie_mb, "Cache budget resolved");
    CacheAllotment {
        database_mb,
        trie_mb,
    }
}

/// `floor(total * percent / 100)` without intermediate overflow.
fn percent_of(total: u64, percent: u64) -> u64 {
    let share = u128::from(total) * u128::from(percent) / 100;
    u64::try_from(share).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn defaults() -> CacheBudgetInput {
        CacheBudgetInput {
            total_mb: 1024,
            total_explicit: false,
            database_percent: 75,
            database_explicit: false,
            gc_percent: 25,
            gc_explicit: false,
        }
    }

    #[test]
    fn test_untouched_budget_keeps_builtin_sizes() {
        assert_eq!(resolve_cache_budget(defaults()), CacheAllotment::default());
    }

    #[test]
    fn test_explicit_total_recomputes_both() {
        let allotment = resolve_cache_budget(CacheBudgetInput {
            total_mb: 2048,
            total_explicit: true,
            ..defaults()
        });
        assert_eq!(allotment.database_mb, Some(1536));
        assert_eq!(allotment.trie_mb, Some(512));
    }

    #[test]
    fn test_explicit_percentage_recomputes_only_its_cache() {
        let allotment = resolve_cache_budget(CacheBudgetInput {
            gc_percent: 50,
            gc_explicit: true,
            ..defaults()
        });
        assert_eq!(allotment.database_mb, None);
        assert_eq!(allotment.trie_mb, Some(512));
    }

    #[test]
    fn test_rounds_down() {
        assert_eq!(percent_of(10, 33), 3);
        assert_eq!(percent_of(0, 100), 0);
        assert_eq!(percent_of(u64::MAX, 100), u64::MAX);
    }

    proptest! {
        #[test]
        fn test_allotments_fit_in_budget(
            total in 0u64..=(1 << 40),
            database in 0u64..=100,
            gc in 0u64..=100,
        ) {
            let allotment = resolve_cache_budget(CacheBudgetInput {
                total_mb: total,
                total_explicit: true,
                database_percent: database,
                database_explicit: true,
                gc_percent: gc,
                gc_explicit: true,
            });
            let database_mb = allotment.database_mb.unwrap_or_default();
            let trie_mb = allotment.trie_mb.unwrap_or_default();
            if database + gc <= 100 {
                prop_assert!(database_mb + trie_mb <= total);
            }
            if database + gc == 100 && total % 100 == 0 {
                prop_assert_eq!(database_mb + trie_mb, total);
            }
        }
    }
}
