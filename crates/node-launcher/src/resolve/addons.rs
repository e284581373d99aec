//! Optional add-on services: messaging overlay and stats reporter.

use super::narrow;
use crate::container::{ConfigResult, MessagingConfig, StatsEndpoint};
use crate::options::descriptor::*;
use crate::options::OptionTable;

pub fn apply_messaging(
    options: &OptionTable,
    messaging: &mut MessagingConfig,
) -> ConfigResult<()> {
    messaging.enabled = options.bool(MESSAGING_ENABLED)?;
    if options.is_set(MESSAGING_MAX_MESSAGE_SIZE) {
        messaging.max_message_size = narrow(options, MESSAGING_MAX_MESSAGE_SIZE)?;
    }
    if options.is_set(MESSAGING_MIN_POW) {
        messaging.minimum_pow = options.float(MESSAGING_MIN_POW)?;
    }
    Ok(())
}

/// Stats reporting target; `None` unless a reporting URL was given.
pub fn stats_endpoint(options: &OptionTable) -> ConfigResult<Option<StatsEndpoint>> {
    let url = options.string(STATS_URL)?;
    if url.is_empty() {
        return Ok(None);
    }
    StatsEndpoint::parse(&url).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messaging_disabled_by_default() {
        let mut messaging = MessagingConfig::default();
        apply_messaging(&OptionTable::defaults(), &mut messaging).unwrap();
        assert!(!messaging.enabled);
    }

    #[test]
    fn test_messaging_options() {
        let options = OptionTable::defaults()
            .with(MESSAGING_ENABLED, "true")
            .with(MESSAGING_MAX_MESSAGE_SIZE, "2048")
            .with(MESSAGING_MIN_POW, "1.5");
        let mut messaging = MessagingConfig::default();
        apply_messaging(&options, &mut messaging).unwrap();
        assert!(messaging.enabled);
        assert_eq!(messaging.max_message_size, 2048);
        assert_eq!(messaging.minimum_pow, 1.5);
    }

    #[test]
    fn test_stats_endpoint() {
        assert!(stats_endpoint(&OptionTable::defaults()).unwrap().is_none());
        let options = OptionTable::defaults().with(STATS_URL, "node:pw@stats.local:3000");
        let endpoint = stats_endpoint(&options).unwrap().unwrap();
        assert_eq!(endpoint.node_name, "node");
    }
}
