//! Node identity, directories, API endpoints, accounts and console.

use super::narrow;
use crate::console::resolve_preloads;
use crate::container::{
    AccountsConfig, ConfigError, ConfigResult, ConsoleConfig, HttpConfig, NodeSettings, WsConfig,
};
use crate::options::descriptor::*;
use crate::options::OptionTable;
use crate::validation::split_and_trim;

/// Interface an enabled endpoint binds to when no address is given.
const LOOPBACK: &str = "127.0.0.1";

pub fn apply_node(options: &OptionTable, node: &mut NodeSettings) -> ConfigResult<()> {
    if options.is_set(DATA_DIR) {
        node.data_dir = options.path(DATA_DIR)?;
    }
    if node.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::MissingDataDir);
    }
    if options.is_set(KEYSTORE_DIR) {
        node.keystore_dir = Some(options.path(KEYSTORE_DIR)?);
    }
    if options.is_set(IDENTITY) {
        node.identity = Some(options.string(IDENTITY)?);
    }
    if options.is_set(LIGHT_KDF) {
        node.lightweight_kdf = options.bool(LIGHT_KDF)?;
    }

    if options.bool(IPC_DISABLED)? {
        node.ipc_path = None;
    } else if options.is_set(IPC_PATH) {
        node.ipc_path = Some(options.path(IPC_PATH)?);
    }

    apply_http(options, &mut node.http)?;
    apply_ws(options, &mut node.ws)?;
    Ok(())
}

fn apply_http(options: &OptionTable, http: &mut HttpConfig) -> ConfigResult<()> {
    if options.bool(RPC_ENABLED)? && http.host.is_none() {
        http.host = Some(endpoint_host(options, RPC_ADDR)?);
    }
    if options.is_set(RPC_PORT) {
        http.port = narrow(options, RPC_PORT)?;
    }
    if options.is_set(RPC_CORS_DOMAIN) {
        http.cors = split_and_trim(&options.string(RPC_CORS_DOMAIN)?);
    }
    if options.is_set(RPC_VHOSTS) {
        http.virtual_hosts = split_and_trim(&options.string(RPC_VHOSTS)?);
    }
    if options.is_set(RPC_API) {
        http.modules = split_and_trim(&options.string(RPC_API)?);
    }
    Ok(())
}

fn apply_ws(options: &OptionTable, ws: &mut WsConfig) -> ConfigResult<()> {
    if options.bool(WS_ENABLED)? && ws.host.is_none() {
        ws.host = Some(endpoint_host(options, WS_ADDR)?);
    }
    if options.is_set(WS_PORT) {
        ws.port = narrow(options, WS_PORT)?;
    }
    if options.is_set(WS_ORIGINS) {
        ws.origins = split_and_trim(&options.string(WS_ORIGINS)?);
    }
    if options.is_set(WS_API) {
        ws.modules = split_and_trim(&options.string(WS_API)?);
    }
    Ok(())
}

fn endpoint_host(options: &OptionTable, addr: &'static str) -> ConfigResult<String> {
    if options.is_set(addr) {
        options.string(addr)
    } else {
        Ok(LOOPBACK.to_string())
    }
}

pub fn apply_accounts(options: &OptionTable, accounts: &mut AccountsConfig) -> ConfigResult<()> {
    if options.is_set(UNLOCK) {
        accounts.unlock = split_and_trim(&options.string(UNLOCK)?);
    }
    if options.is_set(PASSWORD_FILE) {
        let path = options.path(PASSWORD_FILE)?;
        accounts.password_file = (!path.as_os_str().is_empty()).then_some(path);
    }
    Ok(())
}

pub fn apply_console(options: &OptionTable, console: &mut ConsoleConfig) -> ConfigResult<()> {
    if options.is_set(JS_PATH) {
        console.js_path = options.path(JS_PATH)?;
    }
    if options.is_set(PRELOAD) {
        console.preload = resolve_preloads(&console.js_path, &options.string(PRELOAD)?);
    }
    if options.is_set(EXEC) {
        console.exec = Some(options.string(EXEC)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn node_of(options: &OptionTable) -> ConfigResult<NodeSettings> {
        let mut node = NodeSettings {
            data_dir: PathBuf::from("/var/lib/qc"),
            ..NodeSettings::default()
        };
        apply_node(options, &mut node).map(|()| node)
    }

    #[test]
    fn test_empty_data_dir_is_fatal() {
        let options = OptionTable::defaults().with(DATA_DIR, "");
        assert!(matches!(node_of(&options), Err(ConfigError::MissingDataDir)));
    }

    #[test]
    fn test_ipc_disable() {
        let node = node_of(&OptionTable::defaults().with(IPC_DISABLED, "true")).unwrap();
        assert!(node.ipc_endpoint().is_none());
        let node = node_of(&OptionTable::defaults().with(IPC_PATH, "custom.ipc")).unwrap();
        assert_eq!(
            node.ipc_endpoint(),
            Some(PathBuf::from("/var/lib/qc/custom.ipc"))
        );
    }

    #[test]
    fn test_http_enable_binds_loopback() {
        let node = node_of(&OptionTable::defaults().with(RPC_ENABLED, "true")).unwrap();
        assert_eq!(node.http.host.as_deref(), Some("127.0.0.1"));
        assert!(node.ws.host.is_none());
    }

    #[test]
    fn test_address_without_enable_is_ignored() {
        let node = node_of(&OptionTable::defaults().with(RPC_ADDR, "0.0.0.0")).unwrap();
        assert!(node.http.host.is_none());
    }

    #[test]
    fn test_ws_endpoint() {
        let options = OptionTable::defaults()
            .with(WS_ENABLED, "true")
            .with(WS_ADDR, "0.0.0.0")
            .with(WS_PORT, "9000")
            .with(WS_API, "qc, net ,web3")
            .with(WS_ORIGINS, "*");
        let node = node_of(&options).unwrap();
        assert_eq!(node.ws.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(node.ws.port, 9000);
        assert_eq!(node.ws.modules, vec!["qc", "net", "web3"]);
        assert_eq!(node.ws.origins, vec!["*"]);
    }

    #[test]
    fn test_accounts() {
        let options = OptionTable::defaults()
            .with(UNLOCK, "0, 0xabc")
            .with(PASSWORD_FILE, "/run/secrets/pw");
        let mut accounts = AccountsConfig::default();
        apply_accounts(&options, &mut accounts).unwrap();
        assert_eq!(accounts.unlock, vec!["0", "0xabc"]);
        assert_eq!(accounts.password_file, Some(PathBuf::from("/run/secrets/pw")));
    }

    #[test]
    fn test_console_preloads_use_js_path() {
        let options = OptionTable::defaults()
            .with(JS_PATH, "/opt/scripts")
            .with(PRELOAD, "a.js, /abs/b.js");
        let mut console = ConsoleConfig::default();
        apply_console(&options, &mut console).unwrap();
        assert_eq!(
            console.preload,
            vec![PathBuf::from("/opt/scripts/a.js"), PathBuf::from("/abs/b.js")]
        );
    }
}
