use super::*;
use crate::cli::SignerArgs;
use crate::errors::SignerError;
use crate::types::ChainId;

const FULL_CONFIG: &str = r#"
[signer]
backend = "privy"
label = "treasury"

[keystore]
backend = "software"
path = "/etc/signer/keystore.jwe"

[privy]
api_key = "privy-key"
wallet_id = "wallet-1"
timeout_secs = 5

[network]
chain_id = "SN_MAIN"

[audit]
enabled = true
log_path = "/tmp/audit.log"

[logging]
level = "debug"
"#;

#[test]
fn test_parse_full_config() {
    let config = Config::from_toml(FULL_CONFIG).unwrap();

    assert_eq!(config.signer.backend, "privy");
    assert_eq!(config.signer.label.as_deref(), Some("treasury"));
    assert_eq!(config.keystore.backend, "software");
    let privy = config.privy.as_ref().unwrap();
    assert_eq!(privy.wallet_id, "wallet-1");
    assert_eq!(privy.timeout_secs, 5);
    assert_eq!(privy.api_url, "https://api.privy.io");
    assert_eq!(config.chain_id().unwrap(), ChainId::MAINNET);
    assert!(config.audit.enabled);
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_defaults() {
    let config = Config::from_toml("").unwrap();

    assert_eq!(config.signer.backend, "stark");
    assert_eq!(config.keystore.backend, "environment");
    assert_eq!(config.keystore.env_var.as_deref(), Some("SIGNER_PRIVATE_KEY"));
    assert!(config.privy.is_none());
    assert_eq!(config.chain_id().unwrap(), ChainId::SEPOLIA);
    assert!(!config.audit.enabled);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_cli_overrides_file() {
    let args = SignerArgs {
        signer_backend: Some("stark".to_string()),
        keystore_backend: Some("environment".to_string()),
        env_var: Some("MY_KEY".to_string()),
        privy_session_token: Some("session".to_string()),
        chain_id: Some("SN_SEPOLIA".to_string()),
        audit_log: Some("/tmp/other.log".to_string()),
        ..Default::default()
    };

    let config = Config::from_toml(FULL_CONFIG)
        .unwrap()
        .merge_cli(&args)
        .unwrap();

    assert_eq!(config.signer.backend, "stark");
    assert_eq!(config.keystore.env_var.as_deref(), Some("MY_KEY"));
    assert_eq!(
        config.privy.unwrap().session_token.unwrap().expose(),
        "session"
    );
    assert_eq!(config.network.chain_id, "SN_SEPOLIA");
    assert_eq!(config.audit.log_path, "/tmp/other.log");
}

#[test]
fn test_privy_from_cli_only() {
    let args = SignerArgs {
        signer_backend: Some("privy".to_string()),
        privy_api_key: Some("key".to_string()),
        privy_wallet_id: Some("wallet".to_string()),
        privy_timeout_secs: Some(7),
        ..Default::default()
    };
    let config = Config::default().merge_cli(&args).unwrap();
    let privy = config.privy.as_ref().unwrap();
    assert_eq!(privy.api_key.expose(), "key");
    assert_eq!(privy.timeout_secs, 7);
    assert!(config.validate().is_ok());

    let partial = SignerArgs {
        privy_api_key: Some("key".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        Config::default().merge_cli(&partial),
        Err(SignerError::Config(_))
    ));
}

#[test]
fn test_validation_errors() {
    let cases = [
        "[signer]\nbackend = \"ledger\"",
        "[signer]\nbackend = \"privy\"",
        "[keystore]\nbackend = \"software\"",
        "[keystore]\nbackend = \"os_keyring\"",
        "[network]\nchain_id = \"0xnothex\"",
        "[audit]\nenabled = true\nlog_path = \"\"",
    ];

    for case in cases {
        let config = Config::from_toml(case).unwrap();
        assert!(
            matches!(config.validate(), Err(SignerError::Config(_))),
            "accepted {case:?}"
        );
    }
}

#[test]
fn test_backend_config() {
    let config = Config::from_toml(FULL_CONFIG).unwrap();
    assert_eq!(
        config.backend_config().unwrap(),
        crate::keystore::BackendConfig::Software {
            keystore_path: "/etc/signer/keystore.jwe".to_string()
        }
    );
}

#[test]
fn test_invalid_toml() {
    assert!(matches!(
        Config::from_toml("[signer"),
        Err(SignerError::Config(_))
    ));
}
