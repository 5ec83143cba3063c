#[cfg(test)]
mod integration_tests {
    use serde_json::{json, Value};
    use starknet::core::types::BroadcastedInvokeTransactionV3;
    use starknet::macros::felt;
    use starknet_crypto::Felt;
    use std::sync::Arc;

    use crate::audit::AuditLogger;
    use crate::cli::SignerArgs;
    use crate::errors::SignerError;
    use crate::signer::{verify_stark_signature, SignerAdapter, StarkSigner, TransactionSigner};
    use crate::transaction::{FeeSettings, InvokeDetails, ResourceBound, ResourceBounds};
    use crate::types::{Address, ChainId};
    use crate::{Config, SignableTransaction, SignatureComponents};

    const PRIVATE_KEY: Felt =
        felt!("0x2dccce1da22003777062ee0870e9881b460a8b7eca276870f57c601f182136c");

    fn invoke_details() -> InvokeDetails {
        InvokeDetails {
            sender_address: Address::from_hex("0x1").unwrap(),
            calldata: vec![felt!("0x2a")],
            nonce: felt!("0x5"),
            fee: FeeSettings::v3(ResourceBounds {
                l1_gas: ResourceBound::new(100, 1000),
                ..Default::default()
            }),
            account_deployment_data: vec![],
            is_query: false,
        }
    }

    fn adapter() -> SignerAdapter {
        let signer = StarkSigner::from_secret_scalar(PRIVATE_KEY).unwrap();
        SignerAdapter::new(Arc::new(signer), "integration")
    }

    #[tokio::test]
    async fn test_invoke_end_to_end() {
        let adapter = adapter();
        let transaction =
            SignableTransaction::new(invoke_details(), ChainId::SEPOLIA, 3).unwrap();
        let signed = adapter.sign_transaction(&transaction).await.unwrap();

        let (r, s) = match signed.signature() {
            SignatureComponents::Stark { r, s } => (*r, *s),
            other => panic!("unexpected signature: {other:?}"),
        };
        let public_key = StarkSigner::from_secret_scalar(PRIVATE_KEY)
            .unwrap()
            .public_key_felt();
        assert!(verify_stark_signature(public_key, transaction.hash(), r, s));

        let body = signed.to_json();
        assert_eq!(body["type"], "INVOKE");
        assert_eq!(body["version"], "0x3");
        assert_eq!(body["sender_address"], "0x1");
        assert_eq!(body["calldata"], json!(["0x2a"]));
        assert_eq!(body["nonce"], "0x5");
        assert_eq!(body["tip"], "0x0");
        assert_eq!(body["paymaster_data"], json!([]));
        assert_eq!(body["account_deployment_data"], json!([]));
        assert_eq!(body["nonce_data_availability_mode"], "L1");
        assert_eq!(body["fee_data_availability_mode"], "L1");
        assert_eq!(
            body["resource_bounds"]["l1_gas"],
            json!({"max_amount": "0x64", "max_price_per_unit": "0x3e8"})
        );
        assert_eq!(
            body["signature"],
            json!([format!("{:#x}", r), format!("{:#x}", s)])
        );
        assert!(body.get("max_fee").is_none());

        let broadcast: BroadcastedInvokeTransactionV3 = serde_json::from_value(body).unwrap();
        assert_eq!(broadcast.sender_address, Felt::ONE);
        assert_eq!(broadcast.calldata, vec![felt!("0x2a")]);
        assert_eq!(broadcast.nonce, felt!("0x5"));
        assert_eq!(broadcast.signature, vec![r, s]);
        assert_eq!(broadcast.resource_bounds.l1_gas.max_amount, 100);
        assert_eq!(broadcast.resource_bounds.l1_gas.max_price_per_unit, 1000);
        assert!(!broadcast.is_query);
    }

    #[tokio::test]
    async fn test_signing_is_byte_identical_across_runs() {
        let first = {
            let transaction =
                SignableTransaction::new(invoke_details(), ChainId::SEPOLIA, 3).unwrap();
            adapter().sign_transaction(&transaction).await.unwrap()
        };
        let second = {
            let transaction =
                SignableTransaction::new(invoke_details(), ChainId::SEPOLIA, 3).unwrap();
            adapter().sign_transaction(&transaction).await.unwrap()
        };

        assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
    }

    #[tokio::test]
    async fn test_chain_id_is_bound_into_signature() {
        let sepolia = SignableTransaction::new(invoke_details(), ChainId::SEPOLIA, 3).unwrap();
        let mainnet = SignableTransaction::new(invoke_details(), ChainId::MAINNET, 3).unwrap();
        assert_ne!(sepolia.hash(), mainnet.hash());

        let signed = adapter().sign_transaction(&sepolia).await.unwrap();
        let felts = signed.signature_felts();
        let public_key = StarkSigner::from_secret_scalar(PRIVATE_KEY)
            .unwrap()
            .public_key_felt();
        assert!(!verify_stark_signature(
            public_key,
            mainnet.hash(),
            felts[0],
            felts[1]
        ));
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let result = SignableTransaction::new(invoke_details(), ChainId::SEPOLIA, 99);
        assert!(matches!(
            result,
            Err(SignerError::UnsupportedVersion { version: 99, .. })
        ));
    }

    #[tokio::test]
    async fn test_config_built_signer_with_audit() {
        std::env::set_var(
            "INTEGRATION_TEST_PRIVATE_KEY",
            "0x2dccce1da22003777062ee0870e9881b460a8b7eca276870f57c601f182136c",
        );
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.log");

        let args = SignerArgs {
            keystore_backend: Some("environment".to_string()),
            env_var: Some("INTEGRATION_TEST_PRIVATE_KEY".to_string()),
            label: Some("config-built".to_string()),
            chain_id: Some("SN_SEPOLIA".to_string()),
            audit_log: Some(audit_path.to_string_lossy().to_string()),
            ..Default::default()
        };
        let config = Config::default().merge_cli(&args).unwrap();
        config.validate().unwrap();

        let adapter = config.build_adapter().await.unwrap();
        assert_eq!(adapter.label(), "config-built");

        let transaction =
            SignableTransaction::new(invoke_details(), config.chain_id().unwrap(), 3).unwrap();
        let signed = adapter.sign_transaction(&transaction).await.unwrap();

        let direct = adapter_direct_signature(transaction.hash()).await;
        assert_eq!(signed.signature_felts(), direct);

        let log = std::fs::read_to_string(&audit_path).unwrap();
        let entries: Vec<Value> = log
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["signer"], "config-built");
        assert_eq!(entries[0]["chain_id"], "SN_SEPOLIA");
        assert_eq!(entries[0]["success"], true);
    }

    async fn adapter_direct_signature(hash: Felt) -> Vec<Felt> {
        let signer = StarkSigner::from_secret_scalar(PRIVATE_KEY).unwrap();
        signer.sign_hash(hash).await.unwrap().to_felts()
    }

    #[tokio::test]
    async fn test_audit_logger_records_failures() {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("nested").join("audit.log");
        let logger = AuditLogger::new(&audit_path.to_string_lossy()).unwrap();
        let adapter = adapter().with_audit_logger(Arc::new(logger));

        let out_of_range = felt!("0x800000000000000000000000000000000000000000000000000000000000000");
        let result = adapter.sign_hash(out_of_range).await;
        assert!(matches!(result, Err(SignerError::InvalidInput(_))));

        let log = std::fs::read_to_string(&audit_path).unwrap();
        let entry: Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
        assert_eq!(entry["success"], false);
        assert!(entry["error"].as_str().unwrap().contains("2^251"));
    }
}
