use starknet::core::utils::get_contract_address;
use starknet::macros::felt;
use starknet_crypto::Felt;

use super::*;
use crate::errors::SignerError;
use crate::types::{Address, ChainId};

fn sepolia_invoke() -> InvokeDetails {
    InvokeDetails {
        sender_address: Address::new(felt!(
            "0x2e216b191ac966ba1d35cb6cfddfaf9c12aec4dfe869d9fa6233611bb334ee9"
        ))
        .unwrap(),
        calldata: vec![
            felt!("0x1"),
            felt!("0x3f32e152b9637c31bfcf73e434f78591067a01ba070505ff6ee195642c9acfb"),
            felt!("0x37446750a403c1b4014436073cf8d08ceadc5b156ac1c8b7b0ca41a0c9c1c54"),
            felt!("0x1"),
            felt!("0x7979a0a0a175d7e738e8e9ba6fa6d48f680d67758f719390eee58e790819836"),
        ],
        nonce: felt!("0x106"),
        fee: FeeSettings::v3(ResourceBounds {
            l1_gas: ResourceBound::new(0, 0x51066a69ad72c),
            l2_gas: ResourceBound::new(0xf00000, 0x308c5bff6),
            l1_data_gas: ResourceBound::new(0x600, 0x1254),
        }),
        account_deployment_data: vec![],
        is_query: false,
    }
}

fn legacy_invoke() -> InvokeDetails {
    InvokeDetails {
        sender_address: Address::from_hex("0x1").unwrap(),
        calldata: vec![felt!("0x2a"), felt!("0x2b")],
        nonce: felt!("0x5"),
        fee: FeeSettings::legacy(felt!("0x1000")),
        account_deployment_data: vec![],
        is_query: false,
    }
}

fn deploy_account() -> DeployAccountDetails {
    DeployAccountDetails {
        class_hash: felt!("0x61dac032f228abef9c6626f995015233097ae253a7f72d68552db02f2971b8f"),
        contract_address_salt: felt!("0x5"),
        constructor_calldata: vec![felt!("0x6"), felt!("0x7")],
        nonce: Felt::ZERO,
        fee: FeeSettings::v3(ResourceBounds {
            l1_gas: ResourceBound::new(100, 1000),
            ..Default::default()
        }),
        is_query: false,
    }
}

fn declare(compiled_class_hash: Option<Felt>, fee: FeeSettings) -> DeclareDetails {
    DeclareDetails {
        sender_address: Address::from_hex("0x1").unwrap(),
        class_hash: felt!("0x1234"),
        compiled_class_hash,
        nonce: felt!("0x3"),
        fee,
        account_deployment_data: vec![],
        contract_class: None,
        is_query: false,
    }
}

fn hash_of(details: impl Into<TransactionDetails>, version: u64) -> Felt {
    compute_transaction_hash(&details.into(), ChainId::SEPOLIA, version).unwrap()
}

#[test]
fn test_invoke_v3_matches_known_sepolia_hash() {
    let hash = hash_of(sepolia_invoke(), 3);

    assert_eq!(
        hash,
        felt!("0x382a7406fe3931ba1faf00d1eaa36b7c8770b8d185b091b730ecdb4dba5f3ce")
    );
}

#[test]
fn test_hash_is_deterministic() {
    let first = SignableTransaction::invoke(sepolia_invoke(), ChainId::SEPOLIA, 3).unwrap();
    let second = SignableTransaction::invoke(sepolia_invoke(), ChainId::SEPOLIA, 3).unwrap();
    assert_eq!(first.hash(), second.hash());
    assert_eq!(first, second);

    let deploy_a = hash_of(deploy_account(), 3);
    let deploy_b = hash_of(deploy_account(), 3);
    assert_eq!(deploy_a, deploy_b);
}

#[test]
fn test_invoke_v3_single_field_mutations_change_hash() {
    let base = hash_of(sepolia_invoke(), 3);

    let mutations: Vec<(&str, Box<dyn Fn(&mut InvokeDetails)>)> = vec![
        ("sender", Box::new(|d: &mut InvokeDetails| d.sender_address = Address::from_hex("0x2").unwrap())),
        ("calldata value", Box::new(|d: &mut InvokeDetails| d.calldata[4] = felt!("0x1"))),
        ("calldata order", Box::new(|d: &mut InvokeDetails| d.calldata.swap(1, 2))),
        ("calldata duplicate", Box::new(|d: &mut InvokeDetails| d.calldata.push(felt!("0x1")))),
        ("nonce", Box::new(|d: &mut InvokeDetails| d.nonce = felt!("0x107"))),
        ("l1 amount", Box::new(|d: &mut InvokeDetails| d.fee.resource_bounds.l1_gas.max_amount = 1)),
        ("l1 price", Box::new(|d: &mut InvokeDetails| d.fee.resource_bounds.l1_gas.max_price_per_unit += 1)),
        ("l2 amount", Box::new(|d: &mut InvokeDetails| d.fee.resource_bounds.l2_gas.max_amount += 1)),
        ("l2 price", Box::new(|d: &mut InvokeDetails| d.fee.resource_bounds.l2_gas.max_price_per_unit += 1)),
        ("data amount", Box::new(|d: &mut InvokeDetails| d.fee.resource_bounds.l1_data_gas.max_amount += 1)),
        ("data price", Box::new(|d: &mut InvokeDetails| d.fee.resource_bounds.l1_data_gas.max_price_per_unit += 1)),
        ("tip", Box::new(|d: &mut InvokeDetails| d.fee.tip = 1)),
        ("paymaster", Box::new(|d: &mut InvokeDetails| d.fee.paymaster_data = vec![felt!("0x1")])),
        ("nonce da", Box::new(|d: &mut InvokeDetails| d.fee.nonce_data_availability_mode = DataAvailabilityMode::L2)),
        ("fee da", Box::new(|d: &mut InvokeDetails| d.fee.fee_data_availability_mode = DataAvailabilityMode::L2)),
        ("deployment data", Box::new(|d: &mut InvokeDetails| d.account_deployment_data = vec![felt!("0x1")])),
        ("query", Box::new(|d: &mut InvokeDetails| d.is_query = true)),
    ];

    for (name, mutate) in mutations {
        let mut details = sepolia_invoke();
        mutate(&mut details);
        assert_ne!(hash_of(details, 3), base, "mutating {name} did not change the hash");
    }

    let other_chain =
        compute_transaction_hash(&sepolia_invoke().into(), ChainId::MAINNET, 3).unwrap();
    assert_ne!(other_chain, base);
}

#[test]
fn test_invoke_v1_single_field_mutations_change_hash() {
    let base = hash_of(legacy_invoke(), 1);

    let mutations: Vec<Box<dyn Fn(&mut InvokeDetails)>> = vec![
        Box::new(|d: &mut InvokeDetails| d.sender_address = Address::from_hex("0x2").unwrap()),
        Box::new(|d: &mut InvokeDetails| d.calldata.reverse()),
        Box::new(|d: &mut InvokeDetails| d.nonce = felt!("0x6")),
        Box::new(|d: &mut InvokeDetails| d.fee.max_fee = felt!("0x1001")),
        Box::new(|d: &mut InvokeDetails| d.is_query = true),
    ];

    for mutate in mutations {
        let mut details = legacy_invoke();
        mutate(&mut details);
        assert_ne!(hash_of(details, 1), base);
    }

    assert_ne!(base, {
        let mut v3 = legacy_invoke();
        v3.fee = FeeSettings::default();
        hash_of(v3, 3)
    });
}

fn full_v3_fee() -> FeeSettings {
    FeeSettings::v3(ResourceBounds {
        l1_gas: ResourceBound::new(0x2710, 0x5af3107a4000),
        l2_gas: ResourceBound::new(0x30d40, 0x2540be400),
        l1_data_gas: ResourceBound::new(0x80, 0x3b9aca00),
    })
}

/// Every v3 fee field, each changed on its own
fn v3_fee_mutations() -> Vec<(&'static str, Box<dyn Fn(&mut FeeSettings)>)> {
    vec![
        ("l1 amount", Box::new(|f: &mut FeeSettings| f.resource_bounds.l1_gas.max_amount += 1)),
        ("l1 price", Box::new(|f: &mut FeeSettings| f.resource_bounds.l1_gas.max_price_per_unit += 1)),
        ("l2 amount", Box::new(|f: &mut FeeSettings| f.resource_bounds.l2_gas.max_amount += 1)),
        ("l2 price", Box::new(|f: &mut FeeSettings| f.resource_bounds.l2_gas.max_price_per_unit += 1)),
        ("data amount", Box::new(|f: &mut FeeSettings| f.resource_bounds.l1_data_gas.max_amount += 1)),
        ("data price", Box::new(|f: &mut FeeSettings| f.resource_bounds.l1_data_gas.max_price_per_unit += 1)),
        ("tip", Box::new(|f: &mut FeeSettings| f.tip = 1)),
        ("paymaster", Box::new(|f: &mut FeeSettings| f.paymaster_data = vec![felt!("0x1")])),
        ("nonce da", Box::new(|f: &mut FeeSettings| f.nonce_data_availability_mode = DataAvailabilityMode::L2)),
        ("fee da", Box::new(|f: &mut FeeSettings| f.fee_data_availability_mode = DataAvailabilityMode::L2)),
    ]
}

#[test]
fn test_deploy_account_single_field_mutations_change_hash() {
    for version in [1u64, 3] {
        let base_details = || {
            let mut d = deploy_account();
            d.fee = if version == 1 {
                FeeSettings::legacy(felt!("0x100"))
            } else {
                full_v3_fee()
            };
            d
        };
        let base = hash_of(base_details(), version);

        let mut mutations: Vec<(&str, Box<dyn Fn(&mut DeployAccountDetails)>)> = vec![
            ("class hash", Box::new(|d: &mut DeployAccountDetails| d.class_hash = felt!("0x1"))),
            ("salt", Box::new(|d: &mut DeployAccountDetails| d.contract_address_salt = felt!("0x6"))),
            ("calldata order", Box::new(|d: &mut DeployAccountDetails| d.constructor_calldata.reverse())),
            ("calldata length", Box::new(|d: &mut DeployAccountDetails| d.constructor_calldata.push(felt!("0x0")))),
            ("nonce", Box::new(|d: &mut DeployAccountDetails| d.nonce = felt!("0x1"))),
            ("query", Box::new(|d: &mut DeployAccountDetails| d.is_query = true)),
        ];
        if version == 1 {
            mutations.push(("max fee", Box::new(|d: &mut DeployAccountDetails| d.fee.max_fee = felt!("0x101"))));
        } else {
            for (name, mutate) in v3_fee_mutations() {
                mutations.push((name, Box::new(move |d: &mut DeployAccountDetails| mutate(&mut d.fee))));
            }
        }

        for (name, mutate) in mutations {
            let mut details = base_details();
            mutate(&mut details);
            assert_ne!(
                hash_of(details, version),
                base,
                "deploy_account v{version}: mutating {name} did not change the hash"
            );
        }
    }
}

#[test]
fn test_declare_single_field_mutations_change_hash() {
    let v2 = || declare(Some(felt!("0xabc")), FeeSettings::legacy(felt!("0x100")));
    let v3 = || declare(Some(felt!("0xabc")), full_v3_fee());

    let makers: [(u64, &dyn Fn() -> DeclareDetails); 2] = [(2, &v2), (3, &v3)];
    for (version, make) in makers {
        let base = hash_of(make(), version);

        let mut mutations: Vec<(&str, Box<dyn Fn(&mut DeclareDetails)>)> = vec![
            ("sender", Box::new(|d: &mut DeclareDetails| d.sender_address = Address::from_hex("0x2").unwrap())),
            ("class hash", Box::new(|d: &mut DeclareDetails| d.class_hash = felt!("0x1235"))),
            ("compiled class hash", Box::new(|d: &mut DeclareDetails| d.compiled_class_hash = Some(felt!("0xabd")))),
            ("nonce", Box::new(|d: &mut DeclareDetails| d.nonce = felt!("0x4"))),
            ("query", Box::new(|d: &mut DeclareDetails| d.is_query = true)),
        ];
        if version == 2 {
            mutations.push(("max fee", Box::new(|d: &mut DeclareDetails| d.fee.max_fee = felt!("0x101"))));
        } else {
            mutations.push((
                "deployment data",
                Box::new(|d: &mut DeclareDetails| d.account_deployment_data = vec![felt!("0x1")]),
            ));
            for (name, mutate) in v3_fee_mutations() {
                mutations.push((name, Box::new(move |d: &mut DeclareDetails| mutate(&mut d.fee))));
            }
        }

        for (name, mutate) in mutations {
            let mut details = make();
            mutate(&mut details);
            assert_ne!(
                hash_of(details, version),
                base,
                "declare v{version}: mutating {name} did not change the hash"
            );
        }
    }

    let v1 = declare(None, FeeSettings::legacy(felt!("0x100")));
    assert_ne!(hash_of(v1, 1), hash_of(v2(), 2));
}

// Computed with the starknet-accounts 0.14 v3 layouts (tip 0, empty paymaster
// data and deployment data, L1 DA modes) and cross-checked against the
// Sepolia invoke above.
#[test]
fn test_deploy_account_v3_matches_reference_hash() {
    let mut details = deploy_account();
    details.fee = full_v3_fee();

    assert_eq!(
        compute_deploy_account_address(&details).unwrap().as_felt(),
        felt!("0x189d53d6911f7af1b0369d47dcf15613d8961b8bc51730e72f1bc4fcd5d9eb3")
    );
    assert_eq!(
        hash_of(details, 3),
        felt!("0x1a1a922d8eaf65b77791ae8475897fc7c8fbff999ec6766dd452597462bed2e")
    );
}

#[test]
fn test_declare_v3_matches_reference_hash() {
    let details = declare(Some(felt!("0x5678")), full_v3_fee());

    assert_eq!(
        hash_of(details, 3),
        felt!("0x458f2fa50e463a65194f2c0c37cbd4ee6ad6b282375be1b298e7286ff7e82e0")
    );
}

#[test]
fn test_invoke_v1_matches_reference_hash() {
    // pedersen chain over [invoke, 1, sender, 0, h(calldata), max_fee, chain_id, nonce]
    assert_eq!(
        hash_of(legacy_invoke(), 1),
        felt!("0x5f181dafac4e6245dbd0e889a3bc38984a7f328cbbaa7d29c9184a6769186c3")
    );
}

#[test]
fn test_contract_class_is_not_hashed() {
    let mut with_class = declare(Some(felt!("0xabc")), FeeSettings::legacy(felt!("0x100")));
    with_class.contract_class = Some(serde_json::json!({"sierra_program": []}));

    let without_class = declare(Some(felt!("0xabc")), FeeSettings::legacy(felt!("0x100")));
    assert_eq!(hash_of(with_class, 2), hash_of(without_class, 2));
}

#[test]
fn test_unsupported_versions_fail_without_hash() {
    let cases: Vec<(TransactionDetails, u64)> = vec![
        (sepolia_invoke().into(), 99),
        (sepolia_invoke().into(), 2),
        (sepolia_invoke().into(), 0),
        (deploy_account().into(), 99),
        (deploy_account().into(), 2),
        (declare(Some(felt!("0xabc")), FeeSettings::default()).into(), 99),
        (declare(Some(felt!("0xabc")), FeeSettings::default()).into(), 4),
    ];

    for (details, version) in cases {
        let kind = details.kind();
        let result = SignableTransaction::new(details, ChainId::SEPOLIA, version);
        match result {
            Err(SignerError::UnsupportedVersion { kind: k, version: v }) => {
                assert_eq!(k, kind);
                assert_eq!(v, version);
            }
            other => panic!("expected UnsupportedVersion for {kind} v{version}, got {other:?}"),
        }
    }
}

#[test]
fn test_fee_fields_must_match_version() {
    // v1 with resource bounds
    let mut details = legacy_invoke();
    details.fee.resource_bounds.l1_gas = ResourceBound::new(1, 1);
    assert!(matches!(
        SignableTransaction::invoke(details, ChainId::SEPOLIA, 1),
        Err(SignerError::InvalidInput(_))
    ));

    // v3 with max_fee
    let mut details = sepolia_invoke();
    details.fee.max_fee = felt!("0x1");
    assert!(matches!(
        SignableTransaction::invoke(details, ChainId::SEPOLIA, 3),
        Err(SignerError::InvalidInput(_))
    ));

    // declare v2 without compiled class hash
    let details = declare(None, FeeSettings::legacy(felt!("0x1")));
    assert!(matches!(
        SignableTransaction::declare(details, ChainId::SEPOLIA, 2),
        Err(SignerError::InvalidInput(_))
    ));

    // declare v1 with compiled class hash
    let details = declare(Some(felt!("0x1")), FeeSettings::legacy(felt!("0x1")));
    assert!(matches!(
        SignableTransaction::declare(details, ChainId::SEPOLIA, 1),
        Err(SignerError::InvalidInput(_))
    ));
}

#[test]
fn test_zero_resource_bounds_are_accepted() {
    let mut details = sepolia_invoke();
    details.fee.resource_bounds = ResourceBounds::default();
    assert!(SignableTransaction::invoke(details, ChainId::SEPOLIA, 3).is_ok());
}

#[test]
fn test_deploy_account_sender_is_derived() {
    let details = deploy_account();
    let signable = SignableTransaction::deploy_account(details.clone(), ChainId::SEPOLIA, 3).unwrap();

    let expected = get_contract_address(
        details.contract_address_salt,
        details.class_hash,
        &details.constructor_calldata,
        Felt::ZERO,
    );
    assert_eq!(signable.sender_address().as_felt(), expected);
    assert_eq!(compute_deploy_account_address(&details).unwrap().as_felt(), expected);
}

#[test]
fn test_query_version_offset() {
    assert_eq!(TransactionVersion::V3.as_felt(false), Felt::THREE);
    assert_eq!(
        TransactionVersion::V3.as_felt(true),
        felt!("0x100000000000000000000000000000003")
    );
}
