use starknet::macros::felt;
use starknet_crypto::Felt;

/// Chain ID constants
pub const MAINNET_CHAIN_ID: Felt = felt!("0x534e5f4d41494e"); // SN_MAIN
pub const SEPOLIA_CHAIN_ID: Felt = felt!("0x534e5f5345504f4c4941"); // SN_SEPOLIA

/// Stark curve parameters
pub mod curve {
    use super::*;

    /// Order of the Stark curve generator
    pub const EC_ORDER: Felt =
        felt!("0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f");

    /// 2^251, exclusive bound for ECDSA message hashes and contract addresses
    pub const ELEMENT_UPPER_BOUND: Felt =
        felt!("0x800000000000000000000000000000000000000000000000000000000000000");
}

/// Transaction hash domain separators
pub mod prefixes {
    use super::*;

    /// Cairo short string "invoke"
    pub const INVOKE: Felt = felt!("0x696e766f6b65");

    /// Cairo short string "declare"
    pub const DECLARE: Felt = felt!("0x6465636c617265");

    /// Cairo short string "deploy_account"
    pub const DEPLOY_ACCOUNT: Felt = felt!("0x6465706c6f795f6163636f756e74");

    /// 2^128, added to the version for query-only (fee estimation) transactions
    pub const QUERY_VERSION_OFFSET: Felt = felt!("0x100000000000000000000000000000000");
}

/// Resource names packed into the first 8 bytes of a v3 resource bound
pub mod resources {
    pub const L1_GAS: [u8; 8] = [0, 0, b'L', b'1', b'_', b'G', b'A', b'S'];
    pub const L2_GAS: [u8; 8] = [0, 0, b'L', b'2', b'_', b'G', b'A', b'S'];
    pub const L1_DATA_GAS: [u8; 8] = [0, b'L', b'1', b'_', b'D', b'A', b'T', b'A'];
}

/// WebAuthn constants
pub mod webauthn {
    /// clientDataJSON type for assertions
    pub const ASSERTION_TYPE: &str = "webauthn.get";

    /// COSE key type EC2
    pub const COSE_KTY_EC2: i128 = 2;

    /// COSE algorithm ES256
    pub const COSE_ALG_ES256: i128 = -7;

    /// COSE curve P-256
    pub const COSE_CRV_P256: i128 = 1;
}

/// Privy defaults
pub mod privy {
    pub const DEFAULT_API_URL: &str = "https://api.privy.io";

    /// Bounded wait for a custodial round-trip
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
}
