//! P-256 public key decoding for passkey registration flows.

use p256::ecdsa::VerifyingKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::DecodePublicKey;
use p256::PublicKey;
use serde_cbor::Value;
use starknet_crypto::Felt;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::webauthn::{COSE_ALG_ES256, COSE_CRV_P256, COSE_KTY_EC2};
use crate::errors::SignerError;

// COSE_Key map labels (RFC 9053)
const COSE_LABEL_KTY: i128 = 1;
const COSE_LABEL_ALG: i128 = 3;
const COSE_LABEL_CRV: i128 = -1;
const COSE_LABEL_X: i128 = -2;
const COSE_LABEL_Y: i128 = -3;

/// Affine P-256 point, big-endian coordinates. Always on the curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct P256Coordinates {
    x: [u8; 32],
    y: [u8; 32],
}

impl P256Coordinates {
    /// Build from raw coordinates, checking the curve equation
    pub fn new(x: [u8; 32], y: [u8; 32]) -> Result<Self, SignerError> {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..33].copy_from_slice(&x);
        sec1[33..].copy_from_slice(&y);
        PublicKey::from_sec1_bytes(&sec1)
            .map_err(|_| SignerError::MalformedKey("point is not on the P-256 curve".to_string()))?;
        Ok(Self { x, y })
    }

    fn from_public_key(public_key: &PublicKey) -> Result<Self, SignerError> {
        let point = public_key.to_encoded_point(false);
        match (point.x(), point.y()) {
            (Some(x), Some(y)) => {
                let mut coordinates = Self {
                    x: [0u8; 32],
                    y: [0u8; 32],
                };
                coordinates.x.copy_from_slice(x.as_slice());
                coordinates.y.copy_from_slice(y.as_slice());
                Ok(coordinates)
            }
            _ => Err(SignerError::MalformedKey(
                "point at infinity is not a public key".to_string(),
            )),
        }
    }

    pub fn x(&self) -> &[u8; 32] {
        &self.x
    }

    pub fn y(&self) -> &[u8; 32] {
        &self.y
    }

    /// Uncompressed SEC1 encoding, `04 || x || y`
    pub fn to_sec1_bytes(&self) -> [u8; 65] {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..33].copy_from_slice(&self.x);
        sec1[33..].copy_from_slice(&self.y);
        sec1
    }

    pub fn verifying_key(&self) -> Result<VerifyingKey, SignerError> {
        VerifyingKey::from_sec1_bytes(&self.to_sec1_bytes())
            .map_err(|_| SignerError::MalformedKey("point is not on the P-256 curve".to_string()))
    }

    /// `[x.low, x.high, y.low, y.high]` as Cairo `u256` limbs
    pub fn to_felts(&self) -> [Felt; 4] {
        let (x_low, x_high) = u256_limbs(&self.x);
        let (y_low, y_high) = u256_limbs(&self.y);
        [x_low, x_high, y_low, y_high]
    }
}

impl fmt::Debug for P256Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("P256Coordinates")
            .field("x", &hex::encode(self.x))
            .field("y", &hex::encode(self.y))
            .finish()
    }
}

impl fmt::Display for P256Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(0x{}, 0x{})", hex::encode(self.x), hex::encode(self.y))
    }
}

/// Split a big-endian 256-bit integer into `(low, high)` 128-bit felts
pub(crate) fn u256_limbs(bytes: &[u8; 32]) -> (Felt, Felt) {
    let mut high = [0u8; 32];
    let mut low = [0u8; 32];
    high[16..].copy_from_slice(&bytes[..16]);
    low[16..].copy_from_slice(&bytes[16..]);
    (Felt::from_bytes_be(&low), Felt::from_bytes_be(&high))
}

/// Decode a P-256 public key given as a COSE_Key, a DER SubjectPublicKeyInfo
/// or a raw SEC1 point.
pub fn parse_p256_public_key(raw_key: &[u8]) -> Result<P256Coordinates, SignerError> {
    let tag = *raw_key
        .first()
        .ok_or_else(|| SignerError::MalformedKey("empty public key".to_string()))?;

    let public_key = match tag {
        0x02 | 0x03 | 0x04 => PublicKey::from_sec1_bytes(raw_key)
            .map_err(|_| SignerError::MalformedKey("invalid SEC1 P-256 point".to_string()))?,
        // DER SEQUENCE
        0x30 => PublicKey::from_public_key_der(raw_key).map_err(|e| {
            SignerError::MalformedKey(format!("invalid SubjectPublicKeyInfo: {e}"))
        })?,
        // CBOR map
        0xa0..=0xbf => return parse_cose_key(raw_key),
        other => {
            return Err(SignerError::MalformedKey(format!(
                "unsupported public key encoding tag 0x{other:02x}"
            )))
        }
    };

    P256Coordinates::from_public_key(&public_key)
}

fn parse_cose_key(raw_key: &[u8]) -> Result<P256Coordinates, SignerError> {
    let value: Value = serde_cbor::from_slice(raw_key)
        .map_err(|e| SignerError::MalformedKey(format!("invalid COSE key: {e}")))?;
    let Value::Map(map) = value else {
        return Err(SignerError::MalformedKey("COSE key is not a map".to_string()));
    };

    if cose_int(&map, COSE_LABEL_KTY)? != Some(COSE_KTY_EC2) {
        return Err(SignerError::MalformedKey("COSE key type is not EC2".to_string()));
    }
    if let Some(alg) = cose_int(&map, COSE_LABEL_ALG)? {
        if alg != COSE_ALG_ES256 {
            return Err(SignerError::MalformedKey(format!(
                "unsupported COSE algorithm {alg}"
            )));
        }
    }
    if cose_int(&map, COSE_LABEL_CRV)? != Some(COSE_CRV_P256) {
        return Err(SignerError::MalformedKey("COSE curve is not P-256".to_string()));
    }

    let x = cose_coordinate(&map, COSE_LABEL_X)?;
    let y = cose_coordinate(&map, COSE_LABEL_Y)?;
    P256Coordinates::new(x, y)
}

fn cose_int(map: &BTreeMap<Value, Value>, label: i128) -> Result<Option<i128>, SignerError> {
    match map.get(&Value::Integer(label)) {
        None => Ok(None),
        Some(Value::Integer(value)) => Ok(Some(*value)),
        Some(_) => Err(SignerError::MalformedKey(format!(
            "COSE label {label} is not an integer"
        ))),
    }
}

fn cose_coordinate(map: &BTreeMap<Value, Value>, label: i128) -> Result<[u8; 32], SignerError> {
    match map.get(&Value::Integer(label)) {
        Some(Value::Bytes(bytes)) => bytes.as_slice().try_into().map_err(|_| {
            SignerError::MalformedKey(format!(
                "COSE coordinate {label} must be 32 bytes, got {}",
                bytes.len()
            ))
        }),
        _ => Err(SignerError::MalformedKey(format!(
            "COSE coordinate {label} missing"
        ))),
    }
}
