//! DER decoding and low-s canonicalization of P-256 ECDSA signatures.

use p256::ecdsa::VerifyingKey;
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::PrimeField;
use p256::{FieldBytes, ProjectivePoint, Scalar, U256};
use starknet_crypto::Felt;
use std::cmp::Ordering;

use super::keys::u256_limbs;
use crate::errors::SignerError;

/// Order of the P-256 group divided by two
pub(crate) const HALF_N: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0x80, 0x00, 0x00, 0x00, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xDE, 0x73, 0x7D, 0x56, 0xD3, 0x8B, 0xCF, 0x42, 0x79, 0xDC, 0xE5, 0x61, 0x7E, 0x31, 0x92, 0xA8,
];

/// Order of the P-256 group
pub(crate) const N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84, 0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
];

/// Canonical WebAuthn signature as submitted to the account contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAuthnSignature {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub r: [u8; 32],
    /// Always `<= n/2`
    pub s: [u8; 32],
    /// Parity of the nonce point's y coordinate, for on-chain key recovery
    pub y_parity: bool,
}

impl WebAuthnSignature {
    /// `[len(authData), ...authData, len(clientDataJSON), ...clientDataJSON,
    /// r.low, r.high, s.low, s.high, y_parity]`
    pub fn to_felts(&self) -> Vec<Felt> {
        let mut felts = Vec::with_capacity(
            self.authenticator_data.len() + self.client_data_json.len() + 7,
        );

        felts.push(Felt::from(self.authenticator_data.len() as u64));
        felts.extend(self.authenticator_data.iter().map(|b| Felt::from(*b)));
        felts.push(Felt::from(self.client_data_json.len() as u64));
        felts.extend(self.client_data_json.iter().map(|b| Felt::from(*b)));

        let (r_low, r_high) = u256_limbs(&self.r);
        let (s_low, s_high) = u256_limbs(&self.s);
        felts.extend([r_low, r_high, s_low, s_high]);
        felts.push(Felt::from(self.y_parity as u64));
        felts
    }
}

/// Parse a DER `SEQUENCE { INTEGER r, INTEGER s }` into fixed-width components
pub fn parse_der_signature(der: &[u8]) -> Result<([u8; 32], [u8; 32]), SignerError> {
    if der.len() < 8 {
        return Err(malformed("DER too short"));
    }
    if der[0] != 0x30 {
        return Err(malformed("invalid DER sequence tag"));
    }
    if der[1] as usize != der.len() - 2 {
        return Err(malformed("DER sequence length mismatch"));
    }

    let (r, rest) = read_integer(&der[2..], "r")?;
    let (s, rest) = read_integer(rest, "s")?;
    if !rest.is_empty() {
        return Err(malformed("trailing bytes after DER signature"));
    }

    Ok((r, s))
}

fn read_integer<'a>(input: &'a [u8], name: &str) -> Result<([u8; 32], &'a [u8]), SignerError> {
    match input {
        [0x02, len, rest @ ..] => {
            let len = *len as usize;
            if len == 0 || len > rest.len() {
                return Err(malformed(&format!("{name} length overflow")));
            }
            Ok((to_fixed_bytes(&rest[..len], name)?, &rest[len..]))
        }
        _ => Err(malformed(&format!("invalid {name} tag"))),
    }
}

fn to_fixed_bytes(bytes: &[u8], name: &str) -> Result<[u8; 32], SignerError> {
    if bytes[0] & 0x80 != 0 {
        return Err(malformed(&format!("{name} is negative")));
    }

    // A leading zero is only legal as sign padding before a high bit
    let bytes = match bytes {
        [0x00, next, ..] if *next < 0x80 => {
            return Err(malformed(&format!("{name} is not minimally encoded")));
        }
        [0x00, rest @ ..] if !rest.is_empty() => rest,
        _ => bytes,
    };
    if bytes.len() > 32 {
        return Err(malformed(&format!("{name} too large")));
    }

    let mut result = [0u8; 32];
    result[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(result)
}

/// Replace `s` with `n - s` when `s > n/2`; returns whether it was flipped
pub fn normalize_s(s: [u8; 32]) -> ([u8; 32], bool) {
    if compare_bytes(&s, &HALF_N) == Ordering::Greater {
        (subtract_bytes(&N, &s), true)
    } else {
        (s, false)
    }
}

pub(crate) fn compare_bytes(a: &[u8; 32], b: &[u8; 32]) -> Ordering {
    a.iter().cmp(b.iter())
}

/// `a - b` for big-endian integers with `a >= b`
pub(crate) fn subtract_bytes(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow = 0i16;

    for i in (0..32).rev() {
        let diff = a[i] as i16 - b[i] as i16 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

/// y parity of `R = (e/s)·G + (r/s)·Q`, the nonce point of a verified signature
pub(crate) fn nonce_point_y_parity(
    digest: &[u8; 32],
    r: &[u8; 32],
    s: &[u8; 32],
    public_key: &VerifyingKey,
) -> Result<bool, SignerError> {
    let r_scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*r)))
        .ok_or_else(|| malformed("r is not a valid scalar"))?;
    let s_scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*s)))
        .ok_or_else(|| malformed("s is not a valid scalar"))?;
    let s_inv = Option::<Scalar>::from(s_scalar.invert()).ok_or_else(|| malformed("s is zero"))?;

    let e = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest));
    let u1 = e * s_inv;
    let u2 = r_scalar * s_inv;

    let nonce_point = (ProjectivePoint::GENERATOR * u1
        + ProjectivePoint::from(*public_key.as_affine()) * u2)
        .to_affine();

    match nonce_point.to_encoded_point(true).as_bytes().first() {
        Some(0x02) => Ok(false),
        Some(0x03) => Ok(true),
        _ => Err(SignerError::SigningFailed(
            "signature nonce point is the identity".to_string(),
        )),
    }
}

fn malformed(message: &str) -> SignerError {
    SignerError::MalformedSignature(message.to_string())
}
