//! Structural validation of `(v, r, s)` signature triples.
//!
//! This only checks ranges and recovery parity; it does not verify the signature against a
//! public key.

use crate::{Quantity, SignatureError};
use alloy_primitives::U256;

/// Order of the secp256k1 curve.
pub const SECP256K1N: U256 = U256::from_limbs([
    0xbfd2_5e8c_d036_4141,
    0xbaae_dce6_af48_a03b,
    0xffff_ffff_ffff_fffe,
    0xffff_ffff_ffff_ffff,
]);

/// Returns `true` if all three values are zero, i.e. the transaction is unsigned.
pub fn is_unsigned(v: &Quantity, r: &Quantity, s: &Quantity) -> bool {
    v.is_zero() && r.is_zero() && s.is_zero()
}

/// Returns `true` if `v` carries an EIP-155 chain id.
pub fn is_protected_v(v: &Quantity) -> bool {
    match v.to_u64() {
        Some(v) if v <= u8::MAX as u64 => !matches!(v, 0 | 1 | 27 | 28),
        _ => true,
    }
}

/// Derives the chain id encoded into a legacy `v` value, zero when `v` is unprotected.
pub fn chain_id_from_v(v: &Quantity) -> Quantity {
    if !is_protected_v(v) {
        return Quantity::zero();
    }
    v.checked_sub(&Quantity::from(35_u64))
        .map(|offset| Quantity::from(offset.as_biguint() >> 1_u32))
        .unwrap_or_default()
}

/// Checks that a signature triple is well formed.
///
/// `maybe_protected` is set for legacy transactions, whose `v` is either `27 + parity` or
/// `35 + 2 * chain_id + parity`. Typed transactions store the bare parity.
pub fn sanity_check_signature(
    v: &Quantity,
    r: &Quantity,
    s: &Quantity,
    maybe_protected: bool,
) -> Result<(), SignatureError> {
    let protected = is_protected_v(v);
    if protected && !maybe_protected {
        return Err(SignatureError::UnexpectedProtection);
    }

    let parity = if protected {
        v.checked_sub(&Quantity::from(35_u64)).map(|offset| u64::from(offset.as_biguint().bit(0)))
    } else if maybe_protected {
        v.to_u64().and_then(|v| v.checked_sub(27))
    } else {
        v.to_u64()
    };
    if !matches!(parity, Some(0 | 1)) {
        return Err(SignatureError::InvalidV);
    }

    if !in_scalar_range(r) {
        return Err(SignatureError::InvalidR);
    }
    if !in_scalar_range(s) {
        return Err(SignatureError::InvalidS);
    }
    Ok(())
}

fn in_scalar_range(value: &Quantity) -> bool {
    value.to_u256().is_some_and(|value| !value.is_zero() && value < SECP256K1N)
}
