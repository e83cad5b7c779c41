//! Arbitrary-precision unsigned quantities.

use alloy_primitives::U256;
use alloy_rlp::{BufMut, Decodable, Encodable, Header};
use core::{
    fmt,
    ops::Add,
    str::FromStr,
};
use num_bigint::BigUint;

/// An owned, arbitrary-precision unsigned integer.
///
/// Used for every fee, value and signature field of the variable-width transaction kinds. It
/// encodes to RLP as a minimal big-endian byte string and to JSON as a `0x`-prefixed hex
/// quantity.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(BigUint);

impl Quantity {
    /// Creates a zero quantity.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates a quantity from big-endian bytes. Leading zero bytes are ignored.
    pub fn from_be_slice(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Returns `true` if the quantity is zero.
    pub fn is_zero(&self) -> bool {
        self.0.bits() == 0
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> u64 {
        self.0.bits()
    }

    /// Minimal big-endian representation. Zero is the empty vector.
    pub fn to_be_bytes_trimmed(&self) -> Vec<u8> {
        if self.is_zero() { Vec::new() } else { self.0.to_bytes_be() }
    }

    /// Narrows into a [`U256`], or `None` if the value needs more than 256 bits.
    pub fn to_u256(&self) -> Option<U256> {
        U256::try_from_be_slice(&self.to_be_bytes_trimmed())
    }

    /// Narrows into a `u64`, or `None` if the value needs more than 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.0).ok()
    }

    /// Returns the underlying big integer.
    pub const fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Consumes the quantity and returns the underlying big integer.
    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// Subtraction that returns `None` instead of going below zero.
    pub fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        (self.0 >= rhs.0).then(|| Self(&self.0 - &rhs.0))
    }
}

impl From<BigUint> for Quantity {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Quantity {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<U256> for Quantity {
    fn from(value: U256) -> Self {
        Self::from_be_slice(&value.to_be_bytes::<32>())
    }
}

impl From<&U256> for Quantity {
    fn from(value: &U256) -> Self {
        Self::from(*value)
    }
}

impl Add<&Quantity> for &Quantity {
    type Output = Quantity;

    fn add(self, rhs: &Quantity) -> Quantity {
        Quantity(&self.0 + &rhs.0)
    }
}

impl PartialEq<u64> for Quantity {
    fn eq(&self, other: &u64) -> bool {
        self.to_u64() == Some(*other)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Error returned when parsing a hex quantity fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseQuantityError {
    /// The string does not start with `0x`.
    #[error("hex quantity without 0x prefix")]
    MissingPrefix,
    /// Nothing follows the `0x` prefix.
    #[error("hex quantity without digits")]
    Empty,
    /// A character is not a hex digit.
    #[error("invalid hex digit")]
    InvalidDigit,
}

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    /// Parses a `0x`-prefixed hex quantity of any length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(ParseQuantityError::MissingPrefix)?;
        if digits.is_empty() {
            return Err(ParseQuantityError::Empty);
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseQuantityError::InvalidDigit);
        }
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(Self)
            .ok_or(ParseQuantityError::InvalidDigit)
    }
}

impl Encodable for Quantity {
    fn encode(&self, out: &mut dyn BufMut) {
        self.to_be_bytes_trimmed().as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.to_be_bytes_trimmed().as_slice().length()
    }
}

impl Decodable for Quantity {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let bytes = Header::decode_bytes(buf, false)?;
        if bytes.first() == Some(&0) {
            return Err(alloy_rlp::Error::LeadingZero);
        }
        Ok(Self::from_be_slice(bytes))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Quantity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:#x}", self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Quantity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn zero_encodes_as_empty_string() {
        let mut buf = Vec::new();
        Quantity::zero().encode(&mut buf);
        assert_eq!(buf, [0x80]);
        assert_eq!(Quantity::decode(&mut &buf[..]).unwrap(), Quantity::zero());
    }

    #[test]
    fn small_values_encode_as_single_byte() {
        let mut buf = Vec::new();
        Quantity::from(0x1c_u64).encode(&mut buf);
        assert_eq!(buf, [0x1c]);
    }

    #[test]
    fn matches_u256_rlp() {
        let value = U256::from(20_000_000_000_u64);
        let mut ours = Vec::new();
        Quantity::from(value).encode(&mut ours);
        let mut theirs = Vec::new();
        value.encode(&mut theirs);
        assert_eq!(ours, theirs);
        assert_eq!(Quantity::from(value).length(), value.length());
    }

    #[test]
    fn rejects_leading_zero() {
        let buf = hex!("820001");
        assert_eq!(Quantity::decode(&mut &buf[..]), Err(alloy_rlp::Error::LeadingZero));
        let buf = hex!("00");
        assert_eq!(Quantity::decode(&mut &buf[..]), Err(alloy_rlp::Error::LeadingZero));
    }

    #[test]
    fn decodes_values_wider_than_256_bits() {
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&[0u8; 32]);
        let mut buf = Vec::new();
        bytes.as_slice().encode(&mut buf);
        let decoded = Quantity::decode(&mut &buf[..]).unwrap();
        assert_eq!(decoded.bit_len(), 257);
        assert_eq!(decoded.to_u256(), None);
    }

    #[test]
    fn u256_narrowing_boundary() {
        let max = Quantity::from(U256::MAX);
        assert_eq!(max.to_u256(), Some(U256::MAX));
        let above = &max + &Quantity::from(1_u64);
        assert_eq!(above.to_u256(), None);
    }

    #[test]
    fn parse_and_format_hex() {
        assert_eq!("0x0".parse::<Quantity>().unwrap(), Quantity::zero());
        assert_eq!("0x4a817c800".parse::<Quantity>().unwrap(), 20_000_000_000_u64);
        assert_eq!("0x0001".parse::<Quantity>().unwrap(), 1_u64);
        assert_eq!(format!("{:#x}", Quantity::zero()), "0x0");
        assert_eq!(format!("{:#x}", Quantity::from(0x5208_u64)), "0x5208");

        assert_eq!("12".parse::<Quantity>(), Err(ParseQuantityError::MissingPrefix));
        assert_eq!("0x".parse::<Quantity>(), Err(ParseQuantityError::Empty));
        assert_eq!("0x1_0".parse::<Quantity>(), Err(ParseQuantityError::InvalidDigit));
        assert_eq!("0xzz".parse::<Quantity>(), Err(ParseQuantityError::InvalidDigit));
    }

    #[test]
    fn checked_sub_stops_at_zero() {
        let a = Quantity::from(5_u64);
        let b = Quantity::from(7_u64);
        assert_eq!(a.checked_sub(&b), None);
        assert_eq!(b.checked_sub(&a), Some(Quantity::from(2_u64)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let q: Quantity = serde_json::from_str(r#""0x4a817c800""#).unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), r#""0x4a817c800""#);
        assert!(serde_json::from_str::<Quantity>("12").is_err());
    }
}
