//! Errors raised while decoding or re-encoding transaction envelopes.

use alloy_eips::eip2718::Eip2718Error;

/// A signature triple failed the structural sanity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// `r` is zero or not below the secp256k1 curve order.
    #[error("r out of range")]
    InvalidR,
    /// `s` is zero or not below the secp256k1 curve order.
    #[error("s out of range")]
    InvalidS,
    /// `v` does not decode to a recovery parity.
    #[error("invalid recovery id")]
    InvalidV,
    /// An EIP-155 protected `v` was found on a transaction kind that encodes a bare parity.
    #[error("unexpected replay protection")]
    UnexpectedProtection,
}

/// Error returned by the envelope codec.
///
/// Every decode-time violation aborts construction of the transaction; there is no partial
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// A field the transaction kind requires is absent from the record.
    #[error("missing required field '{0}' in transaction")]
    MissingRequiredField(&'static str),
    /// A field the transaction kind forbids is present, or carries a non-default value.
    #[error("unexpected field '{0}' in transaction")]
    UnexpectedField(&'static str),
    /// The discriminant does not name a supported transaction kind.
    #[error("transaction type {0:#x} not supported")]
    UnsupportedTransactionType(u64),
    /// The signature triple is malformed.
    #[error("invalid transaction signature: {0}")]
    InvalidSignature(#[from] SignatureError),
    /// A quantity does not fit into the fixed-width field it targets.
    #[error("value of field '{0}' overflows 256 bits")]
    NumericOverflow(&'static str),
    /// The canonical bytes are malformed.
    #[error("rlp: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    /// The JSON text is malformed.
    #[error("json: {0}")]
    Json(String),
}

impl From<Eip2718Error> for EnvelopeError {
    fn from(err: Eip2718Error) -> Self {
        match err {
            Eip2718Error::UnexpectedType(ty) => Self::UnsupportedTransactionType(ty.into()),
            Eip2718Error::RlpError(err) => Self::Rlp(err),
            err => Self::Rlp(err.into()),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
