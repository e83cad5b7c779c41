//! Contains the transaction type identifier for Celo.

use crate::EnvelopeError;
use alloy_eips::eip2718::{IsTyped2718, Typed2718};
use derive_more::Display;

/// Identifier for an offchain transaction.
pub const OFFCHAIN_TX_TYPE_ID: u8 = 0x7d;

/// Identifier for a deposit transaction.
pub const DEPOSIT_TX_TYPE_ID: u8 = 0x7e;

/// Celo TransactionType flags as specified in EIPs 2718, 2930, 1559 and 4844, as well as the
/// deposit and offchain system transaction kinds.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, Default, PartialEq, PartialOrd, Ord, Hash, Display)]
pub enum TxType {
    /// Legacy transaction type.
    #[default]
    #[display("legacy")]
    Legacy = 0,
    /// EIP-2930 transaction type.
    #[display("eip2930")]
    AccessList = 1,
    /// EIP-1559 transaction type.
    #[display("eip1559")]
    DynamicFee = 2,
    /// EIP-4844 transaction type.
    #[display("eip4844")]
    Blob = 3,
    /// Offchain system transaction type.
    #[display("offchain")]
    Offchain = OFFCHAIN_TX_TYPE_ID,
    /// Optimism Deposit transaction type.
    #[display("deposit")]
    Deposit = DEPOSIT_TX_TYPE_ID,
}

impl TxType {
    /// List of all variants.
    pub const ALL: [Self; 6] = [
        Self::Legacy,
        Self::AccessList,
        Self::DynamicFee,
        Self::Blob,
        Self::Offchain,
        Self::Deposit,
    ];

    /// Returns `true` if the type is [`TxType::Deposit`].
    pub const fn is_deposit(&self) -> bool {
        matches!(self, Self::Deposit)
    }

    /// Returns `true` for the kinds injected by protocol machinery, which carry no signature.
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::Deposit | Self::Offchain)
    }

    /// Returns `true` for the kinds whose canonical bytes start with the type byte.
    pub const fn is_typed(&self) -> bool {
        !matches!(self, Self::Legacy)
    }
}

impl From<TxType> for u8 {
    fn from(v: TxType) -> Self {
        v as Self
    }
}

impl From<TxType> for u64 {
    fn from(v: TxType) -> Self {
        u8::from(v).into()
    }
}

impl TryFrom<u8> for TxType {
    type Error = EnvelopeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Legacy,
            1 => Self::AccessList,
            2 => Self::DynamicFee,
            3 => Self::Blob,
            OFFCHAIN_TX_TYPE_ID => Self::Offchain,
            DEPOSIT_TX_TYPE_ID => Self::Deposit,
            _ => return Err(EnvelopeError::UnsupportedTransactionType(value.into())),
        })
    }
}

impl TryFrom<u64> for TxType {
    type Error = EnvelopeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let ty: u8 =
            value.try_into().map_err(|_| EnvelopeError::UnsupportedTransactionType(value))?;
        Self::try_from(ty)
    }
}

impl Typed2718 for TxType {
    fn ty(&self) -> u8 {
        (*self).into()
    }
}

impl IsTyped2718 for TxType {
    fn is_type(type_id: u8) -> bool {
        // legacy | eip2930 | eip1559 | eip4844 | offchain | deposit
        matches!(type_id, 0 | 1 | 2 | 3 | OFFCHAIN_TX_TYPE_ID | DEPOSIT_TX_TYPE_ID)
    }
}

impl PartialEq<u8> for TxType {
    fn eq(&self, other: &u8) -> bool {
        (*self as u8) == *other
    }
}

impl PartialEq<TxType> for u8 {
    fn eq(&self, other: &TxType) -> bool {
        *self == *other as Self
    }
}
