//! The sum type over every transaction kind.

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::{
        TxAccessList, TxBlob, TxDeposit, TxDepositWithNonce, TxDynamicFee, TxLegacy, TxOffchain,
        abstraction::TxData,
    },
};
use alloy_eips::{eip2718::Typed2718, eip2930::AccessListItem};
use alloy_primitives::{Address, B256, Bytes};
use alloy_rlp::BufMut;

/// One transaction of any supported kind.
///
/// Every accessor is an exhaustive match, so a new kind cannot be added without handling it
/// here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypedTransaction {
    /// Legacy transaction
    Legacy(TxLegacy),
    /// EIP-2930 transaction
    AccessList(TxAccessList),
    /// EIP-1559 transaction
    DynamicFee(TxDynamicFee),
    /// EIP-4844 transaction
    Blob(TxBlob),
    /// Deposit transaction
    Deposit(TxDeposit),
    /// Deposit transaction annotated with an out-of-band nonce
    DepositWithNonce(TxDepositWithNonce),
    /// Offchain system transaction
    Offchain(TxOffchain),
}

macro_rules! delegate {
    ($self:expr, $tx:ident => $body:expr) => {
        match $self {
            Self::Legacy($tx) => $body,
            Self::AccessList($tx) => $body,
            Self::DynamicFee($tx) => $body,
            Self::Blob($tx) => $body,
            Self::Deposit($tx) => $body,
            Self::DepositWithNonce($tx) => $body,
            Self::Offchain($tx) => $body,
        }
    };
}

// =============================================================================
// TypedTransaction additional methods
// =============================================================================

impl TypedTransaction {
    /// Return the inner legacy transaction if it exists.
    pub const fn legacy(&self) -> Option<&TxLegacy> {
        match self {
            Self::Legacy(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner EIP-2930 transaction if it exists.
    pub const fn access_list_tx(&self) -> Option<&TxAccessList> {
        match self {
            Self::AccessList(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner EIP-1559 transaction if it exists.
    pub const fn dynamic_fee(&self) -> Option<&TxDynamicFee> {
        match self {
            Self::DynamicFee(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner EIP-4844 transaction if it exists.
    pub const fn blob(&self) -> Option<&TxBlob> {
        match self {
            Self::Blob(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner deposit transaction if it exists, annotated or not.
    pub const fn deposit(&self) -> Option<&TxDeposit> {
        match self {
            Self::Deposit(tx) => Some(tx),
            Self::DepositWithNonce(tx) => Some(&tx.inner),
            _ => None,
        }
    }

    /// Return the inner offchain transaction if it exists.
    pub const fn offchain(&self) -> Option<&TxOffchain> {
        match self {
            Self::Offchain(tx) => Some(tx),
            _ => None,
        }
    }

    /// Returns `true` if transaction is deposit transaction.
    pub const fn is_deposit(&self) -> bool {
        matches!(self, Self::Deposit(_) | Self::DepositWithNonce(_))
    }
}

impl Typed2718 for TypedTransaction {
    fn ty(&self) -> u8 {
        TxData::tx_type(self).into()
    }
}

impl TxData for TypedTransaction {
    fn tx_type(&self) -> TxType {
        delegate!(self, tx => TxData::tx_type(tx))
    }

    fn chain_id(&self) -> Quantity {
        delegate!(self, tx => tx.chain_id())
    }

    fn access_list(&self) -> &[AccessListItem] {
        delegate!(self, tx => tx.access_list())
    }

    fn input(&self) -> &Bytes {
        delegate!(self, tx => tx.input())
    }

    fn gas_limit(&self) -> u64 {
        delegate!(self, tx => tx.gas_limit())
    }

    fn gas_price(&self) -> Quantity {
        delegate!(self, tx => tx.gas_price())
    }

    fn gas_tip_cap(&self) -> Quantity {
        delegate!(self, tx => tx.gas_tip_cap())
    }

    fn gas_fee_cap(&self) -> Quantity {
        delegate!(self, tx => tx.gas_fee_cap())
    }

    fn blob_fee_cap(&self) -> Quantity {
        delegate!(self, tx => tx.blob_fee_cap())
    }

    fn value(&self) -> Quantity {
        delegate!(self, tx => tx.value())
    }

    fn nonce(&self) -> u64 {
        delegate!(self, tx => tx.nonce())
    }

    fn effective_nonce(&self) -> Option<u64> {
        delegate!(self, tx => tx.effective_nonce())
    }

    fn to(&self) -> Option<Address> {
        delegate!(self, tx => TxData::to(tx))
    }

    fn blob_gas(&self) -> u64 {
        delegate!(self, tx => tx.blob_gas())
    }

    fn blob_hashes(&self) -> &[B256] {
        delegate!(self, tx => tx.blob_hashes())
    }

    fn is_system_tx(&self) -> bool {
        delegate!(self, tx => tx.is_system_tx())
    }

    fn effective_gas_price(&self, base_fee: Option<&Quantity>) -> Quantity {
        delegate!(self, tx => tx.effective_gas_price(base_fee))
    }

    fn raw_signature_values(&self) -> (Quantity, Quantity, Quantity) {
        delegate!(self, tx => tx.raw_signature_values())
    }

    fn set_signature_values(
        &mut self,
        chain_id: Quantity,
        v: Quantity,
        r: Quantity,
        s: Quantity,
    ) -> Result<(), EnvelopeError> {
        delegate!(self, tx => tx.set_signature_values(chain_id, v, r, s))
    }

    fn rlp_encoded_fields_length(&self) -> usize {
        delegate!(self, tx => tx.rlp_encoded_fields_length())
    }

    fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        delegate!(self, tx => tx.rlp_encode_fields(out))
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<TxLegacy> for TypedTransaction {
    fn from(tx: TxLegacy) -> Self {
        Self::Legacy(tx)
    }
}

impl From<TxAccessList> for TypedTransaction {
    fn from(tx: TxAccessList) -> Self {
        Self::AccessList(tx)
    }
}

impl From<TxDynamicFee> for TypedTransaction {
    fn from(tx: TxDynamicFee) -> Self {
        Self::DynamicFee(tx)
    }
}

impl From<TxBlob> for TypedTransaction {
    fn from(tx: TxBlob) -> Self {
        Self::Blob(tx)
    }
}

impl From<TxDeposit> for TypedTransaction {
    fn from(tx: TxDeposit) -> Self {
        Self::Deposit(tx)
    }
}

impl From<TxDepositWithNonce> for TypedTransaction {
    fn from(tx: TxDepositWithNonce) -> Self {
        Self::DepositWithNonce(tx)
    }
}

impl From<TxOffchain> for TypedTransaction {
    fn from(tx: TxOffchain) -> Self {
        Self::Offchain(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_type_follows_variant() {
        let cases: [(TypedTransaction, TxType); 7] = [
            (TxLegacy::default().into(), TxType::Legacy),
            (TxAccessList::default().into(), TxType::AccessList),
            (TxDynamicFee::default().into(), TxType::DynamicFee),
            (TxBlob::default().into(), TxType::Blob),
            (TxDeposit::default().into(), TxType::Deposit),
            (TxDepositWithNonce::default().into(), TxType::Deposit),
            (TxOffchain::default().into(), TxType::Offchain),
        ];
        for (tx, ty) in cases {
            assert_eq!(tx.tx_type(), ty);
            assert_eq!(tx.ty(), u8::from(ty));
            assert_eq!(tx.is_deposit(), ty.is_deposit());
        }
    }

    #[test]
    fn annotated_deposit_exposes_inner() {
        let tx: TypedTransaction = TxDepositWithNonce::new(TxDeposit::default(), 4).into();
        assert!(tx.deposit().is_some());
        assert_eq!(tx.effective_nonce(), Some(4));
        assert_eq!(tx.nonce(), 0);
        assert!(tx.legacy().is_none());
    }
}
