//! The [EIP-2718] transaction envelope.
//!
//! [EIP-2718]: https://eips.ethereum.org/EIPS/eip-2718

use crate::{
    TxType,
    transaction::{
        TxAccessList, TxBlob, TxDeposit, TxDepositWithNonce, TxDynamicFee, TxLegacy, TxOffchain,
        TypedTransaction,
        abstraction::{RlpDecodableTx, TxData},
    },
};
use alloy_eips::eip2718::{
    Decodable2718, Eip2718Error, Eip2718Result, Encodable2718, IsTyped2718, Typed2718,
};
use alloy_primitives::{B256, keccak256};
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::sync::OnceLock;
use tracing::trace;

/// A transaction of any kind together with its lazily computed hash.
///
/// # Note:
///
/// The variant is immutable once wrapped; [`Transaction`] only derefs to a shared
/// [`TypedTransaction`]. The hash is computed from the canonical bytes at most once and is
/// never taken from the outside.
#[derive(Clone, Debug, derive_more::Deref)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "crate::TxJson", into = "crate::TxJson")
)]
pub struct Transaction {
    #[deref]
    inner: TypedTransaction,
    hash: OnceLock<B256>,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Transaction {}

impl From<TypedTransaction> for Transaction {
    fn from(tx: TypedTransaction) -> Self {
        Self::new(tx)
    }
}

macro_rules! impl_from_variant {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Transaction {
                fn from(tx: $ty) -> Self {
                    Self::new(tx)
                }
            }
        )*
    };
}

impl_from_variant!(
    TxLegacy,
    TxAccessList,
    TxDynamicFee,
    TxBlob,
    TxDeposit,
    TxDepositWithNonce,
    TxOffchain,
);

impl AsRef<TypedTransaction> for Transaction {
    fn as_ref(&self) -> &TypedTransaction {
        &self.inner
    }
}

impl Transaction {
    /// Wraps a transaction. The hash is computed on first use.
    pub fn new(inner: impl Into<TypedTransaction>) -> Self {
        Self { inner: inner.into(), hash: OnceLock::new() }
    }

    /// Returns the wrapped transaction.
    pub const fn inner(&self) -> &TypedTransaction {
        &self.inner
    }

    /// Consumes the envelope and returns the wrapped transaction.
    pub fn into_typed(self) -> TypedTransaction {
        self.inner
    }

    /// Return the [`TxType`] of the inner txn.
    pub fn tx_type(&self) -> TxType {
        TxData::tx_type(&self.inner)
    }

    /// Reference to transaction hash. Used to identify transaction.
    ///
    /// This is the keccak256 of [`Encodable2718::encoded_2718`].
    #[doc(alias = "transaction_hash", alias = "tx_hash")]
    pub fn hash(&self) -> &B256 {
        self.hash.get_or_init(|| {
            let hash = keccak256(self.encoded_2718());
            trace!(target: "envelope", tx_type = %self.tx_type(), %hash, "computed transaction hash");
            hash
        })
    }

    /// Returns true if the transaction is a legacy transaction.
    pub const fn is_legacy(&self) -> bool {
        matches!(self.inner, TypedTransaction::Legacy(_))
    }

    /// Returns true if the transaction is a deposit transaction.
    pub const fn is_deposit(&self) -> bool {
        self.inner.is_deposit()
    }

    /// Returns true if the transaction was injected by the protocol (deposit or offchain).
    pub const fn is_system_transaction(&self) -> bool {
        matches!(
            self.inner,
            TypedTransaction::Deposit(_)
                | TypedTransaction::DepositWithNonce(_)
                | TypedTransaction::Offchain(_)
        )
    }

    /// Returns the [`TxLegacy`] variant if the transaction is a legacy transaction.
    pub const fn as_legacy(&self) -> Option<&TxLegacy> {
        self.inner.legacy()
    }

    /// Returns the [`TxAccessList`] variant if the transaction is an EIP-2930 transaction.
    pub const fn as_access_list(&self) -> Option<&TxAccessList> {
        self.inner.access_list_tx()
    }

    /// Returns the [`TxDynamicFee`] variant if the transaction is an EIP-1559 transaction.
    pub const fn as_dynamic_fee(&self) -> Option<&TxDynamicFee> {
        self.inner.dynamic_fee()
    }

    /// Returns the [`TxBlob`] variant if the transaction is an EIP-4844 transaction.
    pub const fn as_blob(&self) -> Option<&TxBlob> {
        self.inner.blob()
    }

    /// Returns the [`TxDeposit`] variant if the transaction is a deposit, annotated or not.
    pub const fn as_deposit(&self) -> Option<&TxDeposit> {
        self.inner.deposit()
    }

    /// Returns the annotated deposit, if the transaction carries an out-of-band nonce.
    pub const fn as_deposit_with_nonce(&self) -> Option<&TxDepositWithNonce> {
        match &self.inner {
            TypedTransaction::DepositWithNonce(tx) => Some(tx),
            _ => None,
        }
    }

    /// Returns the [`TxOffchain`] variant if the transaction is an offchain transaction.
    pub const fn as_offchain(&self) -> Option<&TxOffchain> {
        self.inner.offchain()
    }
}

impl Typed2718 for Transaction {
    fn ty(&self) -> u8 {
        self.inner.ty()
    }
}

impl IsTyped2718 for Transaction {
    fn is_type(type_id: u8) -> bool {
        <TxType as IsTyped2718>::is_type(type_id)
    }
}

impl Encodable for Transaction {
    fn encode(&self, out: &mut dyn BufMut) {
        self.network_encode(out)
    }

    fn length(&self) -> usize {
        self.network_len()
    }
}

impl Decodable for Transaction {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self::network_decode(buf)?)
    }
}

/// Decoding never yields a [`TxDepositWithNonce`], since the nonce is not part of the canonical
/// bytes, and does not sanity check signatures.
impl Decodable2718 for Transaction {
    fn typed_decode(ty: u8, buf: &mut &[u8]) -> Eip2718Result<Self> {
        let inner: TypedTransaction =
            match TxType::try_from(ty).map_err(|_| Eip2718Error::UnexpectedType(ty))? {
                TxType::AccessList => TxAccessList::rlp_decode(buf)?.into(),
                TxType::DynamicFee => TxDynamicFee::rlp_decode(buf)?.into(),
                TxType::Blob => TxBlob::rlp_decode(buf)?.into(),
                TxType::Deposit => TxDeposit::rlp_decode(buf)?.into(),
                TxType::Offchain => TxOffchain::rlp_decode(buf)?.into(),
                // Legacy transactions are never tagged.
                TxType::Legacy => return Err(Eip2718Error::UnexpectedType(ty)),
            };
        Ok(Self::new(inner))
    }

    fn fallback_decode(buf: &mut &[u8]) -> Eip2718Result<Self> {
        Ok(Self::new(TxLegacy::rlp_decode(buf)?))
    }
}

impl Encodable2718 for Transaction {
    fn type_flag(&self) -> Option<u8> {
        match self.tx_type() {
            TxType::Legacy => None,
            ty => Some(ty.into()),
        }
    }

    fn encode_2718_len(&self) -> usize {
        let len = self.inner.rlp_encoded_length();
        if self.is_legacy() { len } else { len + 1 }
    }

    fn encode_2718(&self, out: &mut dyn BufMut) {
        if let Some(ty) = self.type_flag() {
            out.put_u8(ty);
        }
        self.inner.rlp_encode(out);
    }

    fn trie_hash(&self) -> B256 {
        *self.hash()
    }
}
