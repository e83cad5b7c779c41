//! Deposit transactions and the nonce-annotated deposit wrapper.

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::abstraction::{RlpDecodableTx, TxData},
};
use alloy_eips::eip2930::AccessListItem;
use alloy_primitives::{Address, B256, Bytes, TxKind};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// Deposit transactions, also known as deposits are initiated on L1, and executed on L2.
///
/// They carry no signature. The sender is given explicitly by `from`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[doc(alias = "DepositTransaction", alias = "TransactionDeposit", alias = "DepositTx")]
pub struct TxDeposit {
    /// Hash that uniquely identifies the source of the deposit.
    pub source_hash: B256,
    /// The address of the sender account.
    pub from: Address,
    /// The address of the recipient account, or the null (zero-length) address if the deposited
    /// transaction is a contract creation.
    pub to: TxKind,
    /// The ETH value to mint on L2. `None` when nothing is minted.
    pub mint: Option<Quantity>,
    ///  The ETH value to send to the recipient account.
    pub value: Quantity,
    /// The gas limit for the L2 transaction.
    pub gas_limit: u64,
    /// Field indicating if this transaction is exempt from the L2 gas limit.
    pub is_system_transaction: bool,
    /// Input has two uses depending if transaction is Create or Call (if `to` field is None or
    /// Some).
    pub input: Bytes,
}

impl TxDeposit {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> TxType {
        TxType::Deposit
    }
}

/// RLP length of an optional mint, absent encoding as the empty string.
pub(crate) fn mint_length(mint: &Option<Quantity>) -> usize {
    mint.as_ref().map_or(1, Encodable::length)
}

pub(crate) fn encode_mint(mint: &Option<Quantity>, out: &mut dyn BufMut) {
    match mint {
        Some(mint) => mint.encode(out),
        None => out.put_u8(alloy_rlp::EMPTY_STRING_CODE),
    }
}

/// Decodes an optional mint. Zero and absent share the empty string, so zero comes back as
/// `None`.
pub(crate) fn decode_mint(buf: &mut &[u8]) -> alloy_rlp::Result<Option<Quantity>> {
    let mint = Quantity::decode(buf)?;
    Ok((!mint.is_zero()).then_some(mint))
}

impl TxData for TxDeposit {
    fn tx_type(&self) -> TxType {
        TxType::Deposit
    }

    fn chain_id(&self) -> Quantity {
        Quantity::zero()
    }

    fn access_list(&self) -> &[AccessListItem] {
        &[]
    }

    fn input(&self) -> &Bytes {
        &self.input
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn gas_price(&self) -> Quantity {
        Quantity::zero()
    }

    fn gas_tip_cap(&self) -> Quantity {
        Quantity::zero()
    }

    fn gas_fee_cap(&self) -> Quantity {
        Quantity::zero()
    }

    fn value(&self) -> Quantity {
        self.value.clone()
    }

    fn nonce(&self) -> u64 {
        0
    }

    fn to(&self) -> Option<Address> {
        self.to.to().copied()
    }

    fn is_system_tx(&self) -> bool {
        self.is_system_transaction
    }

    fn effective_gas_price(&self, _base_fee: Option<&Quantity>) -> Quantity {
        Quantity::zero()
    }

    fn raw_signature_values(&self) -> (Quantity, Quantity, Quantity) {
        (Quantity::zero(), Quantity::zero(), Quantity::zero())
    }

    fn set_signature_values(
        &mut self,
        _chain_id: Quantity,
        _v: Quantity,
        _r: Quantity,
        _s: Quantity,
    ) -> Result<(), EnvelopeError> {
        Ok(())
    }

    fn rlp_encoded_fields_length(&self) -> usize {
        self.source_hash.length()
            + self.from.length()
            + self.to.length()
            + mint_length(&self.mint)
            + self.value.length()
            + self.gas_limit.length()
            + self.is_system_transaction.length()
            + self.input.length()
    }

    fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        self.source_hash.encode(out);
        self.from.encode(out);
        self.to.encode(out);
        encode_mint(&self.mint, out);
        self.value.encode(out);
        self.gas_limit.encode(out);
        self.is_system_transaction.encode(out);
        self.input.encode(out);
    }
}

impl RlpDecodableTx for TxDeposit {
    /// Decodes the inner [TxDeposit] fields from RLP bytes.
    ///
    /// NOTE: This assumes a RLP header has already been decoded, and _just_
    /// decodes the following RLP fields in the following order:
    ///
    /// - `source_hash`
    /// - `from`
    /// - `to`
    /// - `mint`
    /// - `value`
    /// - `gas_limit`
    /// - `is_system_transaction`
    /// - `input`
    fn rlp_decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            source_hash: Decodable::decode(buf)?,
            from: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            mint: decode_mint(buf)?,
            value: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            is_system_transaction: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
        })
    }
}

/// A [`TxDeposit`] annotated with an externally assigned nonce.
///
/// The annotation is bookkeeping only: the canonical bytes, and therefore the hash, are those
/// of the wrapped deposit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TxDepositWithNonce {
    /// The wrapped deposit.
    pub inner: TxDeposit,
    /// The out-of-band nonce.
    pub effective_nonce: u64,
}

impl TxDepositWithNonce {
    /// Wraps `inner` with the given nonce.
    pub const fn new(inner: TxDeposit, effective_nonce: u64) -> Self {
        Self { inner, effective_nonce }
    }

    /// Returns the wrapped deposit.
    pub const fn inner(&self) -> &TxDeposit {
        &self.inner
    }

    /// Drops the annotation.
    pub fn into_inner(self) -> TxDeposit {
        self.inner
    }
}

impl From<TxDepositWithNonce> for TxDeposit {
    fn from(tx: TxDepositWithNonce) -> Self {
        tx.inner
    }
}

impl TxData for TxDepositWithNonce {
    fn tx_type(&self) -> TxType {
        TxType::Deposit
    }

    fn chain_id(&self) -> Quantity {
        self.inner.chain_id()
    }

    fn access_list(&self) -> &[AccessListItem] {
        self.inner.access_list()
    }

    fn input(&self) -> &Bytes {
        self.inner.input()
    }

    fn gas_limit(&self) -> u64 {
        self.inner.gas_limit()
    }

    fn gas_price(&self) -> Quantity {
        self.inner.gas_price()
    }

    fn gas_tip_cap(&self) -> Quantity {
        self.inner.gas_tip_cap()
    }

    fn gas_fee_cap(&self) -> Quantity {
        self.inner.gas_fee_cap()
    }

    fn value(&self) -> Quantity {
        self.inner.value()
    }

    fn nonce(&self) -> u64 {
        self.inner.nonce()
    }

    fn effective_nonce(&self) -> Option<u64> {
        Some(self.effective_nonce)
    }

    fn to(&self) -> Option<Address> {
        TxData::to(&self.inner)
    }

    fn is_system_tx(&self) -> bool {
        self.inner.is_system_tx()
    }

    fn effective_gas_price(&self, base_fee: Option<&Quantity>) -> Quantity {
        self.inner.effective_gas_price(base_fee)
    }

    fn raw_signature_values(&self) -> (Quantity, Quantity, Quantity) {
        self.inner.raw_signature_values()
    }

    fn set_signature_values(
        &mut self,
        chain_id: Quantity,
        v: Quantity,
        r: Quantity,
        s: Quantity,
    ) -> Result<(), EnvelopeError> {
        self.inner.set_signature_values(chain_id, v, r, s)
    }

    // Only the deposit fields; the nonce never reaches the canonical bytes.
    fn rlp_encoded_fields_length(&self) -> usize {
        self.inner.rlp_encoded_fields_length()
    }

    fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        self.inner.rlp_encode_fields(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, hex};

    fn deposit() -> TxDeposit {
        TxDeposit {
            source_hash: b256!("0x04e9a69416471ead93b02f0c279ab11ca0b635db5c1726a56faf22623bafde52"),
            from: address!("0xdeaddeaddeaddeaddeaddeaddeaddeaddead0001"),
            to: address!("0x4200000000000000000000000000000000000015").into(),
            mint: None,
            value: Quantity::zero(),
            gas_limit: 1_000_000,
            is_system_transaction: false,
            input: hex!("440a5e20").into(),
        }
    }

    #[test]
    fn nonce_annotation_leaves_bytes_untouched() {
        let bare = deposit();
        let annotated = TxDepositWithNonce::new(bare.clone(), 0x152ea95);

        let mut a = Vec::new();
        bare.rlp_encode(&mut a);
        let mut b = Vec::new();
        annotated.rlp_encode(&mut b);
        assert_eq!(a, b);
        assert_eq!(annotated.rlp_encoded_length(), bare.rlp_encoded_length());

        assert_eq!(annotated.nonce(), 0);
        assert_eq!(annotated.effective_nonce(), Some(0x152ea95));
        assert_eq!(bare.effective_nonce(), None);
    }

    #[test]
    fn zero_mint_decodes_as_absent() {
        let mut tx = deposit();
        tx.mint = Some(Quantity::zero());
        let mut with_zero = Vec::new();
        tx.rlp_encode(&mut with_zero);

        let mut without = Vec::new();
        deposit().rlp_encode(&mut without);
        assert_eq!(with_zero, without);
        assert_eq!(TxDeposit::rlp_decode(&mut &with_zero[..]).unwrap().mint, None);

        tx.mint = Some(Quantity::from(1_000_u64));
        let mut buf = Vec::new();
        tx.rlp_encode(&mut buf);
        assert_eq!(TxDeposit::rlp_decode(&mut &buf[..]).unwrap(), tx);
    }

    #[test]
    fn unsigned_and_feeless() {
        let mut tx = deposit();
        tx.set_signature_values(
            Quantity::from(1_u64),
            Quantity::from(27_u64),
            Quantity::from(1_u64),
            Quantity::from(1_u64),
        )
        .unwrap();
        assert_eq!(tx, deposit());
        assert_eq!(tx.raw_signature_values(), (Quantity::zero(), Quantity::zero(), Quantity::zero()));
        assert_eq!(tx.effective_gas_price(Some(&Quantity::from(7_u64))), Quantity::zero());
        assert_eq!(tx.chain_id(), Quantity::zero());
    }

    #[test]
    fn contract_creation_roundtrip() {
        let mut tx = deposit();
        tx.to = TxKind::Create;
        tx.is_system_transaction = true;
        let mut buf = Vec::new();
        tx.rlp_encode(&mut buf);
        let decoded = TxDeposit::rlp_decode(&mut &buf[..]).unwrap();
        assert_eq!(TxData::to(&decoded), None);
        assert!(decoded.is_system_tx());
    }
}
