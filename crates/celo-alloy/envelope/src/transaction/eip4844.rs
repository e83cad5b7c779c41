//! [EIP-4844] blob transactions.
//!
//! [EIP-4844]: https://eips.ethereum.org/EIPS/eip-4844

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::abstraction::{DATA_GAS_PER_BLOB, RlpDecodableTx, TxData, dynamic_fee_price},
};
use alloy_eips::eip2930::{AccessList, AccessListItem};
use alloy_primitives::{Address, B256, Bytes, TxKind, U256};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// A transaction carrying blob versioned hashes ([EIP-4844](https://eips.ethereum.org/EIPS/eip-4844)).
///
/// Unlike the other signed kinds, every numeric field is a fixed-width [`U256`]. Quantities are
/// narrowed with [`narrow`], which refuses to truncate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[doc(alias = "Eip4844Transaction", alias = "TransactionEip4844", alias = "TxEip4844")]
pub struct TxBlob {
    /// EIP-155: Simple replay attack protection
    pub chain_id: U256,
    /// A scalar value equal to the number of transactions sent by the sender; formally Tn.
    pub nonce: u64,
    /// A scalar value equal to the maximum
    /// amount of gas that should be used in executing
    /// this transaction. This is paid up-front, before any
    /// computation is done and may not be increased
    /// later; formally Tg.
    pub gas_limit: u64,
    /// Max fee per gas, also known as `GasFeeCap`.
    pub max_fee_per_gas: U256,
    /// Max priority fee per gas, also known as `GasTipCap`.
    pub max_priority_fee_per_gas: U256,
    /// Recipient of the call, ∅ for creation.
    pub to: TxKind,
    /// A scalar value equal to the number of Wei to be transferred to the message call's
    /// recipient; formally Tv.
    pub value: U256,
    /// Addresses and storage keys pre-warmed by the transaction (EIP-2929).
    pub access_list: AccessList,
    /// Max fee per unit of blob gas, `maxFeePerDataGas` on the JSON wire.
    pub max_fee_per_blob_gas: U256,
    /// Versioned hashes of the blobs carried by the transaction.
    pub blob_versioned_hashes: Vec<B256>,
    /// Call data; formally Td.
    pub input: Bytes,
    /// Signature parity, `0` or `1`.
    pub v: U256,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl TxBlob {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> TxType {
        TxType::Blob
    }
}

/// Narrows a quantity into a [`U256`], failing with [`EnvelopeError::NumericOverflow`] naming
/// `field` when it needs more than 256 bits.
pub fn narrow(value: &Quantity, field: &'static str) -> Result<U256, EnvelopeError> {
    value.to_u256().ok_or(EnvelopeError::NumericOverflow(field))
}

impl TxData for TxBlob {
    fn tx_type(&self) -> TxType {
        TxType::Blob
    }

    fn chain_id(&self) -> Quantity {
        self.chain_id.into()
    }

    fn access_list(&self) -> &[AccessListItem] {
        &self.access_list.0
    }

    fn input(&self) -> &Bytes {
        &self.input
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    fn gas_price(&self) -> Quantity {
        self.max_fee_per_gas.into()
    }

    fn gas_tip_cap(&self) -> Quantity {
        self.max_priority_fee_per_gas.into()
    }

    fn gas_fee_cap(&self) -> Quantity {
        self.max_fee_per_gas.into()
    }

    fn blob_fee_cap(&self) -> Quantity {
        self.max_fee_per_blob_gas.into()
    }

    fn value(&self) -> Quantity {
        self.value.into()
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn to(&self) -> Option<Address> {
        self.to.to().copied()
    }

    fn blob_gas(&self) -> u64 {
        DATA_GAS_PER_BLOB * self.blob_versioned_hashes.len() as u64
    }

    fn blob_hashes(&self) -> &[B256] {
        &self.blob_versioned_hashes
    }

    fn effective_gas_price(&self, base_fee: Option<&Quantity>) -> Quantity {
        dynamic_fee_price(
            &self.max_priority_fee_per_gas.into(),
            &self.max_fee_per_gas.into(),
            base_fee,
        )
    }

    fn raw_signature_values(&self) -> (Quantity, Quantity, Quantity) {
        (self.v.into(), self.r.into(), self.s.into())
    }

    fn set_signature_values(
        &mut self,
        chain_id: Quantity,
        v: Quantity,
        r: Quantity,
        s: Quantity,
    ) -> Result<(), EnvelopeError> {
        let chain_id = narrow(&chain_id, "chainId")?;
        let (v, r, s) = (narrow(&v, "v")?, narrow(&r, "r")?, narrow(&s, "s")?);
        self.chain_id = chain_id;
        self.v = v;
        self.r = r;
        self.s = s;
        Ok(())
    }

    fn rlp_encoded_fields_length(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
            + self.access_list.length()
            + self.max_fee_per_blob_gas.length()
            + self.blob_versioned_hashes.length()
            + self.v.length()
            + self.r.length()
            + self.s.length()
    }

    fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.access_list.encode(out);
        self.max_fee_per_blob_gas.encode(out);
        self.blob_versioned_hashes.encode(out);
        self.v.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }
}

impl RlpDecodableTx for TxBlob {
    /// Decodes the inner [TxBlob] fields from RLP bytes.
    ///
    /// NOTE: This assumes a RLP header has already been decoded, and _just_
    /// decodes the following RLP fields in the following order:
    ///
    /// - `chain_id`
    /// - `nonce`
    /// - `max_priority_fee_per_gas`
    /// - `max_fee_per_gas`
    /// - `gas_limit`
    /// - `to`
    /// - `value`
    /// - `data` (`input`)
    /// - `access_list`
    /// - `max_fee_per_blob_gas`
    /// - `blob_versioned_hashes`
    /// - `v`
    /// - `r`
    /// - `s`
    fn rlp_decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            max_priority_fee_per_gas: Decodable::decode(buf)?,
            max_fee_per_gas: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            max_fee_per_blob_gas: Decodable::decode(buf)?,
            blob_versioned_hashes: Decodable::decode(buf)?,
            v: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}
