//! [EIP-2930] access-list transactions.
//!
//! [EIP-2930]: https://eips.ethereum.org/EIPS/eip-2930

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::abstraction::{RlpDecodableTx, TxData},
};
use alloy_eips::eip2930::{AccessList, AccessListItem};
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// Transaction with an [`AccessList`] ([EIP-2930](https://eips.ethereum.org/EIPS/eip-2930)).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[doc(alias = "Eip2930Transaction", alias = "TransactionEip2930", alias = "TxEip2930")]
pub struct TxAccessList {
    /// Added as EIP-155: Simple replay attack protection
    pub chain_id: Quantity,
    /// A scalar value equal to the number of transactions sent by the sender; formally Tn.
    pub nonce: u64,
    /// A scalar value equal to the number of
    /// Wei to be paid per unit of gas for all computation
    /// costs incurred as a result of the execution of this transaction; formally Tp.
    pub gas_price: Quantity,
    /// A scalar value equal to the maximum
    /// amount of gas that should be used in executing
    /// this transaction. This is paid up-front, before any
    /// computation is done and may not be increased
    /// later; formally Tg.
    pub gas_limit: u64,
    /// The 160-bit address of the message call's recipient or, for a contract creation
    /// transaction, ∅; formally Tt.
    pub to: TxKind,
    /// A scalar value equal to the number of Wei to be transferred to the message call's
    /// recipient; formally Tv.
    pub value: Quantity,
    /// Call data or init code; formally Td.
    pub input: Bytes,
    /// The accessList specifies a list of addresses and storage keys;
    /// these addresses and storage keys are added into the `accessed_addresses`
    /// and `accessed_storage_keys` global sets (introduced in EIP-2929).
    /// A gas cost is charged, though at a discount relative to the cost of
    /// accessing outside the list.
    pub access_list: AccessList,
    /// Signature parity, `0` or `1`.
    pub v: Quantity,
    /// Signature `r`.
    pub r: Quantity,
    /// Signature `s`.
    pub s: Quantity,
}

impl TxAccessList {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> TxType {
        TxType::AccessList
    }
}

impl TxData for TxAccessList {
    fn tx_type(&self) -> TxType {
        TxType::AccessList
    }

    fn chain_id(&self) -> Quantity {
        self.chain_id.clone()
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
        self.gas_price.clone()
    }

    fn gas_tip_cap(&self) -> Quantity {
        self.gas_price.clone()
    }

    fn gas_fee_cap(&self) -> Quantity {
        self.gas_price.clone()
    }

    fn value(&self) -> Quantity {
        self.value.clone()
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn to(&self) -> Option<Address> {
        self.to.to().copied()
    }

    fn effective_gas_price(&self, _base_fee: Option<&Quantity>) -> Quantity {
        self.gas_price.clone()
    }

    fn raw_signature_values(&self) -> (Quantity, Quantity, Quantity) {
        (self.v.clone(), self.r.clone(), self.s.clone())
    }

    fn set_signature_values(
        &mut self,
        chain_id: Quantity,
        v: Quantity,
        r: Quantity,
        s: Quantity,
    ) -> Result<(), EnvelopeError> {
        self.chain_id = chain_id;
        self.v = v;
        self.r = r;
        self.s = s;
        Ok(())
    }

    fn rlp_encoded_fields_length(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
            + self.access_list.length()
            + self.v.length()
            + self.r.length()
            + self.s.length()
    }

    fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.access_list.encode(out);
        self.v.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }
}

impl RlpDecodableTx for TxAccessList {
    /// Decodes the inner [TxAccessList] fields from RLP bytes.
    ///
    /// NOTE: This assumes a RLP header has already been decoded, and _just_
    /// decodes the following RLP fields in the following order:
    ///
    /// - `chain_id`
    /// - `nonce`
    /// - `gas_price`
    /// - `gas_limit`
    /// - `to`
    /// - `value`
    /// - `data` (`input`)
    /// - `access_list`
    /// - `v`
    /// - `r`
    /// - `s`
    fn rlp_decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            chain_id: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            access_list: Decodable::decode(buf)?,
            v: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}
