//! [EIP-1559] dynamic-fee transactions.
//!
//! [EIP-1559]: https://eips.ethereum.org/EIPS/eip-1559

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::abstraction::{RlpDecodableTx, TxData, dynamic_fee_price},
};
use alloy_eips::eip2930::{AccessList, AccessListItem};
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// A transaction with a priority fee ([EIP-1559](https://eips.ethereum.org/EIPS/eip-1559)).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[doc(alias = "Eip1559Transaction", alias = "TransactionEip1559", alias = "TxEip1559")]
pub struct TxDynamicFee {
    /// EIP-155: Simple replay attack protection
    pub chain_id: Quantity,
    /// A scalar value equal to the number of transactions sent by the sender; formally Tn.
    pub nonce: u64,
    /// A scalar value equal to the maximum
    /// amount of gas that should be used in executing
    /// this transaction. This is paid up-front, before any
    /// computation is done and may not be increased
    /// later; formally Tg.
    pub gas_limit: u64,
    /// Max fee per gas the sender accepts to pay.
    ///
    /// This is also known as `GasFeeCap`
    pub max_fee_per_gas: Quantity,
    /// Max Priority fee that transaction is paying
    ///
    /// This is also known as `GasTipCap`
    pub max_priority_fee_per_gas: Quantity,
    /// The 160-bit address of the message call's recipient or, for a contract creation
    /// transaction, ∅; formally Tt.
    pub to: TxKind,
    /// A scalar value equal to the number of Wei to be transferred to the message call's
    /// recipient; formally Tv.
    pub value: Quantity,
    /// The accessList specifies a list of addresses and storage keys;
    /// these addresses and storage keys are added into the `accessed_addresses`
    /// and `accessed_storage_keys` global sets (introduced in EIP-2929).
    pub access_list: AccessList,
    /// Call data or init code; formally Td.
    pub input: Bytes,
    /// Signature parity, `0` or `1`.
    pub v: Quantity,
    /// Signature `r`.
    pub r: Quantity,
    /// Signature `s`.
    pub s: Quantity,
}

impl TxDynamicFee {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> TxType {
        TxType::DynamicFee
    }
}

impl TxData for TxDynamicFee {
    fn tx_type(&self) -> TxType {
        TxType::DynamicFee
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
        self.max_fee_per_gas.clone()
    }

    fn gas_tip_cap(&self) -> Quantity {
        self.max_priority_fee_per_gas.clone()
    }

    fn gas_fee_cap(&self) -> Quantity {
        self.max_fee_per_gas.clone()
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

    fn effective_gas_price(&self, base_fee: Option<&Quantity>) -> Quantity {
        dynamic_fee_price(&self.max_priority_fee_per_gas, &self.max_fee_per_gas, base_fee)
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
            + self.max_priority_fee_per_gas.length()
            + self.max_fee_per_gas.length()
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
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
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

impl RlpDecodableTx for TxDynamicFee {
    /// Decodes the inner [TxDynamicFee] fields from RLP bytes.
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
            v: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    fn tx() -> TxDynamicFee {
        TxDynamicFee {
            chain_id: Quantity::from(1_u64),
            nonce: 0x42,
            gas_limit: 44386,
            max_fee_per_gas: Quantity::from(0x4a817c800_u64),
            max_priority_fee_per_gas: Quantity::from(0x3b9aca00_u64),
            to: address!("0x6069a6c32cf691f5982febae4faf8a6f3ab2f0f6").into(),
            value: Quantity::zero(),
            access_list: AccessList::default(),
            input: hex!("a22cb4650000000000000000000000005eee75727d804a2b13038928d36f8b188945a57a0000000000000000000000000000000000000000000000000000000000000000").into(),
            v: Quantity::zero(),
            r: Quantity::zero(),
            s: Quantity::zero(),
        }
    }

    #[test]
    fn fee_accessors() {
        let tx = tx();
        assert_eq!(tx.gas_price(), tx.max_fee_per_gas);
        assert_eq!(tx.gas_tip_cap(), tx.max_priority_fee_per_gas);
        assert_eq!(tx.effective_gas_price(None), tx.max_fee_per_gas);
        assert_eq!(
            tx.effective_gas_price(Some(&Quantity::from(1_000_000_000_u64))),
            2_000_000_000_u64
        );
    }

    #[test]
    fn rlp_roundtrip() {
        let tx = tx();
        let mut buf = Vec::new();
        tx.rlp_encode(&mut buf);
        assert_eq!(buf.len(), tx.rlp_encoded_length());
        assert_eq!(TxDynamicFee::rlp_decode(&mut &buf[..]).unwrap(), tx);
    }

    #[test]
    fn rejects_truncated_fields() {
        let tx = tx();
        let mut buf = Vec::new();
        tx.rlp_encode(&mut buf);
        buf.truncate(buf.len() - 1);
        assert!(TxDynamicFee::rlp_decode(&mut &buf[..]).is_err());
    }
}
