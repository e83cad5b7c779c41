//! Offchain system transactions.

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::{
        abstraction::{RlpDecodableTx, TxData},
        deposit::{decode_mint, encode_mint, mint_length},
    },
};
use alloy_eips::eip2930::AccessListItem;
use alloy_primitives::{Address, B256, Bytes, TxKind};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// A system transaction injected off-chain by protocol machinery.
///
/// Shares the deposit field layout under its own type byte. Its payload travels as `data` on
/// the JSON wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TxOffchain {
    /// Uniquely identifies the source of the transaction.
    pub source_hash: B256,
    /// The address of the sender account.
    pub from: Address,
    /// Recipient, or [`TxKind::Create`] for contract creation.
    pub to: TxKind,
    /// Value to mint, `None` when nothing is minted.
    pub mint: Option<Quantity>,
    /// Value sent to the recipient.
    pub value: Quantity,
    /// Gas limit.
    pub gas_limit: u64,
    /// Field indicating if this transaction is exempt from the L2 gas limit.
    pub is_system_transaction: bool,
    /// Call data.
    pub input: Bytes,
}

impl TxOffchain {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> TxType {
        TxType::Offchain
    }
}

impl TxData for TxOffchain {
    fn tx_type(&self) -> TxType {
        TxType::Offchain
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

impl RlpDecodableTx for TxOffchain {
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

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn rlp_roundtrip() {
        let tx = TxOffchain {
            source_hash: b256!("0x1111111111111111111111111111111111111111111111111111111111111111"),
            from: address!("0x000000000000000000000000000000000000ce10"),
            to: TxKind::Create,
            mint: Some(Quantity::from(5_u64)),
            value: Quantity::from(9_u64),
            gas_limit: 90_000,
            is_system_transaction: true,
            input: Bytes::from_static(b"offchain"),
        };
        let mut buf = Vec::new();
        tx.rlp_encode(&mut buf);
        assert_eq!(buf.len(), tx.rlp_encoded_length());
        let decoded = TxOffchain::rlp_decode(&mut &buf[..]).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.value(), 9_u64);
        assert!(decoded.is_system_tx());
        assert_eq!(decoded.gas_price(), Quantity::zero());
    }
}
