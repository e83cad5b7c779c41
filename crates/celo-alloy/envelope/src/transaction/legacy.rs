//! Legacy transactions, optionally replay protected under EIP-155.

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::{
        abstraction::{RlpDecodableTx, TxData},
        signature::chain_id_from_v,
    },
};
use alloy_eips::eip2930::AccessListItem;
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_rlp::{BufMut, Decodable, Encodable};

/// Legacy transaction.
///
/// The canonical bytes are the bare RLP list, without a type prefix. The chain id, when
/// present, is folded into `v` as described by EIP-155.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[doc(alias = "LegacyTransaction", alias = "TransactionLegacy", alias = "LegacyTx")]
pub struct TxLegacy {
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
    /// transaction, ∅, used here to denote the only member of B0 ; formally Tt.
    pub to: TxKind,
    /// A scalar value equal to the number of Wei to
    /// be transferred to the message call's recipient or,
    /// in the case of contract creation, as an endowment
    /// to the newly created account; formally Tv.
    pub value: Quantity,
    /// Input has two uses depending if `to` field is Create or Call.
    /// init: An unlimited size byte array specifying the
    /// EVM-code for the account initialisation procedure CREATE,
    /// data: An unlimited size byte array specifying the
    /// input data of the message call, formally Td.
    pub input: Bytes,
    /// Signature `v`: `27 + parity`, or `35 + 2 * chain_id + parity` under EIP-155.
    pub v: Quantity,
    /// Signature `r`.
    pub r: Quantity,
    /// Signature `s`.
    pub s: Quantity,
}

impl TxLegacy {
    /// Get the transaction type
    #[doc(alias = "transaction_type")]
    pub const fn tx_type() -> TxType {
        TxType::Legacy
    }
}

impl TxData for TxLegacy {
    fn tx_type(&self) -> TxType {
        TxType::Legacy
    }

    fn chain_id(&self) -> Quantity {
        chain_id_from_v(&self.v)
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
        _chain_id: Quantity,
        v: Quantity,
        r: Quantity,
        s: Quantity,
    ) -> Result<(), EnvelopeError> {
        self.v = v;
        self.r = r;
        self.s = s;
        Ok(())
    }

    fn rlp_encoded_fields_length(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.length()
            + self.v.length()
            + self.r.length()
            + self.s.length()
    }

    fn rlp_encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.v.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }
}

impl RlpDecodableTx for TxLegacy {
    /// Decodes the inner [TxLegacy] fields from RLP bytes.
    ///
    /// NOTE: This assumes a RLP header has already been decoded, and _just_
    /// decodes the following RLP fields in the following order:
    ///
    /// - `nonce`
    /// - `gas_price`
    /// - `gas_limit`
    /// - `to`
    /// - `value`
    /// - `data` (`input`)
    /// - `v`
    /// - `r`
    /// - `s`
    fn rlp_decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            nonce: Decodable::decode(buf)?,
            gas_price: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            to: Decodable::decode(buf)?,
            value: Decodable::decode(buf)?,
            input: Decodable::decode(buf)?,
            v: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

impl Encodable for TxLegacy {
    fn encode(&self, out: &mut dyn BufMut) {
        self.rlp_encode(out);
    }

    fn length(&self) -> usize {
        self.rlp_encoded_length()
    }
}

impl Decodable for TxLegacy {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::rlp_decode(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    // EIP-155 example transaction.
    const EIP155_RAW: [u8; 110] = hex!(
        "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
    );

    fn eip155_tx() -> TxLegacy {
        TxLegacy {
            nonce: 9,
            gas_price: Quantity::from(20_000_000_000_u64),
            gas_limit: 21_000,
            to: address!("0x3535353535353535353535353535353535353535").into(),
            value: Quantity::from(1_000_000_000_000_000_000_u64),
            input: Bytes::new(),
            v: Quantity::from(37_u64),
            r: "0x28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276"
                .parse()
                .unwrap(),
            s: "0x67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
                .parse()
                .unwrap(),
        }
    }

    #[test]
    fn encode_eip155_example() {
        let tx = eip155_tx();
        let mut buf = Vec::new();
        tx.encode(&mut buf);
        assert_eq!(buf, EIP155_RAW);
        assert_eq!(tx.length(), EIP155_RAW.len());
    }

    #[test]
    fn decode_eip155_example() {
        let decoded = TxLegacy::decode(&mut &EIP155_RAW[..]).unwrap();
        assert_eq!(decoded, eip155_tx());
        assert_eq!(decoded.chain_id(), 1_u64);
        assert_eq!(TxData::to(&decoded), Some(address!("0x3535353535353535353535353535353535353535")));
    }

    #[test]
    fn fee_accessors_mirror_gas_price() {
        let tx = eip155_tx();
        assert_eq!(tx.gas_tip_cap(), tx.gas_price);
        assert_eq!(tx.gas_fee_cap(), tx.gas_price);
        assert_eq!(tx.effective_gas_price(Some(&Quantity::from(1_u64))), tx.gas_price);
        assert_eq!(tx.blob_fee_cap(), Quantity::zero());
        assert!(tx.access_list().is_empty());
        assert!(!tx.is_system_tx());
    }

    #[test]
    fn rejects_trailing_field() {
        let mut tx = eip155_tx();
        let header = alloy_rlp::Header {
            list: true,
            payload_length: tx.rlp_encoded_fields_length() + 1,
        };
        let mut buf = Vec::new();
        header.encode(&mut buf);
        tx.rlp_encode_fields(&mut buf);
        0_u8.encode(&mut buf);
        assert!(TxLegacy::decode(&mut &buf[..]).is_err());

        tx.set_signature_values(Quantity::zero(), Quantity::zero(), Quantity::zero(), Quantity::zero())
            .unwrap();
        assert_eq!(tx.raw_signature_values(), (Quantity::zero(), Quantity::zero(), Quantity::zero()));
    }
}
