//! The operation set every transaction kind implements.

use crate::{EnvelopeError, Quantity, TxType};
use alloy_eips::eip2930::AccessListItem;
use alloy_primitives::{Address, B256, Bytes};
use alloy_rlp::{BufMut, Header};
use auto_impl::auto_impl;

/// Blob gas consumed by every versioned hash of a blob transaction.
pub const DATA_GAS_PER_BLOB: u64 = 1 << 17;

/// Uniform access to the fields of a transaction kind.
///
/// Attributes that are not meaningful for a kind return a defined zero value rather than an
/// error, so the envelope and its callers can treat every kind alike.
#[auto_impl(&mut, Box)]
pub trait TxData {
    /// The kind discriminant.
    fn tx_type(&self) -> TxType;

    /// Chain identifier, zero for chain-agnostic kinds.
    fn chain_id(&self) -> Quantity;

    /// Access list entries, empty if the kind has none.
    fn access_list(&self) -> &[AccessListItem];

    /// The call data or init code.
    fn input(&self) -> &Bytes;

    /// Gas limit.
    fn gas_limit(&self) -> u64;

    /// Price per unit of gas.
    fn gas_price(&self) -> Quantity;

    /// Max priority fee per gas.
    fn gas_tip_cap(&self) -> Quantity;

    /// Max fee per gas.
    fn gas_fee_cap(&self) -> Quantity;

    /// Max fee per blob gas.
    fn blob_fee_cap(&self) -> Quantity {
        Quantity::zero()
    }

    /// Transferred value.
    fn value(&self) -> Quantity;

    /// Sender sequence number, zero if the kind has none.
    fn nonce(&self) -> u64;

    /// Externally assigned sequence number carried beside the canonical fields.
    fn effective_nonce(&self) -> Option<u64> {
        None
    }

    /// Recipient, `None` for contract creation.
    fn to(&self) -> Option<Address>;

    /// Blob gas used by the attached blobs.
    fn blob_gas(&self) -> u64 {
        0
    }

    /// Versioned hashes of the attached blobs.
    fn blob_hashes(&self) -> &[B256] {
        &[]
    }

    /// Whether the transaction was injected by the protocol rather than signed by a user.
    fn is_system_tx(&self) -> bool {
        false
    }

    /// The price per gas paid under the given base fee.
    fn effective_gas_price(&self, base_fee: Option<&Quantity>) -> Quantity;

    /// The raw `(v, r, s)` signature values.
    fn raw_signature_values(&self) -> (Quantity, Quantity, Quantity);

    /// Replaces the signature values. Kinds without a signature ignore the call.
    fn set_signature_values(
        &mut self,
        chain_id: Quantity,
        v: Quantity,
        r: Quantity,
        s: Quantity,
    ) -> Result<(), EnvelopeError>;

    /// Outputs the length of the transaction's fields, without a RLP header.
    fn rlp_encoded_fields_length(&self) -> usize;

    /// Encodes only the transaction's fields into the desired buffer, without a RLP header.
    fn rlp_encode_fields(&self, out: &mut dyn BufMut);

    /// The RLP list header of the fields.
    fn rlp_header(&self) -> Header {
        Header { list: true, payload_length: self.rlp_encoded_fields_length() }
    }

    /// Length of the RLP list, header included.
    fn rlp_encoded_length(&self) -> usize {
        self.rlp_header().length_with_payload()
    }

    /// Encodes the fields as a RLP list.
    fn rlp_encode(&self, out: &mut dyn BufMut) {
        self.rlp_header().encode(out);
        self.rlp_encode_fields(out);
    }
}

/// Decoding counterpart of [`TxData`]'s RLP methods.
pub trait RlpDecodableTx: Sized {
    /// Decodes the fields, assuming the RLP list header has already been consumed.
    fn rlp_decode_fields(buf: &mut &[u8]) -> alloy_rlp::Result<Self>;

    /// Decodes a RLP list of the fields.
    fn rlp_decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let (mut body, rest) = buf.split_at(header.payload_length);
        let tx = Self::rlp_decode_fields(&mut body)?;
        if !body.is_empty() {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - body.len(),
            });
        }
        *buf = rest;
        Ok(tx)
    }
}

/// Effective gas price of a tip/fee-cap transaction: the fee cap, lowered to `tip + base_fee`
/// when that is smaller.
pub(crate) fn dynamic_fee_price(
    tip_cap: &Quantity,
    fee_cap: &Quantity,
    base_fee: Option<&Quantity>,
) -> Quantity {
    match base_fee {
        None => fee_cap.clone(),
        Some(base_fee) => {
            let capped = tip_cap + base_fee;
            if capped < *fee_cap { capped } else { fee_cap.clone() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_fee_price_caps_at_fee_cap() {
        let tip = Quantity::from(2_u64);
        let cap = Quantity::from(10_u64);
        assert_eq!(dynamic_fee_price(&tip, &cap, None), cap);
        assert_eq!(dynamic_fee_price(&tip, &cap, Some(&Quantity::from(5_u64))), 7_u64);
        assert_eq!(dynamic_fee_price(&tip, &cap, Some(&Quantity::from(9_u64))), 10_u64);
        // base fee above the cap still pays the cap
        assert_eq!(dynamic_fee_price(&tip, &cap, Some(&Quantity::from(12_u64))), 10_u64);
    }
}
