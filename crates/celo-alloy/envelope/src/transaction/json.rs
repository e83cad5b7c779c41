//! JSON form of a [`Transaction`].
//!
//! [`TxJson`] carries the union of every kind's wire fields, all optional. It is only a
//! serialization artifact: which fields are read or written is decided per kind by the
//! conversions below.

use crate::{
    EnvelopeError, Quantity, TxType,
    transaction::{
        Transaction, TxAccessList, TxBlob, TxDeposit, TxDepositWithNonce, TxDynamicFee, TxLegacy,
        TxOffchain, TypedTransaction,
        abstraction::TxData,
        eip4844::narrow,
        signature::{is_unsigned, sanity_check_signature},
    },
};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, B256, Bytes, TxKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The JSON transport record of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxJson {
    /// Kind discriminant. Absent means legacy.
    #[serde(rename = "type", default, with = "alloy_serde::quantity")]
    pub tx_type: u64,
    /// Chain id of the typed signed kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Quantity>,
    /// Sender nonce, or the out-of-band nonce of an annotated deposit.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub nonce: Option<u64>,
    /// Recipient. Absent for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub gas: Option<u64>,
    /// Legacy gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Quantity>,
    /// Tip cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<Quantity>,
    /// Fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<Quantity>,
    /// Blob fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_data_gas: Option<Quantity>,
    /// Transferred value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Quantity>,
    /// Call data of every kind but offchain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
    /// Call data of offchain transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Access list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
    /// Blob versioned hashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_versioned_hashes: Option<Vec<B256>>,
    /// Signature `v`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<Quantity>,
    /// Signature `r`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Quantity>,
    /// Signature `s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<Quantity>,
    /// Source of a system transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<B256>,
    /// Sender of a system transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Minted value of a system transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<Quantity>,
    /// Gas limit exemption of a system transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_system_tx: Option<bool>,
    /// Transaction hash. Written on encode, ignored on decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<B256>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, EnvelopeError> {
    value.ok_or(EnvelopeError::MissingRequiredField(field))
}

fn forbidden<T>(value: &Option<T>, field: &'static str) -> Result<(), EnvelopeError> {
    match value {
        Some(_) => Err(EnvelopeError::UnexpectedField(field)),
        None => Ok(()),
    }
}

/// A present zero counts as absent.
fn forbidden_unless_zero(value: &Option<Quantity>, field: &'static str) -> Result<(), EnvelopeError> {
    match value {
        Some(value) if !value.is_zero() => Err(EnvelopeError::UnexpectedField(field)),
        _ => Ok(()),
    }
}

fn check_signature(
    v: &Quantity,
    r: &Quantity,
    s: &Quantity,
    maybe_protected: bool,
) -> Result<(), EnvelopeError> {
    if !is_unsigned(v, r, s) {
        sanity_check_signature(v, r, s, maybe_protected)?;
    }
    Ok(())
}

fn tx_kind(to: Option<Address>) -> TxKind {
    to.map_or(TxKind::Create, TxKind::Call)
}

impl TxJson {
    /// Validates the record against the rules of its kind and builds the transaction.
    pub fn into_typed(self) -> Result<TypedTransaction, EnvelopeError> {
        match TxType::try_from(self.tx_type)? {
            TxType::Legacy => self.into_legacy().map(Into::into),
            TxType::AccessList => self.into_access_list().map(Into::into),
            TxType::DynamicFee => self.into_dynamic_fee().map(Into::into),
            TxType::Blob => self.into_blob().map(Into::into),
            TxType::Deposit => self.into_deposit(),
            TxType::Offchain => self.into_offchain().map(Into::into),
        }
    }

    fn into_legacy(self) -> Result<TxLegacy, EnvelopeError> {
        let tx = TxLegacy {
            nonce: required(self.nonce, "nonce")?,
            to: tx_kind(self.to),
            gas_limit: required(self.gas, "gas")?,
            gas_price: required(self.gas_price, "gasPrice")?,
            value: required(self.value, "value")?,
            input: required(self.input, "input")?,
            v: required(self.v, "v")?,
            r: required(self.r, "r")?,
            s: required(self.s, "s")?,
        };
        check_signature(&tx.v, &tx.r, &tx.s, true)?;
        Ok(tx)
    }

    fn into_access_list(self) -> Result<TxAccessList, EnvelopeError> {
        let tx = TxAccessList {
            chain_id: required(self.chain_id, "chainId")?,
            nonce: required(self.nonce, "nonce")?,
            to: tx_kind(self.to),
            gas_limit: required(self.gas, "gas")?,
            gas_price: required(self.gas_price, "gasPrice")?,
            value: required(self.value, "value")?,
            input: required(self.input, "input")?,
            access_list: self.access_list.unwrap_or_default(),
            v: required(self.v, "v")?,
            r: required(self.r, "r")?,
            s: required(self.s, "s")?,
        };
        check_signature(&tx.v, &tx.r, &tx.s, false)?;
        Ok(tx)
    }

    fn into_dynamic_fee(self) -> Result<TxDynamicFee, EnvelopeError> {
        let tx = TxDynamicFee {
            chain_id: required(self.chain_id, "chainId")?,
            nonce: required(self.nonce, "nonce")?,
            to: tx_kind(self.to),
            gas_limit: required(self.gas, "gas")?,
            max_priority_fee_per_gas: required(
                self.max_priority_fee_per_gas,
                "maxPriorityFeePerGas",
            )?,
            max_fee_per_gas: required(self.max_fee_per_gas, "maxFeePerGas")?,
            value: required(self.value, "value")?,
            input: required(self.input, "input")?,
            access_list: self.access_list.unwrap_or_default(),
            v: required(self.v, "v")?,
            r: required(self.r, "r")?,
            s: required(self.s, "s")?,
        };
        check_signature(&tx.v, &tx.r, &tx.s, false)?;
        Ok(tx)
    }

    fn into_blob(self) -> Result<TxBlob, EnvelopeError> {
        let chain_id = narrow(&required(self.chain_id, "chainId")?, "chainId")?;
        let nonce = required(self.nonce, "nonce")?;
        let gas_limit = required(self.gas, "gas")?;
        let max_priority_fee_per_gas =
            narrow(&required(self.max_priority_fee_per_gas, "maxPriorityFeePerGas")?, "maxPriorityFeePerGas")?;
        let max_fee_per_gas =
            narrow(&required(self.max_fee_per_gas, "maxFeePerGas")?, "maxFeePerGas")?;
        let max_fee_per_blob_gas =
            narrow(&required(self.max_fee_per_data_gas, "maxFeePerDataGas")?, "maxFeePerDataGas")?;
        let value = narrow(&required(self.value, "value")?, "value")?;
        let input = required(self.input, "input")?;
        let blob_versioned_hashes = required(self.blob_versioned_hashes, "blobVersionedHashes")?;
        let v = required(self.v, "v")?;
        let r = required(self.r, "r")?;
        let s = required(self.s, "s")?;
        let (v_wide, r_wide, s_wide) = (narrow(&v, "v")?, narrow(&r, "r")?, narrow(&s, "s")?);
        check_signature(&v, &r, &s, false)?;

        Ok(TxBlob {
            chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            to: tx_kind(self.to),
            value,
            access_list: self.access_list.unwrap_or_default(),
            max_fee_per_blob_gas,
            blob_versioned_hashes,
            input,
            v: v_wide,
            r: r_wide,
            s: s_wide,
        })
    }

    fn into_deposit(self) -> Result<TypedTransaction, EnvelopeError> {
        forbidden(&self.access_list, "accessList")?;
        forbidden(&self.max_fee_per_gas, "maxFeePerGas")?;
        forbidden(&self.max_priority_fee_per_gas, "maxPriorityFeePerGas")?;
        forbidden_unless_zero(&self.gas_price, "gasPrice")?;
        forbidden_unless_zero(&self.v, "v")?;
        forbidden_unless_zero(&self.r, "r")?;
        forbidden_unless_zero(&self.s, "s")?;

        let tx = TxDeposit {
            to: tx_kind(self.to),
            gas_limit: required(self.gas, "gas")?,
            value: required(self.value, "value")?,
            mint: self.mint,
            input: required(self.input, "input")?,
            from: required(self.from, "from")?,
            source_hash: required(self.source_hash, "sourceHash")?,
            is_system_transaction: self.is_system_tx.unwrap_or_default(),
        };
        debug!(
            target: "envelope",
            source_hash = %tx.source_hash,
            nonce = ?self.nonce,
            "parsed deposit transaction"
        );
        Ok(match self.nonce {
            Some(nonce) => TxDepositWithNonce::new(tx, nonce).into(),
            None => tx.into(),
        })
    }

    fn into_offchain(self) -> Result<TxOffchain, EnvelopeError> {
        forbidden(&self.access_list, "accessList")?;
        forbidden(&self.v, "v")?;
        forbidden(&self.r, "r")?;
        forbidden(&self.s, "s")?;
        forbidden(&self.max_fee_per_gas, "maxFeePerGas")?;
        forbidden(&self.max_priority_fee_per_gas, "maxPriorityFeePerGas")?;
        forbidden(&self.gas_price, "gasPrice")?;
        if self.nonce.is_some_and(|nonce| nonce != 0) {
            return Err(EnvelopeError::UnexpectedField("nonce"));
        }

        let tx = TxOffchain {
            to: tx_kind(self.to),
            gas_limit: required(self.gas, "gas")?,
            value: required(self.value, "value")?,
            mint: self.mint,
            input: required(self.data, "data")?,
            from: required(self.from, "from")?,
            source_hash: required(self.source_hash, "sourceHash")?,
            is_system_transaction: self.is_system_tx.unwrap_or_default(),
        };
        debug!(target: "envelope", source_hash = %tx.source_hash, "parsed offchain transaction");
        Ok(tx)
    }

    fn with_signature(mut self, (v, r, s): (Quantity, Quantity, Quantity)) -> Self {
        self.v = Some(v);
        self.r = Some(r);
        self.s = Some(s);
        self
    }

    fn with_deposit(mut self, tx: &TxDeposit) -> Self {
        self.gas = Some(tx.gas_limit);
        self.value = Some(tx.value.clone());
        self.input = Some(tx.input.clone());
        self.to = TxData::to(tx);
        self.source_hash = Some(tx.source_hash);
        self.from = Some(tx.from);
        self.mint = tx.mint.clone();
        self.is_system_tx = Some(tx.is_system_transaction);
        self
    }
}

impl From<&Transaction> for TxJson {
    fn from(tx: &Transaction) -> Self {
        let base = Self {
            tx_type: u8::from(tx.tx_type()).into(),
            hash: Some(*tx.hash()),
            ..Default::default()
        };

        match tx.inner() {
            TypedTransaction::Legacy(itx) => Self {
                nonce: Some(itx.nonce),
                to: TxData::to(itx),
                gas: Some(itx.gas_limit),
                gas_price: Some(itx.gas_price.clone()),
                value: Some(itx.value.clone()),
                input: Some(itx.input.clone()),
                ..base
            }
            .with_signature(itx.raw_signature_values()),
            TypedTransaction::AccessList(itx) => Self {
                chain_id: Some(itx.chain_id.clone()),
                nonce: Some(itx.nonce),
                to: TxData::to(itx),
                gas: Some(itx.gas_limit),
                gas_price: Some(itx.gas_price.clone()),
                value: Some(itx.value.clone()),
                input: Some(itx.input.clone()),
                access_list: Some(itx.access_list.clone()),
                ..base
            }
            .with_signature(itx.raw_signature_values()),
            TypedTransaction::DynamicFee(itx) => Self {
                chain_id: Some(itx.chain_id.clone()),
                nonce: Some(itx.nonce),
                to: TxData::to(itx),
                gas: Some(itx.gas_limit),
                max_fee_per_gas: Some(itx.max_fee_per_gas.clone()),
                max_priority_fee_per_gas: Some(itx.max_priority_fee_per_gas.clone()),
                value: Some(itx.value.clone()),
                input: Some(itx.input.clone()),
                access_list: Some(itx.access_list.clone()),
                ..base
            }
            .with_signature(itx.raw_signature_values()),
            TypedTransaction::Blob(itx) => Self {
                chain_id: Some(itx.chain_id.into()),
                nonce: Some(itx.nonce),
                to: TxData::to(itx),
                gas: Some(itx.gas_limit),
                max_fee_per_gas: Some(itx.max_fee_per_gas.into()),
                max_priority_fee_per_gas: Some(itx.max_priority_fee_per_gas.into()),
                max_fee_per_data_gas: Some(itx.max_fee_per_blob_gas.into()),
                value: Some(itx.value.into()),
                input: Some(itx.input.clone()),
                access_list: Some(itx.access_list.clone()),
                blob_versioned_hashes: Some(itx.blob_versioned_hashes.clone()),
                ..base
            }
            .with_signature(itx.raw_signature_values()),
            TypedTransaction::Deposit(itx) => base.with_deposit(itx),
            TypedTransaction::DepositWithNonce(itx) => {
                Self { nonce: Some(itx.effective_nonce), ..base.with_deposit(itx.inner()) }
            }
            TypedTransaction::Offchain(itx) => Self {
                gas: Some(itx.gas_limit),
                value: Some(itx.value.clone()),
                data: Some(itx.input.clone()),
                to: TxData::to(itx),
                source_hash: Some(itx.source_hash),
                from: Some(itx.from),
                mint: itx.mint.clone(),
                is_system_tx: Some(itx.is_system_transaction),
                ..base
            },
        }
    }
}

impl From<Transaction> for TxJson {
    fn from(tx: Transaction) -> Self {
        Self::from(&tx)
    }
}

impl TryFrom<TxJson> for Transaction {
    type Error = EnvelopeError;

    /// Builds a transaction from its JSON record. The record's `hash` is not trusted; the hash
    /// is recomputed from the canonical bytes on demand.
    fn try_from(json: TxJson) -> Result<Self, Self::Error> {
        let tx_type = json.tx_type;
        json.into_typed().map(Self::new).inspect_err(|err| {
            debug!(target: "envelope", tx_type, %err, "rejected transaction json");
        })
    }
}

impl Transaction {
    /// Decodes a transaction from its JSON form.
    ///
    /// Unlike going through [`serde_json::from_str`], the codec error is returned as is.
    pub fn from_json(s: &str) -> Result<Self, EnvelopeError> {
        let json: TxJson = serde_json::from_str(s)?;
        Self::try_from(json)
    }

    /// Encodes the transaction into its JSON form, including the hash.
    pub fn to_json(&self) -> Result<String, EnvelopeError> {
        Ok(serde_json::to_string(&TxJson::from(self))?)
    }
}
