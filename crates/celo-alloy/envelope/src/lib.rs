#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::{EnvelopeError, SignatureError};

mod quantity;
pub use quantity::{ParseQuantityError, Quantity};

pub use alloy_eips::eip2718::{Decodable2718, Eip2718Error, Encodable2718, Typed2718};

pub mod transaction;
#[cfg(feature = "serde")]
pub use transaction::TxJson;
pub use transaction::{
    DEPOSIT_TX_TYPE_ID, OFFCHAIN_TX_TYPE_ID, RlpDecodableTx, Transaction, TxAccessList, TxBlob,
    TxData, TxDeposit, TxDepositWithNonce, TxDynamicFee, TxLegacy, TxOffchain, TxType,
    TypedTransaction,
};
