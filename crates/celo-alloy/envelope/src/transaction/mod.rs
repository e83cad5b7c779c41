//! Transaction kinds and the envelope wrapping them.

pub mod abstraction;
pub mod deposit;
pub mod eip1559;
pub mod eip2930;
pub mod eip4844;
pub mod envelope;
#[cfg(feature = "serde")]
mod json;
pub mod legacy;
pub mod offchain;
pub mod signature;
mod tx_type;
mod typed;

pub use abstraction::{DATA_GAS_PER_BLOB, RlpDecodableTx, TxData};
pub use deposit::{TxDeposit, TxDepositWithNonce};
pub use eip1559::TxDynamicFee;
pub use eip2930::TxAccessList;
pub use eip4844::TxBlob;
pub use envelope::Transaction;
#[cfg(feature = "serde")]
pub use json::TxJson;
pub use legacy::TxLegacy;
pub use offchain::TxOffchain;
pub use tx_type::{DEPOSIT_TX_TYPE_ID, OFFCHAIN_TX_TYPE_ID, TxType};
pub use typed::TypedTransaction;
