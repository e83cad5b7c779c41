//! End to end tests of the envelope codec through the public API.

use alloy_primitives::{Address, B256, U256, address, b256};
use celo_alloy_envelope::{
    Decodable2718, Encodable2718, EnvelopeError, Quantity, Transaction, TxData, TxDeposit,
    TxDepositWithNonce, TxType,
};
use rstest::rstest;
use serde_json::{Value, json};

fn legacy() -> Value {
    json!({
        "type": "0x0",
        "nonce": "0x9",
        "to": "0x3535353535353535353535353535353535353535",
        "gas": "0x5208",
        "gasPrice": "0x4a817c800",
        "value": "0xde0b6b3a7640000",
        "input": "0x",
        "v": "0x25",
        "r": "0x28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276",
        "s": "0x67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83",
    })
}

fn access_list() -> Value {
    json!({
        "type": "0x1",
        "chainId": "0xa4ec",
        "nonce": "0x3",
        "to": "0x471ece3750da237f93b8e339c536989b8978a438",
        "gas": "0xc350",
        "gasPrice": "0x5d21dba00",
        "value": "0x0",
        "input": "0xa9059cbb",
        "accessList": [{
            "address": "0x471ece3750da237f93b8e339c536989b8978a438",
            "storageKeys": [
                "0x0000000000000000000000000000000000000000000000000000000000000003",
                "0x0000000000000000000000000000000000000000000000000000000000000001"
            ]
        }],
        "v": "0x0",
        "r": "0x0",
        "s": "0x0",
    })
}

fn dynamic_fee() -> Value {
    json!({
        "type": "0x2",
        "chainId": "0xa4ec",
        "nonce": "0x133",
        "to": "0xa0e9096b8e5ad2701f51ca1cb11684aaad91993a",
        "gas": "0x3d97c",
        "maxPriorityFeePerGas": "0x63e4b",
        "maxFeePerGas": "0x315373261",
        "value": "0x0",
        "input": "0xcac35c7a",
        "accessList": [],
        "v": "0x1",
        "r": "0x9de05cbec31a4fcf01c652408e51c58f82aae6c66513320dd9f06b77abfe1494",
        "s": "0x363706d206c4649165bb27b54e6286cf4cedac8b7fdd78d9cb1e00047240e293",
    })
}

fn blob() -> Value {
    json!({
        "type": "0x3",
        "chainId": "0x1",
        "nonce": "0x0",
        "to": "0x11e9ca82a3a762b4b5bd264d4173a242e7a77064",
        "gas": "0x5208",
        "maxPriorityFeePerGas": "0x3b9aca00",
        "maxFeePerGas": "0x6fc23ac00",
        "maxFeePerDataGas": "0x3",
        "value": "0x0",
        "input": "0x",
        "accessList": [],
        "blobVersionedHashes": [
            "0x01a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8"
        ],
        "v": "0x0",
        "r": "0x0",
        "s": "0x0",
    })
}

fn deposit() -> Value {
    json!({
        "type": "0x7e",
        "sourceHash": "0x04e9a69416471ead93b02f0c279ab11ca0b635db5c1726a56faf22623bafde52",
        "from": "0xdeaddeaddeaddeaddeaddeaddeaddeaddead0001",
        "to": "0x4200000000000000000000000000000000000015",
        "mint": "0x1",
        "gas": "0xf4240",
        "value": "0x0",
        "input": "0x440a5e20",
        "isSystemTx": true,
    })
}

fn offchain() -> Value {
    json!({
        "type": "0x7d",
        "sourceHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
        "from": "0x000000000000000000000000000000000000ce10",
        "gas": "0x186a0",
        "value": "0x5",
        "data": "0x01020304",
        "isSystemTx": false,
    })
}

fn decode(value: &Value) -> Transaction {
    Transaction::from_json(&value.to_string()).unwrap()
}

#[rstest]
#[case::legacy(legacy(), TxType::Legacy)]
#[case::access_list(access_list(), TxType::AccessList)]
#[case::dynamic_fee(dynamic_fee(), TxType::DynamicFee)]
#[case::blob(blob(), TxType::Blob)]
#[case::deposit(deposit(), TxType::Deposit)]
#[case::offchain(offchain(), TxType::Offchain)]
fn json_binary_json(#[case] record: Value, #[case] tx_type: TxType) {
    let tx = decode(&record);
    assert_eq!(tx.tx_type(), tx_type);

    // canonical bytes roundtrip to the same transaction and hash
    let raw = tx.encoded_2718();
    let from_raw = Transaction::decode_2718_exact(&raw).unwrap();
    assert_eq!(from_raw, tx);
    assert_eq!(from_raw.hash(), tx.hash());

    // and back to the same JSON, plus the hash
    let mut expected = record;
    expected["hash"] = json!(tx.hash());
    let encoded: Value = serde_json::from_str(&from_raw.to_json().unwrap()).unwrap();
    similar_asserts::assert_eq!(encoded, expected);
}

#[test]
fn eip155_vector_from_json() {
    let tx = decode(&legacy());
    assert_eq!(
        *tx.hash(),
        b256!("0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788")
    );
    assert_eq!(tx.chain_id(), 1_u64);
}

#[test]
fn capability_defaults() {
    let deposit = decode(&deposit());
    assert_eq!(deposit.chain_id(), Quantity::zero());
    assert_eq!(deposit.gas_price(), Quantity::zero());
    assert_eq!(deposit.nonce(), 0);
    assert!(deposit.access_list().is_empty());
    assert!(deposit.is_system_tx());
    assert_eq!(deposit.raw_signature_values(), (Quantity::zero(), Quantity::zero(), Quantity::zero()));
    assert_eq!(TxData::to(deposit.inner()), Some(address!("0x4200000000000000000000000000000000000015")));

    let blob = decode(&blob());
    assert_eq!(blob.blob_gas(), 131072);
    assert_eq!(blob.blob_fee_cap(), 3_u64);
    assert_eq!(blob.gas_price(), 0x6fc23ac00_u64);
    assert_eq!(
        blob.effective_gas_price(Some(&Quantity::from(7_u64))),
        Quantity::from(0x3b9aca07_u64)
    );

    let offchain = decode(&offchain());
    assert_eq!(TxData::to(offchain.inner()), None);
    assert_eq!(offchain.value(), 5_u64);
    assert_eq!(offchain.effective_nonce(), None);
}

#[test]
fn nonce_annotation_is_invisible_to_the_hash() {
    let bare = decode(&deposit());
    let mut record = deposit();
    record["nonce"] = json!("0x152ea95");
    let annotated = decode(&record);

    assert_eq!(annotated.effective_nonce(), Some(0x152ea95));
    assert_eq!(annotated.encoded_2718(), bare.encoded_2718());
    assert_eq!(annotated.hash(), bare.hash());
    assert_ne!(annotated, bare);

    // the annotation survives JSON but not canonical bytes
    let again = Transaction::from_json(&annotated.to_json().unwrap()).unwrap();
    assert_eq!(again, annotated);
    let from_raw = Transaction::decode_2718_exact(&annotated.encoded_2718()).unwrap();
    assert_eq!(from_raw, bare);
}

#[test]
fn programmatic_construction_is_owned() {
    let mut deposit = TxDeposit {
        source_hash: B256::repeat_byte(1),
        from: Address::repeat_byte(2),
        value: Quantity::from(10_u64),
        ..Default::default()
    };
    let tx = Transaction::new(TxDepositWithNonce::new(deposit.clone(), 1));
    let hash = *tx.hash();

    // mutating the caller's copy cannot reach the wrapped transaction
    deposit.value = Quantity::from(11_u64);
    assert_eq!(tx.value(), 10_u64);
    assert_eq!(*tx.hash(), hash);
    assert_ne!(*Transaction::new(deposit).hash(), hash);
}

#[test]
fn parallel_codec_work() {
    let records = [legacy(), access_list(), dynamic_fee(), blob(), deposit(), offchain()];
    let results: Vec<(B256, Vec<u8>)> = std::thread::scope(|s| {
        let handles: Vec<_> = records
            .iter()
            .map(|record| {
                s.spawn(move || {
                    let tx = decode(record);
                    (*tx.hash(), tx.encoded_2718())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for ((hash, raw), record) in results.into_iter().zip(records.iter()) {
        let tx = Transaction::decode_2718_exact(&raw).unwrap();
        assert_eq!(*tx.hash(), hash);
        assert_eq!(tx, decode(record));
    }
}

#[test]
fn blob_overflow_is_reported_by_field() {
    let mut record = blob();
    record["maxFeePerDataGas"] = json!(format!("0x1{}", "0".repeat(64)));
    assert_eq!(
        Transaction::from_json(&record.to_string()),
        Err(EnvelopeError::NumericOverflow("maxFeePerDataGas"))
    );

    record["maxFeePerDataGas"] = json!(format!("0x{}", "f".repeat(64)));
    let tx = Transaction::from_json(&record.to_string()).unwrap();
    assert_eq!(tx.as_blob().unwrap().max_fee_per_blob_gas, U256::MAX);
}
