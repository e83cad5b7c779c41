//! Debugging tool for Celo transaction envelopes.
//!
//! Decodes a transaction from its JSON form or from its canonical bytes and prints the other
//! representation.

use alloy_primitives::hex;
use anyhow::{Context, Result};
use celo_alloy_envelope::{Decodable2718, Encodable2718, EnvelopeError, Transaction, TxData};
use clap::{ArgAction, Parser, Subcommand};
use std::{
    io::{self, Read},
    path::PathBuf,
};
use tracing::info;

mod logger;

/// The envelope inspector command
#[derive(Parser, Debug)]
#[command(about = "Decodes transaction envelopes from JSON or canonical EIP-2718 bytes")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv).
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a JSON transaction and print its kind, hash and canonical bytes.
    Json {
        /// File holding the JSON transaction. Read from stdin when omitted.
        #[arg(env = "ENVELOPE_JSON_PATH")]
        path: Option<PathBuf>,
    },
    /// Decode canonical bytes and print the JSON form.
    Raw {
        /// Hex encoded envelope, `0x` optional. Read from stdin when omitted.
        #[arg(env = "ENVELOPE_RAW")]
        hex: Option<String>,
    },
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
    Ok(input)
}

fn decode_raw(input: &str) -> Result<Transaction> {
    let bytes = hex::decode(input.trim()).context("invalid hex")?;
    Transaction::decode_2718_exact(&bytes)
        .map_err(EnvelopeError::from)
        .context("invalid transaction envelope")
}

fn describe(tx: &Transaction) -> String {
    let mut out = format!(
        "type:  {} ({:#04x})\nhash:  {}\nraw:   {}",
        tx.tx_type(),
        u8::from(tx.tx_type()),
        tx.hash(),
        hex::encode_prefixed(tx.encoded_2718()),
    );
    if let Some(nonce) = tx.effective_nonce() {
        out.push_str(&format!("\nnonce: {nonce} (annotation)"));
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_tracing(cli.verbose)?;

    match cli.command {
        Command::Json { path } => {
            let input = match &path {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => read_stdin()?,
            };
            let tx = Transaction::from_json(&input).context("invalid transaction json")?;
            info!(target: "envelope_inspect", tx_type = %tx.tx_type(), "decoded json transaction");
            println!("{}", describe(&tx));
        }
        Command::Raw { hex } => {
            let input = match hex {
                Some(hex) => hex,
                None => read_stdin()?,
            };
            let tx = decode_raw(&input)?;
            info!(target: "envelope_inspect", tx_type = %tx.tx_type(), "decoded raw transaction");
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP155_RAW: &str = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

    #[test]
    fn decodes_raw_with_and_without_prefix() {
        let tx = decode_raw(EIP155_RAW).unwrap();
        assert!(tx.is_legacy());
        let unprefixed = decode_raw(&format!("{}\n", &EIP155_RAW[2..])).unwrap();
        assert_eq!(tx, unprefixed);
        assert!(decode_raw("0x7e").is_err());
    }

    #[test]
    fn describes_kind_and_hash() {
        let tx = decode_raw(EIP155_RAW).unwrap();
        let out = describe(&tx);
        assert!(out.contains("legacy (0x00)"));
        assert!(
            out.contains("0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788")
        );
        assert!(!out.contains("annotation"));
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["envelope-inspect", "-vv", "raw", "0x00"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Raw { hex: Some(_) }));
    }
}
