//! Coin Exchange CLI
//!
//! Operates on a JSON ledger file and prints results as JSON, one
//! operation per invocation.
//!
//! # Usage
//!
//! ```bash
//! coin-exchange ledger.json create alice
//! coin-exchange ledger.json get <account-id>
//! coin-exchange ledger.json list
//! coin-exchange ledger.json send <sender-id> <receiver-id> <amount>
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use coin_exchange::{AccountStore, ExchangeError, JsonFileBackend, Result, TransferEngine};
use std::env;
use std::process;
use std::sync::Arc;

const USAGE: &str =
    "Usage: coin-exchange <ledger.json> <create USERNAME | get ID | list | send SENDER RECEIVER AMOUNT>";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(ExchangeError::Usage(USAGE));
    }

    let backend = JsonFileBackend::open(&args[1])?;
    let store = Arc::new(AccountStore::open(Box::new(backend))?);

    match args[2].as_str() {
        "create" => {
            let username = args.get(3).ok_or(ExchangeError::Usage(USAGE))?;
            let account = store.create(username)?;
            print_json(&account)
        }
        "get" => {
            let id = args.get(3).ok_or(ExchangeError::Usage(USAGE))?;
            let account = store.get(id.trim())?;
            print_json(&account)
        }
        "list" => print_json(&store.list()),
        "send" => {
            let (sender_id, receiver_id, amount) = match &args[3..] {
                [sender, receiver, amount] => (sender, receiver, amount),
                _ => return Err(ExchangeError::Usage(USAGE)),
            };
            let amount: i64 = amount
                .trim()
                .parse()
                .map_err(|_| ExchangeError::InvalidAmount)?;

            let engine = TransferEngine::new(Arc::clone(&store));
            let receipt = engine.transfer(sender_id, receiver_id, amount)?;
            print_json(&receipt)
        }
        _ => Err(ExchangeError::Usage(USAGE)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(ExchangeError::storage)?;
    println!("{}", json);
    Ok(())
}
