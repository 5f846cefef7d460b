//! Example: register the sender as a node, resolve its node contract, and create a group
//! whose fee is read back through base units.
//!
//! The RPC endpoint must manage the sender account (eth_sendTransaction).
//!
//! Usage: cargo run -p rocketpool --example register_node -- --http-url URL --storage 0x... --from 0x... [--timezone TZ] [--confirmations K]

use alloy::primitives::Address;
use anyhow::Context;
use rocketpool::{ClientConfig, ConfirmationEvent, ConfirmationHandler, RocketPool, TxOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Vec<String> = std::env::args().collect();
    let mut http_url = String::new();
    let mut storage = String::new();
    let mut from = String::new();
    let mut timezone = "Etc/UTC".to_string();
    let mut confirmations = 1u64;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--http-url" => {
                i += 1;
                http_url = args.get(i).cloned().unwrap_or_default();
            }
            "--storage" => {
                i += 1;
                storage = args.get(i).cloned().unwrap_or_default();
            }
            "--from" => {
                i += 1;
                from = args.get(i).cloned().unwrap_or_default();
            }
            "--timezone" => {
                i += 1;
                timezone = args.get(i).cloned().unwrap_or(timezone);
            }
            "--confirmations" => {
                i += 1;
                confirmations = args
                    .get(i)
                    .map(|s| s.parse())
                    .transpose()
                    .context("--confirmations must be an integer")?
                    .unwrap_or(confirmations);
            }
            _ => {}
        }
        i += 1;
    }
    if http_url.is_empty() || storage.is_empty() || from.is_empty() {
        eprintln!("Usage: register_node --http-url URL --storage 0xADDR --from 0xADDR [--timezone TZ] [--confirmations K]");
        std::process::exit(1);
    }
    let storage: Address = storage.parse().context("--storage must be a 20-byte hex address")?;
    let from: Address = from.parse().context("--from must be a 20-byte hex address")?;

    let mut config = ClientConfig::new(http_url, storage);
    config.confirmations = confirmations;
    let rp = RocketPool::connect(&config)?;
    let options = TxOptions::sender(from).gas(8_000_000);

    let registration = async {
        let progress: ConfirmationHandler = Box::new(|event| match event {
            ConfirmationEvent::Confirmed { confirmations, receipt } => {
                println!(
                    "node add: {confirmations} confirmation(s) in block {}",
                    receipt.block_number
                );
            }
            ConfirmationEvent::Failed(e) => println!("node add failed: {e}"),
        });
        let node_contract = rp.node().add(&timezone, &options, Some(progress)).await?;
        let resolved = rp.node().get_contract_address(from).await?;
        println!("node contract {node_contract} (registry: {resolved})");

        let group = rp.group().add("example group", 0.05, &options, None).await?;
        let fee = rp.group().get_group_fee(group).await?;
        println!("group {group} fee {fee}");
        anyhow::Ok(())
    };

    tokio::select! {
        res = registration => res,
        _ = tokio::signal::ctrl_c() => {
            println!("interrupted");
            Ok(())
        }
    }
}
