//! Print the balance of an LNbits wallet.
//!
//! Run with: cargo run --example check_balance
//!
//! Requires LNBITS_INVOICE_KEY. LNBITS_URL defaults to the public instance.

use lnbits_client::{LnbitsClient, LnbitsConfig, PaymentGateway};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config = match env::var("LNBITS_URL") {
        Ok(url) => LnbitsConfig::new(url),
        Err(_) => LnbitsConfig::default(),
    };
    let invoice_key = env::var("LNBITS_INVOICE_KEY")?;

    println!("Connecting to {}...", config.base_url);
    let client = LnbitsClient::new(config)?;

    let balance = client.get_balance(&invoice_key).await?;
    println!("Balance: {} msat", balance.balance);

    Ok(())
}
