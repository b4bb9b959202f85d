//! Build a signed no-registration payment and print its browser URL, then
//! poll the gateway for its status.
//!
//! ```sh
//! EPAY_APP_ID=... EPAY_SECRET=... EPAY_KIN=... cargo run --example noreg_payment
//! ```

use epay_onetouch::{ClientConfig, OneTouchClient};
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("epay_onetouch=debug".parse()?))
        .init();

    let config = ClientConfig::new(
        false,
        env::var("EPAY_APP_ID")?,
        env::var("EPAY_SECRET")?,
        env::var("EPAY_KIN")?,
    )
    .with_timeout(Duration::from_secs(15));
    let client = OneTouchClient::new(config)?;

    let request = client.create_payment_request("demo-order-1", 150, "Demo order", "demo-device", None);
    println!("Open in a browser to pay:\n{}", client.redirect_url(&request));

    let status = client.check_payment_status("demo-order-1", "demo-device").await?;
    println!("Status: {}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
