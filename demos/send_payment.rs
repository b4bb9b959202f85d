//! Walk through the token-based send flow: authorize, init, check, send.
//!
//! ```sh
//! EPAY_APP_ID=... EPAY_SECRET=... EPAY_KIN=... EPAY_TOKEN=... EPAY_PINS=... \
//!     cargo run --example send_payment
//! ```

use epay_onetouch::{ClientConfig, FieldValue, OneTouchClient, SendPayment};
use std::env;

const DEVICE: &str = "demo-device";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = OneTouchClient::new(ClientConfig::new(
        false,
        env::var("EPAY_APP_ID")?,
        env::var("EPAY_SECRET")?,
        env::var("EPAY_KIN")?,
    ))?;

    let token = match env::var("EPAY_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            println!(
                "No EPAY_TOKEN set. Authorize the device first:\n{}",
                client.auth_redirect_url("demo-key", DEVICE)
            );
            return Ok(());
        }
    };
    let pins = env::var("EPAY_PINS")?;

    let init = client.init_send_payment(&token, DEVICE).await?;
    println!("init: {}", init);

    let Some(id) = init["payment"]["ID"].as_str().map(str::to_string) else {
        println!("gateway did not return a payment id");
        return Ok(());
    };

    let check = client.check_send_payment(&token, DEVICE, &id, 150, &pins).await?;
    println!("check: {}", check);

    let sent = client
        .send_payment(SendPayment {
            token: &token,
            device: DEVICE,
            id: &id,
            amount: FieldValue::from(150),
            pins: &pins,
            description: "Demo order",
            reason: Some("Demo"),
        })
        .await?;
    println!("send: {}", sent);

    let status = client.check_send_payment_status(&token, DEVICE, &id).await?;
    println!("status: {}", status);

    Ok(())
}
