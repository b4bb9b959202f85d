//! # epay-onetouch - ePay.bg One Touch client
//!
//! A Rust client for the ePay.bg One Touch mobile payment API. It builds
//! checksum-signed payment requests, calls the gateway's JSON endpoints and
//! assembles the browser redirect URLs for the authorization and
//! no-registration payment flows.
//!
//! ```no_run
//! use epay_onetouch::{ClientConfig, OneTouchClient};
//!
//! # fn main() -> epay_onetouch::Result<()> {
//! let client = OneTouchClient::new(ClientConfig::new(false, "app-id", "secret", "8000000000"))?;
//! let request = client.create_payment_request("order-17", 1250, "Coffee beans", "device-1", None);
//! let url = client.redirect_url(&request);
//! # let _ = url;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod signer;
pub mod types;

// Re-exports for convenience
pub use client::OneTouchClient;
pub use error::{EpayError, Result};
pub use signer::RequestSigner;
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_gateway_constants() {
        assert_eq!(endpoints::API_BASE, "https://www.epay.bg/v3/api");
        assert_eq!(endpoints::API_BASE_WEB, "https://www.epay.bg/v3/mob");
        assert_eq!(endpoints::API_BASE_DEMO, "https://demo.epay.bg/xdev/api");
        assert_eq!(endpoints::API_BASE_WEB_DEMO, "https://demo.epay.bg/xdev/mobile");
        assert_eq!(fields::RCPT_TYPE_KIN, "KIN");
        assert_eq!(fields::TYPE_SEND, "send");
        assert_eq!(CHECKSUM_FIELD, "checksum");
    }
}
