//! Request checksums
//!
//! Every request handed to the browser flow carries a `checksum` field: the
//! lowercase hex HMAC-SHA1, keyed with the application secret, of the
//! request's fields sorted by name and written out as `NAMEvalue\n` lines.

use crate::types::{RequestMap, CHECKSUM_FIELD};
use crate::{EpayError, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;
use std::fmt;

type HmacSha1 = Hmac<Sha1>;

/// Signs and verifies request maps with the shared application secret
#[derive(Clone)]
pub struct RequestSigner {
    mac: HmacSha1,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl RequestSigner {
    /// Create a signer keyed with `secret`
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let mac = HmacSha1::new_from_slice(secret.as_ref())
            .map_err(|e| EpayError::config(format!("Invalid signing key: {}", e)))?;
        Ok(Self { mac })
    }

    /// The string the checksum is computed over.
    ///
    /// Fields are ordered by name (byte order) regardless of insertion order.
    /// An existing `checksum` field is never part of it.
    pub fn signing_payload(request: &RequestMap) -> String {
        let sorted: BTreeMap<&str, String> = request
            .iter()
            .filter(|(name, _)| *name != CHECKSUM_FIELD)
            .map(|(name, value)| (name, value.render()))
            .collect();

        let mut payload = String::new();
        for (name, value) in sorted {
            payload.push_str(name);
            payload.push_str(&value);
            payload.push('\n');
        }
        payload
    }

    /// Hex checksum of `request`
    pub fn checksum(&self, request: &RequestMap) -> String {
        let mut mac = self.mac.clone();
        mac.update(Self::signing_payload(request).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Return `request` with its `checksum` field set
    pub fn sign(&self, mut request: RequestMap) -> RequestMap {
        let checksum = self.checksum(&request);
        request.remove(CHECKSUM_FIELD);
        request.insert(CHECKSUM_FIELD, checksum);
        tracing::debug!(fields = request.len(), "signed request");
        request
    }

    /// Check the `checksum` field of a signed request
    pub fn verify(&self, request: &RequestMap) -> bool {
        let Some(checksum) = request.checksum() else {
            return false;
        };
        let Ok(expected) = hex::decode(checksum) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(Self::signing_payload(request).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
