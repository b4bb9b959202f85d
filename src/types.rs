//! Core types for One Touch requests and client configuration

use crate::{EpayError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Name of the field carrying the request signature
pub const CHECKSUM_FIELD: &str = "checksum";

/// Gateway base URLs
pub mod endpoints {
    /// Production JSON API base
    pub const API_BASE: &str = "https://www.epay.bg/v3/api";
    /// Production browser flow base
    pub const API_BASE_WEB: &str = "https://www.epay.bg/v3/mob";
    /// Demo JSON API base
    pub const API_BASE_DEMO: &str = "https://demo.epay.bg/xdev/api";
    /// Demo browser flow base
    pub const API_BASE_WEB_DEMO: &str = "https://demo.epay.bg/xdev/mobile";
}

/// Relative paths of the gateway operations
pub mod paths {
    pub const PAYMENT_INIT: &str = "/payment/init";
    pub const PAYMENT_CHECK: &str = "/payment/check";
    pub const PAYMENT_SEND: &str = "/payment/send/user";
    pub const PAYMENT_SEND_STATUS: &str = "/payment/send/status";
    pub const NOREG_SEND: &str = "/api/payment/noreg/send";
    pub const NOREG_SEND_STATUS: &str = "/api/payment/noreg/send/status";
    pub const AUTH_START: &str = "/api/start";
}

/// Request field names understood by the gateway
pub mod fields {
    pub const APPID: &str = "APPID";
    pub const DEVICEID: &str = "DEVICEID";
    pub const ID: &str = "ID";
    pub const AMOUNT: &str = "AMOUNT";
    pub const RCPT: &str = "RCPT";
    pub const RCPT_TYPE: &str = "RCPT_TYPE";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const REASON: &str = "REASON";
    pub const TOKEN: &str = "TOKEN";
    pub const TYPE: &str = "TYPE";
    pub const PINS: &str = "PINS";
    pub const KEY: &str = "KEY";

    /// Recipient type for KIN-addressed payments
    pub const RCPT_TYPE_KIN: &str = "KIN";
    /// Operation type for user-to-merchant sends
    pub const TYPE_SEND: &str = "send";
}

/// Scalar value of a request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    /// Present but without a value; signs as an empty string and is left
    /// out of query strings
    Null,
}

impl FieldValue {
    /// Canonical string form used for signing and query strings
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => value.normalize().to_string(),
            Self::Null => String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Decimal(value) => {
                let value = value.normalize();
                if value.scale() == 0 {
                    if let Some(integral) = value.to_i64() {
                        return serializer.serialize_i64(integral);
                    }
                }
                match value.to_f64() {
                    Some(float) => serializer.serialize_f64(float),
                    None => serializer.collect_str(&value),
                }
            }
            Self::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Insertion-ordered set of named request fields.
///
/// Field order is kept exactly as inserted so that query strings come out in
/// the order the gateway documents. Signing sorts a copy and never relies on
/// this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMap {
    entries: Vec<(String, FieldValue)>,
}

impl RequestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value in place if the name exists
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`RequestMap::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The signature attached by [`crate::RequestSigner::sign`], if any
    pub fn checksum(&self) -> Option<&str> {
        match self.get(CHECKSUM_FIELD) {
            Some(FieldValue::Text(checksum)) => Some(checksum),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Form-urlencode the non-null fields in insertion order
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.iter().filter(|(_, value)| !value.is_null()) {
            serializer.append_pair(name, &value.render());
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestMap
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for RequestMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Live,
    #[default]
    Demo,
}

impl Mode {
    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

impl From<bool> for Mode {
    fn from(live_mode: bool) -> Self {
        if live_mode {
            Self::Live
        } else {
            Self::Demo
        }
    }
}

/// Pair of base URLs: one for JSON API calls, one for browser redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: String,
    web: String,
}

impl Endpoints {
    /// Production gateway
    pub fn production() -> Self {
        Self {
            api: endpoints::API_BASE.to_string(),
            web: endpoints::API_BASE_WEB.to_string(),
        }
    }

    /// Demo gateway
    pub fn demo() -> Self {
        Self {
            api: endpoints::API_BASE_DEMO.to_string(),
            web: endpoints::API_BASE_WEB_DEMO.to_string(),
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Live => Self::production(),
            Mode::Demo => Self::demo(),
        }
    }

    /// Custom base URLs, e.g. a local test double
    pub fn custom(api: impl Into<String>, web: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api: Self::check_base(api.into())?,
            web: Self::check_base(web.into())?,
        })
    }

    fn check_base(base: String) -> Result<String> {
        let parsed = url::Url::parse(&base)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(EpayError::config(format!(
                "Base URL must use http or https: {}",
                base
            )));
        }
        Ok(base.trim_end_matches('/').to_string())
    }

    /// JSON API base
    pub fn api(&self) -> &str {
        &self.api
    }

    /// Browser flow base
    pub fn web(&self) -> &str {
        &self.web
    }
}

/// Client configuration.
///
/// Deserializes from the conventional `live_mode` / `app_id` / `secret` /
/// `kin` settings keys.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Talk to the production gateway instead of the demo one
    #[serde(default)]
    pub live_mode: bool,
    /// Application identifier issued by the gateway
    pub app_id: String,
    /// Shared secret for request checksums, never transmitted
    pub secret: String,
    /// Merchant KIN that receives payments
    pub kin: String,
    /// Request timeout
    #[serde(skip)]
    pub timeout: Option<Duration>,
    /// Overrides the mode-selected base URLs
    #[serde(skip)]
    pub endpoints: Option<Endpoints>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("live_mode", &self.live_mode)
            .field("app_id", &self.app_id)
            .field("secret", &"<redacted>")
            .field("kin", &self.kin)
            .field("timeout", &self.timeout)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        live_mode: bool,
        app_id: impl Into<String>,
        secret: impl Into<String>,
        kin: impl Into<String>,
    ) -> Self {
        Self {
            live_mode,
            app_id: app_id.into(),
            secret: secret.into(),
            kin: kin.into(),
            timeout: None,
            endpoints: None,
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from(self.live_mode)
    }

    /// Base URLs this configuration resolves to
    pub fn resolved_endpoints(&self) -> Endpoints {
        self.endpoints
            .clone()
            .unwrap_or_else(|| Endpoints::for_mode(self.mode()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(EpayError::config("app_id cannot be empty"));
        }
        if self.secret.is_empty() {
            return Err(EpayError::config("secret cannot be empty"));
        }
        if self.kin.is_empty() {
            return Err(EpayError::config("kin cannot be empty"));
        }
        Ok(())
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the mode-selected base URLs
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }
}

/// Arguments of the send payment confirmation call
#[derive(Debug, Clone)]
pub struct SendPayment<'a> {
    pub token: &'a str,
    pub device: &'a str,
    pub id: &'a str,
    pub amount: FieldValue,
    pub pins: &'a str,
    pub description: &'a str,
    /// Sent as given; unlike [`crate::OneTouchClient::create_payment_request`]
    /// there is no fallback to `id`
    pub reason: Option<&'a str>,
}
