//! One Touch API client

use crate::signer::RequestSigner;
use crate::types::*;
use crate::{EpayError, Result};
use reqwest::{Client, Response};
use serde_json::Value;

/// Client for the One Touch payment gateway.
///
/// Credentials and base URLs are fixed at construction. Clones share the
/// underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct OneTouchClient {
    /// Underlying HTTP client
    client: Client,
    /// Checksum signer keyed with the application secret
    signer: RequestSigner,
    app_id: String,
    kin: String,
    endpoints: Endpoints,
}

impl OneTouchClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();
        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let client = client_builder
            .build()
            .map_err(|e| EpayError::config(format!("Failed to create HTTP client: {}", e)))?;

        let endpoints = config.resolved_endpoints();
        tracing::debug!(
            mode = ?config.mode(),
            api = endpoints.api(),
            web = endpoints.web(),
            "created One Touch client"
        );

        Ok(Self {
            client,
            signer: RequestSigner::new(&config.secret)?,
            app_id: config.app_id,
            kin: config.kin,
            endpoints,
        })
    }

    /// Build a signed payment request for the no-registration browser flow.
    ///
    /// `reason` defaults to `id` when not given. Pass the result to
    /// [`OneTouchClient::redirect_url`].
    pub fn create_payment_request(
        &self,
        id: &str,
        amount: impl Into<FieldValue>,
        description: &str,
        device: &str,
        reason: Option<&str>,
    ) -> RequestMap {
        let request = self
            .app_request(device)
            .with(fields::ID, id)
            .with(fields::AMOUNT, amount)
            .with(fields::RCPT, &self.kin)
            .with(fields::RCPT_TYPE, fields::RCPT_TYPE_KIN)
            .with(fields::DESCRIPTION, description)
            .with(fields::REASON, reason.unwrap_or(id));

        self.signer.sign(request)
    }

    /// Start a send payment for an authorized user token
    pub async fn init_send_payment(&self, token: &str, device: &str) -> Result<Value> {
        let request = self
            .app_request(device)
            .with(fields::TOKEN, token)
            .with(fields::TYPE, fields::TYPE_SEND);

        self.post(paths::PAYMENT_INIT, &request).await
    }

    /// Ask the gateway to pre-check a send payment
    pub async fn check_send_payment(
        &self,
        token: &str,
        device: &str,
        id: &str,
        amount: impl Into<FieldValue>,
        pins: &str,
    ) -> Result<Value> {
        let request = self.send_request(token, device, id, amount.into(), pins);
        self.post(paths::PAYMENT_CHECK, &request).await
    }

    /// Confirm a send payment
    pub async fn send_payment(&self, payment: SendPayment<'_>) -> Result<Value> {
        let request = self
            .send_request(
                payment.token,
                payment.device,
                payment.id,
                payment.amount,
                payment.pins,
            )
            .with(fields::DESCRIPTION, payment.description)
            .with(fields::REASON, payment.reason);

        self.post(paths::PAYMENT_SEND, &request).await
    }

    /// Status of a send payment made with a user token
    pub async fn check_send_payment_status(
        &self,
        token: &str,
        device: &str,
        id: &str,
    ) -> Result<Value> {
        let request = self
            .app_request(device)
            .with(fields::TOKEN, token)
            .with(fields::ID, id);

        self.post(paths::PAYMENT_SEND_STATUS, &request).await
    }

    /// Status of a no-registration payment
    pub async fn check_payment_status(&self, id: &str, device: &str) -> Result<Value> {
        let request = self
            .app_request(device)
            .with(fields::ID, id)
            .with(fields::RCPT, &self.kin);

        self.get(paths::NOREG_SEND_STATUS, &request).await
    }

    /// Browser URL that starts a no-registration payment for `request`
    pub fn redirect_url(&self, request: &RequestMap) -> String {
        self.web_url(paths::NOREG_SEND, request)
    }

    /// Browser URL that starts user authorization
    pub fn auth_redirect_url(&self, key: &str, device: &str) -> String {
        let request = RequestMap::new()
            .with(fields::APPID, &self.app_id)
            .with(fields::KEY, key)
            .with(fields::DEVICEID, device);

        self.web_url(paths::AUTH_START, &request)
    }

    /// Application identifier
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Merchant KIN
    pub fn kin(&self) -> &str {
        &self.kin
    }

    /// Base URLs in use
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Signer keyed with this client's secret
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    fn app_request(&self, device: &str) -> RequestMap {
        RequestMap::new()
            .with(fields::APPID, &self.app_id)
            .with(fields::DEVICEID, device)
    }

    fn send_request(
        &self,
        token: &str,
        device: &str,
        id: &str,
        amount: FieldValue,
        pins: &str,
    ) -> RequestMap {
        self.app_request(device)
            .with(fields::TOKEN, token)
            .with(fields::TYPE, fields::TYPE_SEND)
            .with(fields::ID, id)
            .with(fields::AMOUNT, amount)
            .with(fields::RCPT, &self.kin)
            .with(fields::RCPT_TYPE, fields::RCPT_TYPE_KIN)
            .with(fields::PINS, pins)
    }

    fn web_url(&self, path: &str, request: &RequestMap) -> String {
        format!(
            "{}{}?{}",
            self.endpoints.web(),
            path,
            request.to_query_string()
        )
    }

    async fn post(&self, path: &str, request: &RequestMap) -> Result<Value> {
        let url = format!("{}{}", self.endpoints.api(), path);
        tracing::debug!(
            method = "POST",
            %url,
            fields = ?request.names().collect::<Vec<_>>(),
            "calling One Touch API"
        );

        let response = self.client.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn get(&self, path: &str, request: &RequestMap) -> Result<Value> {
        let url = format!("{}{}", self.endpoints.api(), path);
        tracing::debug!(
            method = "GET",
            %url,
            fields = ?request.names().collect::<Vec<_>>(),
            "calling One Touch API"
        );

        let response = self.client.get(&url).query(request).send().await?;
        Self::decode(response).await
    }

    async fn decode(response: Response) -> Result<Value> {
        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                url = %response.url(),
                "One Touch API returned an error status"
            );
        }

        let response = response.error_for_status()?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_client() -> OneTouchClient {
        OneTouchClient::new(ClientConfig::new(false, "app-1", "secret", "kin-42")).unwrap()
    }

    #[test]
    fn test_client_creation_selects_mode() {
        let live = OneTouchClient::new(ClientConfig::new(true, "a", "s", "k")).unwrap();
        assert_eq!(live.endpoints(), &Endpoints::production());

        let demo = demo_client();
        assert_eq!(demo.endpoints(), &Endpoints::demo());
        assert_eq!(demo.app_id(), "app-1");
        assert_eq!(demo.kin(), "kin-42");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = OneTouchClient::new(ClientConfig::new(false, "", "secret", "kin"));
        assert!(matches!(result, Err(EpayError::Config { .. })));
    }

    #[test]
    fn test_create_payment_request_fields() {
        let request = demo_client().create_payment_request("tx1", 10, "Order", "dev-1", None);

        assert_eq!(
            request.names().collect::<Vec<_>>(),
            vec![
                "APPID",
                "DEVICEID",
                "ID",
                "AMOUNT",
                "RCPT",
                "RCPT_TYPE",
                "DESCRIPTION",
                "REASON",
                "checksum"
            ]
        );
        assert_eq!(request.get("RCPT"), Some(&FieldValue::from("kin-42")));
        assert_eq!(request.get("RCPT_TYPE"), Some(&FieldValue::from("KIN")));
        assert_eq!(request.get("REASON"), Some(&FieldValue::from("tx1")));
        assert!(demo_client().signer().verify(&request));
    }

    #[test]
    fn test_create_payment_request_explicit_reason() {
        let request =
            demo_client().create_payment_request("tx1", 10, "Order", "dev-1", Some("Invoice 7"));
        assert_eq!(request.get("REASON"), Some(&FieldValue::from("Invoice 7")));
    }

    #[test]
    fn test_redirect_url_reuses_request() {
        let client = demo_client();
        let request = client.create_payment_request("tx 1", 10, "A&B", "dev", None);
        let url = client.redirect_url(&request);

        let expected_prefix = format!(
            "{}/api/payment/noreg/send?APPID=app-1&DEVICEID=dev&ID=tx+1&AMOUNT=10&RCPT=kin-42&RCPT_TYPE=KIN&DESCRIPTION=A%26B&REASON=tx+1&checksum=",
            endpoints::API_BASE_WEB_DEMO
        );
        assert!(url.starts_with(&expected_prefix), "unexpected url: {}", url);
        assert!(url.ends_with(request.checksum().unwrap()));
    }

    #[test]
    fn test_auth_redirect_url() {
        let url = demo_client().auth_redirect_url("key/1", "dev 9");
        assert_eq!(
            url,
            "https://demo.epay.bg/xdev/mobile/api/start?APPID=app-1&KEY=key%2F1&DEVICEID=dev+9"
        );
    }
}
