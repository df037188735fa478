//! Stripe integration via REST API (no SDK dependency)

use std::time::Duration;

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sha2::Sha256;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const API_BASE: &str = "https://api.stripe.com/v1";

/// One display line for the hosted checkout page
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub name: String,
    pub unit_amount_cents: i64,
    pub quantity: i64,
}

/// Correlation metadata embedded in the session and echoed back by webhooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMetadata {
    pub order_id: i64,
    pub payment_id: i64,
    pub user_id: i64,
}

impl SessionMetadata {
    /// Parse from a checkout session object's `metadata` map.
    /// All three keys must be present and numeric.
    pub fn from_object(object: &Value) -> Option<Self> {
        let metadata = object.get("metadata")?;
        let parse = |key: &str| -> Option<i64> { metadata.get(key)?.as_str()?.parse().ok() };
        Some(Self {
            order_id: parse("orderId")?,
            payment_id: parse("paymentId")?,
            user_id: parse("userId")?,
        })
    }
}

/// Newly created hosted checkout session
#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub id: String,
    /// Redirect URL the frontend sends the shopper to
    pub url: String,
}

/// Convert a decimal price to integer cents for the gateway
pub fn to_cents(price: Decimal) -> Option<i64> {
    (price * Decimal::ONE_HUNDRED).round().to_i64()
}

/// Handle for outbound Stripe API calls
#[derive(Debug, Clone)]
pub struct Gateway {
    client: reqwest::Client,
    secret_key: String,
}

impl Gateway {
    pub fn new(secret_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, secret_key }
    }

    /// Create a Stripe Checkout Session (payment mode)
    pub async fn create_checkout_session(
        &self,
        lines: &[CheckoutLine],
        metadata: SessionMetadata,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CreatedSession, BoxError> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("success_url".into(), success_url.to_string()),
            ("cancel_url".into(), cancel_url.to_string()),
            ("metadata[orderId]".into(), metadata.order_id.to_string()),
            ("metadata[paymentId]".into(), metadata.payment_id.to_string()),
            ("metadata[userId]".into(), metadata.user_id.to_string()),
        ];
        for (i, line) in lines.iter().enumerate() {
            form.push((format!("line_items[{i}][price_data][currency]"), "usd".into()));
            form.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                line.name.clone(),
            ));
            form.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                line.unit_amount_cents.to_string(),
            ));
            form.push((format!("line_items[{i}][quantity]"), line.quantity.to_string()));
        }

        let resp: Value = self
            .client
            .post(format!("{API_BASE}/checkout/sessions"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        match (resp["id"].as_str(), resp["url"].as_str()) {
            (Some(id), Some(url)) => Ok(CreatedSession {
                id: id.to_string(),
                url: url.to_string(),
            }),
            _ => Err(format!("Stripe create_checkout failed: {resp}").into()),
        }
    }

    /// Retrieve a Checkout Session by id
    pub async fn retrieve_session(&self, session_id: &str) -> Result<Value, BoxError> {
        let resp: Value = self
            .client
            .get(format!("{API_BASE}/checkout/sessions/{session_id}"))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?
            .json()
            .await?;

        if resp.get("error").is_some() {
            return Err(format!("Stripe retrieve_session failed: {resp}").into());
        }
        Ok(resp)
    }
}

/// Verify Stripe webhook signature (HMAC-SHA256)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err("Invalid Stripe-Signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload.as_bytes());

    // verify_slice is constant-time
    let sig_bytes = hex::decode(signature).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    // Reject events outside a 5 minute tolerance window
    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > 300 {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sign(payload: &[u8], secret: &str, ts: i64) -> String {
        let signed = format!("{ts}.{}", std::str::from_utf8(payload).unwrap());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_signature_accepts_valid_header() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let secret = "whsec_test";
        let ts = chrono::Utc::now().timestamp();
        let header = format!("t={ts},v1={}", sign(payload, secret, ts));

        assert!(verify_webhook_signature(payload, &header, secret).is_ok());
    }

    #[test]
    fn test_signature_rejects_tampered_payload() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let secret = "whsec_test";
        let ts = chrono::Utc::now().timestamp();
        let header = format!("t={ts},v1={}", sign(payload, secret, ts));

        let tampered = br#"{"type":"checkout.session.expired"}"#;
        assert_eq!(
            verify_webhook_signature(tampered, &header, secret),
            Err("Webhook signature mismatch")
        );
    }

    #[test]
    fn test_signature_rejects_wrong_secret() {
        let payload = b"payload";
        let ts = chrono::Utc::now().timestamp();
        let header = format!("t={ts},v1={}", sign(payload, "whsec_a", ts));

        assert_eq!(
            verify_webhook_signature(payload, &header, "whsec_b"),
            Err("Webhook signature mismatch")
        );
    }

    #[test]
    fn test_signature_rejects_malformed_header() {
        assert_eq!(
            verify_webhook_signature(b"x", "garbage", "whsec_test"),
            Err("Invalid Stripe-Signature header")
        );
        assert_eq!(
            verify_webhook_signature(b"x", "t=123", "whsec_test"),
            Err("Invalid Stripe-Signature header")
        );
        assert_eq!(
            verify_webhook_signature(b"x", "t=123,v1=zzzz", "whsec_test"),
            Err("Invalid signature hex")
        );
    }

    #[test]
    fn test_signature_rejects_stale_timestamp() {
        let payload = b"payload";
        let secret = "whsec_test";
        let ts = chrono::Utc::now().timestamp() - 600;
        let header = format!("t={ts},v1={}", sign(payload, secret, ts));

        assert_eq!(
            verify_webhook_signature(payload, &header, secret),
            Err("Webhook timestamp too old")
        );
    }

    #[test]
    fn test_metadata_parses_valid_object() {
        let object = json!({
            "id": "cs_test_1",
            "metadata": {"orderId": "12", "paymentId": "34", "userId": "56"}
        });
        let metadata = SessionMetadata::from_object(&object).unwrap();
        assert_eq!(metadata.order_id, 12);
        assert_eq!(metadata.payment_id, 34);
        assert_eq!(metadata.user_id, 56);
    }

    #[test]
    fn test_metadata_rejects_missing_or_bad_keys() {
        let missing = json!({"metadata": {"orderId": "12", "paymentId": "34"}});
        assert!(SessionMetadata::from_object(&missing).is_none());

        let non_numeric = json!({"metadata": {"orderId": "12", "paymentId": "abc", "userId": "56"}});
        assert!(SessionMetadata::from_object(&non_numeric).is_none());

        let no_metadata = json!({"id": "cs_test_2"});
        assert!(SessionMetadata::from_object(&no_metadata).is_none());
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(to_cents(Decimal::new(2550, 2)), Some(2550)); // 25.50
        assert_eq!(to_cents(Decimal::new(10, 0)), Some(1000)); // 10
        assert_eq!(to_cents(Decimal::new(999, 3)), Some(100)); // 0.999 rounds to 1.00
        assert_eq!(to_cents(Decimal::ZERO), Some(0));
    }
}
