use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signature verification for Razorpay payments and webhooks.
///
/// Razorpay signs the string `order_id + "|" + payment_id` for checkout
/// verification and the raw webhook body for webhooks, in both cases sending
/// the lowercase-hex digest. Comparison goes through `Mac::verify_slice`,
/// which is constant-time.
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Generate the lowercase-hex HMAC-SHA256 of `message`.
    pub fn sign_hex(message: &[u8], secret: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Internal(format!("HMAC initialization failed: {}", e)))?;

        mac.update(message);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Verify a hex-encoded HMAC-SHA256 signature over `message`. An empty
    /// or undecodable candidate fails closed.
    pub fn verify(message: &[u8], signature_hex: &str, secret: &str) -> AppResult<bool> {
        if signature_hex.is_empty() {
            return Ok(false);
        }

        let signature = match hex::decode(signature_hex) {
            Ok(bytes) => bytes,
            Err(_) => return Ok(false),
        };

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Internal(format!("HMAC initialization failed: {}", e)))?;

        mac.update(message);
        Ok(mac.verify_slice(&signature).is_ok())
    }

    /// Verify a checkout payment signature.
    /// signature = HMAC-SHA256(order_id + "|" + payment_id, key_secret)
    pub fn verify_payment_signature(
        order_id: &str,
        payment_id: &str,
        signature: &str,
        secret: &str,
    ) -> AppResult<bool> {
        let message = format!("{}|{}", order_id, payment_id);
        Self::verify(message.as_bytes(), signature, secret)
    }

    /// Verify a webhook signature over the raw, unparsed request body. The
    /// exact transmitted bytes must be hashed; re-serializing parsed JSON
    /// changes key order and whitespace and breaks verification.
    pub fn verify_webhook_signature(
        payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> AppResult<()> {
        if Self::verify(payload, signature, secret)? {
            Ok(())
        } else {
            Err(AppError::WebhookVerification(
                "Invalid webhook signature".to_string(),
            ))
        }
    }
}
