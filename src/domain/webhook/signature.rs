//! Stripe webhook signature verification.
//!
//! Implements Stripe's `Stripe-Signature` scheme: HMAC-SHA256 over
//! `"{timestamp}.{payload}"`, hex encoded, with one or more `v1` entries in
//! the header and a symmetric timestamp tolerance window.
//!
//! A verifier checks a payload against exactly one secret. Trying a set of
//! rotating secrets is the resolver's job.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::stripe_event::StripeEvent;

/// Default tolerance between the signed timestamp and the local clock.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// The only signature scheme Stripe currently signs with.
const EXPECTED_SCHEME: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

/// Why a payload failed verification against one secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The signature header could not be parsed.
    #[error("Unable to extract timestamp and signatures from header: {0}")]
    MalformedHeader(String),

    /// No `v1` signature matched the expected one for this secret.
    #[error("No signatures found matching the expected signature for payload")]
    NoSignatureMatch,

    /// The signed timestamp is too far from the local clock.
    #[error("Timestamp {timestamp} outside the tolerance zone (now {now})")]
    TimestampOutsideTolerance { timestamp: i64, now: i64 },

    /// The payload is authentic but is not a Stripe event document.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// Every `v1` signature present (several during secret rotation).
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>][,v0=<legacy>]`
    ///
    /// Unknown keys, `v0` included, are ignored, as are items without `=`
    /// and `v1` values that are not hex. The header is malformed only when
    /// the timestamp is missing or unreadable, or no usable `v1` remains.
    pub fn parse(header: &str) -> Result<Self, VerificationError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for (key, value) in header.split(',').filter_map(|part| part.split_once('=')) {
            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        VerificationError::MalformedHeader("invalid timestamp".into())
                    })?);
                }
                EXPECTED_SCHEME => match hex::decode(value.trim()) {
                    Ok(signature) => v1_signatures.push(signature),
                    Err(_) => tracing::debug!("Skipping v1 signature that is not hex"),
                },
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| VerificationError::MalformedHeader("missing timestamp".into()))?;
        if v1_signatures.is_empty() {
            return Err(VerificationError::MalformedHeader(
                "no signatures found with expected scheme".into(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeSignatureVerifier {
    /// Allowed distance in seconds between the signed timestamp and now.
    /// Zero disables the check.
    tolerance_secs: i64,
}

impl Default for StripeSignatureVerifier {
    fn default() -> Self {
        Self {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl StripeSignatureVerifier {
    /// Creates a verifier with the given timestamp tolerance.
    pub fn with_tolerance(tolerance_secs: u64) -> Self {
        Self {
            tolerance_secs: i64::try_from(tolerance_secs).unwrap_or(i64::MAX),
        }
    }

    /// Verifies `payload` against `signature_header` with `secret` and parses the event.
    pub fn verify(
        &self,
        payload: &str,
        signature_header: &str,
        secret: &str,
    ) -> Result<StripeEvent, VerificationError> {
        self.verify_at(payload, signature_header, secret, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) against an explicit clock reading.
    pub fn verify_at(
        &self,
        payload: &str,
        signature_header: &str,
        secret: &str,
        now: i64,
    ) -> Result<StripeEvent, VerificationError> {
        let header = SignatureHeader::parse(signature_header)?;

        let expected = signature_bytes(secret, header.timestamp, payload);
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(VerificationError::NoSignatureMatch);
        }

        self.validate_timestamp(header.timestamp, now)?;

        serde_json::from_str(payload).map_err(|e| VerificationError::InvalidPayload(e.to_string()))
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), VerificationError> {
        if self.tolerance_secs > 0 && now.abs_diff(timestamp) > self.tolerance_secs.unsigned_abs() {
            return Err(VerificationError::TimestampOutsideTolerance { timestamp, now });
        }
        Ok(())
    }
}

/// Computes the hex `v1` signature Stripe would send for `payload` at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    hex::encode(signature_bytes(secret, timestamp, payload))
}

fn signature_bytes(secret: &str, timestamp: i64, payload: &str) -> Vec<u8> {
    // HMAC is defined for keys of any length, including empty ones.
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.is_empty() || a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";
    const PAYLOAD: &str = r#"{"id":"evt_test123","type":"payment_intent.succeeded","data":{"object":{}}}"#;
    const NOW: i64 = 1_704_067_200;

    fn header_for(secret: &str, timestamp: i64, payload: &str) -> String {
        format!("t={},v1={}", timestamp, compute_signature(secret, timestamp, payload))
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_single_v1() {
        let header = SignatureHeader::parse(&format!("t=1234567890,v1={}", "a".repeat(64))).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_every_v1_and_ignores_v0() {
        let raw = format!(
            "t=1234567890,v1={},v1={},v0={}",
            "a".repeat(64),
            "b".repeat(64),
            "c".repeat(64)
        );

        let header = SignatureHeader::parse(&raw).unwrap();

        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_header_tolerates_whitespace_and_unknown_keys() {
        let raw = format!("t=1234567890, v1={}, scheme=hmac", "a".repeat(64));

        let header = SignatureHeader::parse(&raw).unwrap();

        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));

        assert!(matches!(result, Err(VerificationError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse(&format!("t=1234567890,v0={}", "a".repeat(64)));

        assert!(matches!(result, Err(VerificationError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_rejects_opaque_values() {
        assert!(SignatureHeader::parse("stripeSignature").is_err());
        assert!(SignatureHeader::parse("t=abc,v1=aa").is_err());
        assert!(SignatureHeader::parse("t=1,v1=not_hex").is_err());
    }

    #[test]
    fn parse_header_skips_ill_formed_items() {
        let raw = format!("t=1234567890,garbage,v1=zz,v1={},", "a".repeat(64));

        let header = SignatureHeader::parse(&raw).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures, vec![vec![0xaa; 32]]);
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature_parses_event() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, NOW, PAYLOAD);

        let event = verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW).unwrap();

        assert_eq!(event.id, "evt_test123");
    }

    #[test]
    fn verify_with_current_clock() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, chrono::Utc::now().timestamp(), PAYLOAD);

        assert!(verifier.verify(PAYLOAD, &header, TEST_SECRET).is_ok());
    }

    #[test]
    fn verify_accepts_any_matching_v1_entry() {
        let verifier = StripeSignatureVerifier::default();
        let header = format!(
            "t={},v1={},v1={}",
            NOW,
            "0".repeat(64),
            compute_signature(TEST_SECRET, NOW, PAYLOAD)
        );

        assert!(verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW).is_ok());
    }

    #[test]
    fn verify_accepts_valid_v1_next_to_garbage_v1() {
        let verifier = StripeSignatureVerifier::default();
        let header = format!(
            "t={},v1=not-a-signature,v1={}",
            NOW,
            compute_signature(TEST_SECRET, NOW, PAYLOAD)
        );

        let event = verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW).unwrap();

        assert_eq!(event.id, "evt_test123");
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, NOW, PAYLOAD);

        let result = verifier.verify_at(PAYLOAD, &header, "whsec_other", NOW);

        assert_eq!(result, Err(VerificationError::NoSignatureMatch));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, NOW, PAYLOAD);
        let tampered = PAYLOAD.replace("evt_test123", "evt_hacked");

        let result = verifier.verify_at(&tampered, &header, TEST_SECRET, NOW);

        assert_eq!(result, Err(VerificationError::NoSignatureMatch));
    }

    #[test]
    fn verify_authentic_non_event_payload_fails() {
        let verifier = StripeSignatureVerifier::default();
        let payload = "not json";
        let header = header_for(TEST_SECRET, NOW, payload);

        let result = verifier.verify_at(payload, &header, TEST_SECRET, NOW);

        assert!(matches!(result, Err(VerificationError::InvalidPayload(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp Tolerance Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn timestamp_at_boundary_succeeds() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, NOW - 300, PAYLOAD);

        assert!(verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW).is_ok());
    }

    #[test]
    fn timestamp_too_old_fails() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, NOW - 301, PAYLOAD);

        let result = verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW);

        assert!(matches!(
            result,
            Err(VerificationError::TimestampOutsideTolerance { .. })
        ));
    }

    #[test]
    fn timestamp_too_far_in_future_fails() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, NOW + 301, PAYLOAD);

        let result = verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW);

        assert!(matches!(
            result,
            Err(VerificationError::TimestampOutsideTolerance { .. })
        ));
    }

    #[test]
    fn zero_tolerance_disables_timestamp_check() {
        let verifier = StripeSignatureVerifier::with_tolerance(0);
        let header = header_for(TEST_SECRET, 1, PAYLOAD);

        assert!(verifier.verify_at(PAYLOAD, &header, TEST_SECRET, NOW).is_ok());
    }

    #[test]
    fn signature_is_checked_before_timestamp() {
        let verifier = StripeSignatureVerifier::default();
        let header = header_for(TEST_SECRET, 1, PAYLOAD);

        let result = verifier.verify_at(PAYLOAD, &header, "whsec_other", NOW);

        assert_eq!(result, Err(VerificationError::NoSignatureMatch));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Computation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn compute_signature_is_hex_sha256() {
        let signature = compute_signature(TEST_SECRET, NOW, PAYLOAD);

        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn constant_time_compare_rejects_length_mismatch() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2]));
        assert!(!constant_time_compare(&[], &[]));
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }
}
