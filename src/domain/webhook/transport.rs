//! Inbound transport context for webhook resolution.
//!
//! A webhook reaches the resolver through one of two capture strategies:
//!
//! - **bridged**: headers and body captured by an HTTP framework bridge
//! - **ambient**: raw server variables plus the raw input body, for plain
//!   deployments without a bridge
//!
//! Both are optional and carried explicitly, so the selection between them
//! is visible in [`WebhookTransport::extract`].

use std::collections::HashMap;

/// Header carrying the Stripe signature (matched case-insensitively).
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Server variable carrying the Stripe signature in ambient captures.
pub const SIGNATURE_SERVER_VAR: &str = "HTTP_STRIPE_SIGNATURE";

/// Headers and body captured by an HTTP bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgedRequest {
    headers: Vec<(String, Vec<String>)>,
    content: String,
}

impl BridgedRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            headers: Vec::new(),
            content: content.into(),
        }
    }

    /// Appends a header value. Repeated names accumulate values in order.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.headers.push((name, vec![value])),
        }
        self
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Raw server state captured without an HTTP bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientRequest {
    server_vars: HashMap<String, String>,
    raw_input: String,
}

impl AmbientRequest {
    pub fn new(raw_input: impl Into<String>) -> Self {
        Self {
            server_vars: HashMap::new(),
            raw_input: raw_input.into(),
        }
    }

    pub fn with_server_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.server_vars.insert(name.into(), value.into());
        self
    }

    pub fn server_var(&self, name: &str) -> Option<&str> {
        self.server_vars.get(name).map(String::as_str)
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }
}

/// Which capture strategy supplied the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureSource {
    Bridged,
    Ambient,
}

/// Signature and payload pulled out of a transport context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedPayload<'a> {
    pub signature: &'a str,
    pub payload: &'a str,
    pub source: SignatureSource,
}

/// Transport context handed to the webhook resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookTransport {
    pub bridged: Option<BridgedRequest>,
    pub ambient: Option<AmbientRequest>,
}

impl WebhookTransport {
    /// A context captured by an HTTP bridge only.
    pub fn bridged(request: BridgedRequest) -> Self {
        Self {
            bridged: Some(request),
            ambient: None,
        }
    }

    /// A context captured from raw server state only.
    pub fn ambient(request: AmbientRequest) -> Self {
        Self {
            bridged: None,
            ambient: Some(request),
        }
    }

    pub fn with_ambient(mut self, request: AmbientRequest) -> Self {
        self.ambient = Some(request);
        self
    }

    /// Extracts the signature and payload.
    ///
    /// The bridged `stripe-signature` header wins; the ambient
    /// `HTTP_STRIPE_SIGNATURE` variable is the fallback. The payload is the
    /// bridged content when non-empty, otherwise the ambient raw input.
    /// Returns `None` when neither strategy yields a signature.
    pub fn extract(&self) -> Option<SignedPayload<'_>> {
        let bridged_signature = self
            .bridged
            .as_ref()
            .and_then(|request| request.header(SIGNATURE_HEADER))
            .map(|signature| (signature, SignatureSource::Bridged));
        let (signature, source) = bridged_signature.or_else(|| {
            self.ambient
                .as_ref()
                .and_then(|request| request.server_var(SIGNATURE_SERVER_VAR))
                .map(|signature| (signature, SignatureSource::Ambient))
        })?;

        Some(SignedPayload {
            signature,
            payload: self.payload(),
            source,
        })
    }

    fn payload(&self) -> &str {
        match (&self.bridged, &self.ambient) {
            (Some(bridged), _) if !bridged.content().is_empty() => bridged.content(),
            (_, Some(ambient)) => ambient.raw_input(),
            (Some(bridged), None) => bridged.content(),
            (None, None) => "",
        }
    }
}
