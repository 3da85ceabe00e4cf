//! Integration tests for cancel reconciliation.
//!
//! These tests verify the tag-then-cancel protocol against a mock Stripe
//! that keeps intent state, and that the resulting `payment_intent.canceled`
//! webhook routes back to the token minted during the cancel.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;

use stripe_gateway::adapters::{ChannelNotifier, InMemoryTokenStore, MockStripeClient};
use stripe_gateway::application::{
    CancelError, CancelPaymentCommand, CancelPaymentHandler, CancelPaymentResult, CancelPhase,
    DispatchOutcome, HandleWebhookCommand, HandleWebhookHandler, MarkerCheck,
    ResolveWebhookEventHandler, WebhookEventRouter,
};
use stripe_gateway::domain::payment::{
    Identity, ModelShape, PaymentDetails, ResourceType, Token, CANCEL_AUTHORIZED_TOKEN_HASH_KEY,
    STATUS_CANCELED,
};
use stripe_gateway::domain::webhook::{
    compute_signature, BridgedRequest, StripeSignatureVerifier, WebhookTransport,
};
use stripe_gateway::ports::{PaymentError, PaymentErrorCode, StripeResourceClient};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    stripe: MockStripeClient,
    tokens: InMemoryTokenStore,
    handler: CancelPaymentHandler,
}

fn harness() -> Harness {
    let stripe = MockStripeClient::new();
    let tokens = InMemoryTokenStore::new("https://shop.test/payment/notify");
    let handler = CancelPaymentHandler::new(Arc::new(stripe.clone()), Arc::new(tokens.clone()));
    Harness {
        stripe,
        tokens,
        handler,
    }
}

fn model(object: &str, id: &str) -> PaymentDetails {
    PaymentDetails::try_from(json!({
        "object": object,
        "id": id,
        "status": "requires_capture",
        "amount": 1000,
        "metadata": { "token_hash": "origin" }
    }))
    .unwrap()
}

fn request_token() -> Token {
    Token::new("cancel_request", "stripe", "https://shop.test/payment/cancel/1")
        .with_details(Identity::new("42", "Payment"))
}

// =============================================================================
// Protocol
// =============================================================================

#[tokio::test]
async fn cancel_tags_then_cancels_and_merges() {
    let h = harness();
    h.stripe
        .add_intent(ResourceType::PaymentIntent, "pi_1", "requires_capture");
    let mut cmd = CancelPaymentCommand::new(Some(request_token()), model("payment_intent", "pi_1"));

    let result = h.handler.handle(&mut cmd).await.unwrap();

    let CancelPaymentResult::Canceled {
        notify_token,
        marker,
        ..
    } = result
    else {
        panic!("expected a cancel");
    };
    assert_eq!(marker, MarkerCheck::Confirmed);

    let methods: Vec<String> = h.stripe.calls().into_iter().map(|c| c.method).collect();
    assert_eq!(methods, vec!["update", "cancel"]);

    let model = cmd.model.unwrap();
    assert_eq!(model.get("status"), Some(&json!(STATUS_CANCELED)));
    assert_eq!(
        model.metadata(CANCEL_AUTHORIZED_TOKEN_HASH_KEY),
        Some(notify_token.hash.as_str())
    );
    // Local-only attributes survive the merge
    assert_eq!(model.get("amount"), Some(&json!(1000)));
}

#[tokio::test]
async fn notify_token_is_scoped_to_request_model() {
    let h = harness();
    h.stripe
        .add_intent(ResourceType::SetupIntent, "seti_1", "requires_payment_method");
    let mut cmd = CancelPaymentCommand::new(Some(request_token()), model("setup_intent", "seti_1"));

    let result = h.handler.handle(&mut cmd).await.unwrap();

    let CancelPaymentResult::Canceled { notify_token, .. } = result else {
        panic!("expected a cancel");
    };
    assert_eq!(notify_token.gateway_name, "stripe");
    assert_eq!(notify_token.details, Some(Identity::new("42", "Payment")));
    assert_ne!(notify_token.hash, "cancel_request");
    assert!(notify_token.target_url.ends_with(&notify_token.hash));
    assert_eq!(h.tokens.len().await, 1);
}

#[tokio::test]
async fn empty_and_unknown_models_make_no_remote_calls() {
    let h = harness();

    let mut empty = CancelPaymentCommand::new(None, PaymentDetails::new());
    let mut unknown = CancelPaymentCommand::new(Some(request_token()), model("charge", "ch_1"));

    assert_eq!(
        h.handler.handle(&mut empty).await.unwrap(),
        CancelPaymentResult::Skipped {
            shape: ModelShape::Empty
        }
    );
    assert_eq!(
        h.handler.handle(&mut unknown).await.unwrap(),
        CancelPaymentResult::Skipped {
            shape: ModelShape::Unknown {
                object: "charge".to_string()
            }
        }
    );
    assert!(h.stripe.calls().is_empty());
    assert!(h.tokens.is_empty().await);
}

#[tokio::test]
async fn missing_request_token_fails_before_any_call() {
    let h = harness();
    h.stripe
        .add_intent(ResourceType::PaymentIntent, "pi_1", "requires_capture");
    let mut cmd = CancelPaymentCommand::new(None, model("payment_intent", "pi_1"));

    let err = h.handler.handle(&mut cmd).await.unwrap_err();

    assert!(matches!(err, CancelError::TokenRequired));
    assert!(h.stripe.calls().is_empty());
}

// =============================================================================
// Failures and races
// =============================================================================

#[tokio::test]
async fn cancel_failure_leaves_intent_tagged_and_model_merged() {
    let h = harness();
    h.stripe
        .add_intent(ResourceType::PaymentIntent, "pi_1", "succeeded");
    h.stripe.set_method_error(
        "cancel",
        PaymentError::invalid_request("You cannot cancel this PaymentIntent")
            .with_provider_code("payment_intent_unexpected_state"),
    );
    let mut cmd = CancelPaymentCommand::new(Some(request_token()), model("payment_intent", "pi_1"));

    let err = h.handler.handle(&mut cmd).await.unwrap_err();

    match &err {
        CancelError::Remote {
            phase,
            source,
            id,
            ..
        } => {
            assert_eq!(*phase, CancelPhase::Cancel);
            assert_eq!(id, "pi_1");
            assert_eq!(source.code, PaymentErrorCode::InvalidRequest);
            assert_eq!(
                source.provider_code.as_deref(),
                Some("payment_intent_unexpected_state")
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!err.is_retryable());

    let remote = h.stripe.intent(ResourceType::PaymentIntent, "pi_1").unwrap();
    assert!(remote.metadata(CANCEL_AUTHORIZED_TOKEN_HASH_KEY).is_some());
    assert_eq!(remote.status(), Some("succeeded"));
    assert!(cmd
        .model
        .unwrap()
        .metadata(CANCEL_AUTHORIZED_TOKEN_HASH_KEY)
        .is_some());
}

#[tokio::test]
async fn tag_failure_is_retryable_when_network_fails() {
    let h = harness();
    h.stripe
        .add_intent(ResourceType::PaymentIntent, "pi_1", "requires_capture");
    h.stripe
        .set_method_error("update", PaymentError::network("connection reset"));
    let mut cmd = CancelPaymentCommand::new(Some(request_token()), model("payment_intent", "pi_1"));

    let err = h.handler.handle(&mut cmd).await.unwrap_err();

    assert!(matches!(
        err,
        CancelError::Remote {
            phase: CancelPhase::Tag,
            ..
        }
    ));
    assert!(err.is_retryable());
    assert!(!h.stripe.was_called("cancel"));
}

#[tokio::test]
async fn unknown_model_without_token_is_rejected() {
    let h = harness();
    let mut cmd = CancelPaymentCommand::new(None, model("charge", "ch_1"));

    let err = h.handler.handle(&mut cmd).await.unwrap_err();

    assert!(matches!(err, CancelError::TokenRequired));
    assert!(h.stripe.calls().is_empty());
    assert!(h.tokens.is_empty().await);
}

#[tokio::test]
async fn racing_cancel_is_reported_as_marker_mismatch() {
    let h = harness();
    h.stripe
        .add_intent(ResourceType::PaymentIntent, "pi_1", "requires_capture");
    h.stripe.simulate_racing_cancel("someone_else");
    let mut cmd = CancelPaymentCommand::new(Some(request_token()), model("payment_intent", "pi_1"));

    let result = h.handler.handle(&mut cmd).await.unwrap();

    let CancelPaymentResult::Canceled {
        notify_token,
        marker,
        ..
    } = result
    else {
        panic!("expected a cancel");
    };
    assert_eq!(
        marker,
        MarkerCheck::Mismatch {
            expected: notify_token.hash,
            found: Some("someone_else".to_string()),
        }
    );
}

// =============================================================================
// Round trip through the webhook pipeline
// =============================================================================

#[tokio::test]
async fn cancel_webhook_notifies_minted_token() {
    let h = harness();
    h.tokens
        .insert(Token::new("origin", "stripe", "https://shop.test/payment/notify/origin"))
        .await;
    h.stripe
        .add_intent(ResourceType::PaymentIntent, "pi_1", "requires_capture");
    h.stripe
        .update(
            ResourceType::PaymentIntent,
            "pi_1",
            json!({ "metadata": { "token_hash": "origin" } }),
        )
        .await
        .unwrap();

    let mut cmd = CancelPaymentCommand::new(Some(request_token()), model("payment_intent", "pi_1"));
    let CancelPaymentResult::Canceled { notify_token, .. } = h.handler.handle(&mut cmd).await.unwrap()
    else {
        panic!("expected a cancel");
    };

    // Stripe sends the canceled intent back as a webhook
    let remote = h.stripe.intent(ResourceType::PaymentIntent, "pi_1").unwrap();
    let payload = json!({
        "id": "evt_cancel",
        "type": "payment_intent.canceled",
        "data": { "object": remote.attributes() }
    })
    .to_string();
    let now = chrono::Utc::now().timestamp();
    let header = format!(
        "t={},v1={}",
        now,
        compute_signature("whsec_cancel", now, &payload)
    );

    let (notifier, mut notifications) = ChannelNotifier::channel(4);
    let pipeline = HandleWebhookHandler::new(
        Arc::new(ResolveWebhookEventHandler::new(
            vec![SecretString::new("whsec_cancel".to_string())],
            StripeSignatureVerifier::default(),
        )),
        Arc::new(WebhookEventRouter::new(
            Arc::new(h.tokens.clone()),
            Arc::new(notifier),
        )),
    );

    let result = pipeline
        .handle(HandleWebhookCommand {
            transport: WebhookTransport::bridged(
                BridgedRequest::new(payload).with_header("stripe-signature", header),
            ),
        })
        .await
        .unwrap();

    assert_eq!(
        result.outcome,
        DispatchOutcome::Notified {
            route: "payment_intent_canceled_from_cancel",
            token_hash: notify_token.hash.clone(),
        }
    );
    assert_eq!(notifications.recv().await.unwrap().token, notify_token);
}
