//! Checkout and payment reconciliation endpoints
//!
//! `create_checkout_session` turns a cart into ledger rows plus a hosted
//! gateway session. `webhook` receives the gateway's asynchronous status
//! events and applies the matching ledger transition. The session lookups
//! back the storefront's success and cancel pages.

use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Book, OrderStatus, PaymentStatus};
use shared::response::ApiResponse;

use crate::db;
use crate::db::orders::{NewOrderItem, OrderTransition};
use crate::state::AppState;
use crate::stripe::{self, CheckoutLine, SessionMetadata, to_cents};
use crate::util::now_millis;

use super::ApiResult;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// POST /payments/create-checkout-session
///
/// Client-sent `title`/`price` fields on cart lines are accepted on the wire
/// but never read: every line is re-priced from the catalog by book id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    pub payment_method: Option<String>,
    pub user: Option<CheckoutUser>,
}

#[derive(Debug, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutUser {
    pub id: i64,
}

#[derive(Debug)]
struct PricedCart {
    total: Decimal,
    order_items: Vec<NewOrderItem>,
    lines: Vec<CheckoutLine>,
}

/// Price a cart against catalog rows. Fails when a line references a book
/// the catalog does not have.
fn price_cart(cart: &[CartItem], books: &[Book]) -> AppResult<PricedCart> {
    let by_id: HashMap<i64, &Book> = books.iter().map(|b| (b.id, b)).collect();

    let mut total = Decimal::ZERO;
    let mut order_items = Vec::with_capacity(cart.len());
    let mut lines = Vec::with_capacity(cart.len());
    for item in cart {
        let book = by_id
            .get(&item.id)
            .copied()
            .ok_or_else(|| AppError::validation(format!("Book {} does not exist", item.id)))?;
        total += book.price * Decimal::from(item.quantity);
        order_items.push(NewOrderItem {
            book_id: book.id,
            quantity: item.quantity,
            price: book.price,
        });
        let unit_amount_cents =
            to_cents(book.price).ok_or_else(|| AppError::internal("Price out of range"))?;
        lines.push(CheckoutLine {
            name: book.title.clone(),
            unit_amount_cents,
            quantity: i64::from(item.quantity),
        });
    }

    Ok(PricedCart {
        total,
        order_items,
        lines,
    })
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(req): Json<CreateCheckoutRequest>,
) -> ApiResult<ApiResponse<Value>> {
    let buyer = req.user.ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "User must be logged in")
    })?;
    let user = db::users::find_by_id(&state.pool, buyer.id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "User must be logged in")
        })?;

    if req.cart_items.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyCart).into());
    }
    if req.cart_items.iter().any(|item| item.quantity < 1) {
        return Err(AppError::validation("Item quantity must be at least 1").into());
    }

    let ids: Vec<i64> = req.cart_items.iter().map(|item| item.id).collect();
    let books = db::books::find_by_ids(&state.pool, &ids).await?;
    let cart = price_cart(&req.cart_items, &books)?;

    let method = req.payment_method.unwrap_or_else(|| "card".to_string());
    let transaction_reference = uuid::Uuid::new_v4().to_string();
    let now = now_millis();
    let (order_id, payment_id) = db::orders::create_order_with_payment(
        &state.pool,
        user.id,
        cart.total,
        &cart.order_items,
        &method,
        &transaction_reference,
        now,
    )
    .await?;

    let metadata = SessionMetadata {
        order_id,
        payment_id,
        user_id: user.id,
    };
    let success_url = format!(
        "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
        state.frontend_base_url
    );
    let cancel_url = format!("{}/payment-cancel", state.frontend_base_url);

    // Ledger rows stay pending if this fails; the webhook (or support
    // tooling) settles them later
    let session = state
        .gateway
        .create_checkout_session(&cart.lines, metadata, &success_url, &cancel_url)
        .await
        .map_err(|e| {
            tracing::error!(order_id, "Checkout session creation failed: {e}");
            AppError::new(ErrorCode::GatewayError)
        })?;

    if let Err(e) = state
        .mailer
        .send_order_placed(&user.email, order_id, cart.total)
        .await
    {
        tracing::warn!(order_id, "Order placed email failed: {e}");
    }

    Ok(Json(ApiResponse::success(json!({
        "url": session.url,
        "sessionId": session.id,
    }))))
}

/// POST /payments/webhook
///
/// Raw-body handler: the signature covers the exact bytes the gateway sent.
/// Once the signature checks out the event is always acknowledged, even when
/// the ledger update fails, so the gateway does not retry forever against a
/// persistent internal fault.
pub async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    else {
        return AppError::with_message(
            ErrorCode::InvalidSignature,
            "Missing Stripe-Signature header",
        )
        .into_response();
    };
    if let Err(reason) =
        stripe::verify_webhook_signature(&body, signature, &state.stripe_webhook_secret)
    {
        tracing::warn!("Webhook signature rejected: {reason}");
        return AppError::with_message(ErrorCode::InvalidSignature, reason).into_response();
    }

    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Webhook payload is not valid JSON: {e}");
            return ack();
        }
    };

    let event_type = event["type"].as_str().unwrap_or_default();
    let object = &event["data"]["object"];

    match event_type {
        "checkout.session.completed" => {
            let Some(meta) = SessionMetadata::from_object(object) else {
                tracing::warn!("Webhook event has no usable correlation metadata");
                return ack();
            };
            // Prefer the payment intent as the durable reference; fall back
            // to the session id
            let gateway_reference = object["payment_intent"]
                .as_str()
                .or_else(|| object["id"].as_str());

            let details = format!("Order {} payment completed", meta.order_id);
            let transition = OrderTransition {
                order_id: meta.order_id,
                payment_id: meta.payment_id,
                payment_status: PaymentStatus::Completed,
                order_status: OrderStatus::Paid,
                gateway_reference,
                log_action: "Payment Completed",
                log_details: &details,
                now: now_millis(),
            };
            match db::orders::transition_payment_and_order(&state.pool, &transition).await {
                Ok(true) => {
                    if let Err(e) = send_confirmation_email(&state, &meta).await {
                        tracing::warn!(
                            order_id = meta.order_id,
                            "Payment confirmed email failed: {e}"
                        );
                    }
                }
                Ok(false) => {
                    tracing::info!(
                        order_id = meta.order_id,
                        "Payment already reconciled, ignoring redelivery"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        order_id = meta.order_id,
                        "Payment completion transition failed: {e}"
                    );
                }
            }
        }
        "checkout.session.expired" | "payment_intent.payment_failed" => {
            let Some(meta) = SessionMetadata::from_object(object) else {
                tracing::warn!("Webhook event has no usable correlation metadata");
                return ack();
            };

            let details = format!("Order {} payment failed ({event_type})", meta.order_id);
            let transition = OrderTransition {
                order_id: meta.order_id,
                payment_id: meta.payment_id,
                payment_status: PaymentStatus::Failed,
                order_status: OrderStatus::Cancelled,
                gateway_reference: None,
                log_action: "Payment Failed",
                log_details: &details,
                now: now_millis(),
            };
            match db::orders::transition_payment_and_order(&state.pool, &transition).await {
                Ok(true) => {
                    if let Err(e) = send_failure_email(&state, &meta).await {
                        tracing::warn!(
                            order_id = meta.order_id,
                            "Payment failed email failed: {e}"
                        );
                    }
                }
                Ok(false) => {
                    tracing::info!(
                        order_id = meta.order_id,
                        "Payment already reconciled, ignoring redelivery"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        order_id = meta.order_id,
                        "Payment failure transition failed: {e}"
                    );
                }
            }
        }
        _ => {
            tracing::debug!(event_type, "Ignoring webhook event");
        }
    }

    ack()
}

fn ack() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Webhook received" })),
    )
        .into_response()
}

async fn send_confirmation_email(
    state: &AppState,
    meta: &SessionMetadata,
) -> Result<(), BoxError> {
    let user = db::users::find_by_id(&state.pool, meta.user_id)
        .await?
        .ok_or("buyer no longer exists")?;
    let order = db::orders::find_by_id(&state.pool, meta.order_id)
        .await?
        .ok_or("order no longer exists")?;
    let items = db::orders::items_with_titles(&state.pool, meta.order_id).await?;
    state
        .mailer
        .send_payment_confirmed(&user.email, meta.order_id, &items, order.total_amount)
        .await
}

async fn send_failure_email(state: &AppState, meta: &SessionMetadata) -> Result<(), BoxError> {
    let user = db::users::find_by_id(&state.pool, meta.user_id)
        .await?
        .ok_or("buyer no longer exists")?;
    state
        .mailer
        .send_payment_failed(&user.email, meta.order_id)
        .await
}

/// GET /payments/verify-session and /payments/check-session
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Success-page lookup: reports the session's payment status plus the
/// order id from its correlation metadata.
pub async fn verify_session(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> ApiResult<Value> {
    let session = fetch_session(&state, q).await?;
    Ok(Json(json!({
        "success": true,
        "session_payment_status": session["payment_status"],
        "order_id": session["metadata"]["orderId"],
    })))
}

/// Cancel-page lookup: reports the session's own lifecycle status.
pub async fn check_session(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> ApiResult<Value> {
    let session = fetch_session(&state, q).await?;
    Ok(Json(json!({
        "success": true,
        "session": {
            "id": session["id"],
            "status": session["status"],
            "payment_status": session["payment_status"],
        },
    })))
}

async fn fetch_session(state: &AppState, q: SessionQuery) -> AppResult<Value> {
    let session_id = q
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Missing session_id"))?;

    state
        .gateway
        .retrieve_session(&session_id)
        .await
        .map_err(|e| {
            tracing::error!("Session lookup failed: {e}");
            AppError::new(ErrorCode::GatewayError)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, cents: i64) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Author".to_string(),
            description: "Description".to_string(),
            category: "Fiction".to_string(),
            price: Decimal::new(cents, 2),
            image_url: None,
            created_at: 0,
        }
    }

    #[test]
    fn cart_total_is_sum_of_price_times_quantity() {
        let books = vec![book(1, "First", 1000), book(2, "Second", 550)];
        let cart = vec![
            CartItem { id: 1, quantity: 2 },
            CartItem { id: 2, quantity: 1 },
        ];

        let priced = price_cart(&cart, &books).unwrap();
        assert_eq!(priced.total, Decimal::new(2550, 2));
        assert_eq!(priced.order_items.len(), 2);
        assert_eq!(priced.order_items[0].price, Decimal::new(1000, 2));
        assert_eq!(priced.order_items[0].quantity, 2);
    }

    #[test]
    fn gateway_lines_use_catalog_price_in_cents() {
        let books = vec![book(7, "Priced", 1999)];
        let cart = vec![CartItem { id: 7, quantity: 3 }];

        let priced = price_cart(&cart, &books).unwrap();
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].name, "Priced");
        assert_eq!(priced.lines[0].unit_amount_cents, 1999);
        assert_eq!(priced.lines[0].quantity, 3);
        assert_eq!(priced.total, Decimal::new(5997, 2));
    }

    #[test]
    fn unknown_book_in_cart_is_rejected() {
        let books = vec![book(1, "Known", 500)];
        let cart = vec![
            CartItem { id: 1, quantity: 1 },
            CartItem { id: 99, quantity: 1 },
        ];

        let err = price_cart(&cart, &books).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn empty_cart_prices_to_zero() {
        let priced = price_cart(&[], &[]).unwrap();
        assert_eq!(priced.total, Decimal::ZERO);
        assert!(priced.order_items.is_empty());
        assert!(priced.lines.is_empty());
    }

    #[test]
    fn duplicate_lines_for_the_same_book_both_count() {
        let books = vec![book(3, "Twice", 250)];
        let cart = vec![
            CartItem { id: 3, quantity: 1 },
            CartItem { id: 3, quantity: 2 },
        ];

        let priced = price_cart(&cart, &books).unwrap();
        assert_eq!(priced.total, Decimal::new(750, 2));
        assert_eq!(priced.order_items.len(), 2);
    }
}
