//! # Order API
//!
//! The one external call in the cart subsystem.
//!
//! ## Response Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST {base_url}{order_path}                                           │
//! │       │                                                                 │
//! │       ├── no response (DNS, connect, timeout) ──► Network              │
//! │       ├── 2xx ──────────────────────────────────► OrderAccepted        │
//! │       │                                           { redirect? }        │
//! │       ├── 401 ──────────────────────────────────► Unauthorized(msg)    │
//! │       └── other ────────────────────────────────► Server{status, msg}  │
//! │                                                                         │
//! │  msg = body.message, else the configured fallback                      │
//! │        ("Failed to place order")                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{CheckoutError, CheckoutResult};
use crate::payload::{ErrorResponse, OrderRequest, OrderResponse};

/// Header carrying the per-attempt request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// What the server told us about a placed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderAccepted {
    /// Optional navigation hint from the server.
    pub redirect: Option<String>,
}

/// The order placement seam.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Places an order. Never retries.
    async fn place_order(
        &self,
        order: &OrderRequest,
        credential: &Credential,
        request_id: Uuid,
    ) -> CheckoutResult<OrderAccepted>;
}

/// [`OrderApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    http: Client,
    endpoint: Url,
    fallback_message: String,
}

impl HttpOrderApi {
    /// Creates a client for the configured endpoint.
    pub fn new(config: &ClientConfig) -> CheckoutResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CheckoutError::InvalidConfig(e.to_string()))?;

        Ok(HttpOrderApi {
            http,
            endpoint: config.order_url()?,
            fallback_message: config.checkout.fallback_error_message.clone(),
        })
    }

    /// The place-order URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn failure_message(&self, body: &str) -> String {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.fallback_message.clone())
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn place_order(
        &self,
        order: &OrderRequest,
        credential: &Credential,
        request_id: Uuid,
    ) -> CheckoutResult<OrderAccepted> {
        debug!(%request_id, url = %self.endpoint, "Sending order");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, credential.authorization())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(order)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let parsed: OrderResponse = serde_json::from_str(&body).unwrap_or_default();
            let redirect = parsed.redirect.filter(|r| !r.trim().is_empty());
            debug!(%request_id, status = status.as_u16(), ?redirect, "Order accepted");
            return Ok(OrderAccepted { redirect });
        }

        let message = self.failure_message(&body);
        warn!(%request_id, status = status.as_u16(), %message, "Order rejected");

        if status == StatusCode::UNAUTHORIZED {
            return Err(CheckoutError::Unauthorized(message));
        }

        Err(CheckoutError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::{Json, Router};
    use munch_core::{Cart, MenuItem, Money, Vendor};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn responding(status: AxumStatus, body: &'static str, seen: Seen) -> Router {
        Router::new().route(
            "/mall/placeOrder",
            post(move |headers: HeaderMap, Json(payload): Json<Value>| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push((headers, payload));
                    (status, body)
                }
            }),
        )
    }

    fn client(base_url: String) -> HttpOrderApi {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url;
        config.api.request_timeout_secs = 5;
        HttpOrderApi::new(&config).unwrap()
    }

    fn order() -> OrderRequest {
        let mut cart = Cart::new();
        cart.add_item(
            &Vendor::new("v1", "Dosa Corner"),
            &MenuItem::new("i1", "Masala Dosa", Money::from_major(100)),
        )
        .unwrap();
        OrderRequest::from(&cart)
    }

    #[tokio::test]
    async fn test_success_sends_headers_and_payload() {
        let seen = Seen::default();
        let base = serve(responding(
            AxumStatus::OK,
            r#"{"redirect":"/Foodcart/orders/42"}"#,
            seen.clone(),
        ))
        .await;
        let request_id = Uuid::new_v4();

        let accepted = client(base)
            .place_order(&order(), &Credential::new("tok"), request_id)
            .await
            .unwrap();

        assert_eq!(accepted.redirect.as_deref(), Some("/Foodcart/orders/42"));

        let seen = seen.lock().unwrap();
        let (headers, payload) = &seen[0];
        assert_eq!(headers["authorization"], "Bearer tok");
        assert_eq!(headers["x-request-id"], request_id.to_string().as_str());
        assert_eq!(
            payload,
            &json!({"orders":[{"foodCartId":"v1","items":[
                {"itemId":"i1","name":"Masala Dosa","price":100,"veg":false,"quantity":1}
            ]}]})
        );
    }

    #[tokio::test]
    async fn test_success_with_empty_body() {
        let base = serve(responding(AxumStatus::CREATED, "", Seen::default())).await;

        let accepted = client(base)
            .place_order(&order(), &Credential::new("tok"), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(accepted, OrderAccepted::default());
    }

    #[tokio::test]
    async fn test_server_message_is_surfaced() {
        let base = serve(responding(
            AxumStatus::BAD_REQUEST,
            r#"{"message":"Food cart is closed"}"#,
            Seen::default(),
        ))
        .await;

        let err = client(base)
            .place_order(&order(), &Credential::new("tok"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::Server {
                status: 400,
                message: "Food cart is closed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unparsable_failure_uses_fallback() {
        let base = serve(responding(
            AxumStatus::INTERNAL_SERVER_ERROR,
            "<html>oops</html>",
            Seen::default(),
        ))
        .await;

        let err = client(base)
            .place_order(&order(), &Credential::new("tok"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to place order");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let base = serve(responding(
            AxumStatus::UNAUTHORIZED,
            r#"{"message":"Session expired"}"#,
            Seen::default(),
        ))
        .await;

        let err = client(base)
            .place_order(&order(), &Credential::new("tok"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::Unauthorized("Session expired".to_string()));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr))
            .place_order(&order(), &Credential::new("tok"), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Network(_)));
    }
}
