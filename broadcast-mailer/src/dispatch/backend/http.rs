//! HTTP backend
//!
//! Posts the broadcast as JSON to the mail dispatch endpoint.

use async_trait::async_trait;

use crate::dispatch::{BroadcastRequest, DispatchError, DispatchReply, MailDispatch};

/// Mail dispatch over HTTP
///
/// # Examples
///
/// ```rust,no_run
/// use broadcast_mailer::dispatch::HttpMailDispatch;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dispatch = HttpMailDispatch::new("https://app.example.com/api/send-email")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpMailDispatch {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailDispatch {
    /// Create a backend posting to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Transport` if the HTTP client cannot be built
    pub fn new(endpoint: impl Into<String>) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a backend reusing an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint requests are posted to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MailDispatch for HttpMailDispatch {
    async fn send(&self, request: &BroadcastRequest) -> Result<DispatchReply, DispatchError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            audience = %request.audience,
            "Posting broadcast request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Mail dispatch returned an error status");
            return Err(DispatchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        DispatchReply::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Audience;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/send-email")
    }

    fn request() -> BroadcastRequest {
        BroadcastRequest {
            audience: Audience::All,
            event_id: String::new(),
            subject: "Hi".to_string(),
            message: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_json_and_parses_success() {
        let received: Arc<Mutex<Option<Value>>> = Arc::default();
        let captured = Arc::clone(&received);
        let app = Router::new().route(
            "/api/send-email",
            post(move |Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({ "success": true, "count": 42 }))
                }
            }),
        );
        let endpoint = serve(app).await;

        let dispatch = HttpMailDispatch::new(endpoint).unwrap();
        let reply = dispatch.send(&request()).await.unwrap();

        assert_eq!(reply, DispatchReply::Sent { count: 42 });
        assert_eq!(
            received.lock().unwrap().clone().unwrap(),
            json!({ "type": "all", "eventId": "", "subject": "Hi", "message": "Test" })
        );
    }

    #[tokio::test]
    async fn test_declined_reply() {
        let app = Router::new().route(
            "/api/send-email",
            post(|| async { Json(json!({ "success": false, "message": "No recipients found" })) }),
        );
        let dispatch = HttpMailDispatch::new(serve(app).await).unwrap();

        let reply = dispatch.send(&request()).await.unwrap();
        assert_eq!(
            reply,
            DispatchReply::Declined {
                message: "No recipients found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_is_transport_failure() {
        let app = Router::new().route(
            "/api/send-email",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": "boom" })),
                )
            }),
        );
        let dispatch = HttpMailDispatch::new(serve(app).await).unwrap();

        let result = dispatch.send(&request()).await;
        assert!(matches!(result, Err(DispatchError::Status(500))));
    }

    #[tokio::test]
    async fn test_unparsable_body() {
        let app = Router::new().route("/api/send-email", post(|| async { "not json" }));
        let dispatch = HttpMailDispatch::new(serve(app).await).unwrap();

        let result = dispatch.send(&request()).await;
        assert!(matches!(result, Err(DispatchError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dispatch = HttpMailDispatch::new(format!("http://{addr}/api/send-email")).unwrap();
        let result = dispatch.send(&request()).await;
        assert!(matches!(result, Err(DispatchError::Transport(_))));
    }
}
