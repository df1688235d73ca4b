use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use crate::proposal::{BetProposalRequest, ProposalError, ProposalNormalizer};

pub const GENERATE_BET_PATH: &str = "/api/generate-bet";

#[derive(Clone)]
pub struct AppState {
    pub normalizer: ProposalNormalizer,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_BET_PATH, post(generate_bet))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn generate_bet(State(state): State<AppState>, body: Bytes) -> Response {
    // A body that is not JSON cannot carry a string `input` either
    let request = serde_json::from_slice::<serde_json::Value>(&body)
        .map_err(|_| ProposalError::InvalidInput)
        .and_then(|value| BetProposalRequest::from_json(&value));

    let request = match request {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    let proposal = match state.normalizer.normalize_request(&request).await {
        Ok(proposal) => proposal,
        Err(e) => return e.into_response(),
    };

    match proposal.to_response_body() {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => ProposalError::Unexpected(e.into()).into_response(),
    }
}

impl IntoResponse for ProposalError {
    fn into_response(self) -> Response {
        match self {
            ProposalError::InvalidInput => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid input" }))).into_response()
            }
            ProposalError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body).into_response()
            }
            ProposalError::Unexpected(e) => {
                tracing::error!("generate-bet failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Something went wrong." })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::upstream::MockCompletionClient;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(client: Arc<MockCompletionClient>) -> Router {
        let normalizer = ProposalNormalizer::new(client, UpstreamConfig::default());
        router(AppState { normalizer })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(GENERATE_BET_PATH)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_body(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_generate_bet_ok() {
        let client = Arc::new(MockCompletionClient::with_content(
            r#"Here is the result: { "statement": "X", "feasible": "yes", "confidence": 80, "verificationUrl": "https://a.example/b and https://c.example" } Hope this helps!"#,
        ));
        let response = app(client).oneshot(post_json(r#"{"input": "X happens"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(body["id"], "chatcmpl-mock");
        assert!(body["choices"][0]["message"]["content"].is_string());
        assert_eq!(
            body["parsed"],
            json!({ "statement": "X", "feasible": "yes", "confidence": 80, "verificationUrl": "https://a.example/b" })
        );
    }

    #[tokio::test]
    async fn test_generate_bet_unparsable_content_omits_parsed() {
        let client = Arc::new(MockCompletionClient::with_content("No idea, sorry."));
        let response = app(client).oneshot(post_json(r#"{"input": "???"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert!(body.get("parsed").is_none());
        assert_eq!(body["choices"][0]["message"]["content"], "No idea, sorry.");
    }

    #[tokio::test]
    async fn test_generate_bet_reversed_braces_still_answers() {
        let client = Arc::new(MockCompletionClient::with_content("} nothing useful {"));
        let response = app(client).oneshot(post_json(r#"{"input": "idea"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert!(body.get("parsed").is_none());
    }

    #[tokio::test]
    async fn test_generate_bet_invalid_input() {
        for payload in [r#"{}"#, r#"{"input": 5}"#, r#"{"input": ""}"#, "not json"] {
            let client = Arc::new(MockCompletionClient::with_content("{}"));
            let response = app(client.clone()).oneshot(post_json(payload)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);

            let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
            assert_eq!(body, json!({ "error": "Invalid input" }));
            assert_eq!(client.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_generate_bet_upstream_error_passthrough() {
        let client = Arc::new(MockCompletionClient::with_response(429, "Rate limit reached"));
        let response = app(client).oneshot(post_json(r#"{"input": "idea"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(read_body(response).await, b"Rate limit reached");
    }

    #[tokio::test]
    async fn test_generate_bet_unexpected_error() {
        let client = Arc::new(MockCompletionClient::failing("dns failure"));
        let response = app(client).oneshot(post_json(r#"{"input": "idea"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(body, json!({ "error": "Something went wrong." }));
    }

    #[tokio::test]
    async fn test_healthz() {
        let client = Arc::new(MockCompletionClient::with_content("{}"));
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let response = app(client).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, b"ok");
    }
}
