//! HTTP routes.
//!
//! The chat front end calls these on behalf of a member. Caller identity
//! travels in each body as `user_id` (plus `display_name` where a profile may
//! be created).

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use tablehost_domain::{Money, PaymentMethod, PollId, SessionUrl, TableName, UserId, UserProfile};

use crate::app::App;
use crate::infrastructure::ports::PaymentInstruction;
use crate::stores::SlotSnapshot;
use crate::use_cases::{
    join::{ConfirmOutcome, JoinReply},
    leave::LeftSession,
    lifecycle::{InterestOutcome, PollOpened},
};

use super::error::ApiError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/session", get(current_session))
        .route("/api/session/end", post(end_session))
        .route("/api/polls", post(start_poll))
        .route(
            "/api/polls/{id}/interest",
            post(record_interest).delete(withdraw_interest),
        )
        .route("/api/join", post(join))
        .route("/api/join/confirm", post(confirm_join))
        .route("/api/join/cancel", post(cancel_join))
        .route("/api/stack", post(add_to_stack))
        .route("/api/leave", post(leave))
        .route("/api/profile/payment", put(set_payment_method))
        .route("/api/profile/table-name", put(set_table_name))
        .route("/api/profile/{user_id}", get(get_profile))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Request / response bodies
// =============================================================================

#[derive(Debug, Deserialize)]
struct Caller {
    user_id: UserId,
}

#[derive(Debug, Deserialize)]
struct InterestBody {
    user_id: UserId,
    #[serde(default)]
    is_bot: bool,
}

#[derive(Debug, Deserialize)]
struct AmountBody {
    user_id: UserId,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct PaymentMethodBody {
    user_id: UserId,
    display_name: String,
    method: PaymentMethod,
    handle: String,
}

#[derive(Debug, Deserialize)]
struct TableNameBody {
    user_id: UserId,
    display_name: String,
    table_name: String,
}

/// Successful reply: the text to show plus the structured result.
#[derive(Debug, Serialize)]
struct Reply<T> {
    message: String,
    result: T,
}

impl<T> Reply<T> {
    fn new(message: impl Into<String>, result: T) -> Json<Self> {
        Json(Self {
            message: message.into(),
            result,
        })
    }
}

#[derive(Debug, Serialize)]
struct SessionEnded {
    url: SessionUrl,
}

#[derive(Debug, Serialize)]
struct InterestWithdrawn {
    /// Remaining count, absent when the poll is no longer open
    count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct JoinCancelled {
    amount: Money,
}

#[derive(Debug, Serialize)]
struct PaymentMethodSet {
    method: PaymentMethod,
    handle: String,
}

#[derive(Debug, Serialize)]
struct TableNameSet {
    table_name: TableName,
}

// =============================================================================
// Session lifecycle
// =============================================================================

async fn current_session(State(app): State<Arc<App>>) -> Json<SlotSnapshot> {
    Json(app.use_cases.lifecycle.current.execute().await)
}

async fn start_poll(
    State(app): State<Arc<App>>,
    Json(body): Json<Caller>,
) -> Result<Json<Reply<PollOpened>>, ApiError> {
    let opened = app.use_cases.lifecycle.start_poll.execute(&body.user_id).await?;
    let message = format!(
        "Who wants to play? The game starts once {} people are in.",
        opened.threshold
    );
    Ok(Reply::new(message, opened))
}

async fn record_interest(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<InterestBody>,
) -> Result<Json<Reply<InterestOutcome>>, ApiError> {
    let outcome = app
        .use_cases
        .lifecycle
        .interest
        .execute(PollId::from_uuid(id), &body.user_id, body.is_bot)
        .await?;
    let message = match &outcome {
        InterestOutcome::Ignored => "That poll is not open.".to_string(),
        InterestOutcome::Counted { count, threshold }
        | InterestOutcome::AlreadyCounted { count, threshold } => {
            format!("{} of {} interested.", count, threshold)
        }
        InterestOutcome::SessionStarted { url } => format!("The game is live: {}", url),
    };
    Ok(Reply::new(message, outcome))
}

async fn withdraw_interest(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<Caller>,
) -> Json<InterestWithdrawn> {
    let count = app
        .use_cases
        .lifecycle
        .interest
        .withdraw(PollId::from_uuid(id), &body.user_id)
        .await;
    Json(InterestWithdrawn { count })
}

async fn end_session(
    State(app): State<Arc<App>>,
    Json(body): Json<Caller>,
) -> Result<Json<Reply<SessionEnded>>, ApiError> {
    let url = app.use_cases.lifecycle.end.execute(&body.user_id).await?;
    Ok(Reply::new("The session has ended.", SessionEnded { url }))
}

// =============================================================================
// Join / leave
// =============================================================================

async fn join(
    State(app): State<Arc<App>>,
    Json(body): Json<AmountBody>,
) -> Result<Json<Reply<JoinReply>>, ApiError> {
    let reply = app.use_cases.join.join(&body.user_id, body.amount).await?;
    Ok(Reply::new(reply.message(), reply))
}

async fn confirm_join(
    State(app): State<Arc<App>>,
    Json(body): Json<Caller>,
) -> Result<Json<Reply<ConfirmOutcome>>, ApiError> {
    let outcome = app.use_cases.join.confirm.execute(&body.user_id).await?;
    Ok(Reply::new(outcome.message(), outcome))
}

async fn cancel_join(
    State(app): State<Arc<App>>,
    Json(body): Json<Caller>,
) -> Result<Json<Reply<JoinCancelled>>, ApiError> {
    let amount = app.use_cases.join.cancel.execute(&body.user_id).await?;
    Ok(Reply::new(
        format!("Your ${} join request was cancelled.", amount),
        JoinCancelled { amount },
    ))
}

async fn add_to_stack(
    State(app): State<Arc<App>>,
    Json(body): Json<AmountBody>,
) -> Result<Json<Reply<PaymentInstruction>>, ApiError> {
    let instruction = app
        .use_cases
        .join
        .add_to_stack
        .execute(&body.user_id, body.amount)
        .await?;
    Ok(Reply::new(instruction.message.clone(), instruction))
}

async fn leave(
    State(app): State<Arc<App>>,
    Json(body): Json<Caller>,
) -> Result<Json<Reply<LeftSession>>, ApiError> {
    let left = app.use_cases.leave.execute(&body.user_id).await?;
    Ok(Reply::new(
        format!("You left the table with ${}.", left.buyout),
        left,
    ))
}

// =============================================================================
// Profile
// =============================================================================

async fn set_payment_method(
    State(app): State<Arc<App>>,
    Json(body): Json<PaymentMethodBody>,
) -> Result<Json<Reply<PaymentMethodSet>>, ApiError> {
    let handle = app
        .use_cases
        .profile
        .ops
        .set_payment_method(&body.user_id, &body.display_name, body.method, &body.handle)
        .await?;
    Ok(Reply::new(
        format!("{} set to {}.", body.method, handle.as_str()),
        PaymentMethodSet {
            method: body.method,
            handle: handle.as_str().to_string(),
        },
    ))
}

async fn set_table_name(
    State(app): State<Arc<App>>,
    Json(body): Json<TableNameBody>,
) -> Result<Json<Reply<TableNameSet>>, ApiError> {
    let table_name = app
        .use_cases
        .profile
        .ops
        .set_table_name(&body.user_id, &body.display_name, &body.table_name)
        .await?;
    Ok(Reply::new(
        format!("Table name set to \"{}\".", table_name),
        TableNameSet { table_name },
    ))
}

async fn get_profile(
    State(app): State<Arc<App>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = UserId::new(user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let profile = app.use_cases.profile.ops.get(&user_id).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::ports::{
        MockPaymentResolver, MockProfileRepo, MockSessionRepo, MockTableAdapter,
    };
    use crate::test_fixtures::{active_session, clock, instruction, ready_profile};

    fn app() -> Arc<App> {
        let config = AppConfig::from_lookup(|key| match key {
            "OPERATOR_IDS" => Some("host".into()),
            "POLL_THRESHOLD" => Some("3".into()),
            _ => None,
        })
        .unwrap();

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get_profile()
            .returning(|id| Ok(Some(ready_profile(id.as_str(), "alice"))));
        let mut sessions = MockSessionRepo::new();
        sessions
            .expect_find_active_membership()
            .returning(|_, _| Ok(None));
        let mut payments = MockPaymentResolver::new();
        payments
            .expect_resolve()
            .returning(|_, amount, _| Ok(instruction(amount)));

        Arc::new(App::new(
            &config,
            Arc::new(sessions),
            Arc::new(profiles),
            Arc::new(MockTableAdapter::new()),
            Arc::new(payments),
            clock(),
        ))
    }

    async fn call(app: &Arc<App>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = routes()
            .with_state(Arc::clone(app))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = routes()
            .with_state(app())
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn session_is_idle_at_startup() {
        let (status, body) = call(&app(), "GET", "/api/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "idle" }));
    }

    #[tokio::test]
    async fn poll_echoes_the_configured_threshold() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/polls", Some(json!({ "user_id": "host" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["threshold"], 3);
        assert!(body["message"].as_str().unwrap().contains("3 people"));

        let (_, session) = call(&app, "GET", "/api/session", None).await;
        assert_eq!(session["status"], "polling");
    }

    #[tokio::test]
    async fn only_operators_start_polls() {
        let (status, body) =
            call(&app(), "POST", "/api/polls", Some(json!({ "user_id": "guest" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].as_str().unwrap().contains("host"));
    }

    #[tokio::test]
    async fn join_without_session_is_a_conflict() {
        let (status, body) = call(
            &app(),
            "POST",
            "/api/join",
            Some(json!({ "user_id": "u1", "amount": 50.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "There is no active session to join");
    }

    #[tokio::test]
    async fn join_request_returns_payment_instructions() {
        let app = app();
        app.slot.set_active(active_session()).await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/join",
            Some(json!({ "user_id": "u1", "amount": 50 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["phase"], "requested");
        assert_eq!(body["result"]["amount"], 50.0);
        assert!(body["message"].as_str().unwrap().contains("$50.00"));

        let (status, body) = call(
            &app,
            "POST",
            "/api/join/cancel",
            Some(json!({ "user_id": "u1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["amount"], 50.0);
    }

    #[tokio::test]
    async fn negative_amount_is_a_bad_request() {
        let app = app();
        app.slot.set_active(active_session()).await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/join",
            Some(json!({ "user_id": "u1", "amount": -5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
