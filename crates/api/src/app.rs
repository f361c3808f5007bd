use crate::config::openapi::openapi_json;
use crate::handlers::{
    account::{current_account, enroll, set_pin},
    admin_queue::{admin_accounts, admin_stats, pending_queue},
    beneficiaries::{create_beneficiary, list_beneficiaries},
    health::health_check,
    loans::{apply_for_loan, list_loans},
    notifications::{list_notifications, mark_notification_read},
    pay_bill::pay_bill,
    resolve_pending::resolve_pending,
    submit_transfer::submit_transfer,
    transactions::{get_transaction, transaction_history},
};
use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use bankline_core::{AppState, SecurityConfig};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

const BODY_LIMIT_BYTES: usize = 256 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let public_router = create_public_routers();
    let protected_router = create_secured_routers(&state);

    let mut router = Router::new()
        .merge(public_router)
        .merge(protected_router)
        .layer(axum::extract::DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            https_redirect_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    if state.config.rate_limit_enabled {
        // 2 requests per second per client IP, bursts of 10
        match GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
        {
            Some(conf) => router = router.layer(GovernorLayer::new(Arc::new(conf))),
            None => warn!("Invalid rate limit configuration; rate limiting disabled"),
        }
    }

    router.with_state(state)
}

fn create_secured_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/transfers", post(submit_transfer))
        .route("/api/bills", post(pay_bill))
        .route("/api/accounts", post(enroll))
        .route("/api/accounts/me", get(current_account))
        .route("/api/accounts/pin", post(set_pin))
        .route(
            "/api/beneficiaries",
            get(list_beneficiaries).post(create_beneficiary),
        )
        .route("/api/loans", get(list_loans).post(apply_for_loan))
        .route("/api/transactions", get(transaction_history))
        .route("/api/transactions/{id}", get(get_transaction))
        .route("/api/notifications", get(list_notifications))
        .route(
            "/api/notifications/{id}/read",
            post(mark_notification_read),
        )
        .route("/api/admin/pending", get(pending_queue))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/accounts", get(admin_accounts))
        .route("/api/admin/actions", post(resolve_pending))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_public_routers() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
}

async fn https_redirect_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    if state.config.app_env == "production" {
        let headers = req.headers();
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok());

        if let Some("http") = proto {
            let host = headers
                .get("host")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");

            let path_and_query = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("");
            let redirect_url = format!("https://{}{}", host, path_and_query);

            return axum::response::Redirect::permanent(&redirect_url).into_response();
        }
    }

    next.run(req).await
}
