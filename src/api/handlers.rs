use axum::{
    Form, Json,
    extract::{Query as QueryParams, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ApiError, ErrorCategory};
use crate::query::Query;
use crate::report::ContactReport;

use super::AppState;
use super::models::{ErrorBody, LookupForm, LookupParams, LookupResponse};
use super::page::render_page;

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let session = state.sessions.create();
    let session = session.lock().await;
    Html(render_page(session.id(), session.state()))
}

pub async fn lookup_form_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LookupForm>,
) -> Html<String> {
    let session = state.sessions.get_or_create(form.session.as_deref());
    let mut session = session.lock().await;

    session
        .submit(&form.query, &state.gateway, state.require_scheme)
        .await;

    Html(render_page(session.id(), session.state()))
}

pub async fn lookup_api_handler(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<LookupParams>,
) -> Result<Json<LookupResponse>, (StatusCode, Json<ErrorBody>)> {
    let start = Instant::now();

    let query = Query::parse(&params.query, state.require_scheme).map_err(error_response)?;
    let result = state
        .gateway
        .fetch_contacts(&query)
        .await
        .map_err(error_response)?;

    Ok(Json(LookupResponse {
        query: query.to_string(),
        report: ContactReport::from_result(&result),
        processing_time_ms: start.elapsed().as_millis(),
    }))
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Validation => StatusCode::BAD_REQUEST,
        ErrorCategory::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCategory::Connection
        | ErrorCategory::Http
        | ErrorCategory::Decode
        | ErrorCategory::RemoteApi => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: ApiError) -> (StatusCode, Json<ErrorBody>) {
    log::warn!("lookup failed: {err}");
    (status_for(err.category()), Json(ErrorBody::from(&err)))
}
