mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use common::*;
use contact_crawler::session::{FormState, LookupSession};
use contact_crawler::{ApiError, ContactReport, ErrorCategory, Query};

fn query(s: &str) -> Query {
    Query::parse(s, true).unwrap()
}

#[tokio::test]
async fn test_success_sends_contract_headers_and_param() -> Result<()> {
    let api = FakeApi::json(json!({"emails": ["a@acme.io", "b@acme.io", "c@acme.io"]})).await?;
    let client = api.client();

    let result = client.fetch_contacts(&query("https://acme.io/about?x=1")).await?;
    let report = ContactReport::from_result(&result);
    assert_eq!(report.emails.items.len(), 3);
    assert!(report.emails.none_found_message().is_none());

    let seen = api.last_request().unwrap();
    assert_eq!(seen.params.get("url").map(String::as_str), Some("https://acme.io/about?x=1"));
    assert_eq!(seen.api_key.as_deref(), Some(API_KEY));
    assert_eq!(seen.api_host, Some(api.host()));
    assert_eq!(seen.accept.as_deref(), Some("application/json"));
    Ok(())
}

#[tokio::test]
async fn test_singular_email_key_is_used() -> Result<()> {
    let api = FakeApi::json(json!({"email": ["info@acme.io"]})).await?;
    let result = api.client().fetch_contacts(&query("https://acme.io")).await?;
    let report = ContactReport::from_result(&result);
    assert_eq!(report.emails.items, vec!["info@acme.io"]);
    Ok(())
}

#[tokio::test]
async fn test_data_envelope() -> Result<()> {
    let api = FakeApi::json(json!({"data": {"phones": ["+1 555 0100"]}})).await?;
    let result = api.client().fetch_contacts(&query("https://acme.io")).await?;
    assert_eq!(result.phones().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_remote_error_payload_fails_and_is_not_cached() -> Result<()> {
    let api = FakeApi::json(json!({"error": "X"})).await?;
    let client = api.client();

    for _ in 0..2 {
        let err = client.fetch_contacts(&query("https://acme.io")).await.unwrap_err();
        assert!(matches!(err, ApiError::RemoteApi { ref message } if message == "X"));
    }
    assert_eq!(api.hits(), 2);
    assert!(client.cache().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_non_2xx_is_http_error() -> Result<()> {
    let api = FakeApi::start(StatusCode::FORBIDDEN, r#"{"message":"not subscribed"}"#).await?;
    let err = api
        .client()
        .fetch_contacts(&query("https://acme.io"))
        .await
        .unwrap_err();

    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("not subscribed"));
        }
        other => panic!("expected http error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() -> Result<()> {
    let api = FakeApi::start(StatusCode::OK, "<html>definitely not json</html>").await?;
    let err = api
        .client()
        .fetch_contacts(&query("https://acme.io"))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
    Ok(())
}

#[tokio::test]
async fn test_slow_api_times_out() -> Result<()> {
    let api = FakeApi::start_with_delay(StatusCode::OK, "{}", Duration::from_secs(3)).await?;
    let client = client_for(Some(api.host()), settings(true, Duration::from_millis(200)));

    let err = client.fetch_contacts(&query("https://acme.io")).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Timeout);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_api_is_connection_error() -> Result<()> {
    let client = client_for(Some(closed_port_host().await?), settings(true, Duration::from_secs(5)));
    let err = client.fetch_contacts(&query("https://acme.io")).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Connection);
    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_short_circuit() -> Result<()> {
    let api = FakeApi::json(json!({"emails": ["a@acme.io"]})).await?;
    let client = client_for(None, settings(true, Duration::from_secs(5)));

    let err = client.fetch_contacts(&query("https://acme.io")).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(api.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_repeat_query_served_from_cache() -> Result<()> {
    let api = FakeApi::json(json!({"emails": ["a@acme.io"]})).await?;
    let client = api.client();

    let first = client.fetch_contacts(&query("https://acme.io")).await?;
    let second = client.fetch_contacts(&query("https://acme.io")).await?;

    assert_eq!(api.hits(), 1);
    assert!(Arc::ptr_eq(&first, &second));

    client.fetch_contacts(&query("https://other.io")).await?;
    assert_eq!(api.hits(), 2);
    assert_eq!(client.cache().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_cache_disabled_always_hits_network() -> Result<()> {
    let api = FakeApi::json(json!({"emails": ["a@acme.io"]})).await?;
    let client = api.client_without_cache();

    client.fetch_contacts(&query("https://acme.io")).await?;
    client.fetch_contacts(&query("https://acme.io")).await?;
    assert_eq!(api.hits(), 2);
    assert!(client.cache().is_none());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_lookups_share_cache() -> Result<()> {
    let api = FakeApi::json(json!({"emails": ["a@acme.io"]})).await?;
    let client = Arc::new(api.client());
    let q = query("https://acme.io");

    let results = futures::future::join_all((0..8).map(|_| {
        let client = client.clone();
        let q = q.clone();
        async move { client.fetch_contacts(&q).await }
    }))
    .await;

    for result in results {
        assert_eq!(result?.emails().len(), 1);
    }
    assert!(api.hits() >= 1);
    assert_eq!(client.cache().unwrap().len(), 1);

    let hits_before = api.hits();
    client.fetch_contacts(&q).await?;
    assert_eq!(api.hits(), hits_before);
    Ok(())
}

#[tokio::test]
async fn test_session_rejects_empty_input_without_network() -> Result<()> {
    let api = FakeApi::json(json!({"emails": ["a@acme.io"]})).await?;
    let client = api.client();
    let mut session = LookupSession::new("s1");

    let state = session.submit("   ", &client, false).await;
    match state {
        FormState::Failed { failure, .. } => {
            assert_eq!(failure.category, ErrorCategory::Validation)
        }
        other => panic!("expected failed state, got {other:?}"),
    }
    assert_eq!(api.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_session_scheme_check_and_success() -> Result<()> {
    let api = FakeApi::json(json!({"socials": [{"url": "https://x.com/acme"}]})).await?;
    let client = api.client();
    let mut session = LookupSession::new("s2");

    let state = session.submit("acme.io", &client, true).await;
    assert!(matches!(state, FormState::Failed { .. }));
    assert_eq!(api.hits(), 0);

    let state = session.submit("https://acme.io", &client, true).await;
    match state {
        FormState::Success { result, .. } => {
            let report = ContactReport::from_result(result);
            assert_eq!(report.socials.items, vec!["https://x.com/acme"]);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(api.hits(), 1);
    Ok(())
}

#[tokio::test]
async fn test_session_recovers_after_cancelled_submit() -> Result<()> {
    let api =
        FakeApi::start_with_delay(StatusCode::OK, r#"{"emails":["a@acme.io"]}"#, Duration::from_millis(500))
            .await?;
    let client = api.client();
    let mut session = LookupSession::new("s3");

    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), session.submit("https://a.io", &client, true))
            .await;
    assert!(cancelled.is_err());
    assert!(session.state().is_submitting());
    let hits_before = api.hits();

    let state = session.submit("https://b.io", &client, true).await;
    match state {
        FormState::Success { query, .. } => assert_eq!(query.as_str(), "https://b.io"),
        other => panic!("expected success, got {other:?}"),
    }
    assert!(api.hits() > hits_before);
    Ok(())
}
