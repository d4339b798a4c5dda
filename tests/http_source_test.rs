use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chargeboard::config::EndpointConfig;
use chargeboard::fetch::{FetchAggregator, HttpStatusSource, StatusSource};
use chargeboard::model::Location;
use chargeboard::status::{DisplayState, classify_record};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn now(Path(key): Path<String>, headers: HeaderMap) -> axum::response::Response {
    let no_cache = headers
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("no-cache"));
    if !no_cache {
        return (StatusCode::BAD_REQUEST, "cache headers missing").into_response();
    }

    match key.as_str() {
        "inc1" => Json(serde_json::json!([
            {"plug": "1", "status": "Charging", "online": 1},
            {"plug": 2, "status": "Available", "online": "1"}
        ]))
        .into_response(),
        "inc2" => Json(serde_json::json!({
            "chargers": [{"plug": "A", "status": "Finishing", "online": true}]
        }))
        .into_response(),
        "odd" => Json(serde_json::json!({"message": "nothing here"})).into_response(),
        "garbage" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(serde_json::json!([])).into_response()
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn spawn_endpoint() -> SocketAddr {
    let app = Router::new().route("/api/v2/now/{key}", get(now));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn endpoint(addr: SocketAddr) -> EndpointConfig {
    EndpointConfig {
        base_url: format!("http://{}/", addr),
        request_timeout_ms: 500,
        ..EndpointConfig::default()
    }
}

#[tokio::test]
async fn bare_and_wrapped_bodies_parse() {
    let addr = spawn_endpoint().await;
    let source = HttpStatusSource::new(&endpoint(addr)).unwrap();
    assert_eq!(
        source.url_for("inc1"),
        format!("http://{}/api/v2/now/inc1", addr)
    );

    let bare = source.fetch_chargers("inc1").await.unwrap();
    assert_eq!(bare.len(), 2);
    assert_eq!(bare[1].plug, "2");
    assert_eq!(classify_record(&bare[0]), DisplayState::Charging);
    assert_eq!(classify_record(&bare[1]), DisplayState::Available);

    let wrapped = source.fetch_chargers("inc2").await.unwrap();
    assert_eq!(wrapped.len(), 1);
    assert_eq!(classify_record(&wrapped[0]), DisplayState::Finishing);

    // Unrecognized shape is an empty list, not an error
    assert!(source.fetch_chargers("odd").await.unwrap().is_empty());
}

#[tokio::test]
async fn failures_map_to_errors() {
    let addr = spawn_endpoint().await;
    let source = HttpStatusSource::new(&endpoint(addr)).unwrap();

    let err = source.fetch_chargers("missing").await.unwrap_err();
    assert!(err.to_string().contains("500"), "{}", err);

    let err = source.fetch_chargers("garbage").await.unwrap_err();
    assert!(err.to_string().contains("Serialization"), "{}", err);

    let err = source.fetch_chargers("slow").await.unwrap_err();
    assert!(err.to_string().contains("Network"), "{}", err);
}

#[tokio::test]
async fn one_failing_key_does_not_spoil_the_rest() {
    let addr = spawn_endpoint().await;
    let source = HttpStatusSource::new(&endpoint(addr)).unwrap();
    let aggregator = FetchAggregator::new(Arc::new(source));

    let locations = vec![
        Location::new("Hotel", "inc1"),
        Location::new("Posto", "broken"),
        Location::new("Hotel again", "inc1"),
    ];
    let aggregate = aggregator.refresh(&locations).await.unwrap();

    assert!(aggregate.had_any_error);
    assert_eq!(aggregate.dataset.len(), 2);
    assert_eq!(aggregate.dataset["inc1"].len(), 2);
    assert!(aggregate.dataset["broken"].is_empty());
    assert_eq!(aggregate.failures.len(), 1);
    assert_eq!(aggregate.failures[0].key, "broken");
}
