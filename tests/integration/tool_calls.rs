use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use rmcp::service::ServiceError;
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use toolbox_mcp::{
    lib::{
        errors::FetchError,
        http::ReqwestFetcher,
        inference::{GeneratedImage, ImageInference, TextToImageRequest},
    },
    server::{
        config::ServerConfig,
        runtime::{OutboundClients, ToolboxServer},
    },
};

use crate::common::{call, config_for, connect, first_text, live_server, shutdown};

#[derive(Default)]
struct CountingInference {
    calls: AtomicUsize,
}

#[async_trait]
impl ImageInference for CountingInference {
    async fn text_to_image(
        &self,
        _request: TextToImageRequest,
    ) -> Result<GeneratedImage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".into(),
        })
    }
}

fn counting_server(config: ServerConfig, inference: Arc<CountingInference>) -> Result<ToolboxServer> {
    Ok(ToolboxServer::with_clients(
        config,
        "integration".into(),
        OutboundClients {
            http: Arc::new(ReqwestFetcher::new()?),
            inference,
        },
    )?)
}

#[tokio::test]
async fn greet_defaults_to_english_and_mirrors_structured_content() -> Result<()> {
    let (client, task) = connect(live_server(ServerConfig::default())?).await?;

    let english = call(&client, "greet", json!({ "name": "Alice" })).await?;
    let korean = call(&client, "greet", json!({ "name": "민수", "language": "ko" })).await?;
    shutdown(client, task).await;

    assert_eq!(first_text(&english), "Hello, Alice!");
    assert_eq!(english.is_error, Some(false));
    assert_eq!(
        english.structured_content,
        Some(json!({ "content": [{ "type": "text", "text": "Hello, Alice!" }] }))
    );
    assert_eq!(first_text(&korean), "안녕하세요, 민수님!");
    Ok(())
}

#[tokio::test]
async fn calculator_reports_division_by_zero_as_text() -> Result<()> {
    let (client, task) = connect(live_server(ServerConfig::default())?).await?;

    let sum = call(
        &client,
        "calculator",
        json!({ "num1": 7, "num2": 5, "operator": "+" }),
    )
    .await?;
    let zero = call(
        &client,
        "calculator",
        json!({ "num1": 1, "num2": 0, "operator": "/" }),
    )
    .await?;
    shutdown(client, task).await;

    assert_eq!(first_text(&sum), "7 + 5 = 12");
    assert_eq!(first_text(&zero), "오류: 0으로 나눌 수 없습니다.");
    assert_ne!(zero.is_error, Some(true));
    Ok(())
}

#[tokio::test]
async fn get_time_rejects_unknown_zone_in_band() -> Result<()> {
    let (client, task) = connect(live_server(ServerConfig::default())?).await?;

    let seoul = call(&client, "get-time", json!({ "timezone": "Asia/Seoul" })).await?;
    let bogus = call(&client, "get-time", json!({ "timezone": "Mars/Base" })).await?;
    shutdown(client, task).await;

    assert!(first_text(&seoul).starts_with("Asia/Seoul의 현재 시간: "));
    assert!(first_text(&seoul).ends_with("(KST)"));
    assert_eq!(
        first_text(&bogus),
        "오류: 유효하지 않은 타임존입니다: Mars/Base"
    );
    Ok(())
}

#[tokio::test]
async fn geocode_uses_first_match() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Seoul City Hall"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "toolbox-mcp-tests/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "display_name": "서울특별시청, 중구, 서울", "lat": "37.5663", "lon": "126.9779" }
        ])))
        .expect(1)
        .mount(&mock)
        .await;

    let (client, task) = connect(live_server(config_for(&mock.uri(), None))?).await?;
    let result = call(&client, "geocode", json!({ "address": "Seoul City Hall" })).await?;
    shutdown(client, task).await;

    assert_eq!(
        first_text(&result),
        "주소: 서울특별시청, 중구, 서울\n위도: 37.5663\n경도: 126.9779"
    );
    Ok(())
}

#[tokio::test]
async fn geocode_without_matches_names_the_address() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock)
        .await;

    let (client, task) = connect(live_server(config_for(&mock.uri(), None))?).await?;
    let result = call(&client, "geocode", json!({ "address": "nowhere-at-all" })).await?;
    shutdown(client, task).await;

    assert_eq!(
        first_text(&result),
        "'nowhere-at-all'에 대한 검색 결과가 없습니다."
    );
    Ok(())
}

#[tokio::test]
async fn weather_renders_requested_days_from_one_call() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("forecast_days", "2"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "temperature_2m": 21.5,
                "relative_humidity_2m": 60,
                "apparent_temperature": 22.0,
                "weather_code": 0,
                "wind_speed_10m": 5.5
            },
            "daily": {
                "time": ["2024-06-01", "2024-06-02"],
                "weather_code": [0, 61],
                "temperature_2m_max": [27.0, 24.5],
                "temperature_2m_min": [18.0, 17.5],
                "precipitation_probability_max": [10, 80]
            }
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let (client, task) = connect(live_server(config_for(&mock.uri(), None))?).await?;
    let result = call(
        &client,
        "get-weather",
        json!({ "latitude": 37.57, "longitude": 126.98, "forecastDays": 2 }),
    )
    .await?;
    shutdown(client, task).await;

    let text = first_text(&result);
    assert!(text.contains("맑음"), "{text}");
    assert!(text.contains("2일 예보"), "{text}");
    assert!(text.contains("[2024-06-01]"), "{text}");
    assert!(text.contains("[2024-06-02]"), "{text}");
    Ok(())
}

#[tokio::test]
async fn weather_upstream_failure_is_reported_in_band() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let (client, task) = connect(live_server(config_for(&mock.uri(), None))?).await?;
    let result = call(
        &client,
        "get-weather",
        json!({ "latitude": 0, "longitude": 0 }),
    )
    .await?;
    shutdown(client, task).await;

    assert!(first_text(&result).starts_with("날씨 정보를 가져오지 못했습니다"));
    Ok(())
}

#[tokio::test]
async fn out_of_range_latitude_is_a_protocol_error() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let (client, task) = connect(live_server(config_for(&mock.uri(), None))?).await?;
    let outcome = call(
        &client,
        "get-weather",
        json!({ "latitude": 91, "longitude": 0 }),
    )
    .await;
    shutdown(client, task).await;

    let error = outcome.expect_err("latitude 91 must be rejected");
    let service_error = error
        .downcast::<ServiceError>()
        .expect("protocol error from the server");
    match service_error {
        ServiceError::McpError(inner) => {
            let data = inner.data.unwrap_or(Value::Null);
            assert_eq!(data["code"], "INVALID_ARGUMENT");
            assert_eq!(data["field"], "latitude");
            assert_eq!(data["constraint"], "range");
        }
        other => panic!("Unexpected error: {other:?}"),
    }
    Ok(())
}

fn invalid_argument_data(outcome: Result<rmcp::model::CallToolResult>) -> Value {
    let error = outcome.expect_err("invalid arguments must be rejected");
    match error.downcast::<ServiceError>() {
        Ok(ServiceError::McpError(inner)) => inner.data.unwrap_or(Value::Null),
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn every_decode_failure_names_field_and_constraint() -> Result<()> {
    let cases = [
        ("greet", json!({ "name": "Alice", "language": "fr" }), "language", "enum"),
        (
            "calculator",
            json!({ "num1": 1, "num2": 2, "operator": "%" }),
            "operator",
            "enum",
        ),
        (
            "get-weather",
            json!({ "latitude": "north", "longitude": 0 }),
            "latitude",
            "type",
        ),
        (
            "get-weather",
            json!({ "latitude": 0, "longitude": 0, "forecastDays": 2.5 }),
            "forecastDays",
            "type",
        ),
        ("greet", json!({ "language": "ko" }), "name", "required"),
        ("greet", json!({ "name": "Alice", "mood": "happy" }), "mood", "unknown_field"),
    ];

    let (client, task) = connect(live_server(ServerConfig::default())?).await?;
    let mut observed = Vec::new();
    for (tool, arguments, _, _) in &cases {
        observed.push(invalid_argument_data(call(&client, tool, arguments.clone()).await));
    }
    shutdown(client, task).await;

    for ((tool, _, field, constraint), data) in cases.iter().zip(observed) {
        assert_eq!(data["code"], "INVALID_ARGUMENT", "{tool}: {data}");
        assert_eq!(data["field"], *field, "{tool}: {data}");
        assert_eq!(data["constraint"], *constraint, "{tool}: {data}");
        assert_eq!(data["retryable"], false, "{tool}: {data}");
    }
    Ok(())
}

#[tokio::test]
async fn generate_image_without_credential_makes_no_call() -> Result<()> {
    let inference = Arc::new(CountingInference::default());
    let server = counting_server(ServerConfig::default(), inference.clone())?;
    let (client, task) = connect(server).await?;

    let result = call(&client, "generate-image", json!({ "prompt": "a red fox" })).await?;
    shutdown(client, task).await;

    assert!(first_text(&result).contains("HF_TOKEN"));
    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn generate_image_returns_user_facing_image() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/black-forest-labs/FLUX.1-schnell"))
        .and(header("authorization", "Bearer hf_test"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
        )
        .expect(1)
        .mount(&mock)
        .await;

    let (client, task) =
        connect(live_server(config_for(&mock.uri(), Some("hf_test")))?).await?;
    let result = call(&client, "generate-image", json!({ "prompt": "a red fox" })).await?;
    shutdown(client, task).await;

    let value = serde_json::to_value(&result)?;
    let item = &value["content"][0];
    assert_eq!(item["type"], "image");
    assert_eq!(item["mimeType"], "image/jpeg");
    assert_eq!(item["data"], "/9j/");
    assert_eq!(item["annotations"]["audience"], json!(["user"]));
    assert!(result.structured_content.is_none());
    Ok(())
}
