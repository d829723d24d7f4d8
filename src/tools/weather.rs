use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::{NumericRange, Validate, ValidationError};
use crate::{
    lib::{
        errors::{FetchError, ToolError},
        http::{GetRequest, HttpFetch},
    },
    server::config::HttpSection,
};

pub const WEATHER_TOOL_ID: &str = "get-weather";

pub const LATITUDE_RANGE: NumericRange = NumericRange::new("latitude", -90.0, 90.0);
pub const LONGITUDE_RANGE: NumericRange = NumericRange::new("longitude", -180.0, 180.0);
pub const FORECAST_DAYS_RANGE: NumericRange = NumericRange::new("forecastDays", 1.0, 16.0);
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Input for `get-weather`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct WeatherRequest {
    /// Latitude in degrees, -90 to 90.
    #[schemars(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180.
    #[schemars(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Number of forecast days, 1 to 16 (defaults to 7).
    #[serde(default = "default_forecast_days")]
    #[schemars(range(min = 1, max = 16))]
    pub forecast_days: u32,
}

fn default_forecast_days() -> u32 {
    DEFAULT_FORECAST_DAYS
}

impl Validate for WeatherRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        LATITUDE_RANGE.check(self.latitude)?;
        LONGITUDE_RANGE.check(self.longitude)?;
        FORECAST_DAYS_RANGE.check(f64::from(self.forecast_days))
    }
}

/// Describe a WMO weather code; unmapped codes render as `코드 {n}`.
pub fn describe_weather_code(code: i64) -> String {
    let known = match code {
        0 => "맑음",
        1 => "대체로 맑음",
        2 => "부분적으로 흐림",
        3 => "흐림",
        45 => "안개",
        48 => "서리 안개",
        51 => "약한 이슬비",
        53 => "이슬비",
        55 => "강한 이슬비",
        56 => "약한 어는 이슬비",
        57 => "강한 어는 이슬비",
        61 => "약한 비",
        63 => "비",
        65 => "강한 비",
        66 => "약한 어는 비",
        67 => "강한 어는 비",
        71 => "약한 눈",
        73 => "눈",
        75 => "강한 눈",
        77 => "싸락눈",
        80 => "약한 소나기",
        81 => "소나기",
        82 => "강한 소나기",
        85 => "약한 눈 소나기",
        86 => "강한 눈 소나기",
        95 => "뇌우",
        96 => "약한 우박을 동반한 뇌우",
        99 => "강한 우박을 동반한 뇌우",
        _ => return format!("코드 {code}"),
    };
    known.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: DailySeries,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub weather_code: i64,
    pub wind_speed_10m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i64>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// Build the single forecast request.
pub fn forecast_request(http: &HttpSection, request: &WeatherRequest) -> GetRequest {
    GetRequest::new(http.weather_url.clone())
        .query("latitude", request.latitude)
        .query("longitude", request.longitude)
        .query("current", CURRENT_FIELDS)
        .query("daily", DAILY_FIELDS)
        .query("timezone", "auto")
        .query("forecast_days", request.forecast_days)
}

/// Fetch and render the forecast with one outbound call.
pub async fn get_weather(
    fetcher: &dyn HttpFetch,
    http: &HttpSection,
    request: &WeatherRequest,
) -> Result<String, ToolError> {
    let body = fetcher
        .get_json(forecast_request(http, request))
        .await
        .map_err(ToolError::Weather)?;
    let forecast = parse_forecast(body, &http.weather_url).map_err(ToolError::Weather)?;
    Ok(render_report(request, &forecast))
}

fn parse_forecast(body: Value, url: &str) -> Result<Forecast, FetchError> {
    serde_json::from_value(body).map_err(|err| FetchError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

pub fn render_report(request: &WeatherRequest, forecast: &Forecast) -> String {
    let current = &forecast.current;
    let mut sections = vec![format!(
        "위치: 위도 {}, 경도 {}\n\n현재 날씨\n- 상태: {}\n- 기온: {}°C (체감 {}°C)\n- 습도: {}%\n- 풍속: {} km/h",
        request.latitude,
        request.longitude,
        describe_weather_code(current.weather_code),
        current.temperature_2m,
        current.apparent_temperature,
        current.relative_humidity_2m,
        current.wind_speed_10m,
    )];

    let blocks = forecast_blocks(&forecast.daily, request.forecast_days);
    sections.push(format!("{}일 예보", blocks.len()));
    sections.extend(blocks);
    sections.join("\n\n")
}

/// One block per day, `min(requested_days, returned days)` of them.
pub fn forecast_blocks(daily: &DailySeries, requested_days: u32) -> Vec<String> {
    let requested = usize::try_from(requested_days).unwrap_or(usize::MAX);
    daily
        .time
        .iter()
        .take(requested)
        .enumerate()
        .map(|(index, date)| {
            let condition = daily
                .weather_code
                .get(index)
                .copied()
                .flatten()
                .map(describe_weather_code)
                .unwrap_or_else(|| "정보 없음".to_string());
            format!(
                "[{date}]\n- 날씨: {condition}\n- 최저/최고: {} / {}\n- 강수 확률: {}",
                celsius(daily.temperature_2m_min.get(index)),
                celsius(daily.temperature_2m_max.get(index)),
                percent(daily.precipitation_probability_max.get(index)),
            )
        })
        .collect()
}

fn celsius(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(value) => format!("{value}°C"),
        None => "-".to_string(),
    }
}

fn percent(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(value) => format!("{value}%"),
        None => "-".to_string(),
    }
}
