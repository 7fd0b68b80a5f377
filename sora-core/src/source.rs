//! Weather sources: OpenWeatherMap and an offline demo generator
//!
//! A source turns a coordinate into one [`WeatherObservation`]. There is no
//! retry and no caching; each call is a single request.

use std::fmt;
use std::future::Future;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::WeatherError;
use crate::labels::Language;
use crate::location::DEFAULT_COORDINATE;
use crate::observation::{Coordinate, WeatherObservation};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Key values that mean "no key configured"
pub const CREDENTIAL_PLACEHOLDERS: [&str; 3] = ["", "{{OPENWEATHER_API_KEY}}", "デモ用のAPIキー"];

/// Anything that can produce an observation for a coordinate
pub trait WeatherSource {
    fn fetch(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<WeatherObservation, WeatherError>> + Send;
}

// ============================================================================
// Configuration
// ============================================================================

/// API key. Placeholder values count as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if CREDENTIAL_PLACEHOLDERS.contains(&trimmed) {
            Self(None)
        } else {
            Self(Some(trimmed.to_string()))
        }
    }

    pub fn none() -> Self {
        Self(None)
    }

    /// First configured value wins: run-time value, then build-time value.
    pub fn resolve(runtime: Option<String>, build_time: Option<&str>) -> Self {
        runtime
            .map(Credential::new)
            .filter(Credential::is_configured)
            .or_else(|| build_time.map(Credential::new))
            .unwrap_or_default()
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    pub fn key(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => write!(f, "Credential(set)"),
            None => write!(f, "Credential(none)"),
        }
    }
}

/// Request parameters shared by every call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub units: String,
    pub language: Language,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            units: "metric".into(),
            language: Language::default(),
        }
    }
}

// ============================================================================
// OpenWeatherMap
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    name: String,
    weather: Vec<ApiCondition>,
    main: ApiMain,
    wind: ApiWind,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

/// Parse a current-weather response body.
pub fn parse_observation(body: &str) -> Result<WeatherObservation, WeatherError> {
    let data: ApiResponse = serde_json::from_str(body)?;
    let condition = data
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Parse("missing weather[0]".into()))?;

    Ok(WeatherObservation {
        location_name: data.name,
        condition_main: condition.main,
        condition_description: condition.description,
        temperature_celsius: data.main.temp,
        humidity_percent: data.main.humidity,
        wind_speed_mps: data.wind.speed,
    })
}

/// Current-weather client for the OpenWeatherMap API
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    key: String,
    config: ApiConfig,
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.config.base_url)
            .field("language", &self.config.language)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(key: impl Into<String>, config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key: key.into(),
            config,
        }
    }

    pub fn request_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}?lat={}&lon={}&appid={}&units={}&lang={}",
            self.config.base_url,
            coordinate.lat,
            coordinate.lon,
            self.key,
            self.config.units,
            self.config.language.code()
        )
    }

    /// Request URL with the key masked, safe to log
    pub fn redacted_url(&self, coordinate: Coordinate) -> String {
        self.request_url(coordinate).replace(&self.key, "xxxxxx")
    }

    /// Probe the key with one request against the default coordinate.
    pub async fn check_credential(&self) -> Result<(), WeatherError> {
        info!(url = %self.redacted_url(DEFAULT_COORDINATE), "testing API key");
        let response = self.http.get(self.request_url(DEFAULT_COORDINATE)).send().await?;
        let status = response.status();
        if status.is_success() {
            info!("API key is valid");
            Ok(())
        } else {
            warn!(status = status.as_u16(), "API key rejected");
            Err(WeatherError::from_status(status.as_u16()))
        }
    }
}

impl WeatherSource for OpenWeatherClient {
    fn fetch(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<WeatherObservation, WeatherError>> + Send {
        async move {
            info!(url = %self.redacted_url(coordinate), "requesting weather");
            let response = self.http.get(self.request_url(coordinate)).send().await?;

            let status = response.status();
            if !status.is_success() {
                warn!(
                    status = status.as_u16(),
                    reason = status.canonical_reason().unwrap_or(""),
                    "weather request failed"
                );
                return Err(WeatherError::from_status(status.as_u16()));
            }

            let body = response.text().await?;
            parse_observation(&body)
        }
    }
}

// ============================================================================
// Demo source
// ============================================================================

/// How the offline source picks its observation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DemoMode {
    /// Always the same rainy Tokyo reading
    Fixed,
    /// Derived from the coordinate, so different places look different
    #[default]
    Seeded,
}

/// Offline source used when no key is configured
#[derive(Clone, Debug, Default)]
pub struct DemoSource {
    mode: DemoMode,
    language: Language,
}

impl DemoSource {
    pub fn new(mode: DemoMode, language: Language) -> Self {
        Self { mode, language }
    }

    pub fn fixed_observation() -> WeatherObservation {
        WeatherObservation {
            location_name: "東京".into(),
            condition_main: "Rain".into(),
            condition_description: "小雨".into(),
            temperature_celsius: 18.5,
            humidity_percent: 75.0,
            wind_speed_mps: 3.2,
        }
    }

    /// Deterministic observation for a coordinate.
    pub fn observe(&self, coordinate: Coordinate) -> WeatherObservation {
        match self.mode {
            DemoMode::Fixed => Self::fixed_observation(),
            DemoMode::Seeded => self.seeded(coordinate),
        }
    }

    fn seeded(&self, coordinate: Coordinate) -> WeatherObservation {
        let lat = (coordinate.lat * 100.0).round() as i64;
        let lon = (coordinate.lon * 100.0).round() as i64;
        let seed = (lat * 31 + lon * 17).rem_euclid(1000);
        let spread = |divisor: i64, modulus: i64| ((seed / divisor) % modulus) as f64;

        let (main, ja, en, temperature, humidity, wind) = match seed % 4 {
            0 => (
                "Clear",
                "快晴",
                "clear sky",
                12.0 + spread(4, 20),
                30.0 + spread(7, 30),
                spread(3, 60) / 10.0,
            ),
            1 => (
                "Clouds",
                "曇りがち",
                "broken clouds",
                8.0 + spread(4, 15),
                45.0 + spread(7, 45),
                spread(3, 100) / 10.0,
            ),
            2 => (
                "Rain",
                "小雨",
                "light rain",
                10.0 + spread(4, 15),
                60.0 + spread(7, 40),
                spread(3, 80) / 10.0,
            ),
            _ => (
                "Snow",
                "雪",
                "snow",
                -8.0 + spread(4, 9),
                70.0 + spread(7, 25),
                spread(3, 60) / 10.0,
            ),
        };

        let (place, description) = match self.language {
            Language::Ja => ("デモ地点", ja),
            Language::En => ("Demo location", en),
        };

        WeatherObservation {
            location_name: format!("{} ({:.2}, {:.2})", place, coordinate.lat, coordinate.lon),
            condition_main: main.into(),
            condition_description: description.into(),
            temperature_celsius: temperature,
            humidity_percent: humidity,
            wind_speed_mps: wind,
        }
    }
}

impl WeatherSource for DemoSource {
    fn fetch(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<WeatherObservation, WeatherError>> + Send {
        async move {
            debug!(%coordinate, mode = ?self.mode, "serving demo weather");
            Ok(self.observe(coordinate))
        }
    }
}

// ============================================================================
// Backend selection
// ============================================================================

/// The source the app actually uses, picked from the credential
#[derive(Clone, Debug)]
pub enum WeatherBackend {
    Remote(OpenWeatherClient),
    Demo(DemoSource),
}

impl WeatherBackend {
    /// Remote when a key is configured, demo otherwise.
    pub fn from_credential(credential: &Credential, config: ApiConfig, demo: DemoMode) -> Self {
        match credential.key() {
            Some(key) => WeatherBackend::Remote(OpenWeatherClient::new(key, config)),
            None => {
                info!("no API key configured, using demo weather");
                WeatherBackend::Demo(DemoSource::new(demo, config.language))
            }
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, WeatherBackend::Demo(_))
    }
}

impl WeatherSource for WeatherBackend {
    fn fetch(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<WeatherObservation, WeatherError>> + Send {
        async move {
            match self {
                WeatherBackend::Remote(client) => client.fetch(coordinate).await,
                WeatherBackend::Demo(demo) => demo.fetch(coordinate).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    const TOKYO_BODY: &str = r#"{
        "coord": {"lon": 139.65, "lat": 35.68},
        "weather": [{"id": 500, "main": "Rain", "description": "小雨", "icon": "10d"}],
        "main": {"temp": 18.5, "feels_like": 18.1, "humidity": 75, "pressure": 1012},
        "wind": {"speed": 3.2, "deg": 180},
        "name": "東京",
        "cod": 200
    }"#;

    #[test]
    fn test_parse_observation() {
        let observation = parse_observation(TOKYO_BODY).unwrap();
        assert_eq!(observation, DemoSource::fixed_observation());
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        assert!(matches!(
            parse_observation("<html>oops</html>"),
            Err(WeatherError::Parse(_))
        ));
        assert!(matches!(
            parse_observation(r#"{"name": "x"}"#),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_conditions() {
        let body = r#"{
            "name": "x",
            "weather": [],
            "main": {"temp": 1, "humidity": 2},
            "wind": {"speed": 3}
        }"#;
        assert_eq!(
            parse_observation(body),
            Err(WeatherError::Parse("missing weather[0]".into()))
        );
    }

    #[test]
    fn test_placeholders_are_not_credentials() {
        for placeholder in CREDENTIAL_PLACEHOLDERS {
            assert!(!Credential::new(placeholder).is_configured());
        }
        assert!(!Credential::new("   ").is_configured());
        assert_eq!(Credential::new(" abc123 ").key(), Some("abc123"));
    }

    #[test]
    fn test_credential_resolution_order() {
        let runtime = Credential::resolve(Some("runtime".into()), Some("build"));
        assert_eq!(runtime.key(), Some("runtime"));

        let build = Credential::resolve(Some("".into()), Some("build"));
        assert_eq!(build.key(), Some("build"));

        let none = Credential::resolve(None, Some("{{OPENWEATHER_API_KEY}}"));
        assert!(!none.is_configured());
    }

    #[test]
    fn test_credential_debug_hides_key() {
        let debug = format!("{:?}", Credential::new("secret-key"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_request_url_and_redaction() {
        let client = OpenWeatherClient::new("k3y", ApiConfig::default());
        let coordinate = Coordinate::new(35.6762, 139.6503);

        assert_eq!(
            client.request_url(coordinate),
            concat!(
                "https://api.openweathermap.org/data/2.5/weather",
                "?lat=35.6762&lon=139.6503&appid=k3y&units=metric&lang=ja"
            )
        );
        let redacted = client.redacted_url(coordinate);
        assert!(redacted.contains("appid=xxxxxx"));
        assert!(!redacted.contains("k3y"));
    }

    #[test]
    fn test_backend_selection() {
        let demo = WeatherBackend::from_credential(
            &Credential::none(),
            ApiConfig::default(),
            DemoMode::Fixed,
        );
        assert!(demo.is_demo());

        let remote = WeatherBackend::from_credential(
            &Credential::new("abc"),
            ApiConfig::default(),
            DemoMode::Fixed,
        );
        assert!(!remote.is_demo());
    }

    #[test]
    fn test_seeded_demo_is_deterministic() {
        let demo = DemoSource::new(DemoMode::Seeded, Language::En);
        let here = Coordinate::new(51.5072, -0.1276);
        assert_eq!(demo.observe(here), demo.observe(here));
    }

    #[test]
    fn test_seeded_demo_covers_four_patterns() {
        let demo = DemoSource::new(DemoMode::Seeded, Language::Ja);
        let mut seen = std::collections::HashSet::new();
        for i in 0..40 {
            let observation = demo.observe(Coordinate::new(i as f64 * 0.01, 0.0));
            assert!((0.0..=100.0).contains(&observation.humidity_percent));
            assert!(observation.wind_speed_mps >= 0.0);
            seen.insert(observation.condition_main);
        }
        let expected: std::collections::HashSet<String> = ["Clear", "Clouds", "Rain", "Snow"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_seeded_demo_handles_negative_coordinates() {
        let demo = DemoSource::new(DemoMode::Seeded, Language::En);
        let observation = demo.observe(Coordinate::new(-33.8688, -151.2093));
        assert!(observation.location_name.starts_with("Demo location"));
        assert!(["Clear", "Clouds", "Rain", "Snow"].contains(&observation.condition_main.as_str()));
    }

    #[tokio::test]
    async fn test_fixed_demo_fetch() {
        let source = DemoSource::new(DemoMode::Fixed, Language::Ja);
        let observation = source
            .fetch(Coordinate::new(0.0, 0.0))
            .await
            .expect("demo never fails");
        assert_eq!(observation.location_name, "東京");
        assert_eq!(observation.effect_kind(), Some(EffectKind::Rain));
    }

    /// Answer one request on a local port with a canned response.
    ///
    /// Returns the endpoint URL and the request head the client sent.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let (head_tx, head_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.expect("read request");
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
            }
            let _ = head_tx.send(String::from_utf8_lossy(&head).into_owned());

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}/data/2.5/weather"), head_rx)
    }

    fn client_for(base_url: String) -> OpenWeatherClient {
        OpenWeatherClient::new(
            "test-key",
            ApiConfig {
                base_url,
                ..ApiConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_remote_fetch_parses_success() {
        let (url, head) = serve_once("200 OK", TOKYO_BODY).await;

        let observation = client_for(url)
            .fetch(Coordinate::new(35.68, 139.65))
            .await
            .expect("200 with a valid body");

        assert_eq!(observation.location_name, "東京");
        assert_eq!(observation.humidity_percent, 75.0);

        let head = head.await.expect("request head");
        assert!(head.starts_with("GET /data/2.5/weather?lat=35.68&lon=139.65"));
        assert!(head.contains("appid=test-key"));
        assert!(head.contains("units=metric"));
        assert!(head.contains("lang=ja"));
    }

    #[tokio::test]
    async fn test_remote_fetch_checks_status_before_body() {
        // A parseable body does not rescue a rejected request
        let (url, _) = serve_once("401 Unauthorized", TOKYO_BODY).await;

        let result = client_for(url).fetch(DEFAULT_COORDINATE).await;

        assert_eq!(result, Err(WeatherError::Unauthorized));
    }

    #[tokio::test]
    async fn test_remote_fetch_maps_forbidden_and_rate_limit() {
        let (url, _) = serve_once("403 Forbidden", "{}").await;
        assert_eq!(
            client_for(url).fetch(DEFAULT_COORDINATE).await,
            Err(WeatherError::Forbidden)
        );

        let (url, _) = serve_once("429 Too Many Requests", "{}").await;
        assert_eq!(
            client_for(url).fetch(DEFAULT_COORDINATE).await,
            Err(WeatherError::RateLimited)
        );
    }

    #[tokio::test]
    async fn test_remote_fetch_other_status_is_http_error() {
        let (url, _) = serve_once("500 Internal Server Error", "<html>oops</html>").await;

        let result = client_for(url).fetch(DEFAULT_COORDINATE).await;

        assert_eq!(result, Err(WeatherError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn test_remote_fetch_malformed_body_is_parse_error() {
        let (url, _) = serve_once("200 OK", "<html></html>").await;

        let result = client_for(url).fetch(DEFAULT_COORDINATE).await;

        assert!(matches!(result, Err(WeatherError::Parse(_))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_check_credential_reports_status() {
        let (url, _) = serve_once("200 OK", TOKYO_BODY).await;
        assert_eq!(client_for(url).check_credential().await, Ok(()));

        let (url, _) = serve_once("401 Unauthorized", "{}").await;
        assert_eq!(
            client_for(url).check_credential().await,
            Err(WeatherError::Unauthorized)
        );
    }
}
