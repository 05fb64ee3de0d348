//! YouTube Music InnerTube client.
//!
//! See: https://music.youtube.com/
//!
//! A [`YtMusicProvider`] owns the HTTP connection pool. Every call to
//! [`CatalogProvider::connect`] scrapes a fresh InnerTube config with the
//! caller's cookies and returns an independent [`YtMusicClient`].

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug, error, info, trace, warn};

use super::parser;
use super::traverse::{traverse_list, traverse_string};
use super::ytcfg::InnertubeConfig;
use crate::core::config::CatalogConfig;
use crate::domains::catalog::{
    AlbumDetails, CatalogClient, CatalogError, CatalogProvider, CatalogResult, ClientOptions,
    HomeSection, SearchResult, SongDetails,
};

/// Browser user agent; the catalog serves a stripped page to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

const HOME_BROWSE_ID: &str = "FEmusic_home";

/// Upper bound on home feed continuation pages.
const MAX_HOME_CONTINUATIONS: usize = 10;

/// Factory for [`YtMusicClient`] sessions.
pub struct YtMusicProvider {
    http_client: reqwest::Client,
    base_url: String,
}

impl YtMusicProvider {
    /// Create a provider from the catalog configuration.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(&config.base_url),
        })
    }

    /// Base URL every request is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogProvider for YtMusicProvider {
    async fn connect(&self, options: ClientOptions) -> CatalogResult<Box<dyn CatalogClient>> {
        let client =
            YtMusicClient::initialize(self.http_client.clone(), self.base_url.clone(), options)
                .await?;
        Ok(Box::new(client))
    }
}

/// One initialized catalog session.
pub struct YtMusicClient {
    http_client: reqwest::Client,
    base_url: String,
    cookies: Option<HeaderValue>,
    ytcfg: InnertubeConfig,
    log_level: LevelFilter,
}

impl YtMusicClient {
    /// Load the landing page with the caller's cookies and read its config.
    pub async fn initialize(
        http_client: reqwest::Client,
        base_url: String,
        options: ClientOptions,
    ) -> CatalogResult<Self> {
        let cookies = options.cookies;

        let mut request = http_client
            .get(&base_url)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE);
        if let Some(cookies) = &cookies {
            request = request.header(header::COOKIE, cookies.clone());
        }

        let response = request.send().await?.error_for_status()?;
        let html = response.text().await?;
        let ytcfg = InnertubeConfig::from_html(&html).with_locale(options.gl, options.hl);

        let client = Self {
            http_client,
            base_url,
            cookies,
            ytcfg,
            log_level: options.log_level,
        };

        if client.ytcfg.innertube_api_key.is_none() {
            client.diagnostic(Level::WARN, "Landing page carried no InnerTube API key");
        }
        client.diagnostic(
            Level::DEBUG,
            format!(
                "Initialized InnerTube client {} {}",
                client.ytcfg.client_name(),
                client.ytcfg.client_version()
            ),
        );

        Ok(client)
    }

    /// Emit a client diagnostic if this session's level allows it.
    fn diagnostic(&self, level: Level, message: impl std::fmt::Display) {
        if level > self.log_level {
            return;
        }
        if level == Level::ERROR {
            error!(target: "catalog", "{}", message);
        } else if level == Level::WARN {
            warn!(target: "catalog", "{}", message);
        } else if level == Level::INFO {
            info!(target: "catalog", "{}", message);
        } else if level == Level::DEBUG {
            debug!(target: "catalog", "{}", message);
        } else {
            trace!(target: "catalog", "{}", message);
        }
    }

    /// InnerTube `context` object sent with every request.
    fn context(&self) -> Value {
        json!({
            "capabilities": {},
            "client": {
                "clientName": self.ytcfg.client_name(),
                "clientVersion": self.ytcfg.client_version(),
                "experimentIds": [],
                "experimentsToken": "",
                "gl": self.ytcfg.gl,
                "hl": self.ytcfg.hl,
                "platform": "DESKTOP",
                "utcOffsetMinutes": 0,
                "visitorData": self.ytcfg.visitor_data,
            },
            "request": {
                "internalExperimentFlags": [],
                "sessionIndex": {},
            },
            "user": {
                "enableSafetyMode": false,
            },
        })
    }

    fn headers(&self) -> HeaderMap {
        let origin = self.base_url.trim_end_matches('/');
        let candidates = [
            ("x-origin", Some(origin.to_string())),
            ("origin", Some(origin.to_string())),
            ("x-goog-visitor-id", self.ytcfg.visitor_data.clone()),
            (
                "x-youtube-client-name",
                Some(self.ytcfg.context_client_name()),
            ),
            (
                "x-youtube-client-version",
                Some(self.ytcfg.client_version().to_string()),
            ),
            ("x-youtube-device", self.ytcfg.device.clone()),
            ("x-youtube-page-cl", self.ytcfg.page_cl()),
            ("x-youtube-page-label", self.ytcfg.page_build_label.clone()),
            ("x-youtube-utc-offset", Some("0".to_string())),
            ("x-youtube-time-zone", Some("UTC".to_string())),
        ];

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        for (name, value) in candidates {
            let Some(value) = value else { continue };
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(name), value);
                }
                Err(_) => self.diagnostic(Level::WARN, format!("Skipping invalid {name} header")),
            }
        }
        if let Some(cookies) = &self.cookies {
            headers.insert(header::COOKIE, cookies.clone());
        }
        headers
    }

    /// POST to an InnerTube endpoint and return the decoded JSON.
    async fn post(
        &self,
        endpoint: &str,
        body: Value,
        query: &[(&str, &str)],
    ) -> CatalogResult<Value> {
        let url = format!(
            "{}youtubei/{}/{}",
            self.base_url,
            self.ytcfg.api_version(),
            endpoint
        );

        let mut params: Vec<(&str, &str)> = vec![("alt", "json")];
        if let Some(key) = self.ytcfg.innertube_api_key.as_deref() {
            params.push(("key", key));
        }
        params.extend_from_slice(query);

        let mut payload = json!({ "context": self.context() });
        if let (Some(target), Value::Object(extra)) = (payload.as_object_mut(), body) {
            target.extend(extra);
        }

        self.diagnostic(Level::TRACE, format!("POST {url}"));

        let response = self
            .http_client
            .post(&url)
            .query(&params)
            .headers(self.headers())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                self.diagnostic(Level::ERROR, format!("{endpoint} request failed: {e}"));
                CatalogError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            self.diagnostic(Level::ERROR, format!("{endpoint} returned HTTP {status}"));
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for YtMusicClient {
    async fn home_sections(&self) -> CatalogResult<Vec<HomeSection>> {
        let page = self
            .post("browse", json!({ "browseId": HOME_BROWSE_ID }), &[])
            .await?;

        let mut sections: Vec<HomeSection> =
            traverse_list(&page, &["sectionListRenderer", "contents"])
                .into_iter()
                .filter_map(parser::parse_home_section)
                .collect();

        let mut continuation = traverse_string(&page, &["continuation"]);
        let mut pages = 0;
        while let Some(token) = continuation.take() {
            if pages == MAX_HOME_CONTINUATIONS {
                self.diagnostic(Level::DEBUG, "Home feed continuation limit reached");
                break;
            }
            pages += 1;

            let query = [
                ("ctoken", token.as_str()),
                ("continuation", token.as_str()),
                ("type", "next"),
            ];
            let next = self.post("browse", json!({}), &query).await?;

            sections.extend(
                traverse_list(&next, &["sectionListContinuation", "contents"])
                    .into_iter()
                    .filter_map(parser::parse_home_section),
            );
            continuation = traverse_string(&next, &["continuation"]);
        }

        Ok(sections)
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<SearchResult>> {
        let data = self
            .post("search", json!({ "query": query, "params": Value::Null }), &[])
            .await?;
        Ok(parser::parse_search(&data))
    }

    async fn album(&self, album_id: &str) -> CatalogResult<AlbumDetails> {
        let data = self
            .post("browse", json!({ "browseId": album_id }), &[])
            .await?;
        parser::parse_album(&data, album_id)
            .ok_or_else(|| CatalogError::not_found(format!("Album {album_id}")))
    }

    async fn song(&self, video_id: &str) -> CatalogResult<SongDetails> {
        if !parser::is_valid_video_id(video_id) {
            return Err(CatalogError::invalid_id("song", video_id));
        }

        let data = self
            .post("player", json!({ "videoId": video_id }), &[])
            .await?;
        parser::parse_song(&data)
            .ok_or_else(|| CatalogError::not_found(format!("Song {video_id}")))
    }
}

/// Ensure the base URL ends with exactly one `/`.
fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Json, Path, Query, State};
    use axum::http::{HeaderMap as RequestHeaders, StatusCode};
    use axum::response::{Html, IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const SESSION_CONFIG: &str = r#"ytcfg.set({"VISITOR_DATA":"Cgt2aXNpdG9y",
        "INNERTUBE_CLIENT_VERSION":"1.2.3","PAGE_CL":42,"GL":"US","HL":"en"});"#;

    const LANDING_PAGE: &str = r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY":"K",
        "INNERTUBE_CLIENT_VERSION":"1.2.3","VISITOR_DATA":"V"});</script></html>"#;

    /// One InnerTube request seen by the stub catalog.
    struct Call {
        endpoint: String,
        query: HashMap<String, String>,
        body: Value,
        cookies: Option<String>,
    }

    #[derive(Default)]
    struct Recorded {
        landing_cookies: Vec<Option<String>>,
        calls: Vec<Call>,
    }

    type Shared = Arc<Mutex<Recorded>>;

    fn cookie_of(headers: &RequestHeaders) -> Option<String> {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn shelf(title: &str) -> Value {
        json!({ "musicCarouselShelfRenderer": {
            "header": { "title": { "runs": [ { "text": title } ] } },
            "contents": []
        } })
    }

    fn next_token() -> Value {
        json!([ { "nextContinuationData": { "continuation": "TOK" } } ])
    }

    async fn landing(
        State(recorded): State<Shared>,
        headers: RequestHeaders,
    ) -> Html<&'static str> {
        recorded.lock().unwrap().landing_cookies.push(cookie_of(&headers));
        Html(LANDING_PAGE)
    }

    async fn innertube(
        State(recorded): State<Shared>,
        Path(endpoint): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        headers: RequestHeaders,
        Json(body): Json<Value>,
    ) -> Response {
        let continued = query.contains_key("ctoken");
        recorded.lock().unwrap().calls.push(Call {
            endpoint: endpoint.clone(),
            query,
            body,
            cookies: cookie_of(&headers),
        });

        match endpoint.as_str() {
            "player" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "browse" if continued => Json(json!({ "continuationContents": {
                "sectionListContinuation": {
                    "contents": [shelf("Second")],
                    "continuations": next_token()
                }
            } }))
            .into_response(),
            "browse" => Json(json!({ "contents": { "singleColumnBrowseResultsRenderer": {
                "tabs": [ { "tabRenderer": { "content": { "sectionListRenderer": {
                    "contents": [shelf("First")],
                    "continuations": next_token()
                } } } } ]
            } } }))
            .into_response(),
            _ => Json(json!({})).into_response(),
        }
    }

    /// Serve a fake catalog on an ephemeral local port.
    async fn stub_catalog() -> (YtMusicProvider, Shared) {
        let recorded = Shared::default();
        let app = Router::new()
            .route("/", get(landing))
            .route("/youtubei/v1/{endpoint}", post(innertube))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = CatalogConfig {
            base_url: format!("http://{addr}"),
            ..Default::default()
        };
        (YtMusicProvider::new(&config).unwrap(), recorded)
    }

    fn session() -> ClientOptions {
        ClientOptions::default().with_cookies(Some(HeaderValue::from_static("SID=abc")))
    }

    fn client() -> YtMusicClient {
        YtMusicClient {
            http_client: reqwest::Client::new(),
            base_url: "https://music.youtube.com/".to_string(),
            cookies: Some(HeaderValue::from_static("SID=abc")),
            ytcfg: InnertubeConfig::from_html(SESSION_CONFIG),
            log_level: LevelFilter::OFF,
        }
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://music.youtube.com"),
            "https://music.youtube.com/"
        );
        assert_eq!(
            normalize_base_url("https://music.youtube.com//"),
            "https://music.youtube.com/"
        );
    }

    #[test]
    fn test_provider_creation() {
        let provider = YtMusicProvider::new(&CatalogConfig::default()).unwrap();
        assert_eq!(provider.base_url(), "https://music.youtube.com/");
    }

    #[test]
    fn test_headers_carry_session() {
        let headers = client().headers();
        assert_eq!(headers["x-goog-visitor-id"], "Cgt2aXNpdG9y");
        assert_eq!(headers["x-youtube-client-version"], "1.2.3");
        assert_eq!(headers["x-youtube-page-cl"], "42");
        assert_eq!(headers["x-origin"], "https://music.youtube.com");
        assert_eq!(headers[header::COOKIE], "SID=abc");
        assert!(!headers.contains_key("x-youtube-device"));
    }

    #[test]
    fn test_context_uses_locale() {
        let context = client().context();
        assert_eq!(context["client"]["gl"], "US");
        assert_eq!(context["client"]["hl"], "en");
        assert_eq!(context["client"]["clientName"], "WEB_REMIX");
    }

    #[tokio::test]
    async fn test_song_rejects_malformed_id_without_network() {
        let err = client().song("not-an-id").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidId { kind: "song", .. }));
    }

    #[tokio::test]
    async fn test_search_sends_innertube_request() {
        let (provider, recorded) = stub_catalog().await;
        let client = provider.connect(session()).await.unwrap();

        let results = client.search("queen").await.unwrap();
        assert!(results.is_empty());

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.landing_cookies, vec![Some("SID=abc".to_string())]);

        let call = &recorded.calls[0];
        assert_eq!(call.endpoint, "search");
        assert_eq!(call.query["alt"], "json");
        assert_eq!(call.query["key"], "K");
        assert_eq!(call.body["query"], "queen");
        assert_eq!(call.body["context"]["client"]["clientVersion"], "1.2.3");
        assert_eq!(call.body["context"]["client"]["visitorData"], "V");
        assert_eq!(call.cookies.as_deref(), Some("SID=abc"));
    }

    #[tokio::test]
    async fn test_home_follows_continuations_up_to_limit() {
        let (provider, recorded) = stub_catalog().await;
        let client = provider.connect(session()).await.unwrap();

        let sections = client.home_sections().await.unwrap();
        assert_eq!(sections.len(), 1 + MAX_HOME_CONTINUATIONS);
        assert_eq!(sections[0].title, "First");
        assert!(sections[1..].iter().all(|s| s.title == "Second"));

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.calls.len(), 1 + MAX_HOME_CONTINUATIONS);
        assert_eq!(recorded.calls[0].body["browseId"], HOME_BROWSE_ID);
        let continued = &recorded.calls[1];
        assert_eq!(continued.query["ctoken"], "TOK");
        assert_eq!(continued.query["continuation"], "TOK");
        assert_eq!(continued.query["type"], "next");
    }

    #[tokio::test]
    async fn test_upstream_status_is_reported() {
        let (provider, _recorded) = stub_catalog().await;
        let client = provider.connect(ClientOptions::default()).await.unwrap();

        let err = client.song("fJ9rUzIMcZQ").await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 500 }));
    }
}
