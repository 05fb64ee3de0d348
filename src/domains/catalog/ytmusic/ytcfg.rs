//! InnerTube configuration scraped from the catalog's landing page.
//!
//! The page embeds one or more `ytcfg.set({...});` calls. Their JSON objects
//! are merged in order, later keys winning.

use serde::Deserialize;
use serde_json::{Map, Value};

const YTCFG_MARKER: &str = "ytcfg.set(";

const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_CLIENT_NAME: &str = "WEB_REMIX";
const DEFAULT_CLIENT_VERSION: &str = "1.20250101.01.00";
const DEFAULT_CONTEXT_CLIENT_NAME: &str = "67";

/// The subset of `ytcfg` the client needs to talk to InnerTube.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct InnertubeConfig {
    pub innertube_api_key: Option<String>,
    pub innertube_api_version: Option<String>,
    pub innertube_client_name: Option<String>,
    pub innertube_client_version: Option<String>,
    pub innertube_context_client_name: Option<Value>,
    pub visitor_data: Option<String>,
    pub device: Option<String>,
    pub page_cl: Option<Value>,
    pub page_build_label: Option<String>,
    pub gl: Option<String>,
    pub hl: Option<String>,
}

impl InnertubeConfig {
    /// Build the config from the landing page HTML.
    ///
    /// Blobs that are not valid JSON are skipped. A page without any blob
    /// yields the default (empty) config.
    pub fn from_html(html: &str) -> Self {
        let mut merged = Map::new();

        for blob in ytcfg_blobs(html) {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(blob) {
                merged.extend(map);
            }
        }

        serde_json::from_value(Value::Object(merged)).unwrap_or_default()
    }

    /// Apply caller overrides for country and language.
    pub fn with_locale(mut self, gl: Option<String>, hl: Option<String>) -> Self {
        if gl.is_some() {
            self.gl = gl;
        }
        if hl.is_some() {
            self.hl = hl;
        }
        self
    }

    pub fn api_version(&self) -> &str {
        self.innertube_api_version
            .as_deref()
            .unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn client_name(&self) -> &str {
        self.innertube_client_name
            .as_deref()
            .unwrap_or(DEFAULT_CLIENT_NAME)
    }

    pub fn client_version(&self) -> &str {
        self.innertube_client_version
            .as_deref()
            .unwrap_or(DEFAULT_CLIENT_VERSION)
    }

    /// Numeric client id sent as `X-YouTube-Client-Name`.
    pub fn context_client_name(&self) -> String {
        self.innertube_context_client_name
            .as_ref()
            .map(scalar_to_string)
            .unwrap_or_else(|| DEFAULT_CONTEXT_CLIENT_NAME.to_string())
    }

    pub fn page_cl(&self) -> Option<String> {
        self.page_cl.as_ref().map(scalar_to_string)
    }
}

/// Render a JSON scalar the way it would appear in a header.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Raw JSON object text of every `ytcfg.set(...)` call in the page.
fn ytcfg_blobs(html: &str) -> Vec<&str> {
    let mut blobs = Vec::new();
    let mut rest = html;

    while let Some(pos) = rest.find(YTCFG_MARKER) {
        rest = &rest[pos + YTCFG_MARKER.len()..];
        if let Some(object) = leading_object(rest) {
            let skipped = rest.len() - rest.trim_start().len();
            blobs.push(object);
            rest = &rest[skipped + object.len()..];
        }
    }

    blobs
}

/// The balanced `{...}` at the start of `text`, ignoring braces in strings.
fn leading_object(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    let offset = text.len() - trimmed.len();
    if !trimmed.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in trimmed.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[offset..offset + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><script>
        ytcfg.set({"INNERTUBE_API_KEY":"key-123","INNERTUBE_CLIENT_VERSION":"1.2.3","PAGE_CL":555});
        </script><script>ytcfg.set({"VISITOR_DATA":"visitor",
        "INNERTUBE_CLIENT_VERSION":"1.2.4","LABEL":"a } brace"});</script>
        <script>ytcfg.set("EXPERIMENT", true);</script></html>"#;

    #[test]
    fn test_merges_all_blobs() {
        let config = InnertubeConfig::from_html(PAGE);
        assert_eq!(config.innertube_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.visitor_data.as_deref(), Some("visitor"));
        assert_eq!(config.client_version(), "1.2.4");
        assert_eq!(config.page_cl().as_deref(), Some("555"));
    }

    #[test]
    fn test_empty_page_uses_defaults() {
        let config = InnertubeConfig::from_html("<html></html>");
        assert!(config.innertube_api_key.is_none());
        assert_eq!(config.api_version(), "v1");
        assert_eq!(config.client_name(), "WEB_REMIX");
        assert_eq!(config.context_client_name(), "67");
    }

    #[test]
    fn test_invalid_blob_is_skipped() {
        let html = r#"ytcfg.set({not json}); ytcfg.set({"HL":"fr"});"#;
        let config = InnertubeConfig::from_html(html);
        assert_eq!(config.hl.as_deref(), Some("fr"));
    }

    #[test]
    fn test_locale_overrides() {
        let config = InnertubeConfig::from_html(r#"ytcfg.set({"GL":"US","HL":"en"});"#)
            .with_locale(Some("DE".to_string()), None);
        assert_eq!(config.gl.as_deref(), Some("DE"));
        assert_eq!(config.hl.as_deref(), Some("en"));
    }

    #[test]
    fn test_leading_object_respects_strings() {
        let text = r#"{"a":"}{","b":{"c":1}}); trailing"#;
        assert_eq!(leading_object(text), Some(r#"{"a":"}{","b":{"c":1}}"#));
        assert_eq!(leading_object("no object"), None);
        assert_eq!(leading_object("{unterminated"), None);
    }
}
