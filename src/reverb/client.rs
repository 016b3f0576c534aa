// client.rs
use crate::errors::{ExportError, Result};
use crate::listings::lookup;
use crate::reverb::models::ListingsResponse;
use crate::reverb::Page;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("reverb_export/", env!("CARGO_PKG_VERSION"));
const HAL_JSON: &str = "application/hal+json";
const API_VERSION: &str = "3.0";

/// Anything that can hand back pages of listings by URL.
pub trait PageSource {
    fn fetch_page(&mut self, url: &str) -> Result<Page>;
}

pub struct ReverbClient {
    client: Client,
    headers: HeaderMap,
}

impl ReverbClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            headers: api_headers(token)?,
        })
    }
}

impl PageSource for ReverbClient {
    fn fetch_page(&mut self, url: &str) -> Result<Page> {
        debug!(url, "GET listings page");

        let resp = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ExportError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_page(url, &text)
    }
}

fn api_headers(token: &str) -> Result<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ExportError::Credential("token contains invalid header characters".into()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(HAL_JSON));
    headers.insert("Accept-Version", HeaderValue::from_static(API_VERSION));
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}

/// Decode a response body fetched from `url`.
///
/// The body must be a JSON object. A missing `listings` key is an empty page;
/// the `next` href is resolved against `url` so relative links work too.
pub fn parse_page(url: &str, body: &str) -> Result<Page> {
    let json: Value = serde_json::from_str(body).map_err(|e| ExportError::Decode(e.to_string()))?;
    if !json.is_object() {
        return Err(ExportError::Decode("expected a JSON object".into()));
    }

    // Any unusable `_links` shape simply means there is no next page.
    let next = lookup(&json, &["_links".into(), "next".into(), "href".into()])
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| resolve_href(url, href))
        .transpose()?;

    let resp: ListingsResponse =
        serde_json::from_value(json).map_err(|e| ExportError::Decode(e.to_string()))?;

    Ok(Page {
        listings: resp.listings.unwrap_or_default(),
        next,
    })
}

fn resolve_href(base: &str, href: &str) -> Result<String> {
    let joined = Url::parse(base)
        .and_then(|b| b.join(href))
        .map_err(|e| ExportError::Decode(format!("bad next link '{href}': {e}")))?;
    Ok(joined.into())
}
