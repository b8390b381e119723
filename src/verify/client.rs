// src/verify/client.rs

use anyhow::{ensure, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable holding the project's base endpoint URL.
pub const ENV_URL: &str = "SUPABASE_URL";
/// Environment variable holding the service-role key. Elevated credential;
/// supplied via the environment, never committed to source.
pub const ENV_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated handle to a Supabase project's PostgREST interface.
///
/// Construction validates the endpoint and credential up front: a verification
/// run that cannot establish its client has no recovery path.
pub struct SupabaseClient {
    http: reqwest::Client,
    base: Url,
}

impl SupabaseClient {
    pub fn new(base_url: &str, service_key: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid endpoint URL {base_url:?}"))?;
        ensure!(
            matches!(base.scheme(), "http" | "https"),
            "endpoint URL must be http(s), got {base_url:?}"
        );
        ensure!(!service_key.is_empty(), "service key is empty");

        let mut key = HeaderValue::from_str(service_key)
            .context("service key is not a valid header value")?;
        key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .context("service key is not a valid header value")?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;

        Ok(Self { http, base })
    }

    /// Build a client from `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`.
    pub fn from_env() -> Result<Self> {
        let url = env::var(ENV_URL).with_context(|| format!("{ENV_URL} is not set"))?;
        let key = env::var(ENV_SERVICE_KEY).with_context(|| format!("{ENV_SERVICE_KEY} is not set"))?;
        Self::new(&url, &key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        let endpoint = format!(
            "{}/rest/v1/{}",
            self.base.as_str().trim_end_matches('/'),
            table
        );
        Url::parse(&endpoint).with_context(|| format!("invalid table endpoint {endpoint:?}"))
    }

    /// Fetch all rows of `table` with the given PostgREST `select` clause.
    pub async fn fetch_rows(&self, table: &str, select: &str) -> Result<Vec<Value>> {
        let url = self.table_url(table)?;
        debug!(%url, table, "fetching rows");
        let rows: Vec<Value> = self
            .http
            .get(url)
            .query(&[("select", select)])
            .send()
            .await
            .with_context(|| format!("GET rows of '{table}' failed"))?
            .error_for_status()
            .with_context(|| format!("non-success status for '{table}'"))?
            .json()
            .await
            .with_context(|| format!("decoding rows of '{table}'"))?;
        debug!(table, rows = rows.len(), "fetched");
        Ok(rows)
    }

    /// Exact row count of `table`, taken from the `Content-Range` response
    /// header so no row payload has to travel.
    pub async fn count_rows(&self, table: &str) -> Result<u64> {
        let url = self.table_url(table)?;
        debug!(%url, table, "counting rows");
        let resp = self
            .http
            .get(url)
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await
            .with_context(|| format!("counting rows of '{table}' failed"))?
            .error_for_status()
            .with_context(|| format!("non-success status counting '{table}'"))?;

        let content_range = resp
            .headers()
            .get("content-range")
            .with_context(|| format!("no Content-Range header counting '{table}'"))?
            .to_str()
            .context("Content-Range header is not valid text")?;
        parse_content_range_total(content_range)
            .with_context(|| format!("unparseable Content-Range {content_range:?} for '{table}'"))
    }
}

/// Parse the total out of a `Content-Range` value such as `0-0/57`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "eyJhbGciOiJIUzI1NiJ9.fake.fake";

    #[test]
    fn valid_endpoint_and_key_yield_a_client_without_io() {
        let client = SupabaseClient::new("https://project.supabase.co", KEY).unwrap();
        assert_eq!(client.base_url().as_str(), "https://project.supabase.co/");
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(SupabaseClient::new("not a url", KEY).is_err());
        assert!(SupabaseClient::new("ftp://project.supabase.co", KEY).is_err());
    }

    #[test]
    fn invalid_credential_format_is_rejected() {
        assert!(SupabaseClient::new("https://project.supabase.co", "").is_err());
        assert!(SupabaseClient::new("https://project.supabase.co", "key\nwith-newline").is_err());
    }

    #[test]
    fn table_urls_ignore_trailing_slash_in_base() {
        let client = SupabaseClient::new("https://project.supabase.co/", KEY).unwrap();
        assert_eq!(
            client.table_url("incidents").unwrap().as_str(),
            "https://project.supabase.co/rest/v1/incidents"
        );
    }

    #[test]
    fn content_range_totals_parse() {
        assert_eq!(parse_content_range_total("0-0/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range_total("0-0/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
