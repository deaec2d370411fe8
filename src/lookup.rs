use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LookupError;

const DEFAULT_BASE_URL: &str = "http://api.rottentomatoes.com/api/public/v1.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration. Only the API key is required; the rest has
/// sensible defaults.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl LookupConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Wire shape of the provider's search endpoint. Movies stay untyped
/// because callers address their fields by name.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub total: u64,
    pub movies: Vec<Value>,
}

/// A successful exact-title match, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMatch {
    /// Canonical title as the provider spells it.
    pub title: String,
    /// The "detailed" poster URL.
    pub poster_url: String,
    /// Requested field name -> value, copied verbatim from the movie.
    pub fields: BTreeMap<String, Value>,
}

/// Terminal states of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Matched(MovieMatch),
    NotFound,
}

#[derive(Debug)]
pub struct LookupClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LookupClient {
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        if config.api_key.is_empty() {
            return Err(LookupError::NotConfigured(
                "API key must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(Self {
            http,
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key,
        })
    }

    /// Run the whole lookup: one GET against the search endpoint, then
    /// evaluate the response against the exact-match policy.
    pub async fn lookup(
        &self,
        title: &str,
        fields: &[String],
    ) -> Result<LookupOutcome, LookupError> {
        let url = format!("{}/movies.json", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", title),
                ("page_limit", "1"),
                ("page", "1"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let search: SearchResponse = serde_json::from_str(&body)?;
        evaluate_search(&search, title, fields)
    }
}

/// Pure half of the lookup: apply the match policy and extract the
/// requested fields. Separated from the network call so it can be
/// tested against fixtures.
pub fn evaluate_search(
    response: &SearchResponse,
    title: &str,
    fields: &[String],
) -> Result<LookupOutcome, LookupError> {
    let candidate = match first_exact_match(response, title)? {
        Some(movie) => movie,
        None => return Ok(LookupOutcome::NotFound),
    };

    // Invariant from first_exact_match: a string title is present.
    let canonical_title = candidate
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(title)
        .to_string();

    let poster_url = candidate
        .get("posters")
        .and_then(|posters| posters.get("detailed"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            LookupError::Shape("matched movie has no posters.detailed URL".to_string())
        })?
        .to_string();

    let fields = extract_fields(candidate, fields)?;

    Ok(LookupOutcome::Matched(MovieMatch {
        title: canonical_title,
        poster_url,
        fields,
    }))
}

/// Match policy: the lookup succeeds only when at least one result came
/// back and the first result's title equals the query title
/// case-insensitively. Anything else is a miss, not an error.
fn first_exact_match<'a>(
    response: &'a SearchResponse,
    title: &str,
) -> Result<Option<&'a Value>, LookupError> {
    if response.total == 0 {
        return Ok(None);
    }

    let first = response.movies.first().ok_or_else(|| {
        LookupError::Shape(format!(
            "total is {} but the movies array is empty",
            response.total
        ))
    })?;

    let candidate_title = first
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| LookupError::Shape("first movie has no string title".to_string()))?;

    if candidate_title.to_lowercase() == title.to_lowercase() {
        Ok(Some(first))
    } else {
        Ok(None)
    }
}

/// Copy the requested fields out of the movie object. Field names are
/// exact and case-sensitive; the first unknown name aborts the whole
/// extraction so a partial mapping never escapes.
fn extract_fields(
    movie: &Value,
    fields: &[String],
) -> Result<BTreeMap<String, Value>, LookupError> {
    let mut out = BTreeMap::new();

    for name in fields {
        let value = movie
            .get(name)
            .ok_or_else(|| LookupError::UnknownField(name.clone()))?;
        out.insert(name.clone(), value.clone());
    }

    Ok(out)
}
