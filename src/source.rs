use std::{fmt, str::FromStr, time::Duration};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::ApiError, number::Number};

/// The categories of numbers the upstream source can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Prime,
    Fibonacci,
    Even,
    Random,
}

impl NumberKind {
    /// The single letter used both in our route and in the upstream URL.
    pub fn code(self) -> &'static str {
        match self {
            NumberKind::Prime => "p",
            NumberKind::Fibonacci => "f",
            NumberKind::Even => "e",
            NumberKind::Random => "r",
        }
    }
}

impl FromStr for NumberKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" => Ok(NumberKind::Prime),
            "f" => Ok(NumberKind::Fibonacci),
            "e" => Ok(NumberKind::Even),
            "r" => Ok(NumberKind::Random),
            other => Err(ApiError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Somewhere to get a batch of numbers from.
///
/// Fetching never fails: anything that goes wrong is reported as an empty
/// batch, so callers only ever deal with numbers.
#[async_trait::async_trait]
pub trait NumberSource: Send + Sync {
    async fn fetch_numbers(&self, kind: NumberKind) -> Vec<Number>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Timed out waiting for {0}")]
    Timeout(String),
    #[error("Request to {0} failed: {1}")]
    Request(String, reqwest::Error),
    #[error("{0} responded with {1}")]
    Status(String, StatusCode),
    #[error("{0} sent a body we could not read: {1}")]
    Malformed(String, reqwest::Error),
    #[error("{0} sent numbers we could not read: {1}")]
    BadNumbers(String, serde_json::Error),
}

/// Fetches numbers over HTTP from `{base_url}{code}`.
#[derive(Debug, Clone)]
pub struct HttpNumberSource {
    client: Client,
    base_url: String,
}

impl HttpNumberSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, kind: NumberKind) -> String {
        format!("{}{}", self.base_url, kind.code())
    }

    async fn fetch(&self, kind: NumberKind) -> Result<Vec<Number>, FetchError> {
        let url = self.url_for(kind);
        let res = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.clone())
            } else {
                FetchError::Request(url.clone(), e)
            }
        })?;

        if !res.status().is_success() {
            return Err(FetchError::Status(url, res.status()));
        }

        let mut body = res.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.clone())
            } else {
                FetchError::Malformed(url.clone(), e)
            }
        })?;

        // Only an object can carry `numbers`; any other body has none.
        match body.get_mut("numbers").map(Value::take) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(numbers) => {
                serde_json::from_value(numbers).map_err(|e| FetchError::BadNumbers(url, e))
            }
        }
    }
}

#[async_trait::async_trait]
impl NumberSource for HttpNumberSource {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_numbers(&self, kind: NumberKind) -> Vec<Number> {
        match self.fetch(kind).await {
            Ok(numbers) => {
                debug!("Fetched {:?}", numbers);
                numbers
            }
            Err(e) => {
                warn!("Could not fetch numbers, using none: {}", e);
                Vec::new()
            }
        }
    }
}
