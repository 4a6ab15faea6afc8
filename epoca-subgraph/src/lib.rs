//! epoca-subgraph
//!
//! Connector that implements `RoundProvider` on top of a GraphQL subgraph
//! exposing prediction-market `rounds`. Results are paged with `first`/`skip`
//! and returned ascending by epoch; a page that repeats earlier rounds or a
//! `skip` past [`SubgraphConnector::MAX_SKIP`] fails with `EpocaError::Data`.
#![warn(missing_docs)]

use async_trait::async_trait;
use epoca_core::connector::{ConnectorKey, EpocaConnector, RoundProvider};
use epoca_core::{EpocaError, EpochRange, Round};
use serde::{Deserialize, Serialize};
use url::Url;

/// GraphQL document sent for every page.
pub const ROUNDS_QUERY: &str = "query Rounds($gte: BigInt!, $lte: BigInt!, $first: Int!, $skip: Int!) {
  rounds(first: $first, skip: $skip, orderBy: epoch, orderDirection: asc, where: { startAt_gte: $gte, startAt_lte: $lte }) {
    epoch
    position
    failed
    startAt
    closeAt
    totalBets
    totalAmount
    bullBets
    bullAmount
    bearBets
    bearAmount
  }
}";

#[derive(Serialize)]
struct GraphRequest<'a> {
    query: &'a str,
    variables: RoundsVariables,
}

#[derive(Serialize)]
struct RoundsVariables {
    gte: String,
    lte: String,
    first: u32,
    skip: u32,
}

#[derive(Deserialize)]
struct GraphResponse {
    data: Option<RoundsData>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Deserialize)]
struct RoundsData {
    rounds: Option<Vec<Round>>,
}

#[derive(Deserialize)]
struct GraphError {
    message: String,
}

/// Public connector type for the round registry.
#[derive(Debug, Clone)]
pub struct SubgraphConnector {
    http: reqwest::Client,
    endpoint: Url,
    page_size: u32,
}

impl SubgraphConnector {
    /// Static connector key.
    pub const KEY: ConnectorKey = ConnectorKey::new("epoca-subgraph");

    /// Deployment id of the prediction-market subgraph on the hosted gateway.
    pub const SUBGRAPH_ID: &'static str = "4kRuZVKCR9dsG2ePXhLSiKw5oaw3YMJo4nAwxZbUaqVY";

    /// Default page size; the gateway caps `first` at 1000.
    pub const DEFAULT_PAGE_SIZE: u32 = 1000;

    /// Largest `skip` the gateway accepts.
    pub const MAX_SKIP: u32 = 5000;

    /// Build against the hosted gateway using `api_key`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a blank key and `Other` if the HTTP client cannot be built.
    pub fn gateway(api_key: &str) -> Result<Self, EpocaError> {
        let key = api_key.trim();
        if key.is_empty() {
            return Err(EpocaError::InvalidArg("graph api key is empty".into()));
        }
        Self::with_endpoint(&format!(
            "https://gateway.thegraph.com/api/{key}/subgraphs/id/{}",
            Self::SUBGRAPH_ID
        ))
    }

    /// Build against an arbitrary GraphQL endpoint.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `endpoint` is not an absolute http(s) URL and `Other`
    /// if the HTTP client cannot be built.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, EpocaError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| EpocaError::InvalidArg(format!("invalid subgraph endpoint: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(EpocaError::InvalidArg(format!(
                "subgraph endpoint must be http(s), got {}",
                endpoint.scheme()
            )));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("epoca/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EpocaError::Other(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            page_size: Self::DEFAULT_PAGE_SIZE,
        })
    }

    /// Replace the HTTP client, e.g. to share a connection pool.
    #[must_use]
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Set the page size used for `first`. Values below one are raised to one.
    #[must_use]
    pub fn page_size(mut self, n: u32) -> Self {
        self.page_size = n.max(1);
        self
    }

    /// The endpoint queried.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport(msg: impl std::fmt::Display) -> EpocaError {
        EpocaError::connector(Self::KEY, msg.to_string())
    }

    async fn fetch_page(&self, range: EpochRange, skip: u32) -> Result<Vec<Round>, EpocaError> {
        let body = GraphRequest {
            query: ROUNDS_QUERY,
            variables: RoundsVariables {
                gte: range.start.to_string(),
                lte: range.end.to_string(),
                first: self.page_size,
                skip,
            },
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport(format!("request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::transport(format!("status {status}: rounds")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Self::transport(format!("read body: {e}")))?;
        let parsed: GraphResponse = serde_json::from_slice(&bytes)
            .map_err(|e| EpocaError::shape("round registry response", e.to_string()))?;

        if !parsed.errors.is_empty() {
            let msgs: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(Self::transport(format!("graphql: {}", msgs.join("; "))));
        }

        parsed
            .data
            .and_then(|d| d.rounds)
            .ok_or_else(|| Self::transport("response carried no rounds"))
    }
}

impl EpocaConnector for SubgraphConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "The Graph"
    }

    fn as_round_provider(&self) -> Option<&dyn RoundProvider> {
        Some(self as &dyn RoundProvider)
    }
}

#[async_trait]
impl RoundProvider for SubgraphConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "epoca_subgraph::rounds",
            skip(self),
            fields(start = range.start, end = range.end, page_size = self.page_size),
        )
    )]
    async fn rounds(&self, range: EpochRange) -> Result<Vec<Round>, EpocaError> {
        let mut out: Vec<Round> = Vec::new();
        let mut skip: u32 = 0;
        loop {
            let page = self.fetch_page(range, skip).await?;
            let n = page.len();
            #[cfg(feature = "tracing")]
            tracing::debug!(skip, rounds = n, "fetched round page");
            if let (Some(prev), Some(next)) = (out.last(), page.first()) {
                if !advances(prev, next) {
                    return Err(EpocaError::Data(format!(
                        "round page at skip {skip} did not advance past epoch {}",
                        prev.epoch
                    )));
                }
            }
            out.extend(page);
            if n < self.page_size as usize {
                break;
            }
            skip = skip
                .checked_add(self.page_size)
                .filter(|s| *s <= Self::MAX_SKIP)
                .ok_or_else(|| {
                    EpocaError::Data(format!(
                        "more than {} rounds in {}..={}; paging limit reached",
                        out.len(),
                        range.start,
                        range.end
                    ))
                })?;
        }
        Ok(out)
    }
}

// A page continues the previous one only if its first round comes strictly later.
fn advances(prev: &Round, next: &Round) -> bool {
    match (prev.sequence(), next.sequence()) {
        (Some(a), Some(b)) => b > a,
        _ => prev.epoch != next.epoch,
    }
}
