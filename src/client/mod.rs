use crate::{api::alias::Aliases, Error};
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client as Reqwest, Method};
use serde::Deserialize;
use std::{future::Future, sync::Arc};
use tracing::{debug, instrument, warn};
use url::Url;

pub mod builder;
use builder::*;

/// Sends one request to the cluster and hands back the raw response body.
///
/// `path` is a list of segments, joined with `/` and percent-encoded by the
/// implementation. `body`, when present, is already-encoded JSON.
/// Implementations own everything about the connection: timeouts,
/// authentication, retries and the mapping of error statuses to [`Error`].
pub trait Transport {
    fn execute(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Bytes, Error>> + Send;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub reqwest: Reqwest,
    hostname: Arc<Url>,
}

impl Client {
    /// # Panics
    ///
    /// If `hostname` is not a valid base url.
    pub fn new(hostname: &str) -> Self {
        Self::builder()
            .hostname(hostname)
            .build()
            .expect("hostname should be a valid base url")
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn hostname(&self) -> &str {
        self.hostname.as_str()
    }

    pub fn aliases(&self) -> Aliases<'_, Self> {
        Aliases::new(self)
    }

    /// Dot segments are normalized away by url parsing, escaped or not, so
    /// they are refused rather than sent to a different endpoint.
    fn url(&self, path: &[&str]) -> Result<Url, Error> {
        if let Some(segment) = path.iter().find(|p| is_dot_segment(p)) {
            return Err(Error::DotSegment(segment.to_string()));
        }

        let mut url = Url::clone(&self.hostname);

        // checked by the builder
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }

        Ok(url)
    }
}

impl Transport for Client {
    #[instrument(skip(self, body))]
    async fn execute(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, &str)],
        body: Option<Bytes>,
    ) -> Result<Bytes, Error> {
        let url = self.url(path)?;

        let req = self.reqwest.request(method.clone(), url.clone()).query(query);
        let req = if let Some(body) = body {
            req.body(body)
        } else {
            req
        };

        let res = req.send().await.map_err(Error::ActionFailed)?;
        let status = res.status();
        let body = res.bytes().await.map_err(Error::ReadBody)?;

        debug!(%method, %url, %status, len = body.len(), "elasticsearch responded");

        if !status.is_success() {
            let reason = error_reason(&body);
            warn!(%method, %url, %status, %reason, "elasticsearch request failed");

            return Err(Error::Elasticsearch {
                status: status.as_u16(),
                reason,
            });
        }

        Ok(body)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
    )
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Cause { reason: String },
    Message(String),
}

/// Pulls `error.reason` (or a bare `error` string) out of an error body,
/// falling back to the body text itself.
fn error_reason(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorDetail::Cause { reason } | ErrorDetail::Message(reason),
        }) => reason,
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
