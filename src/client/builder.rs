use super::{Client, CONTENT_TYPE};
use crate::{error::*, Error};
use reqwest::header::{HeaderMap, HeaderValue};
use std::{env, time::Duration};
use tracing::instrument;
use url::Url;

pub const HOSTNAME_ENV: &str = "ELASTICSEARCH_HOSTNAME";
pub const JSON_CONTENT_TYPE: HeaderValue = HeaderValue::from_static("application/json");

#[derive(Debug)]
pub struct ClientBuilder {
    hostname: Option<String>,
    reqwest_builder: Option<reqwest::ClientBuilder>,
    timeout: Option<Duration>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            reqwest_builder: None,
            hostname: env::var(HOSTNAME_ENV).ok(),
            timeout: None,
        }
    }

    pub fn hostname(mut self, hostname: impl ToString) -> Self {
        self.hostname.replace(hostname.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout.replace(timeout);
        self
    }

    pub fn reqwest_builder(mut self, builder: reqwest::ClientBuilder) -> Self {
        self.reqwest_builder.replace(builder);
        self
    }

    #[instrument]
    pub fn build(self) -> Result<Client, Error> {
        let hostname = self.hostname.ok_or(Error::HostnameNotFound)?;
        let url = Url::parse(&hostname).toss_invalid_hostname_with(|| hostname.clone())?;

        if url.cannot_be_a_base() {
            return Err(Error::HostnameCannotBeABase(hostname));
        }

        let mut builder = self.reqwest_builder.unwrap_or_default();

        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
        builder = builder.default_headers(header_map);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let reqwest = builder.build().map_err(Error::ReqwestBuilderFailed)?;

        Ok(Client {
            reqwest,
            hostname: url.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build() {
        let client = ClientBuilder::new()
            .hostname("http://127.0.0.1:9200")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(client.hostname(), "http://127.0.0.1:9200/");
    }

    #[test]
    fn test_invalid_hostname() {
        let err = ClientBuilder::new()
            .hostname("not a url")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidHostname { hostname, .. } if hostname == "not a url"));
    }

    #[test]
    fn test_hostname_cannot_be_a_base() {
        let err = ClientBuilder::new()
            .hostname("mailto:ops@example.com")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::HostnameCannotBeABase(_)));
    }
}
