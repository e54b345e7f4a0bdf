//! Client bindings for the Elasticsearch index alias API.
//!
//! ```no_run
//! # async fn run() -> Result<(), elastic_aliases::Error> {
//! let client = elastic_aliases::Client::builder()
//!     .hostname("http://127.0.0.1:9200")
//!     .build()?;
//!
//! client
//!     .aliases()
//!     .replace("logs-2024", "logs-current", "logs-2025")
//!     .await?;
//!
//! let listing = client.aliases().get_index_from_alias("logs-current").await?;
//! for index in listing.indices() {
//!     println!("{index}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;

pub mod api;

pub use api::{
    alias::{AliasAction, AliasBinding, AliasListing, AliasRequest, Aliases},
    AckResponse,
};
pub use client::*;
pub use error::Error;
pub use reqwest::{Client as Reqwest, ClientBuilder as ReqwestBuilder, Method};

mod error {
    use thiserror::Error;
    use tosserror::Toss;

    #[derive(Debug, Error, Toss)]
    #[visibility(pub(crate))]
    pub enum Error {
        #[error("You must specify an index to {action} the alias on")]
        MissingIndex { action: &'static str },
        #[error("You must specify at least one index to list aliases for")]
        MissingIndices,
        #[error("Path segment `{0}` would be normalized out of the url")]
        DotSegment(String),
        #[error("Alias action has neither `add` nor `remove`")]
        EmptyAction,
        #[error("Alias request contains no actions")]
        NoActions,
        #[error("Failed to serialize request {body} to json")]
        SerializeBody {
            body: String,
            source: serde_json::Error,
        },
        #[error("Request failed to Elasticsearch")]
        ActionFailed(#[source] reqwest::Error),
        #[error("Failed to read response body")]
        ReadBody(#[source] reqwest::Error),
        #[error("Elasticsearch responded with {status}: {reason}")]
        Elasticsearch { status: u16, reason: String },
        #[error("Failed to deserialize text {text} as json")]
        DeserializeText {
            text: String,
            source: serde_json::Error,
        },
        #[error("Hostname not found")]
        HostnameNotFound,
        #[error("Hostname ({hostname}) is not a valid url")]
        InvalidHostname {
            hostname: String,
            source: url::ParseError,
        },
        #[error("Hostname ({0}) cannot be used as a base url")]
        HostnameCannotBeABase(String),
        #[error("ReqwestBuilder failed to build")]
        ReqwestBuilderFailed(#[source] reqwest::Error),
    }
}
