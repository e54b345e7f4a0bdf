use crate::{error::*, Error};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub mod alias;

pub(crate) fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R, Error> {
    serde_json::from_slice(body)
        .toss_deserialize_text_with(|| String::from_utf8_lossy(body).into_owned())
}

/// Acknowledgement returned by write endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub acknowledged: bool,
    pub errors: Option<bool>,
}
