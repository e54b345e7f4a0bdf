use super::{decode, AckResponse};
use crate::{error::*, Error, Transport};
use itertools::Itertools;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use std::{fmt, ops::Deref};
use tracing::{debug, instrument};

const PATH: &'static str = "_aliases";
const ALIAS: &'static str = "_alias";

/// An `(index, alias)` pair. Empty fields are left out of the wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasBinding {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub index: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

impl AliasBinding {
    pub fn new(index: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            alias: alias.into(),
        }
    }
}

/// One entry of the `actions` list.
///
/// When both slots are set the server applies them as a single atomic swap.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasAction {
    pub remove: Option<AliasBinding>,
    pub add: Option<AliasBinding>,
}

impl AliasAction {
    pub fn add(index: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            add: Some(AliasBinding::new(index, alias)),
            ..Default::default()
        }
    }

    pub fn remove(index: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            remove: Some(AliasBinding::new(index, alias)),
            ..Default::default()
        }
    }

    /// Moves `alias` from `index` to `new_index`.
    pub fn swap(
        index: impl Into<String>,
        alias: impl Into<String>,
        new_index: impl Into<String>,
    ) -> Self {
        let alias = alias.into();

        Self {
            remove: Some(AliasBinding::new(index, alias.clone())),
            add: Some(AliasBinding::new(new_index, alias)),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.remove.is_none() && self.add.is_none() {
            return Err(Error::EmptyAction);
        }

        for (action, binding) in [("remove", &self.remove), ("add", &self.add)] {
            if binding.as_ref().is_some_and(|b| b.index.is_empty()) {
                return Err(Error::MissingIndex { action });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRequest {
    pub actions: Vec<AliasAction>,
}

impl AliasRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(self, index: impl Into<String>, alias: impl Into<String>) -> Self {
        self.action(AliasAction::add(index, alias))
    }

    pub fn remove(self, index: impl Into<String>, alias: impl Into<String>) -> Self {
        self.action(AliasAction::remove(index, alias))
    }

    pub fn swap(
        self,
        index: impl Into<String>,
        alias: impl Into<String>,
        new_index: impl Into<String>,
    ) -> Self {
        self.action(AliasAction::swap(index, alias, new_index))
    }

    pub fn action(mut self, action: AliasAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.actions.is_empty() {
            return Err(Error::NoActions);
        }

        self.actions.iter().try_for_each(AliasAction::validate)
    }
}

impl From<AliasAction> for AliasRequest {
    fn from(action: AliasAction) -> Self {
        Self {
            actions: vec![action],
        }
    }
}

impl FromIterator<AliasAction> for AliasRequest {
    fn from_iter<I: IntoIterator<Item = AliasAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// Response of the alias lookup endpoints.
///
/// The shape differs between server versions, so it is kept as an ordered
/// json object, usually keyed by index name:
///
/// ```json
/// { "logs-2024": { "aliases": { "logs-current": {} } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasListing(Map<String, Value>);

impl AliasListing {
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn aliases_of<'a>(&'a self, index: &str) -> impl Iterator<Item = &'a str> {
        self.0
            .get(index)
            .and_then(|entry| entry.get("aliases"))
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|aliases| aliases.keys().map(String::as_str))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for AliasListing {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Map<String, Value>> for AliasListing {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub struct Aliases<'a, T> {
    transport: &'a T,
}

impl<'a, T> Clone for Aliases<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Aliases<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Aliases<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aliases")
            .field("transport", self.transport)
            .finish()
    }
}

impl<'a, T: Transport> Aliases<'a, T> {
    pub fn new(transport: &'a T) -> Aliases<'a, T> {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, index: &str, alias: &str) -> Result<AckResponse, Error> {
        self.update(&AliasAction::add(index, alias).into()).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, index: &str, alias: &str) -> Result<AckResponse, Error> {
        self.update(&AliasAction::remove(index, alias).into()).await
    }

    /// Points `alias` at `new_index` instead of `index` in one request, so
    /// the alias never resolves to nothing in between.
    #[instrument(skip(self))]
    pub async fn replace(
        &self,
        index: &str,
        alias: &str,
        new_index: &str,
    ) -> Result<AckResponse, Error> {
        self.update(&AliasAction::swap(index, alias, new_index).into())
            .await
    }

    /// Submits every action of `request` in a single call.
    #[instrument(skip(self))]
    pub async fn update(&self, request: &AliasRequest) -> Result<AckResponse, Error> {
        request.validate()?;

        let body = serde_json::to_vec(request)
            .toss_serialize_body_with(|| format!("{request:?}"))?;

        debug!(actions = request.actions.len(), "updating aliases");

        let res = self
            .transport
            .execute(Method::POST, &[PATH], &[], Some(body.into()))
            .await?;

        decode(&res)
    }

    /// Looks up which indices `alias` points at. An empty `alias` lists
    /// every alias in the cluster.
    #[instrument(skip(self))]
    pub async fn get_index_from_alias(&self, alias: &str) -> Result<AliasListing, Error> {
        let path = [ALIAS, alias];
        let path = if alias.is_empty() {
            &path[..1]
        } else {
            &path[..]
        };

        let res = self.transport.execute(Method::GET, path, &[], None).await?;

        decode(&res)
    }

    /// Lists the aliases bound to any of `indices`.
    #[instrument(skip(self))]
    pub async fn get_aliases(&self, indices: &[&str]) -> Result<AliasListing, Error> {
        let indices = indices.iter().filter(|i| !i.is_empty()).join(",");

        if indices.is_empty() {
            return Err(Error::MissingIndices);
        }

        let res = self
            .transport
            .execute(Method::GET, &[indices.as_str(), ALIAS], &[], None)
            .await?;

        decode(&res)
    }
}
