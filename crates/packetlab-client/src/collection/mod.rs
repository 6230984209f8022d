//! Generic resource-collection protocol.
//!
//! Every domain resource (results, users, history) reuses this module for
//! listing, filtering, sorting, pagination, CRUD and bulk mutation. A
//! [`Collection`] is parameterized by a [`Resource`] implementation and talks
//! to the server through the injected [`Transport`]; it owns no state beyond
//! the resource's base path.
//!
//! Server envelope: every JSON response wraps its payload in `{"data": ...}`,
//! lists additionally carry `{"total": n}`, and a 2xx body may still report a
//! failure through a top-level `{"error": "..."}` string, which surfaces as
//! [`Error::Server`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::DecodeError;
use crate::error::Error;
use crate::transport::{Method, RawResponse, Transport};

/// A server-side resource usable with [`Collection`].
pub trait Resource: Serialize + DeserializeOwned {
    /// Collection name in URLs (e.g. `results`).
    const NAME: &'static str;

    /// The resource's id, when populated.
    fn id(&self) -> Option<&str>;
}

/// Pagination limit: an explicit count or the server's `none` sentinel for
/// the unpaginated full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u32),
    Unlimited,
}

impl Limit {
    fn as_query(&self) -> String {
        match self {
            Limit::Count(n) => n.to_string(),
            Limit::Unlimited => "none".to_string(),
        }
    }
}

/// Options for [`Collection::list`].
///
/// `filter` entries are combined with logical AND by the server; `sort`
/// tokens are `field` or `-field` for descending order.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: Vec<String>,
    pub sort: Vec<String>,
    pub limit: Option<Limit>,
    pub page: Option<u32>,
    pub format: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filter.push(expr.into());
        self
    }

    pub fn sort(mut self, token: impl Into<String>) -> Self {
        self.sort.push(token.into());
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        for expr in &self.filter {
            query.push(("filter", expr.clone()));
        }
        for token in &self.sort {
            query.push(("sort", token.clone()));
        }
        if let Some(limit) = &self.limit {
            query.push(("limit", limit.as_query()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(format) = &self.format {
            query.push(("format", format.clone()));
        }
        query
    }
}

/// One page of a listed collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total item count across all pages, when the server reports it.
    pub total: Option<u64>,
}

/// Selection mode for bulk operations.
///
/// Exactly one of `ids`, `filter` or `all` must be populated; anything else
/// fails with [`Error::InvalidSelection`] before a request is issued. The
/// fields are public so callers can build selections programmatically;
/// validation happens at call time, not construction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSelection {
    pub ids: Option<Vec<String>>,
    pub filter: Option<Vec<String>>,
    pub all: bool,
}

impl BulkSelection {
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Some(ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn filter<I, S>(exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: Some(exprs.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Resolve to query parameters, enforcing the exactly-one-mode contract.
    fn to_query(&self) -> Result<Vec<(&'static str, String)>, Error> {
        let modes =
            usize::from(self.ids.is_some()) + usize::from(self.filter.is_some()) + usize::from(self.all);
        if modes != 1 {
            return Err(Error::InvalidSelection(format!(
                "exactly one of ids, filter or all must be given, got {modes}"
            )));
        }
        let mut query = Vec::new();
        if let Some(ids) = &self.ids {
            for id in ids {
                query.push(("ids", id.clone()));
            }
        }
        if let Some(filter) = &self.filter {
            for expr in filter {
                query.push(("filter", expr.clone()));
            }
        }
        if self.all {
            query.push(("all", "true".to_string()));
        }
        Ok(query)
    }
}

/// Outcome of a bulk operation, including per-item failures the server chose
/// to report inside a successful response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkResult {
    #[serde(default)]
    pub updated: Option<u64>,
    #[serde(default)]
    pub errors: Vec<BulkError>,
}

/// A per-item failure inside a [`BulkResult`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkError {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShareEntry {
    user_id: String,
}

/// Generic collection access for one resource type.
pub struct Collection<'a, T> {
    transport: &'a dyn Transport,
    base: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Resource> Collection<'a, T> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            base: format!("{}/", T::NAME),
            _marker: PhantomData,
        }
    }

    /// Base collection path, for services that extend it with sub-resources.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}{}/", self.base, id)
    }

    /// List resources matching `options`. Never mutates server state.
    pub fn list(&self, options: &ListOptions) -> Result<Page<T>, Error> {
        let resp = self
            .transport
            .send(Method::Get, &self.base, &options.to_query(), None)?;
        decode_page(&resp, T::NAME)
    }

    /// List resources in an alternate representation (e.g. `format=csv`),
    /// returning the raw body.
    pub fn list_raw(&self, options: &ListOptions) -> Result<Vec<u8>, Error> {
        let resp = self
            .transport
            .send(Method::Get, &self.base, &options.to_query(), None)?;
        Ok(resp.body)
    }

    pub fn get(&self, id: &str) -> Result<T, Error> {
        let resp = self
            .transport
            .send(Method::Get, &self.item_path(id), &[], None)?;
        decode_one(&resp, T::NAME)
    }

    pub fn create(&self, resource: &T) -> Result<T, Error> {
        let body = serde_json::to_value(resource).map_err(DecodeError::from)?;
        let resp = self
            .transport
            .send(Method::Post, &self.base, &[], Some(&body))?;
        decode_one(&resp, T::NAME)
    }

    /// Update the resource identified by `resource.id()`.
    ///
    /// Only populated fields are serialized, so unspecified fields keep their
    /// server-side values (partial update).
    pub fn edit(&self, resource: &T) -> Result<T, Error> {
        let id = resource.id().ok_or_else(|| {
            Error::InvalidResource(format!("{} edit requires an id", T::NAME))
        })?;
        let path = self.item_path(id);
        let body = serde_json::to_value(resource).map_err(DecodeError::from)?;
        let resp = self.transport.send(Method::Put, &path, &[], Some(&body))?;
        decode_one(&resp, T::NAME)
    }

    pub fn delete(&self, id: &str) -> Result<(), Error> {
        self.transport
            .send(Method::Delete, &self.item_path(id), &[], None)?;
        Ok(())
    }

    /// Apply `fields` to every selected resource.
    pub fn bulk_edit(&self, fields: &Value, selection: &BulkSelection) -> Result<BulkResult, Error> {
        let query = selection.to_query()?;
        let body = serde_json::json!({ "fields": fields });
        let resp = self
            .transport
            .send(Method::Put, &self.base, &query, Some(&body))?;
        decode_bulk(&resp)
    }

    pub fn bulk_delete(&self, selection: &BulkSelection) -> Result<BulkResult, Error> {
        let query = selection.to_query()?;
        let resp = self
            .transport
            .send(Method::Delete, &self.base, &query, None)?;
        decode_bulk(&resp)
    }

    /// Copy the given resources server-side.
    pub fn bulk_copy(&self, ids: &[String]) -> Result<BulkResult, Error> {
        let query = BulkSelection::ids(ids.iter().cloned()).to_query()?;
        let resp = self.transport.send(Method::Post, &self.base, &query, None)?;
        decode_bulk(&resp)
    }

    /// Download one resource as a binary archive.
    pub fn export(&self, id: &str, exclude_captures: bool) -> Result<Vec<u8>, Error> {
        let mut query = vec![("format", "gz".to_string())];
        if exclude_captures {
            query.push(("exclude_captures", "true".to_string()));
        }
        let resp = self
            .transport
            .send(Method::Get, &self.item_path(id), &query, None)?;
        Ok(resp.body)
    }

    /// Download several resources as one binary archive.
    pub fn bulk_export(&self, ids: &[String], exclude_captures: bool) -> Result<Vec<u8>, Error> {
        let mut query = BulkSelection::ids(ids.iter().cloned()).to_query()?;
        query.push(("format", "gz".to_string()));
        if exclude_captures {
            query.push(("exclude_captures", "true".to_string()));
        }
        let resp = self.transport.send(Method::Get, &self.base, &query, None)?;
        Ok(resp.body)
    }

    /// Ids of the users this resource is shared with.
    pub fn shares(&self, id: &str) -> Result<Vec<String>, Error> {
        let path = format!("{}shares/", self.item_path(id));
        let resp = self.transport.send(Method::Get, &path, &[], None)?;
        let value = resp.json_value()?;
        check_server_error(&value)?;
        let data = take_data(value, "shares")?;
        let entries: Vec<ShareEntry> = from_data(data)?;
        Ok(entries.into_iter().map(|entry| entry.user_id).collect())
    }

    /// Replace the set of users this resource is shared with.
    pub fn edit_shares(&self, id: &str, user_ids: &[String]) -> Result<(), Error> {
        let path = format!("{}shares/", self.item_path(id));
        let body = serde_json::json!({ "user_ids": user_ids });
        self.transport.send(Method::Put, &path, &[], Some(&body))?;
        Ok(())
    }
}

/// Fail with [`Error::Server`] when a 2xx body carries a server-reported
/// error string.
pub(crate) fn check_server_error(value: &Value) -> Result<(), Error> {
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(Error::Server {
            message: message.to_string(),
        });
    }
    Ok(())
}

/// Pull the `data` payload out of a response envelope.
pub(crate) fn take_data(value: Value, context: &str) -> Result<Value, Error> {
    match value {
        Value::Object(mut map) => map.remove("data").ok_or_else(|| {
            Error::Malformed(DecodeError::UnexpectedShape {
                context: format!("{context} envelope"),
                expected: "data key",
            })
        }),
        _ => Err(Error::Malformed(DecodeError::UnexpectedShape {
            context: format!("{context} envelope"),
            expected: "object",
        })),
    }
}

pub(crate) fn from_data<T: DeserializeOwned>(data: Value) -> Result<T, Error> {
    serde_json::from_value(data)
        .map_err(DecodeError::from)
        .map_err(Error::from)
}

pub(crate) fn decode_page<T: DeserializeOwned>(
    resp: &RawResponse,
    context: &str,
) -> Result<Page<T>, Error> {
    let value = resp.json_value()?;
    check_server_error(&value)?;
    let total = value.get("total").and_then(Value::as_u64);
    let items = from_data(take_data(value, context)?)?;
    Ok(Page { items, total })
}

pub(crate) fn decode_one<T: DeserializeOwned>(
    resp: &RawResponse,
    context: &str,
) -> Result<T, Error> {
    let value = resp.json_value()?;
    check_server_error(&value)?;
    from_data(take_data(value, context)?)
}

fn decode_bulk(resp: &RawResponse) -> Result<BulkResult, Error> {
    let value = resp.json_value()?;
    check_server_error(&value)?;
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => from_data(data),
            None => Ok(BulkResult::default()),
        },
        _ => Ok(BulkResult::default()),
    }
}
