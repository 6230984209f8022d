use serde::{Deserialize, Serialize};

use crate::collection::{
    BulkResult, BulkSelection, Collection, ListOptions, Page, Resource, decode_one,
};
use crate::error::Error;
use crate::transport::{Method, Transport};

/// One server user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// API token; only present on responses the server chooses to include it
    /// in, and never sent on edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Resource for User {
    const NAME: &'static str = "users";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Service for user accounts.
pub struct UsersService<'a> {
    transport: &'a dyn Transport,
    collection: Collection<'a, User>,
}

impl<'a> UsersService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            collection: Collection::new(transport),
        }
    }

    pub fn list(&self, options: &ListOptions) -> Result<Page<User>, Error> {
        self.collection.list(options)
    }

    pub fn get(&self, id: &str) -> Result<User, Error> {
        self.collection.get(id)
    }

    pub fn create(&self, resource: &User) -> Result<User, Error> {
        self.collection.create(resource)
    }

    pub fn edit(&self, resource: &User) -> Result<User, Error> {
        self.collection.edit(resource)
    }

    pub fn delete(&self, id: &str) -> Result<(), Error> {
        self.collection.delete(id)
    }

    pub fn bulk_copy(&self, ids: &[String]) -> Result<BulkResult, Error> {
        self.collection.bulk_copy(ids)
    }

    pub fn bulk_edit(
        &self,
        fields: &serde_json::Value,
        selection: &BulkSelection,
    ) -> Result<BulkResult, Error> {
        self.collection.bulk_edit(fields, selection)
    }

    pub fn bulk_delete(&self, selection: &BulkSelection) -> Result<BulkResult, Error> {
        self.collection.bulk_delete(selection)
    }

    /// Change a user's password.
    ///
    /// `old` may be omitted by admins; `change_token` also rotates the user's
    /// API token.
    pub fn change_password(
        &self,
        id: &str,
        new: &str,
        old: Option<&str>,
        change_token: bool,
    ) -> Result<User, Error> {
        let path = format!("users/{id}/password/");
        let query = vec![("change_token", change_token.to_string())];
        let body = serde_json::json!({
            "old": old,
            "new": new,
            "new_confirm": new,
        });
        let resp = self
            .transport
            .send(Method::Post, &path, &query, Some(&body))?;
        decode_one(&resp, User::NAME)
    }

    /// Rotate a user's API token.
    pub fn change_token(&self, id: &str) -> Result<User, Error> {
        let path = format!("users/{id}/token/");
        let resp = self.transport.send(Method::Post, &path, &[], None)?;
        decode_one(&resp, User::NAME)
    }
}
