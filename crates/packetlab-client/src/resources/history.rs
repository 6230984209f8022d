use serde::{Deserialize, Serialize};

use crate::collection::{Collection, ListOptions, Page, Resource};
use crate::error::Error;
use crate::transport::Transport;

/// One entry of the server's audit history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for HistoryEntry {
    const NAME: &'static str = "history";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Service for the audit history. History is append-only server-side, so the
/// only operation is `list`.
pub struct HistoryService<'a> {
    collection: Collection<'a, HistoryEntry>,
}

impl<'a> HistoryService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            collection: Collection::new(transport),
        }
    }

    pub fn list(&self, options: &ListOptions) -> Result<Page<HistoryEntry>, Error> {
        self.collection.list(options)
    }
}
