use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::{
    BulkResult, BulkSelection, Collection, ListOptions, Page, Resource, decode_page,
};
use crate::error::Error;
use crate::transport::{Method, RawResponse, Transport};

/// One test-run result.
///
/// Every field is optional: a `TestResult` deserialized from the server has
/// whatever the server sent, and one built locally for [`ResultsService::edit`]
/// carries only the fields to change (absent fields are not serialized and
/// keep their server-side values).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loops: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Resource for TestResult {
    const NAME: &'static str = "results";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// One entry of a result's log directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDirFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// Scheduling point for [`ResultsService::stop`] and [`ResultsService::pause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    EndOfTest,
    EndOfLoop,
}

impl When {
    fn as_query(&self) -> &'static str {
        match self {
            When::EndOfTest => "end-of-test",
            When::EndOfLoop => "end-of-loop",
        }
    }
}

/// Service for test results.
///
/// Results are created by the server when a test run launches, so there is no
/// `create`; everything else of the collection protocol applies, plus run
/// control, stats, log-directory and metric retrieval.
pub struct ResultsService<'a> {
    transport: &'a dyn Transport,
    collection: Collection<'a, TestResult>,
}

impl<'a> ResultsService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            collection: Collection::new(transport),
        }
    }

    pub fn list(&self, options: &ListOptions) -> Result<Page<TestResult>, Error> {
        self.collection.list(options)
    }

    /// List results as CSV, returning the raw body.
    pub fn list_csv(&self, options: &ListOptions) -> Result<Vec<u8>, Error> {
        let options = options.clone().format("csv");
        self.collection.list_raw(&options)
    }

    pub fn get(&self, id: &str) -> Result<TestResult, Error> {
        self.collection.get(id)
    }

    pub fn edit(&self, resource: &TestResult) -> Result<TestResult, Error> {
        self.collection.edit(resource)
    }

    pub fn delete(&self, id: &str) -> Result<(), Error> {
        self.collection.delete(id)
    }

    pub fn get_shares(&self, id: &str) -> Result<Vec<String>, Error> {
        self.collection.shares(id)
    }

    pub fn edit_shares(&self, id: &str, user_ids: &[String]) -> Result<(), Error> {
        self.collection.edit_shares(id, user_ids)
    }

    pub fn export(&self, id: &str, exclude_captures: bool) -> Result<Vec<u8>, Error> {
        self.collection.export(id, exclude_captures)
    }

    pub fn bulk_export(&self, ids: &[String], exclude_captures: bool) -> Result<Vec<u8>, Error> {
        self.collection.bulk_export(ids, exclude_captures)
    }

    pub fn bulk_copy(&self, ids: &[String]) -> Result<BulkResult, Error> {
        self.collection.bulk_copy(ids)
    }

    pub fn bulk_edit(
        &self,
        fields: &Value,
        selection: &BulkSelection,
    ) -> Result<BulkResult, Error> {
        self.collection.bulk_edit(fields, selection)
    }

    pub fn bulk_delete(&self, selection: &BulkSelection) -> Result<BulkResult, Error> {
        self.collection.bulk_delete(selection)
    }

    /// Stop a running result, immediately or at the given point.
    pub fn stop(&self, id: &str, when: Option<When>) -> Result<(), Error> {
        self.run_control(id, "stop", when)
    }

    pub fn stop_end_of_test(&self, id: &str) -> Result<(), Error> {
        self.stop(id, Some(When::EndOfTest))
    }

    pub fn stop_end_of_loop(&self, id: &str) -> Result<(), Error> {
        self.stop(id, Some(When::EndOfLoop))
    }

    /// Pause a running result, immediately or at the given point.
    pub fn pause(&self, id: &str, when: Option<When>) -> Result<(), Error> {
        self.run_control(id, "pause", when)
    }

    pub fn pause_end_of_test(&self, id: &str) -> Result<(), Error> {
        self.pause(id, Some(When::EndOfTest))
    }

    pub fn pause_end_of_loop(&self, id: &str) -> Result<(), Error> {
        self.pause(id, Some(When::EndOfLoop))
    }

    pub fn unpause(&self, id: &str) -> Result<(), Error> {
        self.run_control(id, "unpause", None)
    }

    fn run_control(&self, id: &str, action: &str, when: Option<When>) -> Result<(), Error> {
        let path = format!("{}{}/{}/", self.collection.base(), id, action);
        let mut query = Vec::new();
        if let Some(when) = when {
            query.push(("when", when.as_query().to_string()));
        }
        self.transport.send(Method::Post, &path, &query, None)?;
        Ok(())
    }

    /// Aggregate stats over all results; shape is server-defined and passed
    /// through untyped.
    pub fn all_stats(&self) -> Result<Value, Error> {
        let query = vec![("stats", "all".to_string())];
        let resp = self
            .transport
            .send(Method::Post, self.collection.base(), &query, None)?;
        stats_payload(&resp)
    }

    /// Aggregate stats over the given result set.
    pub fn set_stats(&self, ids: &[String]) -> Result<Value, Error> {
        let query = vec![("stats", "set".to_string())];
        let body: Vec<Value> = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id }))
            .collect();
        let body = Value::Array(body);
        let resp =
            self.transport
                .send(Method::Post, self.collection.base(), &query, Some(&body))?;
        stats_payload(&resp)
    }

    /// Stats for a single result.
    pub fn single_stats(&self, id: &str) -> Result<Value, Error> {
        let path = format!("{}{}/", self.collection.base(), id);
        let query = vec![("stats", "all".to_string())];
        let resp = self.transport.send(Method::Get, &path, &query, None)?;
        stats_payload(&resp)
    }

    /// List the files in a result's log directory.
    pub fn list_logdir(&self, id: &str, options: &ListOptions) -> Result<Page<LogDirFile>, Error> {
        let path = format!("{}{}/logdir/", self.collection.base(), id);
        let resp = self
            .transport
            .send(Method::Get, &path, &options.to_query(), None)?;
        decode_page(&resp, "logdir")
    }

    /// Fetch one file from a result's log directory.
    pub fn get_logdir_file(&self, id: &str, filename: &str) -> Result<Vec<u8>, Error> {
        let path = format!("{}{}/logdir/{}/", self.collection.base(), id, filename);
        let resp = self.transport.send(Method::Get, &path, &[], None)?;
        Ok(resp.body)
    }

    /// Download the whole log directory as an archive.
    pub fn download_logdir_archive(
        &self,
        id: &str,
        format: &str,
        exclude_captures: bool,
    ) -> Result<Vec<u8>, Error> {
        let path = format!("{}{}/logdir/", self.collection.base(), id);
        let mut query = vec![("format", format.to_string())];
        if exclude_captures {
            query.push(("exclude_captures", "true".to_string()));
        }
        let resp = self.transport.send(Method::Get, &path, &query, None)?;
        Ok(resp.body)
    }

    /// Fetch a test metric; shape is server-defined and passed through untyped.
    pub fn get_test_metric(&self, id: &str, name: &str, metric: &str) -> Result<Value, Error> {
        let resp = self.fetch_test_metric(id, name, metric, None)?;
        let value = resp.json_value()?;
        crate::collection::check_server_error(&value)?;
        Ok(value)
    }

    /// Fetch a test metric rendered as CSV.
    pub fn get_test_metric_csv(&self, id: &str, name: &str, metric: &str) -> Result<Vec<u8>, Error> {
        let resp = self.fetch_test_metric(id, name, metric, Some("csv"))?;
        Ok(resp.body)
    }

    fn fetch_test_metric(
        &self,
        id: &str,
        name: &str,
        metric: &str,
        format: Option<&str>,
    ) -> Result<RawResponse, Error> {
        let path = format!(
            "{}{}/metrics/{}/{}/",
            self.collection.base(),
            id,
            name,
            metric
        );
        let mut query = Vec::new();
        if let Some(format) = format {
            query.push(("format", format.to_string()));
        }
        Ok(self.transport.send(Method::Get, &path, &query, None)?)
    }
}

fn stats_payload(resp: &RawResponse) -> Result<Value, Error> {
    let value = resp.json_value()?;
    crate::collection::check_server_error(&value)?;
    crate::collection::take_data(value, "stats")
}
