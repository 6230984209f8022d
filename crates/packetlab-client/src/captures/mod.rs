//! Capture access service.
//!
//! Captures are scoped under a specific test result and test-sequence number
//! (`results/<id>/tests/<seq>/captures/`). Besides plain metadata access this
//! service downloads raw capture files (streamed, never fully buffered) and
//! fetches the server's analysis representations: summary tables, full
//! protocol decodes and hex/ASCII dumps.

use std::io::Write;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::collection::{check_server_error, decode_page, from_data, take_data};
use crate::decode::{Ascii, Decode, Summary, decode_from_value};
use crate::error::Error;
use crate::transport::{Method, RawResponse, Transport};

/// One interface's capture within a test result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Result of a CloudShark upload request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudShark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Service for capture retrieval and analysis.
pub struct CapturesService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> CapturesService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    fn base(result_id: &str, seq: &str) -> String {
        format!("results/{result_id}/tests/{seq}/captures/")
    }

    /// List the captures recorded for one test result.
    pub fn list(&self, result_id: &str, seq: &str) -> Result<Vec<Capture>, Error> {
        let resp = self
            .transport
            .send(Method::Get, &Self::base(result_id, seq), &[], None)?;
        Ok(decode_page(&resp, "captures")?.items)
    }

    /// Get one interface's capture metadata.
    pub fn get(&self, result_id: &str, seq: &str, interface: &str) -> Result<Capture, Error> {
        let path = format!("{}{}/", Self::base(result_id, seq), interface);
        let resp = self.transport.send(Method::Get, &path, &[], None)?;
        let value = resp.json_value()?;
        check_server_error(&value)?;
        from_data(take_data(value, "captures")?)
    }

    /// Stream the raw capture file into `sink`.
    ///
    /// The body is copied chunk by chunk, never fully buffered; on error the
    /// sink holds whatever prefix was written before the failure. Returns the
    /// number of bytes written and the server-supplied filename.
    pub fn download(
        &self,
        result_id: &str,
        seq: &str,
        interface: &str,
        inline: bool,
        sink: &mut dyn Write,
    ) -> Result<(u64, Option<String>), Error> {
        let path = format!("{}{}/", Self::base(result_id, seq), interface);
        let query = inline_query(inline);
        let mut stream = self.transport.stream(&path, &query)?;
        let written = std::io::copy(&mut stream.reader, sink)?;
        debug!("downloaded {written} bytes from {path}");
        Ok((written, stream.filename))
    }

    /// Get a capture's summary table, optionally filtered.
    pub fn summary(
        &self,
        result_id: &str,
        seq: &str,
        interface: &str,
        filter: Option<&str>,
        inline: bool,
    ) -> Result<Summary, Error> {
        let resp = self.analysis(result_id, seq, interface, "summary", filter, None, inline)?;
        let value = resp.json_value()?;
        check_server_error(&value)?;
        from_data(take_data(value, "summary")?)
    }

    /// Get a capture's protocol decode, optionally filtered or restricted to
    /// a single frame.
    pub fn decode(
        &self,
        result_id: &str,
        seq: &str,
        interface: &str,
        filter: Option<&str>,
        frame: Option<u32>,
        inline: bool,
    ) -> Result<Decode, Error> {
        let resp = self.analysis(result_id, seq, interface, "decode", filter, frame, inline)?;
        let value = resp.json_value()?;
        check_server_error(&value)?;
        let data = take_data(value, "decode")?;
        Ok(decode_from_value(&data)?)
    }

    /// Get a capture's hex/ASCII dump, optionally filtered or restricted to a
    /// single frame.
    pub fn ascii(
        &self,
        result_id: &str,
        seq: &str,
        interface: &str,
        filter: Option<&str>,
        frame: Option<u32>,
        inline: bool,
    ) -> Result<Ascii, Error> {
        let resp = self.analysis(result_id, seq, interface, "ascii", filter, frame, inline)?;
        let value = resp.json_value()?;
        check_server_error(&value)?;
        from_data(take_data(value, "ascii")?)
    }

    /// Upload a capture to the server's configured CloudShark appliance.
    ///
    /// A missing CloudShark configuration is reported by the server like any
    /// other request failure.
    pub fn send_to_cloudshark(
        &self,
        result_id: &str,
        seq: &str,
        interface: &str,
        inline: bool,
    ) -> Result<CloudShark, Error> {
        let path = format!("{}{}/cloudshark/", Self::base(result_id, seq), interface);
        let query = inline_query(inline);
        let resp = self.transport.send(Method::Post, &path, &query, None)?;
        let value = resp.json_value()?;
        check_server_error(&value)?;
        from_data(take_data(value, "cloudshark")?)
    }

    fn analysis(
        &self,
        result_id: &str,
        seq: &str,
        interface: &str,
        kind: &str,
        filter: Option<&str>,
        frame: Option<u32>,
        inline: bool,
    ) -> Result<RawResponse, Error> {
        let path = format!("{}{}/{}/", Self::base(result_id, seq), interface, kind);
        let mut query = Vec::new();
        if let Some(filter) = filter {
            query.push(("filter", filter.to_string()));
        }
        if let Some(frame) = frame {
            query.push(("frame", frame.to_string()));
        }
        query.extend(inline_query(inline));
        Ok(self.transport.send(Method::Get, &path, &query, None)?)
    }
}

fn inline_query(inline: bool) -> Vec<(&'static str, String)> {
    if inline {
        vec![("inline", "true".to_string())]
    } else {
        Vec::new()
    }
}
