#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;

use serde_json::Value;

use packetlab_client::transport::{ByteStream, Method, RawResponse, Transport, TransportError};

/// One request observed by [`FakeTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// In-memory [`Transport`] for tests: replays queued responses and records
/// every request. Running out of queued responses is a transport error, so a
/// test can assert that contract violations never reach the network.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<RawResponse>>,
    stream: RefCell<Option<(Vec<u8>, Option<String>)>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, body: Value) {
        self.responses.borrow_mut().push_back(RawResponse {
            status: 200,
            filename: None,
            body: serde_json::to_vec(&body).expect("serialize fake body"),
        });
    }

    pub fn push_bytes(&self, body: Vec<u8>, filename: Option<&str>) {
        self.responses.borrow_mut().push_back(RawResponse {
            status: 200,
            filename: filename.map(str::to_string),
            body,
        });
    }

    pub fn set_stream(&self, body: Vec<u8>, filename: Option<&str>) {
        *self.stream.borrow_mut() = Some((body, filename.map(str::to_string)));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: method.as_str(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: body.cloned(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TransportError::Request("no queued response".to_string()))
    }

    fn stream(&self, path: &str, query: &[(&str, String)]) -> Result<ByteStream, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: "GET",
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: None,
        });
        let (body, filename) = self
            .stream
            .borrow_mut()
            .take()
            .ok_or_else(|| TransportError::Request("no queued stream".to_string()))?;
        Ok(ByteStream {
            reader: Box::new(Cursor::new(body)),
            filename,
        })
    }
}
