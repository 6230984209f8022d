//! Client library for the PacketLab network-test-execution server.
//!
//! The server runs network test packages against devices, records packet
//! captures per interface and analyzes them; this crate retrieves those
//! results, captures and their protocol decodes, and performs generic
//! collection operations (list/filter/sort/paginate, CRUD, bulk mutation) on
//! server-side resources.
//!
//! Layering, leaves first: the `transport` module defines the blocking HTTP
//! seam (reqwest-backed by default, injectable for tests); `decode` holds the
//! immutable typed trees the analysis endpoints return, including the
//! depth-guarded recursive `Field` model; `collection` implements the resource
//! protocol once; `resources` and `captures` specialize it per domain
//! resource. Every service takes the transport by reference, so independent
//! calls from separate threads are safe as long as the transport is.
//!
//! Invariants:
//! - Model objects are built once from a response and never mutated.
//! - Server vocabulary is preserved verbatim (e.g. `"true"`/`"false"` strings
//!   in decode trees stay strings).
//! - Caller contract violations (bulk selection, edit without id) fail before
//!   any request is issued.
//!
//! # Examples
//! ```no_run
//! use packetlab_client::{Client, HttpTransport, ListOptions};
//!
//! let client = Client::new(HttpTransport::new("https://lab.example/api/v1"));
//! let page = client.results().list(&ListOptions::new().sort("-created"))?;
//! for result in &page.items {
//!     println!("{:?} {:?}", result.id, result.status);
//! }
//!
//! let summary = client.captures().summary("12", "1", "eth0", None, false)?;
//! println!("{} packets summarized", summary.summaries.map_or(0, |rows| rows.len()));
//! # Ok::<(), packetlab_client::Error>(())
//! ```

pub mod captures;
pub mod collection;
pub mod decode;
mod error;
pub mod resources;
pub mod transport;

pub use captures::{Capture, CapturesService, CloudShark};
pub use collection::{BulkError, BulkResult, BulkSelection, Limit, ListOptions, Page, Resource};
pub use decode::{Ascii, Decode, DecodeError, Summary};
pub use error::Error;
pub use resources::{
    HistoryEntry, HistoryService, LogDirFile, ResultsService, TestResult, User, UsersService, When,
};
pub use transport::{HttpTransport, Transport, TransportError};

/// Entry point bundling one transport with accessors for every service.
///
/// Services can also be constructed directly from any `&dyn Transport` when
/// finer-grained injection is wanted.
pub struct Client<T: Transport> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn results(&self) -> ResultsService<'_> {
        ResultsService::new(&self.transport)
    }

    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(&self.transport)
    }

    pub fn history(&self) -> HistoryService<'_> {
        HistoryService::new(&self.transport)
    }

    pub fn captures(&self) -> CapturesService<'_> {
        CapturesService::new(&self.transport)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl Client<HttpTransport> {
    /// Convenience constructor for the default HTTP transport.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }
}
