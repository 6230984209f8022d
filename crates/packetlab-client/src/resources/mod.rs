//! Domain resources built on the collection protocol.
//!
//! Each service takes the transport as a constructor parameter and layers
//! resource-specific operations (run control, stats, logdir and metric access
//! for results; password and token management for users) on top of the
//! generic [`Collection`](crate::collection::Collection).

pub mod history;
pub mod results;
pub mod users;

pub use history::{HistoryEntry, HistoryService};
pub use results::{LogDirFile, ResultsService, TestResult, When};
pub use users::{User, UsersService};
