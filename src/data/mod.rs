//! Dataset sources.
//!
//! - `source`: resolve the configured source (flag / env / default)
//! - `remote`: blocking HTTP fetch of the CSV

pub mod remote;
pub mod source;

pub use remote::DatasetClient;
pub use source::{DataSource, SourceConfig};
