//! WebHDFS implementation of the filesystem capability.
//!
//! Talks to the namenode REST API over HTTP; see
//! <https://hadoop.apache.org/docs/stable/hadoop-project-dist/hadoop-hdfs/WebHDFS.html>.

mod client;
mod error;

pub use client::{WebHdfs, WebHdfsAuth, WebHdfsConnector};
pub use error::WebHdfsError;
