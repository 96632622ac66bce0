//! `linkq` is a sentinel based, circular, doubly linked queue of strings.
//!
//! Nodes live in an index arena and link to each other through [`NodeId`]s,
//! every algorithm (sort, k-group reversal, monotonic filtering...) works by
//! rewiring those links in place.

pub mod chain;
pub mod config;
pub mod console;
pub mod list;
pub mod queue;

pub use allocator_api2::alloc::AllocError;
pub use chain::{QueueChain, QueueContext};
pub use config::Config;
pub use list::NodeId;
pub use queue::{Element, LinkedQueue};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("invalid config")]
    Config(#[from] serde_json::Error),
    #[error("unable to allocate queue storage")]
    Alloc(#[from] AllocError),
    #[error("queue is not sorted at index `{index}`")]
    Unsorted { index: usize },
    #[error("queue links are corrupt: {0}")]
    Corrupt(String),
    #[error("no queue")]
    NoQueue,
    #[error("queue is empty")]
    Empty,
    #[error("removed value `{actual}` != expected value `{expected}`")]
    Mismatch { expected: String, actual: String },
    #[error("{0}")]
    Parse(String),
}
