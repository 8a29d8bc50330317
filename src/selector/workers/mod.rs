//! Background threads that talk to the backing store.
//!
//! The selector never calls the store directly. It sends commands tagged with
//! a generation (searches) or epoch (payloads) and drains tagged responses on
//! its own thread, so late responses can be recognized and dropped.

mod payload;
mod search;

pub(crate) use payload::{PayloadResponse, PayloadRuntime};
pub(crate) use search::{SearchResponse, SearchRuntime};

#[cfg(test)]
pub(crate) use payload::PayloadCommand;
#[cfg(test)]
pub(crate) use search::SearchCommand;
