//! Terminal front-end for a [`Selector`](crate::selector::Selector).
//!
//! [`App`] wraps a selector with the widgets needed to drive it from the
//! keyboard: a query prompt, a paged results table, a payload detail pane and
//! an annotation field. [`run`] owns the terminal for the duration of a pick.

mod actions;
mod app;
mod input;
mod render;
mod runtime;
mod theme;


use serde::Serialize;

use crate::selector::CommitSelection;

pub use app::{App, Focus};
pub use runtime::run;

/// How an interactive pick ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOutcome {
    /// `true` when the user committed a selection.
    pub accepted: bool,
    /// The query text as last typed.
    pub query: String,
    pub selection: Option<CommitSelection>,
}

impl SelectorOutcome {
    pub(crate) fn committed(query: String, selection: CommitSelection) -> Self {
        Self {
            accepted: true,
            query,
            selection: Some(selection),
        }
    }

    pub(crate) fn cancelled(query: String) -> Self {
        Self {
            accepted: false,
            query,
            selection: None,
        }
    }
}
