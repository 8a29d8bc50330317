//! The paginated, lazily hydrated search-and-select core.
//!
//! A [`Selector`] owns all interaction state for one picker instance. Every
//! mutation happens on the owner's thread through discrete handlers
//! ([`input`](Selector::input), [`tick`](Selector::tick),
//! [`pump`](Selector::pump), [`mark_visible`](Selector::mark_visible),
//! [`select`](Selector::select), ...). Store access runs on background workers
//! whose tagged responses are drained by `pump`.

mod debounce;
mod error;
mod hydration;
mod options;
mod pages;
mod selection;
mod workers;


use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use lazypick_source_api::{ItemId, Payload, ResultItem, SelectorSource};

pub use debounce::{DEFAULT_DEBOUNCE, QueryDebouncer};
pub use error::SelectorError;
pub use hydration::HydrationState;
pub use options::{DEFAULT_HYDRATION_WORKERS, DEFAULT_PAGE_SIZE, SelectorOptions};
pub use selection::CommitSelection;

use hydration::{HydrationUpdate, Hydrator};
use pages::{LoadKind, PageLoader, PageRequest, PageUpdate};
use selection::SelectionState;
use workers::{PayloadResponse, PayloadRuntime, SearchResponse, SearchRuntime};

/// Coarse lifecycle of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPhase {
    /// Nothing has been queried yet.
    Idle,
    /// The first page of the effective query is in flight.
    Loading,
    /// Results are displayed and nothing is selected.
    Loaded,
    /// A follow-up page is in flight.
    LoadingMore,
    /// Results are displayed and one of them is selected.
    Selected,
    /// The user confirmed a selection.
    Committed,
    /// The selector was cancelled or closed.
    Closed,
}

impl SelectorPhase {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, SelectorPhase::Committed | SelectorPhase::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Committed,
    Closed,
}

type CommitCallback = Box<dyn FnMut(&CommitSelection) + Send>;
type CancelCallback = Box<dyn FnMut() + Send>;

/// One picker instance: debounced query, paged results, lazily fetched
/// payloads and a single selection.
pub struct Selector {
    raw_query: String,
    debouncer: QueryDebouncer,
    pages: PageLoader,
    hydrator: Hydrator,
    selection: SelectionState,
    search: SearchRuntime,
    payloads: PayloadRuntime,
    notice: Option<SelectorError>,
    finish: Option<Finish>,
    on_commit: Option<CommitCallback>,
    on_cancel: Option<CancelCallback>,
}

impl Selector {
    /// Open a selector over `source` and immediately load the initial query.
    pub fn open(source: Arc<dyn SelectorSource>, options: SelectorOptions) -> Self {
        let search = SearchRuntime::spawn(Arc::clone(&source));
        let payloads = PayloadRuntime::spawn(source, options.hydration_workers);
        Self::with_runtimes(options, search, payloads)
    }

    fn with_runtimes(
        options: SelectorOptions,
        search: SearchRuntime,
        payloads: PayloadRuntime,
    ) -> Self {
        let mut selector = Self {
            raw_query: options.initial_query.clone(),
            debouncer: QueryDebouncer::new(options.debounce),
            pages: PageLoader::new(options.page_size),
            hydrator: Hydrator::default(),
            selection: SelectionState::default(),
            search,
            payloads,
            notice: None,
            finish: None,
            on_commit: None,
            on_cancel: None,
        };
        selector.apply_effective_query(&options.initial_query);
        selector
    }

    /// Invoke `callback` with the composite when the user commits.
    #[must_use]
    pub fn with_on_commit<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&CommitSelection) + Send + 'static,
    {
        self.on_commit = Some(Box::new(callback));
        self
    }

    /// Invoke `callback` when the user cancels.
    #[must_use]
    pub fn with_on_cancel<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_cancel = Some(Box::new(callback));
        self
    }

    /// Record a keystroke's worth of query text. It takes effect once the
    /// debounce period passes without further input.
    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        if self.finish.is_some() {
            return;
        }
        self.raw_query = raw.into();
        self.debouncer.push(self.raw_query.clone(), now);
    }

    /// Fire the debounce timer if due, then drain worker responses.
    pub fn tick(&mut self, now: Instant) {
        if self.finish.is_some() {
            return;
        }
        if let Some(query) = self.debouncer.poll(now) {
            self.apply_effective_query(&query);
        }
        self.pump();
    }

    /// Apply every response the workers have delivered so far.
    pub fn pump(&mut self) {
        loop {
            match self.search.try_recv() {
                Ok(response) => self.handle_search_response(response),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        loop {
            match self.payloads.try_recv() {
                Ok(response) => self.handle_payload_response(response),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply_effective_query(&mut self, raw: &str) {
        let query = raw.trim();
        if self.pages.query() == Some(query) {
            tracing::trace!(query, "effective query unchanged");
            return;
        }
        tracing::debug!(query, "effective query changed");
        self.selection.clear();
        self.notice = None;
        let request = self.pages.begin_query(query.to_string());
        self.dispatch(request);
    }

    fn dispatch(&mut self, request: PageRequest) {
        let generation = request.generation;
        let query = request.criteria.query().to_string();
        tracing::debug!(generation, offset = request.offset, limit = request.limit, %query, "issuing search");
        if !self.search.issue(request) {
            tracing::warn!(generation, "search worker is gone");
            self.pages.abandon(generation);
            self.notice = Some(SelectorError::Search {
                query,
                message: "search worker stopped".into(),
            });
        }
    }

    fn handle_search_response(&mut self, response: SearchResponse) {
        if self.finish.is_some() {
            return;
        }
        let SearchResponse {
            generation,
            offset,
            result,
        } = response;
        match self.pages.apply(generation, offset, result) {
            PageUpdate::Stale => {
                tracing::debug!(generation, offset, "discarding stale search response");
            }
            PageUpdate::Replaced => {
                self.notice = None;
                self.hydrator.release_watches();
                self.observe_from(0);
            }
            PageUpdate::Appended { from } => {
                self.notice = None;
                self.observe_from(from);
            }
            PageUpdate::Failed(err) => {
                let query = self.pages.query().unwrap_or_default().to_string();
                tracing::warn!(generation, offset, %query, error = %err, "search failed");
                self.notice = Some(SelectorError::Search {
                    query,
                    message: err.to_string(),
                });
            }
        }
    }

    fn observe_from(&mut self, from: usize) {
        for item in &self.pages.items()[from..] {
            self.hydrator.observe(&item.id);
        }
    }

    fn handle_payload_response(&mut self, response: PayloadResponse) {
        let PayloadResponse { epoch, id, result } = response;
        match self.hydrator.apply(epoch, id, result) {
            HydrationUpdate::Stale => tracing::trace!(epoch, "discarding stale payload"),
            HydrationUpdate::Stored | HydrationUpdate::Absent => {}
            HydrationUpdate::Failed(err) => tracing::warn!(error = %err, "hydration failed"),
        }
    }

    /// Fetch the next page of the current query.
    ///
    /// A no-op returning `false` while a page is in flight, when no further
    /// results exist, or when the displayed results are from an older query.
    pub fn load_more(&mut self) -> bool {
        if self.finish.is_some() {
            return false;
        }
        match self.pages.begin_more() {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Recover from a failed search: reload the first page if the current
    /// query never loaded, otherwise try the next page again. Does nothing
    /// unless the last search failed.
    pub fn retry(&mut self) -> bool {
        if self.finish.is_some() || !matches!(self.notice, Some(SelectorError::Search { .. })) {
            return false;
        }
        if self.pages.results_are_current() {
            return self.load_more();
        }
        match self.pages.begin_retry() {
            Some(request) => {
                self.selection.clear();
                self.notice = None;
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Report that these items are on screen. Each item's first report
    /// triggers its payload fetch; later reports do nothing.
    pub fn mark_visible<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        if self.finish.is_some() {
            return;
        }
        for id in ids {
            if self.hydrator.on_visible(id) {
                self.request_payload(id);
            }
        }
    }

    /// Re-arm the visibility watch for `id` if it has not been fetched yet.
    pub fn observe(&mut self, id: &ItemId) {
        if self.finish.is_none() {
            self.hydrator.observe(id);
        }
    }

    /// Fetch `id`'s payload unless it is cached or already requested.
    /// Returns `true` if a fetch was issued.
    pub fn ensure_hydrated(&mut self, id: &ItemId) -> bool {
        if self.finish.is_some() || !self.hydrator.begin(id) {
            return false;
        }
        self.request_payload(id);
        true
    }

    fn request_payload(&mut self, id: &ItemId) {
        tracing::trace!(%id, "requesting payload");
        if !self.payloads.fetch(self.hydrator.epoch(), id.clone()) {
            tracing::warn!(%id, "payload workers are gone");
            self.hydrator.abandon(id);
        }
    }

    /// Drop all cached payloads, e.g. when the owning scope changes. Items
    /// currently loaded are watched again so they re-hydrate when visible.
    pub fn invalidate_payloads(&mut self) {
        self.hydrator.invalidate();
        self.observe_from(0);
    }

    /// Select the item with `id` from the current results.
    pub fn select(&mut self, id: &ItemId) -> Result<(), SelectorError> {
        if self.finish.is_some() {
            return Err(SelectorError::Finished);
        }
        let item = self
            .pages
            .items()
            .iter()
            .find(|item| &item.id == id)
            .cloned()
            .ok_or_else(|| SelectorError::UnknownItem { id: id.clone() })?;
        tracing::debug!(id = %item.id, "selected");
        self.selection.select(item);
        Ok(())
    }

    pub fn set_annotation(&mut self, text: impl Into<String>) {
        if self.finish.is_none() {
            self.selection.set_annotation(text);
        }
    }

    /// Confirm the current selection, notify the commit callback and finish.
    ///
    /// # Errors
    ///
    /// [`SelectorError::InvalidCommit`] without a selection (the callback is
    /// not invoked and the selector stays open), [`SelectorError::Finished`]
    /// after the selector ended.
    pub fn commit(&mut self) -> Result<CommitSelection, SelectorError> {
        if self.finish.is_some() {
            return Err(SelectorError::Finished);
        }
        let Some(composite) = self.selection.composite() else {
            tracing::debug!("commit rejected without a selection");
            return Err(SelectorError::InvalidCommit);
        };
        tracing::info!(id = %composite.item.id, annotated = composite.annotation.is_some(), "selection committed");
        if let Some(callback) = self.on_commit.as_mut() {
            callback(&composite);
        }
        self.teardown(Finish::Committed);
        Ok(composite)
    }

    /// Abandon the interaction, notify the cancel callback and finish.
    pub fn cancel(&mut self) {
        if self.finish.is_some() {
            return;
        }
        tracing::info!("selection cancelled");
        if let Some(callback) = self.on_cancel.as_mut() {
            callback();
        }
        self.teardown(Finish::Closed);
    }

    /// Tear the selector down without invoking any callback.
    pub fn close(&mut self) {
        if self.finish.is_none() {
            self.teardown(Finish::Closed);
        }
    }

    fn teardown(&mut self, finish: Finish) {
        self.finish = Some(finish);
        self.debouncer.cancel();
        self.pages.cancel_all();
        self.search.retire(self.pages.generation());
        self.hydrator.invalidate();
        self.search.shutdown();
        self.payloads.shutdown();
    }

    #[must_use]
    pub fn phase(&self) -> SelectorPhase {
        match self.finish {
            Some(Finish::Committed) => SelectorPhase::Committed,
            Some(Finish::Closed) => SelectorPhase::Closed,
            None => match self.pages.outstanding_kind() {
                Some(LoadKind::Reset) => SelectorPhase::Loading,
                Some(LoadKind::More) => SelectorPhase::LoadingMore,
                None if !self.pages.has_started() => SelectorPhase::Idle,
                None if self.selection.item().is_some() => SelectorPhase::Selected,
                None => SelectorPhase::Loaded,
            },
        }
    }

    /// The query text as typed, before debouncing.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.raw_query
    }

    /// The settled query the displayed results are being fetched for.
    #[must_use]
    pub fn effective_query(&self) -> Option<&str> {
        self.pages.query()
    }

    #[must_use]
    pub fn items(&self) -> &[ResultItem] {
        self.pages.items()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pages.has_more()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.pages.total()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.pages.page_size()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pages.outstanding_kind().is_some()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&ResultItem> {
        self.selection.item()
    }

    #[must_use]
    pub fn annotation(&self) -> &str {
        self.selection.annotation()
    }

    #[must_use]
    pub fn payload(&self, id: &ItemId) -> Option<&Payload> {
        self.hydrator.payload(id)
    }

    #[must_use]
    pub fn hydration_state(&self, id: &ItemId) -> HydrationState {
        self.hydrator.state(id)
    }

    #[must_use]
    pub fn hydration_error(&self, id: &ItemId) -> Option<&SelectorError> {
        self.hydrator.failure(id)
    }

    /// The most recent recoverable search problem, cleared by the next
    /// successful page or query change.
    #[must_use]
    pub fn notice(&self) -> Option<&SelectorError> {
        self.notice.as_ref()
    }

    /// When the pending query edit will take effect, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("phase", &self.phase())
            .field("query", &self.raw_query)
            .field("effective_query", &self.pages.query())
            .field("items", &self.pages.items().len())
            .field("cached_payloads", &self.hydrator.cached_len())
            .finish_non_exhaustive()
    }
}

impl Drop for Selector {
    fn drop(&mut self) {
        self.close();
    }
}
