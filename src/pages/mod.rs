//! Dashboard pages
//!
//! Each page owns a small view state (active tab, open modal, record under
//! edit) and a loader that runs the fetch facade's results through the
//! formatters into a serialisable view model.

pub mod audit;
pub mod etl;
pub mod forex;
pub mod integrations;
pub mod materiality;
pub mod quantum;
pub mod ratios;
pub mod reconciliations;
pub mod statements;
pub mod system;

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::domain::RecordId;
use crate::services::{LoadReport, LoadTracker, Loaded, ResilientFetch};

/// Dependencies a page loader composes
#[derive(Clone)]
pub struct PageContext {
    pub fetch: ResilientFetch,
    pub tracker: LoadTracker,
}

impl PageContext {
    /// Run `load` as the newest load for `key`. Returns `None` when another
    /// load for the same key started before this one finished. Loads
    /// without a key always complete.
    pub async fn latest<T>(&self, key: Option<&str>, load: impl Future<Output = T>) -> Option<T> {
        let Some(key) = key else {
            return Some(load.await);
        };
        let ticket = self.tracker.begin(key);
        let value = load.await;
        self.tracker.settle(&ticket, value)
    }
}

#[cfg(test)]
impl PageContext {
    /// Untracked context over a canned transport, fallback data on.
    pub(crate) fn over(transport: crate::services::testing::StaticTransport) -> Self {
        Self {
            fetch: ResilientFetch::new(std::sync::Arc::new(transport), true),
            tracker: LoadTracker::new(),
        }
    }
}

/// Load outcome of one panel of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub panel: &'static str,
    #[serde(flatten)]
    pub report: LoadReport,
}

impl SourceReport {
    pub fn of<T>(panel: &'static str, loaded: &Loaded<T>) -> Self {
        Self {
            panel,
            report: LoadReport::from(loaded),
        }
    }
}

/// Page-local UI mode: which tab is shown, which modal is open, and which
/// record the modal is editing.
///
/// Starts on the first tab with nothing open. There is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState<T, M> {
    pub active_tab: T,
    pub modal: Option<M>,
    pub editing: Option<RecordId>,
}

impl<T: Default, M> Default for ViewState<T, M> {
    fn default() -> Self {
        Self {
            active_tab: T::default(),
            modal: None,
            editing: None,
        }
    }
}

impl<T: Copy + PartialEq, M: Copy + PartialEq> ViewState<T, M> {
    /// Switch tabs. Any open modal is closed.
    pub fn select_tab(&mut self, tab: T) {
        self.active_tab = tab;
        self.close_modal();
    }

    /// Open `modal` for a new record.
    pub fn open_modal(&mut self, modal: M) {
        self.modal = Some(modal);
        self.editing = None;
    }

    /// Open `modal` on an existing record.
    pub fn start_edit(&mut self, modal: M, id: RecordId) {
        self.modal = Some(modal);
        self.editing = Some(id);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.editing = None;
    }

    pub fn is_open(&self, modal: M) -> bool {
        self.modal == Some(modal)
    }
}

/// View-state parameters the browser shell sends with a page request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery<T, M> {
    pub tab: Option<T>,
    pub modal: Option<M>,
    pub editing: Option<String>,
}

impl<T, M> ViewQuery<T, M>
where
    T: Copy + PartialEq + Default,
    M: Copy + PartialEq,
{
    /// Replay the query as transitions from the initial state.
    pub fn restore(&self) -> ViewState<T, M> {
        let mut state = ViewState::default();
        if let Some(tab) = self.tab {
            state.select_tab(tab);
        }
        match (self.modal, self.editing.as_deref()) {
            (Some(modal), Some(id)) if !id.is_empty() => state.start_edit(modal, RecordId::new(id)),
            (Some(modal), _) => state.open_modal(modal),
            (None, _) => {}
        }
        state
    }
}
