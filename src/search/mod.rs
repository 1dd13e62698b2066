// src/search/mod.rs
mod panel;

pub use panel::{failure_message, PanelError, SearchPanel, ViewState, FALLBACK_ERROR};
