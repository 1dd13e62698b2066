// src/view/mod.rs
//! Plain-text renderers. Everything here is a pure function of its input.
mod perf;
mod result;
mod search;
mod status;

pub use perf::{render_event, render_progress, render_summary};
pub use result::{ResultView, REASONABLE_PHRASE, SLOW_PHRASE, SLOW_QUERY_THRESHOLD_MS};
pub use search::{render_search, SEARCHING, SEARCH_PROMPT};
pub use status::{
    render_service, render_statuses, status_indicator, status_label, CHECKING, CONNECTED, FAILED,
    UNHEALTHY,
};
