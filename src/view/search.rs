// src/view/search.rs
use super::ResultView;
use crate::search::ViewState;

pub const SEARCH_PROMPT: &str = "Ready to search for employees named \"John Smith\"";
pub const SEARCHING: &str = "Searching employees...";

pub fn render_search(state: &ViewState) -> String {
    match state {
        ViewState::Idle => SEARCH_PROMPT.to_string(),
        ViewState::Loading => SEARCHING.to_string(),
        ViewState::Success(response) => ResultView::from(response).to_string(),
        ViewState::Failure(message) => format!("Error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SearchResponse;

    #[test]
    fn test_render_each_state() {
        assert_eq!(render_search(&ViewState::Loading), SEARCHING);
        assert_eq!(
            render_search(&ViewState::Failure("HTTP error! status: 500".into())),
            "Error: HTTP error! status: 500"
        );

        let done = render_search(&ViewState::Success(SearchResponse {
            results_count: 3,
            execution_time_ms: 150.7,
        }));
        assert!(done.contains("150.7ms"));
        assert!(done.contains("quite a while"));
    }
}
