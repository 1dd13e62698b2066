// src/view/result.rs
use std::fmt;

use crate::client::SearchResponse;

/// Queries slower than this (strictly greater) are called out as slow.
pub const SLOW_QUERY_THRESHOLD_MS: f64 = 100.0;

pub const SLOW_PHRASE: &str = "quite a while";
pub const REASONABLE_PHRASE: &str = "a reasonable amount of time";

/// Summary of a finished search: result count plus query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultView {
    pub total_count: u64,
    pub execution_time_ms: f64,
}

impl ResultView {
    pub fn new(total_count: u64, execution_time_ms: f64) -> Self {
        Self {
            total_count,
            execution_time_ms,
        }
    }

    pub fn performance_phrase(&self) -> &'static str {
        if self.execution_time_ms > SLOW_QUERY_THRESHOLD_MS {
            SLOW_PHRASE
        } else {
            REASONABLE_PHRASE
        }
    }

    pub fn formatted_time(&self) -> String {
        format!("{:.1}ms", self.execution_time_ms)
    }
}

impl From<&SearchResponse> for ResultView {
    fn from(response: &SearchResponse) -> Self {
        Self::new(response.results_count, response.execution_time_ms)
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.formatted_time();
        writeln!(f, "Query executed in {}", time)?;
        writeln!(f, "Found {} matching employees", self.total_count)?;
        writeln!(f)?;
        writeln!(f, "Search Complete")?;
        writeln!(
            f,
            "Successfully found {} employees named \"John Smith\" in {}",
            self.total_count, time
        )?;
        write!(
            f,
            "💡 This search took {}. There might be room for optimization!",
            self.performance_phrase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strictly_greater() {
        assert_eq!(ResultView::new(1, 100.0).performance_phrase(), REASONABLE_PHRASE);
        assert_eq!(ResultView::new(1, 100.04).performance_phrase(), REASONABLE_PHRASE);
        assert_eq!(ResultView::new(1, 100.1).performance_phrase(), SLOW_PHRASE);
        assert_eq!(ResultView::new(1, 0.0).performance_phrase(), REASONABLE_PHRASE);
    }

    #[test]
    fn test_time_rounded_to_one_decimal() {
        assert_eq!(ResultView::new(0, 37.2).formatted_time(), "37.2ms");
        assert_eq!(ResultView::new(0, 12.0).formatted_time(), "12.0ms");
        assert_eq!(ResultView::new(0, 9.96).formatted_time(), "10.0ms");
        assert_eq!(ResultView::new(0, 100.04).formatted_time(), "100.0ms");
    }

    #[test]
    fn test_render_mentions_count_time_and_phrase() {
        let text = ResultView::new(42, 37.2).to_string();
        assert!(text.contains("Query executed in 37.2ms"));
        assert!(text.contains("Found 42 matching employees"));
        assert!(text.contains("Successfully found 42 employees named \"John Smith\" in 37.2ms"));
        assert!(text.contains("This search took a reasonable amount of time."));
    }
}
