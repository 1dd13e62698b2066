// src/view/perf.rs
use crate::perf::{PerfEvent, PerfProgress, PerfSummary};

pub fn render_progress(p: &PerfProgress) -> String {
    format!(
        "[{:>3}/{}] {:>5.1}% current {:.2}ms avg {:.2}ms",
        p.progress, p.total, p.percentage, p.current_query_time, p.average_time
    )
}

pub fn render_summary(s: &PerfSummary) -> String {
    format!(
        "Performance test {}\n  queries executed: {}\n  total time: {:.2}ms\n  average time: {:.2}ms\n  results per query: {}",
        s.status, s.queries_executed, s.total_execution_time_ms, s.average_time_ms, s.results_count
    )
}

pub fn render_event(event: &PerfEvent) -> String {
    match event {
        PerfEvent::Progress(p) => render_progress(p),
        PerfEvent::Summary(s) => render_summary(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line() {
        let line = render_progress(&PerfProgress {
            progress: 42,
            total: 100,
            percentage: 42.0,
            current_query_time: 12.346,
            average_time: 11.2,
            total_time: 470.4,
            results_count: 5,
            status: "running".into(),
        });
        assert_eq!(line, "[ 42/100]  42.0% current 12.35ms avg 11.20ms");
    }
}
