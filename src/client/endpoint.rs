// src/client/endpoint.rs
use std::fmt;

/// Fixed GET endpoints exposed by the directory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    DbTest,
    DbHealth,
    SearchJohnSmith,
    PerformanceSearch,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::DbTest => "/db-test",
            Endpoint::DbHealth => "/db-health",
            Endpoint::SearchJohnSmith => "/search/john-smith",
            Endpoint::PerformanceSearch => "/performance/search",
        }
    }

    /// Short label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::DbTest => "db_test",
            Endpoint::DbHealth => "db_health",
            Endpoint::SearchJohnSmith => "search_john_smith",
            Endpoint::PerformanceSearch => "performance_search",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
