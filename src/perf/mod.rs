// src/perf/mod.rs
mod events;

pub use events::{PerfEvent, PerfProgress, PerfSummary, SseDecoder};

use std::time::Instant;
use tracing::{debug, info};

use crate::client::{ApiClient, ClientError, Endpoint};

/// Run the backend's streamed performance test, passing every decoded event
/// to `on_event`, and return the final summary.
///
/// The request is counted once the stream ends, so failures mid-stream show
/// up in its outcome.
pub async fn run_performance_test<F>(
    client: &ApiClient,
    on_event: F,
) -> Result<PerfSummary, ClientError>
where
    F: FnMut(&PerfEvent),
{
    let start = Instant::now();
    let result = read_stream(client, on_event).await;
    client.record_outcome(Endpoint::PerformanceSearch, &result, start.elapsed());
    result
}

async fn read_stream<F>(client: &ApiClient, mut on_event: F) -> Result<PerfSummary, ClientError>
where
    F: FnMut(&PerfEvent),
{
    let mut response = client.open(Endpoint::PerformanceSearch).await?;
    let mut decoder = SseDecoder::default();
    let mut summary = None;
    let mut seen = 0usize;

    let mut handle = |event: PerfEvent| {
        seen += 1;
        on_event(&event);
        if let PerfEvent::Summary(s) = event {
            summary = Some(s);
        }
    };

    while let Some(chunk) = response.chunk().await.map_err(ClientError::Network)? {
        debug!("Performance stream chunk: {} bytes", chunk.len());
        for event in decoder.push(&chunk)? {
            handle(event);
        }
    }
    if let Some(event) = decoder.finish()? {
        handle(event);
    }

    info!("Performance stream closed after {} events", seen);
    summary.ok_or_else(|| ClientError::Decode("stream ended without a summary".to_string()))
}
