// src/perf/events.rs
use serde::{Deserialize, Serialize};

use crate::client::ClientError;

/// One step of the streamed performance test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfProgress {
    pub progress: u32,
    pub total: u32,
    pub percentage: f64,
    pub current_query_time: f64,
    pub average_time: f64,
    pub total_time: f64,
    pub results_count: u64,
    pub status: String,
}

/// Final frame of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfSummary {
    pub status: String,
    pub total_execution_time_ms: f64,
    pub average_time_ms: f64,
    pub queries_executed: u32,
    pub results_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerfEvent {
    Progress(PerfProgress),
    Summary(PerfSummary),
}

/// Incremental decoder for `data: <json>\n\n` frames.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed one body chunk, returning every frame it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<PerfEvent>, ClientError> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = find_frame_end(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(event) = decode_frame(&frame[..end])? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Flush a trailing frame that was not followed by a blank line.
    pub fn finish(&mut self) -> Result<Option<PerfEvent>, ClientError> {
        let rest = std::mem::take(&mut self.buffer);
        decode_frame(&rest)
    }
}

fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn decode_frame(frame: &[u8]) -> Result<Option<PerfEvent>, ClientError> {
    let text = std::str::from_utf8(frame)
        .map_err(|e| ClientError::Decode(format!("stream frame is not UTF-8: {}", e)))?;

    let payload = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n");

    if payload.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRESS: &str = r#"data: {"progress": 1, "total": 100, "percentage": 1.0, "current_query_time": 12.34, "average_time": 12.34, "total_time": 12.34, "results_count": 5, "status": "running"}"#;
    const SUMMARY: &str = r#"data: {"status": "completed", "total_execution_time_ms": 1234.5, "average_time_ms": 12.35, "queries_executed": 100, "results_count": 5}"#;

    #[test]
    fn test_decodes_progress_and_summary() {
        let mut decoder = SseDecoder::default();
        let body = format!("{}\n\n{}\n\n", PROGRESS, SUMMARY);

        let events = decoder.push(body.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        match &events[0] {
            PerfEvent::Progress(p) => {
                assert_eq!(p.progress, 1);
                assert_eq!(p.status, "running");
            }
            other => panic!("expected progress, got {:?}", other),
        }
        match &events[1] {
            PerfEvent::Summary(s) => assert_eq!(s.queries_executed, 100),
            other => panic!("expected summary, got {:?}", other),
        }
        assert!(decoder.finish().unwrap().is_none());
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        let body = format!("{}\r\n\r\n", PROGRESS);
        let (head, tail) = body.as_bytes().split_at(40);

        assert!(decoder.push(head).unwrap().is_empty());
        let events = decoder.push(tail).unwrap();
        assert!(matches!(events.as_slice(), [PerfEvent::Progress(_)]));
    }

    #[test]
    fn test_trailing_frame_without_blank_line() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(SUMMARY.as_bytes()).unwrap().is_empty());
        assert!(matches!(decoder.finish().unwrap(), Some(PerfEvent::Summary(_))));
    }

    #[test]
    fn test_garbage_payload_is_decode_error() {
        let mut decoder = SseDecoder::default();
        let err = decoder.push(b"data: {\"nope\": true}\n\n").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
