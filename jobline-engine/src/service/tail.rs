//! Log tail engine
//!
//! Pulls a job's log stream from the log host in batches, resuming from a
//! line cursor. While the host keeps returning new lines the engine drains
//! without pausing; once it goes quiet, a tailing session backs off
//! exponentially until the end-of-stream marker arrives. A one-shot fetch
//! stops at the first quiet round instead.

use jobline_client::JobsApi;
use jobline_core::domain::log::LogLine;
use tracing::debug;

use crate::config::EngineConfig;
use crate::report::Reporter;
use crate::service::backoff::Backoff;

/// Where to start and whether to keep following
#[derive(Debug, Clone, Copy, Default)]
pub struct TailOptions {
    /// Line cursor to resume from
    pub line: u64,
    /// Keep polling until end-of-stream instead of stopping when caught up
    pub follow: bool,
}

impl TailOptions {
    /// Follow a stream from its beginning
    pub fn follow() -> Self {
        Self {
            line: 0,
            follow: true,
        }
    }
}

/// Cursor-based log reader
#[derive(Debug, Clone)]
pub struct LogTail {
    api: JobsApi,
    config: EngineConfig,
}

impl LogTail {
    pub fn new(api: JobsApi, config: EngineConfig) -> Self {
        Self { api, config }
    }

    /// Report each new line as it arrives, hiding the end-of-stream marker
    pub async fn print(&self, job_id: &str, options: TailOptions, reporter: &dyn Reporter) -> bool {
        self.drain(job_id, options, |batch| {
            batch
                .iter()
                .filter(|line| !line.is_end_of_stream())
                .for_each(|line| reporter.log_line(line));
        })
        .await;
        true
    }

    /// Gather every record received, in stream order
    pub async fn collect(&self, job_id: &str, options: TailOptions) -> Vec<LogLine> {
        let mut lines = Vec::new();
        self.drain(job_id, options, |batch| lines.extend_from_slice(batch))
            .await;
        lines
    }

    async fn drain<F>(&self, job_id: &str, options: TailOptions, mut emit: F)
    where
        F: FnMut(&[LogLine]),
    {
        let mut cursor = options.line;
        let mut consumed: Option<u64> = None;
        let mut backoff = Backoff::new(self.config.backoff_unit, self.config.backoff_ceiling);

        loop {
            let batch = self.fetch(job_id, cursor).await;

            // Drop anything at or below a line already handed out.
            let mut fresh = Vec::with_capacity(batch.len());
            for record in &batch {
                if consumed.is_none_or(|high| record.line > high) {
                    consumed = Some(record.line);
                    fresh.push(record.clone());
                }
            }
            emit(&fresh);

            if batch.last().is_some_and(LogLine::is_end_of_stream) {
                debug!("Log stream for job {} ended at line {}", job_id, cursor);
                return;
            }

            if let Some(high) = consumed.filter(|high| *high > cursor) {
                cursor = high;
                backoff.reset();
                continue;
            }

            if !options.follow {
                return;
            }

            let delay = backoff.next_delay();
            if !delay.is_zero() {
                debug!("No new logs for job {}, retrying in {:?}", job_id, delay);
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// One batch at `line`; failures count as an empty batch
    async fn fetch(&self, job_id: &str, line: u64) -> Vec<LogLine> {
        match self.api.get_logs(job_id, line).await {
            Ok(payload) => serde_json::from_value(payload).unwrap_or_else(|e| {
                debug!("Ignoring unreadable log batch for job {}: {}", job_id, e);
                Vec::new()
            }),
            Err(e) => {
                debug!("Log fetch for job {} failed: {}", job_id, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingReporter, ScriptedTransport, api};
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    const LOGS: &str = "/jobs/logs";

    fn tail(transport: &std::sync::Arc<ScriptedTransport>) -> LogTail {
        LogTail::new(api(transport), EngineConfig::default())
    }

    fn cursors(transport: &ScriptedTransport) -> Vec<String> {
        transport
            .requests()
            .iter()
            .map(|r| r.query["line"].clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_print_hides_end_of_stream() {
        let transport = ScriptedTransport::new();
        transport.reply(
            LOGS,
            json!([
                { "line": 0, "message": "hello" },
                { "line": 1, "message": "PSEOF" },
            ]),
        );
        let reporter = RecordingReporter::default();

        let done = tail(&transport)
            .print("js1", TailOptions::follow(), &reporter)
            .await;

        assert!(done);
        assert_eq!(reporter.lines(), vec!["hello"]);
        assert_eq!(transport.count(LOGS), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_keeps_marker_and_advances_cursor() {
        let transport = ScriptedTransport::new();
        transport
            .reply(LOGS, json!([{ "line": 0, "message": "a" }, { "line": 1, "message": "b" }]))
            .reply(LOGS, json!([{ "line": 2, "message": "c" }, { "line": 3, "message": "PSEOF" }]));

        let lines = tail(&transport).collect("js1", TailOptions::follow()).await;

        let messages: Vec<_> = lines.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c", "PSEOF"]);
        assert_eq!(cursors(&transport), vec!["0", "1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_stops_when_caught_up() {
        let transport = ScriptedTransport::new();
        transport
            .reply(LOGS, json!([{ "line": 0, "message": "a" }, { "line": 1, "message": "b" }]))
            .reply(LOGS, json!([]));
        let start = Instant::now();

        let lines = tail(&transport).collect("js1", TailOptions::default()).await;

        assert_eq!(lines.len(), 2);
        assert_eq!(transport.count(LOGS), 2);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_batches_emit_each_line_once() {
        let transport = ScriptedTransport::new();
        transport
            .reply(LOGS, json!([{ "line": 0, "message": "a" }, { "line": 1, "message": "b" }]))
            .reply(LOGS, json!([{ "line": 1, "message": "b" }, { "line": 2, "message": "c" }]))
            .reply(LOGS, json!([{ "line": 2, "message": "c" }, { "line": 3, "message": "PSEOF" }]));
        let reporter = RecordingReporter::default();

        tail(&transport)
            .print("js1", TailOptions::follow(), &reporter)
            .await;

        assert_eq!(reporter.lines(), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_count_as_empty_batches() {
        let transport = ScriptedTransport::new();
        transport
            .reply(LOGS, json!({ "error": "not ready" }))
            .fail(LOGS, 502)
            .reply(LOGS, json!([{ "line": 5, "message": "x" }, { "line": 6, "message": "PSEOF" }]));
        let start = Instant::now();

        let lines = tail(&transport)
            .collect("js1", TailOptions { line: 5, follow: true })
            .await;

        assert_eq!(lines, vec![LogLine::new(5, "x"), LogLine::new(6, "PSEOF")]);
        // First quiet round re-polls at once, the second waits one unit.
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_resets_after_progress() {
        let transport = ScriptedTransport::new();
        transport
            .reply(LOGS, json!([]))
            .reply(LOGS, json!([]))
            .reply(LOGS, json!([]))
            .reply(LOGS, json!([{ "line": 1, "message": "a" }]))
            .reply(LOGS, json!([]))
            .reply(LOGS, json!([]))
            .reply(LOGS, json!([{ "line": 2, "message": "PSEOF" }]));
        let start = Instant::now();

        tail(&transport).collect("js1", TailOptions::follow()).await;

        // 0 + 1 + 2 before the data, then 0 + 1 after the reset.
        assert_eq!(start.elapsed(), Duration::from_secs(4));
        assert_eq!(transport.count(LOGS), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_idle_caps_at_ceiling() {
        let transport = ScriptedTransport::new();
        for _ in 0..8 {
            transport.reply(LOGS, json!([]));
        }
        transport.reply(LOGS, json!([{ "line": 0, "message": "PSEOF" }]));
        let start = Instant::now();

        tail(&transport).collect("js1", TailOptions::follow()).await;

        // 0, 1, 2, 4, 8, 16, 30, 30
        assert_eq!(start.elapsed(), Duration::from_secs(91));
    }
}
