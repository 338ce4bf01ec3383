//! Recorded pointer traces
//!
//! A trace is a CSV file with one pointer sample per row:
//!
//! ```text
//! at_ms,pointer,phase,x,y
//! 0,1,down,120,300
//! 40,1,move,150,290
//! 90,1,up,150,290
//! ```
//!
//! `at_ms` is relative to the start of the replay and must not decrease.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::host::{HostError, HostHandle, PointerEvent, PointerPhase};
use crate::input::geometry::Point;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to read trace {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad trace row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("trace row {row} has a non-finite position ({x}, {y})")]
    NonFinite { row: usize, x: f32, y: f32 },

    #[error("trace row {row} goes back in time ({at_ms} ms after {previous_ms} ms)")]
    OutOfOrder { row: usize, at_ms: u64, previous_ms: u64 },

    #[error(transparent)]
    Host(#[from] HostError),
}

fn line_of(err: &csv::Error) -> Option<usize> {
    err.position().map(|p| p.line() as usize)
}

/// One pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TraceRow {
    pub at_ms: u64,
    pub pointer: u64,
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

impl TraceRow {
    pub fn event(&self) -> PointerEvent {
        PointerEvent {
            pointer: self.pointer,
            phase: self.phase,
            position: Point::new(self.x, self.y),
        }
    }
}

/// A parsed, time-ordered trace
#[derive(Debug, Clone, Default)]
pub struct Trace {
    rows: Vec<TraceRow>,
}

impl Trace {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TraceError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, TraceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(contents.as_bytes());

        let headers = reader
            .headers()
            .map_err(|source| TraceError::Row { row: 1, source })?
            .clone();

        let mut rows: Vec<TraceRow> = Vec::new();
        let mut last_line = 1;
        for result in reader.records() {
            let record = result.map_err(|source| TraceError::Row {
                row: line_of(&source).unwrap_or(last_line + 1),
                source,
            })?;
            // Line numbers in the file, comments included
            let row_no = record.position().map_or(last_line + 1, |p| p.line() as usize);
            last_line = row_no;

            let row: TraceRow = record
                .deserialize(Some(&headers))
                .map_err(|source| TraceError::Row { row: row_no, source })?;

            if !row.x.is_finite() || !row.y.is_finite() {
                return Err(TraceError::NonFinite {
                    row: row_no,
                    x: row.x,
                    y: row.y,
                });
            }

            if let Some(prev) = rows.last() {
                if row.at_ms < prev.at_ms {
                    return Err(TraceError::OutOfOrder {
                        row: row_no,
                        at_ms: row.at_ms,
                        previous_ms: prev.at_ms,
                    });
                }
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Time of the last sample
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.rows.last().map_or(0, |r| r.at_ms))
    }

    /// Feed every sample to the host at its recorded time
    pub async fn replay(&self, host: &HostHandle) -> Result<(), TraceError> {
        info!("Replaying {} samples over {:?}", self.rows.len(), self.duration());
        let start = tokio::time::Instant::now();

        for row in &self.rows {
            tokio::time::sleep_until(start + Duration::from_millis(row.at_ms)).await;
            debug!("t={}ms pointer {} {:?} ({}, {})", row.at_ms, row.pointer, row.phase, row.x, row.y);
            host.pointer(row.event())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::host::{ChannelListener, HostEvent, Side};
    use std::sync::Arc;

    const TAP_TAP: &str = "\
at_ms,pointer,phase,x,y
# two taps on the left half
0,1,down,100,200
30,1,up,100,200
100,2,down,100,200
130,2,up,100,200
";

    #[test]
    fn test_parse_rows() {
        let trace = Trace::parse(TAP_TAP).unwrap();
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.rows()[1].phase, PointerPhase::Up);
        assert_eq!(trace.rows()[2].event(), PointerEvent::down(2, 100.0, 200.0));
        assert_eq!(trace.duration(), Duration::from_millis(130));
    }

    #[test]
    fn test_rejects_unknown_phase() {
        let err = Trace::parse("at_ms,pointer,phase,x,y\n0,1,hover,1,1\n").unwrap_err();
        assert!(matches!(err, TraceError::Row { row: 2, .. }));
    }

    #[test]
    fn test_rejects_time_travel() {
        let err = Trace::parse("at_ms,pointer,phase,x,y\n50,1,down,1,1\n10,1,up,1,1\n").unwrap_err();
        assert!(matches!(err, TraceError::OutOfOrder { row: 3, at_ms: 10, previous_ms: 50 }));
    }

    #[test]
    fn test_error_rows_count_comment_lines() {
        let csv = "at_ms,pointer,phase,x,y\n# warm-up\n0,1,down,1,1\n# lift\n10,1,hover,1,1\n";
        let err = Trace::parse(csv).unwrap_err();
        assert!(matches!(err, TraceError::Row { row: 5, .. }), "{err}");

        let csv = "at_ms,pointer,phase,x,y\n# a\n# b\n50,1,down,1,1\n10,1,up,1,1\n";
        let err = Trace::parse(csv).unwrap_err();
        assert!(matches!(err, TraceError::OutOfOrder { row: 5, .. }), "{err}");
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let err = Trace::parse("at_ms,pointer,phase,x,y\n0,1,down,NaN,60\n").unwrap_err();
        assert!(matches!(err, TraceError::NonFinite { row: 2, .. }), "{err}");

        let err = Trace::parse("at_ms,pointer,phase,x,y\n0,1,down,60,inf\n").unwrap_err();
        assert!(matches!(err, TraceError::NonFinite { row: 2, .. }), "{err}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_produces_quick_tap() {
        let (listener, rx) = ChannelListener::unbounded();
        let host = HostHandle::spawn(&AppConfig::default(), Arc::new(listener));

        Trace::parse(TAP_TAP).unwrap().replay(&host).await.unwrap();
        host.snapshot().await.unwrap();

        let taps: Vec<_> = rx
            .try_iter()
            .filter(|e| matches!(e, HostEvent::QuickTap { .. } | HostEvent::NormalTap { .. }))
            .collect();
        assert_eq!(
            taps,
            vec![
                HostEvent::NormalTap { side: Side::Left },
                HostEvent::QuickTap { side: Side::Left },
            ]
        );
    }
}
