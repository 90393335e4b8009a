use std::io::{self, BufRead, Write};

use serde_json::json;
use tracing::warn;

use crate::config::OutputMode;
use crate::engine::{AvailabilityUpdate, Clock, Validator, available_minutes, open_windows};

/// Counts from one pass over a request stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub rejected: usize,
}

impl Summary {
    /// 1 when any request was invalid or unreadable, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.rejected > 0)
    }
}

/// Validate one JSON request per line of `input`, writing one JSON response
/// per request to `output`. A bad line gets an `{"error": ..}` response and
/// the stream carries on; only I/O failures end the run early.
pub fn run<C: Clock>(
    validator: &Validator<C>,
    mode: OutputMode,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<Summary> {
    let mut summary = Summary::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(e) => {
                warn!("request on line {line_no}: {e}");
                summary.total += 1;
                summary.rejected += 1;
                write_line(&mut output, &json!({ "error": e.to_string() }))?;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        summary.total += 1;

        let response = match serde_json::from_str::<AvailabilityUpdate>(&line) {
            Ok(update) => {
                let body = respond(validator, &update, mode);
                if body["result"]["is_valid"] != json!(true) {
                    summary.rejected += 1;
                }
                body
            }
            Err(e) => {
                warn!("request on line {line_no}: {e}");
                summary.rejected += 1;
                json!({ "error": e.to_string() })
            }
        };
        write_line(&mut output, &response)?;
    }

    output.flush()?;
    Ok(summary)
}

fn write_line(output: &mut impl Write, value: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *output, value)?;
    writeln!(output)
}

fn respond<C: Clock>(validator: &Validator<C>, update: &AvailabilityUpdate, mode: OutputMode) -> serde_json::Value {
    let result = validator.validate_availability_update(update);
    let verdict = match mode {
        OutputMode::Messages => json!(result.rendered()),
        OutputMode::Structured => json!(result.structured()),
    };
    json!({
        "result": verdict,
        "open_windows": open_windows(&update.slots, &update.operating_hours),
        "available_minutes": available_minutes(&update.slots, &update.operating_hours),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::engine::{FixedClock, Policy};

    /// 2026-10-17 10:00 UTC
    const NOW: i64 = 1_792_231_200_000;

    const GOOD: &str = r#"{"date":"2026-10-18T12:00:00Z","slots":[{"start":"09:00","end":"12:00"}],"operating_hours":{"start":"06:00","end":"23:00"}}"#;
    const SHORT: &str = r#"{"date":"2026-10-18T12:00:00Z","slots":[{"start":"09:00","end":"09:30"}],"operating_hours":{"start":"06:00","end":"23:00"}}"#;

    fn validator() -> Validator<FixedClock> {
        Validator::with_clock(Policy::default(), FixedClock(NOW))
    }

    fn run_bytes(input: &[u8], mode: OutputMode) -> (Summary, Vec<serde_json::Value>) {
        let mut out = Vec::new();
        let summary = run(&validator(), mode, Cursor::new(input), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, lines)
    }

    #[test]
    fn all_valid_exits_zero() {
        let input = format!("{GOOD}\n\n{GOOD}");
        let (summary, lines) = run_bytes(input.as_bytes(), OutputMode::Messages);
        assert_eq!(summary, Summary { total: 2, rejected: 0 });
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["result"]["is_valid"], true);
        assert_eq!(lines[0]["available_minutes"], 180);
        assert_eq!(lines[0]["open_windows"][0]["end"], "09:00");
    }

    #[test]
    fn invalid_utf8_line_does_not_stop_the_stream() {
        let mut input = Vec::new();
        input.extend_from_slice(GOOD.as_bytes());
        input.extend_from_slice(b"\n\xff\xfe bad\n");
        input.extend_from_slice(GOOD.as_bytes());
        input.push(b'\n');

        let (summary, lines) = run_bytes(&input, OutputMode::Messages);
        assert_eq!(summary, Summary { total: 3, rejected: 1 });
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["result"]["is_valid"], true);
        assert!(lines[1]["error"].as_str().unwrap().contains("utf-8"));
        assert_eq!(lines[2]["result"]["is_valid"], true);
    }

    #[test]
    fn unparseable_and_invalid_requests_are_rejected() {
        let input = format!("{{not json}}\n{SHORT}\n{GOOD}\n");
        let (summary, lines) = run_bytes(input.as_bytes(), OutputMode::Messages);
        assert_eq!(summary, Summary { total: 3, rejected: 2 });
        assert_eq!(summary.exit_code(), 1);
        assert!(lines[0]["error"].is_string());
        assert_eq!(lines[1]["result"]["is_valid"], false);
        assert_eq!(
            lines[1]["result"]["errors"][0],
            "Time slot 09:00-09:30 is 30 minutes; minimum duration is 1 hour"
        );
        assert_eq!(lines[2]["result"]["is_valid"], true);
    }

    #[test]
    fn structured_mode_tags_findings() {
        let (_, lines) = run_bytes(SHORT.as_bytes(), OutputMode::Structured);
        assert_eq!(lines[0]["result"]["errors"][0]["kind"], "slot_too_short");
        assert_eq!(lines[0]["result"]["errors"][0]["minutes"], 30);
    }

    #[test]
    fn empty_input() {
        let (summary, lines) = run_bytes(b"", OutputMode::Messages);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.exit_code(), 0);
        assert!(lines.is_empty());
    }
}
