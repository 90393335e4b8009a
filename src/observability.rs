use std::net::SocketAddr;

use crate::engine::ValidationResult;

/// Counter: checks run. Labels: check, outcome.
pub const VALIDATIONS_TOTAL: &str = "slotcheck_validations_total";

/// Counter: findings produced. Labels: kind, severity.
pub const FINDINGS_TOTAL: &str = "slotcheck_findings_total";

/// Histogram: aggregate validation latency in seconds. Labels: check.
pub const VALIDATION_DURATION_SECONDS: &str = "slotcheck_validation_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Short label for a result's verdict.
pub fn outcome_label(result: &ValidationResult) -> &'static str {
    match (result.is_valid(), result.warnings.is_empty()) {
        (false, _) => "invalid",
        (true, false) => "valid_with_warnings",
        (true, true) => "valid",
    }
}

pub fn record_outcome(check: &'static str, result: &ValidationResult) {
    metrics::counter!(VALIDATIONS_TOTAL, "check" => check, "outcome" => outcome_label(result))
        .increment(1);
}

pub fn record_findings(result: &ValidationResult) {
    for finding in result.errors.iter().chain(&result.warnings) {
        metrics::counter!(
            FINDINGS_TOTAL,
            "kind" => finding.kind(),
            "severity" => finding.severity().label()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Finding;
    use crate::model::Span;

    #[test]
    fn outcome_labels() {
        let span = Span::new("14:00".parse().unwrap(), "16:00".parse().unwrap());
        let mut result = ValidationResult::new();
        assert_eq!(outcome_label(&result), "valid");

        result.push(Finding::TentativeConflict {
            slot: span,
            booking: span,
            job_title: None,
        });
        assert_eq!(outcome_label(&result), "valid_with_warnings");

        result.push(Finding::SlotsOverlap {
            first: span,
            second: span,
        });
        assert_eq!(outcome_label(&result), "invalid");
    }

    #[test]
    fn init_without_port_is_noop() {
        assert!(init(None).is_ok());
    }
}
