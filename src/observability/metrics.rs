//! Metrics for the tender client
//!
//! Counters are recorded through the `metrics` facade; whichever recorder the
//! host process installs receives them. Without a recorder they are no-ops.

use std::fmt;

/// Enum representing all metric names used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Upstream tender service
    UpstreamRequestsSuccess,
    UpstreamRequestsError,
    UpstreamRecordsReceived,

    // Option cache
    OptionCacheHits,
    OptionCacheMisses,
    OptionCacheFailures,

    // Session
    ResponsesSuperseded,
    ValidationRejections,
}

impl MetricName {
    /// Get the metric name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::UpstreamRequestsSuccess => "tender_upstream_requests_success_total",
            MetricName::UpstreamRequestsError => "tender_upstream_requests_error_total",
            MetricName::UpstreamRecordsReceived => "tender_upstream_records_received_total",
            MetricName::OptionCacheHits => "tender_option_cache_hits_total",
            MetricName::OptionCacheMisses => "tender_option_cache_misses_total",
            MetricName::OptionCacheFailures => "tender_option_cache_failures_total",
            MetricName::ResponsesSuperseded => "tender_responses_superseded_total",
            MetricName::ValidationRejections => "tender_validation_rejections_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            UpstreamRequestsSuccess,
            UpstreamRequestsError,
            UpstreamRecordsReceived,
            OptionCacheHits,
            OptionCacheMisses,
            OptionCacheFailures,
            ResponsesSuperseded,
            ValidationRejections,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod upstream {
    use super::MetricName;

    /// Record a successful call to the tender service
    pub fn request_success(endpoint: &'static str) {
        ::metrics::counter!(MetricName::UpstreamRequestsSuccess.as_str(), "endpoint" => endpoint)
            .increment(1);
    }

    /// Record a failed call to the tender service
    pub fn request_error(endpoint: &'static str) {
        ::metrics::counter!(MetricName::UpstreamRequestsError.as_str(), "endpoint" => endpoint)
            .increment(1);
    }

    pub fn records_received(endpoint: &'static str, count: usize) {
        ::metrics::counter!(MetricName::UpstreamRecordsReceived.as_str(), "endpoint" => endpoint)
            .increment(count as u64);
    }
}

pub mod option_cache {
    use super::MetricName;

    pub fn hit(level: &'static str) {
        ::metrics::counter!(MetricName::OptionCacheHits.as_str(), "level" => level).increment(1);
    }

    pub fn miss(level: &'static str) {
        ::metrics::counter!(MetricName::OptionCacheMisses.as_str(), "level" => level).increment(1);
    }

    pub fn failure(level: &'static str) {
        ::metrics::counter!(MetricName::OptionCacheFailures.as_str(), "level" => level)
            .increment(1);
    }
}

pub mod session {
    use super::MetricName;

    /// A response arrived after a newer request for the same scope was issued
    pub fn superseded(scope: &'static str) {
        ::metrics::counter!(MetricName::ResponsesSuperseded.as_str(), "scope" => scope)
            .increment(1);
    }

    pub fn validation_rejected(action: &'static str) {
        ::metrics::counter!(MetricName::ValidationRejections.as_str(), "action" => action)
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn metric_names_are_unique_and_prefixed() {
        let names: HashSet<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
        assert!(names.iter().all(|n| n.starts_with("tender_") && n.ends_with("_total")));
    }

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        upstream::request_success("tenders");
        option_cache::miss("area");
        session::superseded("records");
    }
}
