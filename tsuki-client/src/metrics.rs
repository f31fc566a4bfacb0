use std::time::Duration;

use hyper::StatusCode;
use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::{ClientError, HttpMethod, Site};

const REQUEST_DURATION: &str = "tsuki_client_request_duration_seconds";
const REQUEST_FAILURES: &str = "tsuki_client_request_failures_total";

/// Why a request produced no response.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Failure {
    Timeout,
    Transport,
}

impl Failure {
    fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Transport => "transport",
        }
    }
}

impl From<&ClientError> for Failure {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Timeout => Self::Timeout,
            _ => Self::Transport,
        }
    }
}

pub(crate) struct ClientMetrics;

impl ClientMetrics {
    pub(crate) fn init() {
        describe_histogram!(
            REQUEST_DURATION,
            "Time until a response arrived, by site, method and status"
        );

        describe_counter!(
            REQUEST_FAILURES,
            "Requests without response, by site, method and failure kind"
        );
    }

    /// A response arrived, successful or not.
    pub(crate) fn response(site: Site, method: HttpMethod, status: StatusCode, latency: Duration) {
        histogram!(
            REQUEST_DURATION,
            "site" => site.as_str(),
            "method" => method.as_str(),
            "status" => status.as_str().to_owned()
        )
        .record(latency);
    }

    pub(crate) fn failure(site: Site, method: HttpMethod, failure: Failure) {
        counter!(
            REQUEST_FAILURES,
            "site" => site.as_str(),
            "method" => method.as_str(),
            "kind" => failure.as_str()
        )
        .increment(1);
    }
}
