/// Errors from talking to `pige-api`.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The forwarding hop could not reach the engine. Carries the hop's
    /// own message.
    #[error("{0}")]
    Unreachable(String),

    /// `pige-api` returned an unexpected non-2xx status.
    #[error("Server error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// Why a submission did not reach `polling`.
///
/// Every variant is terminal for its session; none is retried
/// automatically. The operator may resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No engine webhook URL is configured. Raised before any network call.
    #[error("Automation engine webhook URL is not configured")]
    NotConfigured,

    /// The engine could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The engine answered with a non-2xx status.
    #[error("Engine error ({status}): {body}")]
    Engine { status: u16, body: String },

    /// 2xx response without a usable correlation id.
    #[error("Malformed engine response: {0}")]
    MalformedResponse(String),
}

impl SubmitError {
    /// Operator-facing message stored on the failed session.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => {
                "The automation engine webhook URL is not configured. Add it in the settings \
                 before starting a search."
                    .to_string()
            }
            Self::Transport(detail) => detail.clone(),
            Self::Engine { status, body } => {
                format!("The automation engine returned HTTP {status}. Response: {body}")
            }
            Self::MalformedResponse(detail) => {
                format!("Malformed engine response: {detail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_verbatim() {
        let err = SubmitError::Transport("connection refused".into());
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn engine_message_carries_status_and_body() {
        let err = SubmitError::Engine {
            status: 500,
            body: "workflow crashed".into(),
        };
        let message = err.user_message();
        assert!(message.contains("500"));
        assert!(message.contains("workflow crashed"));
    }

    #[test]
    fn not_configured_points_at_settings() {
        assert!(SubmitError::NotConfigured.user_message().contains("settings"));
    }
}
