use crate::session::SessionStatus;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot {action} a search session in state '{from}'")]
    InvalidTransition {
        from: SessionStatus,
        action: &'static str,
    },
}
