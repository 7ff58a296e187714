//! Search coordinator for the pige pipeline.
//!
//! Submits a criteria board to the automation engine through the
//! `pige-api` forwarding hop, then polls the correlation store until the
//! engine's callback lands, the operator cancels, or the ceiling elapses.

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod poller;

pub use backend::{EngineReply, SearchBackend};
pub use coordinator::{SearchCoordinator, SearchHandle};
pub use error::{BackendError, SubmitError};
pub use poller::PollSettings;
