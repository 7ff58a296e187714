//! Shared response envelope types for API handlers.
//!
//! Settings and other same-origin JSON responses use a `{ "data": ... }`
//! envelope. The callback and polling endpoints keep the bare shapes the
//! automation engine and the poller expect.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Acknowledgement returned to the automation engine on every callback.
#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub received: bool,
}
