//! Domain model for the pige (prospecting) search pipeline.
//!
//! Pure data and state transitions only: criteria, the criteria board,
//! profile derivation, the engine wire payload, the search session state
//! machine and stored callback results. No I/O lives here so the API
//! server and the search client can share it.

pub mod board;
pub mod catalog;
pub mod criterion;
pub mod deriver;
pub mod error;
pub mod payload;
pub mod profile;
pub mod report;
pub mod result;
pub mod session;
pub mod settings;
pub mod types;
