//! Background tasks spawned alongside the HTTP server.

pub mod result_retention;
