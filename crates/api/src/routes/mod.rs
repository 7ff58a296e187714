//! Route tree.
//!
//! ```text
//! /health                           GET   health check
//! /n8n-proxy                        POST  forwarding hop to the engine
//! /api/pige-results                 POST  engine callback (public, any origin)
//! /api/pige-results/{search_id}     GET   poll for a stored result
//! /api/settings/engine              GET, PUT  engine webhook URL
//! ```

pub mod health;
pub mod pige_results;
pub mod proxy;
pub mod settings;
