//! Request admission middleware
//!
//! Every request passes through the edge gate before routing:
//!
//! 1. per-client rate limit (429 when exceeded)
//! 2. access-token check for paths under the protected prefix (303 to login)
//! 3. security headers on whatever response goes out

mod edge_gate;
mod gate_service;
mod security_headers;

pub use edge_gate::{EdgeGate, GateDecision};
pub use gate_service::{EdgeGateMiddleware, EdgeGateService};
pub use security_headers::{apply_security_headers, SecurityHeaders};
