//! Server glue: accept loop, handler capability, connection accounting.

pub mod handler;
pub mod listener;
pub mod metrics;

pub use handler::Handler;
pub use metrics::ConnectionCounter;
