pub mod logging;

pub use logging::{init_tracing, request_logging};
