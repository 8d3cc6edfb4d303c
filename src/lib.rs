pub mod caller;
pub mod greeting;
pub mod intent;
pub mod logging;
pub mod responder;
pub mod state_machine;

pub mod greeter_proto {
    include!(concat!(env!("OUT_DIR"), "/greeter.rs"));
}

pub use caller::{CallError, Caller, CallerConfig, greet_once, report};
pub use greeting::{Greeting, GreetingReply};
pub use intent::{Intent, classify, compose, respond};
pub use responder::{
    GreetingHandler, IntentResponder, Responder, ResponderConfig, ResponderHandle, ServerError,
};

/// Port the responder listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 50051;

/// Status message attached to calls rejected while the responder drains.
/// The caller matches on it to tell a shutdown apart from a lost connection.
pub const SHUTDOWN_MESSAGE: &str = "responder is shutting down";

/// Default address a caller dials when no target is given.
pub fn default_target() -> String {
    format!("http://localhost:{DEFAULT_PORT}")
}
