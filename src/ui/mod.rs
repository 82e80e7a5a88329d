//! Terminal output helpers
//!
//! Progress bars are only drawn on interactive terminals; in CI or when
//! stderr is piped the transfer is reported through log lines alone.

mod context;
mod progress;

pub use context::UiContext;
pub use progress::TransferProgress;
