//! Populate command handlers.

mod logging;
mod run;

pub use logging::mask_connection_password;
pub use run::{execute, run_populate};
