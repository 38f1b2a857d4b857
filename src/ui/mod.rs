//! Terminal output helpers
//!
//! Uses `cliclack` for spinners, log lines and prompts in an interactive
//! terminal, and falls back to plain prefixed lines in CI or when output is
//! piped.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{key_value, remark, step_ok, step_warn};
pub use progress::TaskSpinner;
pub use prompts::confirm;
