pub mod formatters;
pub mod utils;

use healframe_core::Validated;
pub use formatters::{json::JsonFormatter, stdout::StdOutFormatter};

/// Receives the stages of one pipeline run.
pub trait Reporter {
    fn on_start(&self);
    fn on_loading(&self, path: &str);
    fn on_validation_start(&self);
    fn on_result(&mut self, validated: &Validated);
    fn on_complete(&self);
}
