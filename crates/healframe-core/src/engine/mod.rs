mod accumulator;
mod healing;
mod validation_engine;


pub use accumulator::ResultAccumulator;
pub use healing::remove_rows;
pub use validation_engine::{validate, ValidationEngine};
