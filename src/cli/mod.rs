mod replay;
mod root;

pub use replay::{ReplayCommand, ReplayScript, Step, StepReport};
pub use root::{Cli, Commands};
