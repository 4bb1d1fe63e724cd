pub mod evaluation;
pub mod plots;

pub use evaluation::evaluate;
pub use plots::{plot_all, EvaluatedModel};
