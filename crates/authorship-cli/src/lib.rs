pub mod plot;
pub mod preprocess;
pub mod train;
pub mod util;
