pub mod consultant;

pub use consultant::*;
