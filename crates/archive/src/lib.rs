//! Generated blog files on disk: writing them, reading them back, and
//! reporting token usage and cost across a run.

pub mod costs;
pub mod report;
pub mod store;

pub use costs::*;
pub use report::*;
pub use store::*;
