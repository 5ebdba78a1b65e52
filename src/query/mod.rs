//! Query classification, execution and result normalization.

pub mod classify;
pub mod executor;
pub mod normalize;
pub mod statements;

pub use classify::{classify, StatementClass, StatementClassifier};
pub use executor::execute;
