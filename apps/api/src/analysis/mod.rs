//! The shared "analyze unstructured text → derive structured business signal"
//! pipeline: extract signals, classify them, persist the verdict.

pub mod extractor;
pub mod heuristics;
pub mod persist;

pub use extractor::TextSignalExtractor;
pub use persist::{Recorded, ResultPersister};
