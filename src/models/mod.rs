//! Job-shop domain models.
//!
//! Provides the input record and output timeline types exchanged with
//! callers. Internal solver structures live in `shop` and `bnb`.
//!
//! # Domain Mappings
//!
//! | u-jobshop | Bakery | Machining | Laboratory |
//! |-----------|--------|-----------|------------|
//! | Job | Recipe batch | Work order | Sample run |
//! | TaskRecord | Mix / proof / bake | Operation | Assay step |
//! | Tool | Oven / proofer | Machine | Instrument |
//! | SolveResult | Production timeline | Shop schedule | Bench plan |

pub mod generator;
mod schedule;
mod task;

pub use schedule::{SolveResult, SolveStatus, TimelineEntry, Violation, ViolationType};
pub use task::TaskRecord;
