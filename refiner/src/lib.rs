pub mod parse;
pub mod pipeline;

pub use parse::extract_candidates;
pub use pipeline::{RefineRequest, SynonymRefiner};
