pub mod evaluate;
pub mod label;
pub mod summarize;

pub use evaluate::execute_ratings;
pub use label::{execute_labeling, LabelingOutcome};
pub use summarize::execute_summary;
