pub mod aggregate;
pub mod duration;
pub mod enrich;
pub mod fallback;
pub mod lyrics;
pub mod normalize;
pub mod pipeline;
pub mod recommend;
pub mod report;
pub mod sentiment;
pub mod workers;

pub use pipeline::{AnalysisSettings, Analyzer, Collaborators};
pub use sentiment::LexiconScorer;
