//! Readability, complexity and theme analysis over parsed stories.

pub mod complexity;
pub mod themes;

pub use complexity::{
    ComplexityAnalyzer, ComplexityMetrics, analyze_complexity, recommend_age_range,
};
pub use themes::{MAX_THEMES, Theme, detect_themes};
