//! Service clients for the Hokusai storyboard engine.
//!
//! The analysis and image-generation services are external collaborators;
//! this crate provides the [`StoryAnalyzer`] and [`ImageGenerator`] seams
//! plus their HTTP implementations.

mod analyzer;
mod generator;

pub use analyzer::{HttpAnalysisClient, StoryAnalyzer};
pub use generator::{HttpImageClient, ImageGenerator};
