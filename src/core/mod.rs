/// Core module for character frequency analysis
///
/// This module contains the text pipeline: body extraction, normalization,
/// frequency aggregation and the analyzer that drives a corpus through them.

pub mod aggregator;
pub mod analyzer;
pub mod extractor;
pub mod normalizer;
