/// Charfreq - character frequency analysis for multilingual e-book corpora
///
/// This library extracts the body of Project Gutenberg style plain-text books,
/// normalizes it and tallies character frequencies per language (taken from the
/// first two characters of each file name) and across the whole corpus.

pub mod core;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::aggregator::{Bucket, FrequencyAggregator, FrequencyTable, RankedReport};
pub use crate::core::analyzer::CorpusAnalyzer;
pub use crate::core::extractor::extract;
pub use crate::core::normalizer::normalize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a corpus directory and return its ranked reports
///
/// This is a convenience function for simple use cases: every `.txt` file is
/// analyzed on the calling thread.
///
/// # Arguments
///
/// * `corpus_dir` - Directory containing the books
/// * `top_n` - Number of entries per report
///
/// # Returns
///
/// The global report followed by one report per language
pub fn analyze_corpus<P: AsRef<std::path::Path>>(
    corpus_dir: P,
    top_n: usize,
) -> anyhow::Result<Vec<RankedReport>> {
    let config = config::Config {
        top_n,
        ..config::Config::default()
    };
    let outcome = app::run_analysis(corpus_dir.as_ref(), &config, None)?;
    Ok(outcome.reports)
}

/// Library configuration
pub mod config {
    use log::{error, info};
    use serde::Deserialize;
    use std::path::Path;

    use crate::core::aggregator::DEFAULT_TOP_N;

    /// Analysis settings, loadable from a JSON file
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    #[serde(default)]
    pub struct Config {
        /// Entries per report
        pub top_n: usize,
        /// Analyze only the largest file of each language
        pub largest_only: bool,
        /// Extension of corpus files, without the dot
        pub extension: String,
        /// Worker threads (0 = all cores, 1 = sequential)
        pub workers: usize,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                top_n: DEFAULT_TOP_N,
                largest_only: false,
                extension: "txt".to_string(),
                workers: 1,
            }
        }
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing or invalid file is logged and the defaults are used instead.
    pub fn load_config(path: &Path) -> Config {
        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return Config::default();
        }

        let config_str = match std::fs::read_to_string(path) {
            Ok(config_str) => config_str,
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                return Config::default();
            }
        };

        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                Config::default()
            }
        }
    }
}

/// Command-line application functionality
pub mod app {
    use anyhow::{Context, Result};
    use indicatif::ProgressBar;
    use log::info;
    use std::path::Path;

    use crate::config::Config;
    use crate::core::aggregator::{Bucket, RankedReport};
    use crate::core::analyzer::{AnalysisStats, CorpusAnalyzer};
    use crate::utils::file_utils::discover_documents;

    /// Everything a run produces
    #[derive(Debug, Clone)]
    pub struct AnalysisOutcome {
        /// Global report first, then languages in key order
        pub reports: Vec<RankedReport>,
        pub stats: AnalysisStats,
        /// Number of language buckets seen
        pub languages: usize,
        /// Characters counted across the corpus
        pub total_characters: u64,
    }

    /// Discover, analyze and rank a corpus
    ///
    /// # Arguments
    ///
    /// * `corpus_dir` - Directory containing the books
    /// * `config` - Analysis settings
    /// * `progress` - Optional progress bar; its length is set to the document count
    pub fn run_analysis(
        corpus_dir: &Path,
        config: &Config,
        progress: Option<ProgressBar>,
    ) -> Result<AnalysisOutcome> {
        let documents = discover_documents(corpus_dir, &config.extension, config.largest_only)
            .context("Failed to scan corpus")?;
        info!("Found {} documents in {}", documents.len(), corpus_dir.display());

        let mut analyzer = CorpusAnalyzer::new(config.workers);
        if let Some(progress) = progress {
            progress.set_length(documents.len() as u64);
            analyzer = analyzer.with_progress(progress);
        }

        let analysis = analyzer.analyze(&documents)?;
        let aggregator = &analysis.aggregator;

        Ok(AnalysisOutcome {
            reports: aggregator.reports(config.top_n),
            stats: analysis.stats,
            languages: aggregator.languages().count(),
            total_characters: aggregator
                .table(&Bucket::Global)
                .map(|table| table.total())
                .unwrap_or(0),
        })
    }
}
