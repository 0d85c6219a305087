/// Corpus analyzer
///
/// This file contains the CorpusAnalyzer which runs every document of a corpus
/// through extraction and normalization and folds the result into a
/// FrequencyAggregator.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::core::aggregator::FrequencyAggregator;
use crate::core::extractor::extract_body;
use crate::core::normalizer::normalize;
use crate::utils::file_utils::{with_document, CorpusDocument, DocumentError};

/// What happened to a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Body found and counted
    Counted,
    /// Read fine but the boilerplate markers were missing
    NoBody,
    /// Could not be read
    Failed,
}

/// Counters describing an analysis pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub counted: usize,
    pub no_body: usize,
    pub failed: usize,
}

impl AnalysisStats {
    fn record(&mut self, status: DocumentStatus) {
        match status {
            DocumentStatus::Counted => self.counted += 1,
            DocumentStatus::NoBody => self.no_body += 1,
            DocumentStatus::Failed => self.failed += 1,
        }
    }

    fn combine(mut self, other: AnalysisStats) -> Self {
        self.counted += other.counted;
        self.no_body += other.no_body;
        self.failed += other.failed;
        self
    }

    /// Documents that contributed nothing
    pub fn skipped(&self) -> usize {
        self.no_body + self.failed
    }

    pub fn total(&self) -> usize {
        self.counted + self.skipped()
    }
}

/// Result of an analysis pass
#[derive(Debug, Clone, Default)]
pub struct CorpusAnalysis {
    pub aggregator: FrequencyAggregator,
    pub stats: AnalysisStats,
}

/// Extract and normalize the body of a document's content.
///
/// Returns `None` when the content has no body between the markers.
pub fn normalized_body(content: &str) -> Option<String> {
    extract_body(content).map(|body| normalize(&body))
}

/// Read a document and return its normalized body
pub fn process_document(path: &Path) -> Result<Option<String>, DocumentError> {
    with_document(path, normalized_body)
}

/// Drives documents through the extraction and counting pipeline
pub struct CorpusAnalyzer {
    /// Worker threads; 0 uses every core, 1 runs on the calling thread
    workers: usize,

    /// Optional progress reporting, one tick per document
    progress: Option<ProgressBar>,
}

impl CorpusAnalyzer {
    /// Create a new CorpusAnalyzer
    ///
    /// # Arguments
    ///
    /// * `workers` - Number of worker threads (0 = available parallelism)
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            progress: None,
        }
    }

    /// Tick `progress` once for every processed document
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn worker_count(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.workers
        }
    }

    /// Analyze every document.
    ///
    /// Documents that fail to read or lack a body are logged and skipped; they
    /// never abort the pass.
    ///
    /// # Arguments
    ///
    /// * `documents` - Documents to analyze
    ///
    /// # Returns
    ///
    /// The filled aggregator and per-status counters
    pub fn analyze(&self, documents: &[CorpusDocument]) -> Result<CorpusAnalysis> {
        let start_time = Instant::now();
        let workers = self.worker_count();
        info!("Analyzing {} documents with {} workers", documents.len(), workers);

        let analysis = if workers <= 1 {
            let mut analysis = CorpusAnalysis::default();
            for document in documents {
                let status = self.fold_document(&mut analysis.aggregator, document);
                analysis.stats.record(status);
            }
            analysis
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;

            // Each worker owns its aggregator; partial results are merged
            pool.install(|| {
                documents
                    .par_iter()
                    .fold(CorpusAnalysis::default, |mut analysis, document| {
                        let status = self.fold_document(&mut analysis.aggregator, document);
                        analysis.stats.record(status);
                        analysis
                    })
                    .reduce(CorpusAnalysis::default, |mut left, right| {
                        left.aggregator.merge(right.aggregator);
                        left.stats = left.stats.combine(right.stats);
                        left
                    })
            })
        };

        if let Some(progress) = &self.progress {
            progress.finish_with_message("Analysis complete");
        }

        info!(
            "Analysis completed in {:?}: {} counted, {} without body, {} failed",
            start_time.elapsed(),
            analysis.stats.counted,
            analysis.stats.no_body,
            analysis.stats.failed
        );

        Ok(analysis)
    }

    fn fold_document(
        &self,
        aggregator: &mut FrequencyAggregator,
        document: &CorpusDocument,
    ) -> DocumentStatus {
        let status = match process_document(&document.path) {
            Ok(Some(text)) => {
                debug!(
                    "Counted {} characters from {}",
                    text.chars().count(),
                    document.path.display()
                );
                aggregator.update(&document.language, &text);
                DocumentStatus::Counted
            }
            Ok(None) => {
                warn!("No body markers found in {}", document.path.display());
                DocumentStatus::NoBody
            }
            Err(e) => {
                error!("Error reading {}: {}", document.path.display(), e);
                DocumentStatus::Failed
            }
        };

        if let Some(progress) = &self.progress {
            progress.inc(1);
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::Bucket;
    use crate::core::extractor::{END_MARKER, START_MARKER};
    use std::fs;

    fn book(body: &str) -> String {
        format!(
            "Produced by volunteers\n{} X ***\n{}\n{} X ***\nEnd matter\n",
            START_MARKER, body, END_MARKER
        )
    }

    fn document(dir: &Path, name: &str, content: &[u8]) -> CorpusDocument {
        let path = dir.join(name);
        fs::write(&path, content).expect("Failed to write test file");
        CorpusDocument {
            language: name[..2].to_string(),
            size: content.len() as u64,
            path,
        }
    }

    #[test]
    fn test_normalized_body() {
        assert_eq!(
            normalized_body(&book("Café, s'il vous plaît!")).as_deref(),
            Some("cafesilvousplaît")
        );
        assert_eq!(normalized_body("no markers here"), None);
    }

    #[test]
    fn test_failures_do_not_abort() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let documents = vec![
            document(temp_dir.path(), "en_good.txt", book("abc").as_bytes()),
            document(temp_dir.path(), "en_plain.txt", b"no markers"),
            document(temp_dir.path(), "en_binary.txt", &[0xff, 0xfe, 0x00]),
            CorpusDocument {
                path: temp_dir.path().join("fr_gone.txt"),
                language: "fr".to_string(),
                size: 0,
            },
        ];

        let analysis = CorpusAnalyzer::new(1).analyze(&documents).unwrap();
        assert_eq!(
            analysis.stats,
            AnalysisStats {
                counted: 1,
                no_body: 1,
                failed: 2
            }
        );
        assert_eq!(analysis.stats.skipped(), 3);
        assert_eq!(
            analysis.aggregator.rank(&Bucket::Global, 10).pairs(),
            vec![('a', 1), ('b', 1), ('c', 1)]
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let bodies = [
            ("en_1.txt", "The quick brown fox"),
            ("en_2.txt", "jumps over the lazy dog"),
            ("es_1.txt", "El pingüino comió ñoquis"),
            ("de_1.txt", "Über den Wolken"),
            ("es_2.txt", "Árbol Ñoño"),
        ];
        let documents: Vec<_> = bodies
            .iter()
            .map(|(name, body)| document(temp_dir.path(), name, book(body).as_bytes()))
            .collect();

        let sequential = CorpusAnalyzer::new(1).analyze(&documents).unwrap();
        let parallel = CorpusAnalyzer::new(4).analyze(&documents).unwrap();

        assert_eq!(sequential.stats, parallel.stats);
        assert_eq!(sequential.aggregator.reports(50), parallel.aggregator.reports(50));
        assert_eq!(
            parallel.aggregator.summed_global(),
            *parallel.aggregator.table(&Bucket::Global).unwrap()
        );
    }

    #[test]
    fn test_empty_corpus() {
        let analysis = CorpusAnalyzer::new(0).analyze(&[]).unwrap();
        assert_eq!(analysis.stats.total(), 0);
        assert!(analysis.aggregator.reports(10).iter().all(|r| r.is_empty()));
    }
}
