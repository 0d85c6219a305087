/// Integration tests for the character frequency analyzer
///
/// These tests build small corpora on disk and verify the whole pipeline, from
/// file discovery to the ranked reports.

use std::fs;
use std::path::Path;

use charfreq::app::run_analysis;
use charfreq::config::{load_config, Config};
use charfreq::core::extractor::{END_MARKER, START_MARKER};
use charfreq::{analyze_corpus, Bucket, RankedReport};

fn write_book(dir: &Path, name: &str, body: &str) {
    let content = format!(
        "The Project Gutenberg EBook\n\n{} SOME TITLE ***\n{}\n{} SOME TITLE ***\nLicence\n",
        START_MARKER, body, END_MARKER
    );
    fs::write(dir.join(name), content).expect("Failed to write book");
}

fn report_for<'a>(reports: &'a [RankedReport], bucket: &Bucket) -> &'a RankedReport {
    reports
        .iter()
        .find(|r| &r.bucket == bucket)
        .unwrap_or_else(|| panic!("No report for {}", bucket))
}

fn count_of(report: &RankedReport, c: char) -> u64 {
    report
        .entries
        .iter()
        .find(|e| e.character == c)
        .map(|e| e.count)
        .unwrap_or(0)
}

#[test]
fn test_two_language_corpus() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_book(temp_dir.path(), "en_book1.txt", "Café");
    write_book(temp_dir.path(), "es_book1.txt", "Ñandú");

    let reports = analyze_corpus(temp_dir.path(), 10).expect("Failed to analyze corpus");
    assert_eq!(reports.len(), 3);

    let en = report_for(&reports, &Bucket::Language("en".into()));
    assert_eq!(en.pairs(), vec![('a', 1), ('c', 1), ('e', 1), ('f', 1)]);

    let es = report_for(&reports, &Bucket::Language("es".into()));
    assert_eq!(es.pairs(), vec![('n', 2), ('a', 1), ('d', 1), ('u', 1)]);

    let global = report_for(&reports, &Bucket::Global);
    assert_eq!(count_of(global, 'n'), 2);
    assert_eq!(count_of(global, 'a'), 2);
    assert_eq!(global.pairs()[..2], [('a', 2), ('n', 2)]);
}

#[test]
fn test_bad_documents_are_skipped() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_book(temp_dir.path(), "de_gut.txt", "Über");
    fs::write(temp_dir.path().join("de_raw.txt"), "no markers at all").unwrap();
    fs::write(temp_dir.path().join("fr_latin1.txt"), [0x63, 0x61, 0x66, 0xe9]).unwrap();

    let outcome = run_analysis(temp_dir.path(), &Config::default(), None)
        .expect("A bad document must not abort the pass");

    assert_eq!(outcome.stats.counted, 1);
    assert_eq!(outcome.stats.no_body, 1);
    assert_eq!(outcome.stats.failed, 1);
    assert_eq!(outcome.languages, 1);
    assert_eq!(outcome.total_characters, 4);

    let de = report_for(&outcome.reports, &Bucket::Language("de".into()));
    assert_eq!(de.pairs(), vec![('b', 1), ('e', 1), ('r', 1), ('u', 1)]);
}

#[test]
fn test_empty_corpus_gives_empty_reports() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let outcome = run_analysis(temp_dir.path(), &Config::default(), None).unwrap();
    assert_eq!(outcome.stats.total(), 0);
    assert_eq!(outcome.reports.len(), 1);
    assert!(outcome.reports[0].is_empty());
}

#[test]
fn test_missing_corpus_is_an_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(analyze_corpus(temp_dir.path().join("missing"), 10).is_err());
}

#[test]
fn test_parallel_run_matches_sequential() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    for i in 0..12 {
        let language = ["en", "es", "fr"][i % 3];
        let body = format!("Línea número {} — ¡qué día más bonito! {}", i, "ä".repeat(i));
        write_book(temp_dir.path(), &format!("{}_{}.txt", language, i), &body);
    }

    let sequential = run_analysis(temp_dir.path(), &Config::default(), None).unwrap();
    let parallel_config = Config {
        workers: 4,
        ..Config::default()
    };
    let parallel = run_analysis(temp_dir.path(), &parallel_config, None).unwrap();

    assert_eq!(sequential.reports, parallel.reports);
    assert_eq!(sequential.stats, parallel.stats);
    assert_eq!(sequential.total_characters, parallel.total_characters);
}

#[test]
fn test_largest_only_and_top_n() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_book(temp_dir.path(), "en_short.txt", "zzz");
    write_book(temp_dir.path(), "en_long.txt", "abcdefghijklmnopqrstuvwxy");

    let config = Config {
        top_n: 3,
        largest_only: true,
        ..Config::default()
    };
    let outcome = run_analysis(temp_dir.path(), &config, None).unwrap();

    assert_eq!(outcome.stats.counted, 1);
    let en = report_for(&outcome.reports, &Bucket::Language("en".into()));
    assert_eq!(en.pairs(), vec![('a', 1), ('b', 1), ('c', 1)]);
    assert_eq!(count_of(en, 'z'), 0);
}

#[test]
fn test_load_config() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.json");

    fs::write(&path, r#"{ "top_n": 5, "workers": 0 }"#).unwrap();
    let config = load_config(&path);
    assert_eq!(config.top_n, 5);
    assert_eq!(config.workers, 0);
    assert_eq!(config.extension, "txt");
    assert!(!config.largest_only);

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_config(&path), Config::default());
    assert_eq!(load_config(&temp_dir.path().join("missing.json")), Config::default());
}
