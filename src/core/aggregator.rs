/// Frequency aggregation
///
/// Keeps one character tally per language bucket plus a global tally, and
/// projects any of them into a ranked top-N report.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Serialize, Serializer};

/// Number of entries in a report unless configured otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// Identifies a tally: the global total or a single language
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Sum over every language bucket
    Global,
    /// One language, keyed by the filename prefix
    Language(String),
}

impl Bucket {
    /// Short label used in rendered output ("ALL" for the global bucket)
    pub fn label(&self) -> String {
        match self {
            Bucket::Global => "ALL".to_string(),
            Bucket::Language(code) => code.to_uppercase(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Global => write!(f, "global"),
            Bucket::Language(code) => write!(f, "{}", code),
        }
    }
}

/// Serialized as its display form: "global" or the language code
impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Mapping from a normalized character to the number of times it was seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<char, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every character of `text`
    pub fn add_text(&mut self, text: &str) {
        for c in text.chars() {
            self.add(c, 1);
        }
    }

    /// Increase the count of `c` by `count`
    pub fn add(&mut self, c: char, count: u64) {
        *self.counts.entry(c).or_insert(0) += count;
    }

    /// Add every count of `other` into this table
    pub fn absorb(&mut self, other: &FrequencyTable) {
        for (&c, &count) in &other.counts {
            self.add(c, count);
        }
    }

    /// Count for `c`, zero if never seen
    pub fn count(&self, c: char) -> u64 {
        self.counts.get(&c).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct characters
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&c, &count)| (c, count))
    }

    /// The `top_n` most frequent characters.
    ///
    /// Sorted by count descending; equal counts are ordered by code point
    /// ascending so the result never depends on hash iteration order.
    pub fn top(&self, top_n: usize) -> Vec<(char, u64)> {
        let mut entries: Vec<(char, u64)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(top_n);
        entries
    }
}

/// One ranked entry of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub character: char,
    pub count: u64,
}

/// Ordered top-N projection of one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedReport {
    pub bucket: Bucket,
    pub entries: Vec<RankedEntry>,
}

impl RankedReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries as plain `(character, count)` pairs
    pub fn pairs(&self) -> Vec<(char, u64)> {
        self.entries.iter().map(|e| (e.character, e.count)).collect()
    }
}

/// Per-language and global character tallies for one aggregation run
#[derive(Debug, Clone, Default)]
pub struct FrequencyAggregator {
    languages: BTreeMap<String, FrequencyTable>,
    global: FrequencyTable,
}

impl FrequencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold normalized text into a language bucket and the global tally.
    ///
    /// The bucket is created if it does not exist yet, even when `text` is
    /// empty.
    pub fn update(&mut self, language: &str, text: &str) {
        let table = self.languages.entry(language.to_string()).or_default();
        for c in text.chars() {
            table.add(c, 1);
            self.global.add(c, 1);
        }
    }

    /// Fold another aggregator into this one
    pub fn merge(&mut self, other: FrequencyAggregator) {
        for (language, table) in other.languages {
            match self.languages.get_mut(&language) {
                Some(existing) => existing.absorb(&table),
                None => {
                    self.languages.insert(language, table);
                }
            }
        }
        self.global.absorb(&other.global);
    }

    /// Table backing `bucket`, if any
    pub fn table(&self, bucket: &Bucket) -> Option<&FrequencyTable> {
        match bucket {
            Bucket::Global => Some(&self.global),
            Bucket::Language(code) => self.languages.get(code),
        }
    }

    /// Ranked top-N report for `bucket`.
    ///
    /// Unknown and empty buckets give an empty report.
    pub fn rank(&self, bucket: &Bucket, top_n: usize) -> RankedReport {
        let entries = self
            .table(bucket)
            .map(|table| table.top(top_n))
            .unwrap_or_default()
            .into_iter()
            .map(|(character, count)| RankedEntry { character, count })
            .collect();

        RankedReport {
            bucket: bucket.clone(),
            entries,
        }
    }

    /// Global report followed by one report per language in key order
    pub fn reports(&self, top_n: usize) -> Vec<RankedReport> {
        std::iter::once(Bucket::Global)
            .chain(self.languages.keys().cloned().map(Bucket::Language))
            .map(|bucket| self.rank(&bucket, top_n))
            .collect()
    }

    /// Language codes seen so far, in ascending order
    pub fn languages(&self) -> impl Iterator<Item = &str> + '_ {
        self.languages.keys().map(String::as_str)
    }

    /// Global table recomputed from the language buckets
    pub fn summed_global(&self) -> FrequencyTable {
        let mut sum = FrequencyTable::new();
        for table in self.languages.values() {
            sum.absorb(table);
        }
        sum
    }

    /// Whether no character has been counted in any bucket
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }
}
