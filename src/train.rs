//! Training: vocabulary building, count aggregation, and probability
//! estimation.
//!
//! A training corpus is plain text with one example per line:
//!
//! ```text
//! <complaint text>,<syndrome1>[,<syndrome2>,...]
//! ```
//!
//! Complaint text contains no commas and its words are whitespace-separated.
//! A line may carry several syndrome labels; each label counts as an
//! independent occurrence of the same tokens. Vocabulary and counts exist
//! only for the duration of a training run and are discarded once the
//! probability model file has been written.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenize;
use crate::error::{CocoError, Result};
use crate::vocabulary::Vocabulary;

/// A corpus line skipped during training, with the reason.
///
/// Skipped lines are recoverable: training continues without them. The CLI
/// reports them as warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the corpus file.
    pub line_number: usize,
    /// Human-readable reason the line was skipped.
    pub reason: String,
}

/// Summary of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainStats {
    /// Total (syndrome, example) pairings counted.
    pub examples: u64,
    /// Distinct syndromes discovered.
    pub syndromes: usize,
    /// Distinct words discovered.
    pub words: usize,
    /// Distinct ordered adjacent word pairs discovered.
    pub wordpairs: usize,
    /// Lines skipped with their reasons.
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Default)]
struct SyndromeCounts {
    examples: u64,
    unigrams: AHashMap<u32, u64>,
    bigrams: AHashMap<u32, u64>,
    unigram_total: u64,
    bigram_total: u64,
}

/// Per-syndrome occurrence counts accumulated over a training corpus.
///
/// Assigns first-seen ids to complaint strings, syndromes, words, and word
/// pairs, and tallies unigram/bigram/example counts per syndrome.
#[derive(Debug, Clone, Default)]
pub struct CorpusCounts {
    syndromes: Vocabulary<String>,
    words: Vocabulary<String>,
    wordpairs: Vocabulary<(String, String)>,
    complaints: Vocabulary<String>,
    counts: Vec<SyndromeCounts>,
    total_examples: u64,
    skipped: Vec<SkippedLine>,
}

impl CorpusCounts {
    /// Create an empty count aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate counts from every line of a corpus reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut counts = CorpusCounts::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            counts.add_line(index + 1, &line);
        }
        Ok(counts)
    }

    /// Feed one corpus line into the aggregator.
    ///
    /// Blank lines and lines without a syndrome column are recorded as
    /// skipped and otherwise ignored.
    pub fn add_line(&mut self, line_number: usize, line: &str) {
        // Empty fields collapse, mirroring the whitespace-splitting rule.
        let fields: Vec<&str> = line.split(',').filter(|f| !f.is_empty()).collect();

        if fields.is_empty() {
            self.skipped.push(SkippedLine {
                line_number,
                reason: "blank line".to_string(),
            });
            return;
        }
        if fields.len() == 1 {
            self.skipped.push(SkippedLine {
                line_number,
                reason: format!("no syndromes indicated for \"{}\"", fields[0]),
            });
            return;
        }

        let text = fields[0];
        let tokens = tokenize(text);
        self.complaints.intern(&text.to_string());

        let word_ids: Vec<u32> = tokens.iter().map(|t| self.words.intern(t)).collect();
        let pair_ids: Vec<u32> = tokens
            .windows(2)
            .map(|w| self.wordpairs.intern(&(w[0].clone(), w[1].clone())))
            .collect();

        for label in &fields[1..] {
            let sid = self.syndromes.intern(&label.to_string()) as usize;
            if self.counts.len() <= sid {
                self.counts.resize_with(sid + 1, SyndromeCounts::default);
            }

            let counts = &mut self.counts[sid];
            counts.examples += 1;
            self.total_examples += 1;

            for &wid in &word_ids {
                *counts.unigrams.entry(wid).or_insert(0) += 1;
                counts.unigram_total += 1;
            }
            for &pid in &pair_ids {
                *counts.bigrams.entry(pid).or_insert(0) += 1;
                counts.bigram_total += 1;
            }
        }
    }

    /// Total (syndrome, example) pairings counted so far.
    pub fn total_examples(&self) -> u64 {
        self.total_examples
    }

    /// Example count for one syndrome.
    pub fn example_count(&self, syndrome: &str) -> u64 {
        self.with_syndrome(syndrome, |c| c.examples)
    }

    /// Occurrences of `word` within examples labeled `syndrome`.
    pub fn unigram_count(&self, syndrome: &str, word: &str) -> u64 {
        self.with_syndrome(syndrome, |c| {
            self.words
                .id(word)
                .and_then(|wid| c.unigrams.get(&wid).copied())
                .unwrap_or(0)
        })
    }

    /// Occurrences of the ordered pair within examples labeled `syndrome`.
    pub fn bigram_count(&self, syndrome: &str, first: &str, second: &str) -> u64 {
        self.with_syndrome(syndrome, |c| {
            self.wordpairs
                .id(&(first.to_string(), second.to_string()))
                .and_then(|pid| c.bigrams.get(&pid).copied())
                .unwrap_or(0)
        })
    }

    /// Total word tokens counted for one syndrome.
    pub fn unigram_total(&self, syndrome: &str) -> u64 {
        self.with_syndrome(syndrome, |c| c.unigram_total)
    }

    /// Total word-pair tokens counted for one syndrome.
    pub fn bigram_total(&self, syndrome: &str) -> u64 {
        self.with_syndrome(syndrome, |c| c.bigram_total)
    }

    /// Distinct complaint strings seen so far.
    pub fn distinct_complaints(&self) -> usize {
        self.complaints.len()
    }

    /// Lines skipped so far.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Summarize the aggregation for reporting.
    pub fn stats(&self) -> TrainStats {
        TrainStats {
            examples: self.total_examples,
            syndromes: self.syndromes.len(),
            words: self.words.len(),
            wordpairs: self.wordpairs.len(),
            skipped: self.skipped.clone(),
        }
    }

    fn with_syndrome<T: Default>(&self, syndrome: &str, f: impl FnOnce(&SyndromeCounts) -> T) -> T {
        self.syndromes
            .id(syndrome)
            .and_then(|sid| self.counts.get(sid as usize))
            .map(f)
            .unwrap_or_default()
    }
}

/// Prior, unigram, and bigram probability tables estimated from counts.
#[derive(Debug, Clone)]
pub struct ProbabilityTables {
    syndromes: Vocabulary<String>,
    words: Vocabulary<String>,
    wordpairs: Vocabulary<(String, String)>,
    prior: Vec<f64>,
    prob_1_tuple: Vec<AHashMap<u32, f64>>,
    prob_2_tuple: Vec<AHashMap<u32, f64>>,
}

impl ProbabilityTables {
    /// Estimate probabilities from accumulated counts.
    ///
    /// Priors are maximum-likelihood example frequencies. Unigram entries
    /// are `count / syndrome unigram total`. Bigram entries are
    /// `count / unigram count of the pair's first word within the syndrome`,
    /// i.e. P(second word | first word, syndrome), not a joint frequency.
    /// Zero-count cells produce no entry at all.
    pub fn estimate(counts: CorpusCounts) -> Result<Self> {
        if counts.total_examples == 0 {
            return Err(CocoError::corpus("no usable training examples"));
        }

        let n = counts.syndromes.len();
        let mut per_syndrome = counts.counts;
        per_syndrome.resize_with(n, SyndromeCounts::default);

        let mut prior = Vec::with_capacity(n);
        let mut prob_1_tuple = Vec::with_capacity(n);
        let mut prob_2_tuple = Vec::with_capacity(n);

        for sc in &per_syndrome {
            prior.push(sc.examples as f64 / counts.total_examples as f64);

            let mut p1 = AHashMap::with_capacity(sc.unigrams.len());
            for (&wid, &count) in &sc.unigrams {
                p1.insert(wid, count as f64 / sc.unigram_total as f64);
            }

            let mut p2 = AHashMap::with_capacity(sc.bigrams.len());
            for (&pid, &count) in &sc.bigrams {
                let pair = counts
                    .wordpairs
                    .key(pid)
                    .ok_or_else(|| CocoError::other("word pair id out of range"))?;
                let first_wid = counts
                    .words
                    .id(pair.0.as_str())
                    .ok_or_else(|| CocoError::other("word pair references unknown word"))?;
                let denominator = sc
                    .unigrams
                    .get(&first_wid)
                    .copied()
                    .ok_or_else(|| CocoError::other("inconsistent unigram counts"))?;
                p2.insert(pid, count as f64 / denominator as f64);
            }

            prob_1_tuple.push(p1);
            prob_2_tuple.push(p2);
        }

        Ok(ProbabilityTables {
            syndromes: counts.syndromes,
            words: counts.words,
            wordpairs: counts.wordpairs,
            prior,
            prob_1_tuple,
            prob_2_tuple,
        })
    }

    /// Syndrome names in id order.
    pub fn syndrome_names(&self) -> &[String] {
        self.syndromes.keys()
    }

    /// Prior probability for a syndrome.
    pub fn prior(&self, syndrome: &str) -> Option<f64> {
        let sid = self.syndromes.id(syndrome)?;
        self.prior.get(sid as usize).copied()
    }

    /// Unigram probability for (syndrome, word), if a nonzero count existed.
    pub fn unigram(&self, syndrome: &str, word: &str) -> Option<f64> {
        let sid = self.syndromes.id(syndrome)?;
        let wid = self.words.id(word)?;
        self.prob_1_tuple[sid as usize].get(&wid).copied()
    }

    /// Bigram probability for (syndrome, pair), if a nonzero count existed.
    pub fn bigram(&self, syndrome: &str, first: &str, second: &str) -> Option<f64> {
        let sid = self.syndromes.id(syndrome)?;
        let pid = self.wordpairs.id(&(first.to_string(), second.to_string()))?;
        self.prob_2_tuple[sid as usize].get(&pid).copied()
    }

    /// Serialize the tables in the flat probability-file format.
    ///
    /// Three sections, each headed by its entry count: syndrome priors,
    /// nonzero unigram entries, nonzero bigram entries. Entries are ordered
    /// by syndrome id, then word/pair id.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.syndromes.len())?;
        for (sid, name) in self.syndromes.keys().iter().enumerate() {
            writeln!(writer, "{},{}", name, self.prior[sid])?;
        }

        let unigram_entries: usize = self.prob_1_tuple.iter().map(|m| m.len()).sum();
        writeln!(writer, "{unigram_entries}")?;
        for (sid, name) in self.syndromes.keys().iter().enumerate() {
            for (wid, word) in self.words.keys().iter().enumerate() {
                if let Some(p) = self.prob_1_tuple[sid].get(&(wid as u32)) {
                    writeln!(writer, "{name},{word},{p}")?;
                }
            }
        }

        let bigram_entries: usize = self.prob_2_tuple.iter().map(|m| m.len()).sum();
        writeln!(writer, "{bigram_entries}")?;
        for (sid, name) in self.syndromes.keys().iter().enumerate() {
            for (pid, (first, second)) in self.wordpairs.keys().iter().enumerate() {
                if let Some(p) = self.prob_2_tuple[sid].get(&(pid as u32)) {
                    writeln!(writer, "{name},{first},{second},{p}")?;
                }
            }
        }

        Ok(())
    }

    /// Write the probability model file.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| CocoError::model(format!("can not write file {}: {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Train a classifier from a labeled corpus and write the probability model.
///
/// The corpus must be readable and contain at least one usable example.
/// Returns statistics about the run, including any skipped lines.
pub fn train<P: AsRef<Path>, Q: AsRef<Path>>(corpus_path: P, model_path: Q) -> Result<TrainStats> {
    let corpus_path = corpus_path.as_ref();
    let file = File::open(corpus_path).map_err(|e| {
        CocoError::corpus(format!("can not read file {}: {e}", corpus_path.display()))
    })?;

    let counts = CorpusCounts::from_reader(BufReader::new(file))?;
    let stats = counts.stats();
    let tables = ProbabilityTables::estimate(counts)?;
    tables.write_file(model_path)?;

    Ok(stats)
}
