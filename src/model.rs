//! Loading probability model files.
//!
//! A model file is plain text with three sections, each headed by its entry
//! count:
//!
//! ```text
//! <S>                                     syndrome count
//! <syndrome_name>,<prior_prob>            S lines
//! <U>                                     nonzero unigram entry count
//! <syndrome_name>,<word>,<prob>           U lines
//! <B>                                     nonzero bigram entry count
//! <syndrome_name>,<word1>,<word2>,<prob>  B lines
//! ```
//!
//! Loading is all-or-nothing: any malformed section aborts with a model
//! error and no partial model is produced. Cells never mentioned in the file
//! stay absent, so the scorer can tell "never observed" from an entry that
//! was written as 0.0.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{CocoError, Result};
use crate::vocabulary::Vocabulary;

/// A loaded probability model.
///
/// Constructed once by the loader and immutable afterwards; scoring borrows
/// it and never mutates it, so independent callers may share a reference.
#[derive(Debug, Clone)]
pub struct Model {
    syndromes: Vocabulary<String>,
    words: Vocabulary<String>,
    wordpairs: Vocabulary<(String, String)>,
    prior: Vec<f64>,
    prob_1_tuple: Vec<AHashMap<u32, f64>>,
    prob_2_tuple: Vec<AHashMap<u32, f64>>,
}

impl Model {
    /// Load a probability model file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| CocoError::model(format!("can not read file {}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a probability model from a reader.
    ///
    /// Ids for syndromes, words, and word pairs are assigned in order of
    /// first occurrence in the file.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_number = 0usize;

        // Syndrome priors.
        let syndrome_count = parse_count(&next_line(&mut lines, &mut line_number)?, line_number)?;
        let mut syndromes = Vocabulary::new();
        let mut prior = Vec::with_capacity(syndrome_count);
        for _ in 0..syndrome_count {
            let line = next_line(&mut lines, &mut line_number)?;
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 2 {
                return Err(malformed("prior entry", line_number));
            }
            let sid = syndromes.intern(&fields[0].to_string());
            if sid as usize != prior.len() {
                return Err(CocoError::model(format!(
                    "duplicate syndrome \"{}\" at line {line_number}",
                    fields[0]
                )));
            }
            prior.push(parse_prob(fields[1], line_number)?);
        }

        // Unigram entries.
        let unigram_count = parse_count(&next_line(&mut lines, &mut line_number)?, line_number)?;
        let mut words = Vocabulary::new();
        let mut prob_1_tuple = vec![AHashMap::new(); syndrome_count];
        for _ in 0..unigram_count {
            let line = next_line(&mut lines, &mut line_number)?;
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 3 {
                return Err(malformed("unigram entry", line_number));
            }
            let sid = resolve_syndrome(&syndromes, fields[0], line_number)?;
            let wid = words.intern(&fields[1].to_string());
            prob_1_tuple[sid].insert(wid, parse_prob(fields[2], line_number)?);
        }

        // Bigram entries.
        let bigram_count = parse_count(&next_line(&mut lines, &mut line_number)?, line_number)?;
        let mut wordpairs = Vocabulary::new();
        let mut prob_2_tuple = vec![AHashMap::new(); syndrome_count];
        for _ in 0..bigram_count {
            let line = next_line(&mut lines, &mut line_number)?;
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 4 {
                return Err(malformed("bigram entry", line_number));
            }
            let sid = resolve_syndrome(&syndromes, fields[0], line_number)?;
            let pid = wordpairs.intern(&(fields[1].to_string(), fields[2].to_string()));
            prob_2_tuple[sid].insert(pid, parse_prob(fields[3], line_number)?);
        }

        // Anything after the declared sections means the counts were wrong.
        for line in lines {
            line_number += 1;
            if !line?.trim().is_empty() {
                return Err(CocoError::model(format!(
                    "trailing data at line {line_number}"
                )));
            }
        }

        Ok(Model {
            syndromes,
            words,
            wordpairs,
            prior,
            prob_1_tuple,
            prob_2_tuple,
        })
    }

    /// Number of syndromes in the model.
    pub fn syndrome_count(&self) -> usize {
        self.syndromes.len()
    }

    /// Syndrome names in id order.
    pub fn syndrome_names(&self) -> &[String] {
        self.syndromes.keys()
    }

    /// Id of a syndrome name, if present.
    pub fn syndrome_id(&self, name: &str) -> Option<u32> {
        self.syndromes.id(name)
    }

    /// Prior probability for a syndrome id.
    pub fn prior(&self, syndrome: u32) -> f64 {
        self.prior.get(syndrome as usize).copied().unwrap_or(0.0)
    }

    /// Unigram probability for (syndrome, word).
    ///
    /// `None` means the word is out of vocabulary or the cell was never
    /// observed; `Some(0.0)` is a legitimate observed-zero entry.
    pub fn unigram_prob(&self, syndrome: u32, word: &str) -> Option<f64> {
        let wid = self.words.id(word)?;
        self.prob_1_tuple.get(syndrome as usize)?.get(&wid).copied()
    }

    /// Bigram probability for (syndrome, ordered word pair).
    pub fn bigram_prob(&self, syndrome: u32, pair: &(String, String)) -> Option<f64> {
        let pid = self.wordpairs.id(pair)?;
        self.prob_2_tuple.get(syndrome as usize)?.get(&pid).copied()
    }
}

fn next_line<L>(lines: &mut L, line_number: &mut usize) -> Result<String>
where
    L: Iterator<Item = io::Result<String>>,
{
    *line_number += 1;
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(CocoError::model(format!(
            "unexpected end of file at line {line_number}"
        ))),
    }
}

fn parse_count(text: &str, line_number: usize) -> Result<usize> {
    text.trim().parse().map_err(|_| {
        CocoError::model(format!(
            "invalid entry count {text:?} at line {line_number}"
        ))
    })
}

fn parse_prob(text: &str, line_number: usize) -> Result<f64> {
    text.parse().map_err(|_| {
        CocoError::model(format!(
            "invalid probability {text:?} at line {line_number}"
        ))
    })
}

fn resolve_syndrome(
    syndromes: &Vocabulary<String>,
    name: &str,
    line_number: usize,
) -> Result<usize> {
    syndromes
        .id(name)
        .map(|sid| sid as usize)
        .ok_or_else(|| CocoError::model(format!("unknown syndrome {name:?} at line {line_number}")))
}

fn malformed(what: &str, line_number: usize) -> CocoError {
    CocoError::model(format!("malformed {what} at line {line_number}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MODEL: &str = "2\n\
                         Respiratory,0.5\n\
                         Constitutional,0.5\n\
                         3\n\
                         Respiratory,diff,0.5\n\
                         Respiratory,breathing,0.5\n\
                         Constitutional,fever,1\n\
                         1\n\
                         Respiratory,diff,breathing,1\n";

    fn load(text: &str) -> Result<Model> {
        Model::from_reader(Cursor::new(text))
    }

    #[test]
    fn test_load_valid_model() {
        let model = load(MODEL).unwrap();
        assert_eq!(model.syndrome_count(), 2);
        assert_eq!(model.syndrome_names(), &["Respiratory", "Constitutional"]);
        assert_eq!(model.syndrome_id("Constitutional"), Some(1));
        assert_eq!(model.prior(0), 0.5);
        assert_eq!(model.unigram_prob(0, "diff"), Some(0.5));
        assert_eq!(model.unigram_prob(1, "fever"), Some(1.0));
        assert_eq!(
            model.bigram_prob(0, &("diff".to_string(), "breathing".to_string())),
            Some(1.0)
        );
    }

    #[test]
    fn test_missing_vs_observed_zero() {
        let text = "1\nRespiratory,1\n2\nRespiratory,cough,0.0\nRespiratory,sob,0.25\n0\n";
        let model = load(text).unwrap();
        // Written as 0.0: observed-zero, a real entry.
        assert_eq!(model.unigram_prob(0, "cough"), Some(0.0));
        // In vocabulary but never paired with this syndrome: absent.
        let other = "2\nA,0.5\nB,0.5\n1\nA,cough,1\n0\n";
        let model = load(other).unwrap();
        assert_eq!(model.unigram_prob(0, "cough"), Some(1.0));
        assert_eq!(model.unigram_prob(1, "cough"), None);
        // Out of vocabulary entirely: absent.
        assert_eq!(model.unigram_prob(0, "wheeze"), None);
    }

    #[test]
    fn test_pair_words_need_not_be_in_unigram_section() {
        let text = "1\nBotulinic,1\n0\n1\nBotulinic,blurred,vision,1\n";
        let model = load(text).unwrap();
        assert_eq!(model.unigram_prob(0, "blurred"), None);
        assert_eq!(
            model.bigram_prob(0, &("blurred".to_string(), "vision".to_string())),
            Some(1.0)
        );
    }

    #[test]
    fn test_bad_count_rejected() {
        assert!(load("two\nA,1\n0\n0\n").is_err());
        assert!(load("1\nA,1\nx\n0\n").is_err());
    }

    #[test]
    fn test_non_numeric_probability_rejected() {
        assert!(load("1\nA,abc\n0\n0\n").is_err());
        assert!(load("1\nA,1\n1\nA,fever,oops\n0\n").is_err());
    }

    #[test]
    fn test_dangling_syndrome_rejected() {
        let err = load("1\nA,1\n1\nB,fever,0.5\n0\n").unwrap_err();
        assert!(err.to_string().contains("unknown syndrome"));
    }

    #[test]
    fn test_truncated_file_rejected() {
        assert!(load("2\nA,0.5\n").is_err());
        assert!(load("1\nA,1\n2\nA,fever,0.5\n").is_err());
        assert!(load("1\nA,1\n0\n").is_err()); // missing bigram section
    }

    #[test]
    fn test_overlong_section_rejected() {
        // Declared one unigram entry but two are present; the second becomes
        // the bigram count line and fails to parse.
        let err = load("1\nA,1\n1\nA,fever,0.5\nA,chills,0.5\n0\n").unwrap_err();
        assert!(err.to_string().contains("invalid entry count"));
    }

    #[test]
    fn test_trailing_data_rejected() {
        let err = load("1\nA,1\n0\n0\nextra,stuff\n").unwrap_err();
        assert!(err.to_string().contains("trailing data"));
    }

    #[test]
    fn test_wrong_field_count_rejected() {
        assert!(load("1\nA\n0\n0\n").is_err());
        assert!(load("1\nA,1\n1\nA,fever\n0\n").is_err());
        assert!(load("1\nA,1\n0\n1\nA,diff,breathing\n").is_err());
    }

    #[test]
    fn test_duplicate_syndrome_rejected() {
        let err = load("2\nA,0.5\nA,0.5\n0\n0\n").unwrap_err();
        assert!(err.to_string().contains("duplicate syndrome"));
    }

    #[test]
    fn test_missing_model_file_reports_path() {
        let err = Model::load("/no/such/probs.txt").unwrap_err();
        assert!(err.to_string().contains("/no/such/probs.txt"));
    }
}
