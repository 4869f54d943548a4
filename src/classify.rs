//! Posterior scoring and label decision.
//!
//! The scorer is a pure function of (tokens, model, parameters): it borrows
//! an immutable [`Model`] and keeps all accumulators call-local, so
//! independent callers may score against a shared model concurrently.

use std::io::{BufRead, Write};

use crate::analysis::{BreakNormalizer, tokenize};
use crate::error::Result;
use crate::model::Model;

/// Label produced when a complaint carries no usable evidence.
pub const OTHER_LABEL: &str = "Other";

/// Blend weights and fallback used by the posterior scorer.
///
/// The weights let a caller run unigram-only, bigram-only, or mixed models
/// against the same probability file without retraining.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParams {
    /// Weight applied to unigram evidence in the blend.
    pub weight_1_tuple: f64,
    /// Weight applied to bigram evidence in the blend.
    pub weight_2_tuple: f64,
    /// Fallback probability substituted for unseen evidence.
    pub default_prob: f64,
}

impl Default for ScoreParams {
    /// The shipped configuration: a unigram-only model.
    fn default() -> Self {
        ScoreParams {
            weight_1_tuple: 1.0,
            weight_2_tuple: 0.0,
            default_prob: 1e-7,
        }
    }
}

/// Scoring parameters plus the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyOptions {
    /// Parameters for the posterior scorer.
    pub score: ScoreParams,
    /// Negative: single-label argmax. Otherwise: multi-label membership,
    /// selecting every syndrome whose posterior reaches the threshold.
    pub threshold: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions {
            score: ScoreParams::default(),
            threshold: -1.0,
        }
    }
}

/// Compute the posterior distribution over syndromes for a token sequence.
///
/// Each syndrome's score starts from its prior times the first token's
/// unigram probability, then multiplies in a weighted blend of bigram and
/// unigram evidence for every adjacent token pair. Unseen evidence falls
/// back to `default_prob` without counting as found; a syndrome that never
/// finds any word evidence (or any pair evidence while bigram weighting is
/// active) is forced to zero. Scores are normalized into a distribution, or
/// left all-zero when no syndrome scored at all.
pub fn posterior(model: &Model, tokens: &[String], params: &ScoreParams) -> Vec<f64> {
    let n = model.syndrome_count();
    let mut scores = vec![0.0; n];
    if tokens.is_empty() {
        return scores;
    }

    let pairs: Vec<(String, String)> = tokens
        .windows(2)
        .map(|w| (w[0].clone(), w[1].clone()))
        .collect();

    let mut denominator = 0.0;
    for (sid, slot) in scores.iter_mut().enumerate() {
        let s = sid as u32;
        let mut word_found = false;
        let mut wordpair_found = false;
        let mut score = model.prior(s);

        score *= match model.unigram_prob(s, &tokens[0]) {
            Some(p) => {
                word_found = true;
                p
            }
            None => params.default_prob,
        };

        for (i, pair) in pairs.iter().enumerate() {
            let word_prob = match model.unigram_prob(s, &tokens[i + 1]) {
                Some(p) => {
                    word_found = true;
                    p
                }
                None => params.default_prob,
            };
            let wordpair_prob = match model.bigram_prob(s, pair) {
                Some(p) => {
                    wordpair_found = true;
                    p
                }
                None => params.default_prob,
            };
            score *= params.weight_2_tuple * wordpair_prob + params.weight_1_tuple * word_prob;
        }

        // The complaint contains no evidence this model has ever associated
        // with the syndrome under the active weighting.
        if !word_found || (!wordpair_found && params.weight_2_tuple > 0.0) {
            score = 0.0;
        }

        *slot = score;
        denominator += score;
    }

    if denominator > 0.0 {
        for score in &mut scores {
            *score /= denominator;
        }
    } else {
        scores.fill(0.0);
    }

    scores
}

/// Turn a posterior vector into a label or comma-joined label set.
///
/// Negative threshold: argmax, ties broken by lowest syndrome id, with the
/// literal `"Other"` when the winning posterior is exactly zero. Otherwise:
/// every syndrome whose posterior reaches the threshold, in ascending id
/// order, possibly none.
pub fn decide(model: &Model, posterior: &[f64], threshold: f64) -> String {
    let names = model.syndrome_names();

    if threshold < 0.0 {
        if posterior.is_empty() {
            return OTHER_LABEL.to_string();
        }
        let mut winner = 0;
        for i in 1..posterior.len() {
            if posterior[i] > posterior[winner] {
                winner = i;
            }
        }
        if posterior[winner] == 0.0 {
            OTHER_LABEL.to_string()
        } else {
            names[winner].clone()
        }
    } else {
        let labels: Vec<&str> = posterior
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p >= threshold)
            .map(|(i, _)| names[i].as_str())
            .collect();
        labels.join(",")
    }
}

/// Classifies complaint strings against a borrowed model.
///
/// Bundles the model reference, normalizer, and options so batch and line
/// classification share one configuration.
#[derive(Debug)]
pub struct Classifier<'a> {
    model: &'a Model,
    normalizer: BreakNormalizer,
    options: ClassifyOptions,
}

impl<'a> Classifier<'a> {
    /// Create a classifier with the default break normalizer.
    pub fn new(model: &'a Model, options: ClassifyOptions) -> Self {
        Classifier {
            model,
            normalizer: BreakNormalizer::default(),
            options,
        }
    }

    /// Create a classifier with a custom break-character pattern.
    pub fn with_break_pattern(
        model: &'a Model,
        options: ClassifyOptions,
        pattern: &str,
    ) -> Result<Self> {
        Ok(Classifier {
            model,
            normalizer: BreakNormalizer::new(pattern)?,
            options,
        })
    }

    /// Classify a free-form complaint string (line mode).
    ///
    /// The input is normalized before tokenization. An all-blank input
    /// yields `"Other"` without invoking the scorer.
    pub fn classify(&self, input: &str) -> String {
        let normalized = self.normalizer.normalize(input);
        self.classify_tokens(&tokenize(&normalized))
    }

    /// Classify a pre-normalized, whitespace-separated complaint.
    pub fn classify_tokens(&self, tokens: &[String]) -> String {
        if tokens.is_empty() {
            return OTHER_LABEL.to_string();
        }
        let posterior = posterior(self.model, tokens, &self.options.score);
        decide(self.model, &posterior, self.options.threshold)
    }

    /// Classify each line of `reader`, writing one label line to `writer`
    /// in the same order. Returns the number of complaints classified.
    pub fn classify_batch<R: BufRead, W: Write>(&self, reader: R, writer: &mut W) -> Result<usize> {
        let mut classified = 0;
        for line in reader.lines() {
            let line = line?;
            let label = self.classify_tokens(&tokenize(&line));
            writeln!(writer, "{label}")?;
            classified += 1;
        }
        Ok(classified)
    }
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

    fn model(text: &str) -> Model {
        Model::from_reader(Cursor::new(text)).unwrap()
    }

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_posterior_is_a_distribution() {
        let model = model(MODEL);
        let posterior = posterior(&model, &tokens("diff breathing fever"), &ScoreParams::default());
        let sum: f64 = posterior.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(posterior.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_argmax_label() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        assert_eq!(classifier.classify_tokens(&tokens("diff breathing")), "Respiratory");
        assert_eq!(classifier.classify_tokens(&tokens("fever")), "Constitutional");
    }

    #[test]
    fn test_unseen_complaint_is_other() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        assert_eq!(classifier.classify_tokens(&tokens("unseen phrase")), "Other");
    }

    #[test]
    fn test_zero_evidence_with_bigram_weight() {
        let model = model(MODEL);
        let params = ScoreParams {
            weight_1_tuple: 0.5,
            weight_2_tuple: 0.5,
            default_prob: 1e-7,
        };
        let posterior = posterior(&model, &tokens("unseen phrase thing"), &params);
        assert!(posterior.iter().all(|&p| p == 0.0));

        let options = ClassifyOptions {
            score: params,
            threshold: -1.0,
        };
        let classifier = Classifier::new(&model, options);
        assert_eq!(classifier.classify_tokens(&tokens("unseen phrase thing")), "Other");
    }

    #[test]
    fn test_mixed_weights_blend_bigrams() {
        let model = model(MODEL);
        let params = ScoreParams {
            weight_1_tuple: 0.5,
            weight_2_tuple: 0.5,
            default_prob: 1e-7,
        };
        let posterior = posterior(&model, &tokens("diff breathing"), &params);
        // Respiratory has both word and pair evidence; Constitutional has
        // neither and is forced to zero.
        assert_eq!(posterior[0], 1.0);
        assert_eq!(posterior[1], 0.0);
    }

    #[test]
    fn test_word_evidence_found_on_later_token() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        // First token is out of vocabulary; "fever" still counts as found.
        assert_eq!(classifier.classify_tokens(&tokens("sudden fever")), "Constitutional");
    }

    #[test]
    fn test_tie_breaks_by_lowest_id() {
        // "B" has id 0 and "A" has id 1; equal priors, equal word evidence.
        let text = "2\nB,0.5\nA,0.5\n2\nB,fever,1\nA,fever,1\n0\n";
        let model = model(text);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        assert_eq!(classifier.classify_tokens(&tokens("fever")), "B");
    }

    #[test]
    fn test_threshold_membership() {
        let text = "3\nS0,0.4\nS1,0.3\nS2,0.3\n0\n0\n";
        let model = model(text);
        assert_eq!(decide(&model, &[0.5, 0.05, 0.2], 0.1), "S0,S2");
        assert_eq!(decide(&model, &[0.5, 0.05, 0.2], 0.9), "");
        assert_eq!(decide(&model, &[0.5, 0.05, 0.2], 0.0), "S0,S1,S2");
    }

    #[test]
    fn test_all_zero_posterior_is_other() {
        let text = "2\nA,0.5\nB,0.5\n0\n0\n";
        let model = model(text);
        assert_eq!(decide(&model, &[0.0, 0.0], -1.0), "Other");
    }

    #[test]
    fn test_free_form_classification_normalizes() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        assert_eq!(classifier.classify("Diff. Breathing?"), "Respiratory");
        assert_eq!(classifier.classify("FEVER"), "Constitutional");
    }

    #[test]
    fn test_blank_input_is_other() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        assert_eq!(classifier.classify(""), "Other");
        assert_eq!(classifier.classify("  ,.--  "), "Other");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        let first = classifier.classify("diff breathing");
        for _ in 0..10 {
            assert_eq!(classifier.classify("diff breathing"), first);
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let model = model(MODEL);
        let classifier = Classifier::new(&model, ClassifyOptions::default());
        let input = Cursor::new("diff breathing\nfever\n\nunseen phrase\n");
        let mut output = Vec::new();
        let classified = classifier.classify_batch(input, &mut output).unwrap();
        assert_eq!(classified, 4);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Respiratory\nConstitutional\nOther\nOther\n"
        );
    }
}
