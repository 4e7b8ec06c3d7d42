//! Intent matcher - rule scoring and selection
//!
//! Each rule scores `pattern_weight` when any of its patterns matches the
//! original-case input (first match only), plus the fraction of its
//! keywords found in the lowercased input times `keyword_weight`. The
//! strictly highest total wins, earlier rules win ties, and a winner below
//! `min_score` is replaced by the fallback intent.

use crate::config::{FallbackConfig, ScoringConfig};
use crate::rules::{CompiledRule, RuleSet};
use crate::types::{Classification, IntentScore, MatchSource};

/// Score one rule against the input.
///
/// `input_lower` must be `input.to_lowercase()`; it is passed in so the
/// caller lowercases once per request rather than once per rule.
pub fn score_rule(input: &str, input_lower: &str, rule: &CompiledRule, scoring: &ScoringConfig) -> IntentScore {
    let matched_pattern = rule
        .patterns
        .iter()
        .find(|pattern| pattern.is_match(input))
        .map(|pattern| pattern.as_str().to_string());
    let pattern_score = if matched_pattern.is_some() {
        scoring.pattern_weight
    } else {
        0.0
    };

    let matched_keywords: Vec<String> = rule
        .keywords
        .iter()
        .filter(|keyword| input_lower.contains(keyword.as_str()))
        .cloned()
        .collect();
    let keyword_score = if rule.keywords.is_empty() {
        0.0
    } else {
        matched_keywords.len() as f64 / rule.keywords.len() as f64 * scoring.keyword_weight
    };

    IntentScore {
        intent_name: rule.intent_name.clone(),
        pattern_score,
        keyword_score,
        matched_pattern,
        matched_keywords,
    }
}

/// Score every rule, in registration order.
pub fn score_intents(input: &str, rules: &RuleSet, scoring: &ScoringConfig) -> Vec<IntentScore> {
    let input_lower = input.to_lowercase();
    rules
        .rules()
        .iter()
        .map(|rule| score_rule(input, &input_lower, rule, scoring))
        .collect()
}

/// Index of the first rule reaching the maximum score.
fn best_index(scores: &[IntentScore]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores.iter().enumerate() {
        let total = score.total();
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((index, total)),
        }
    }
    best.map(|(index, _)| index)
}

/// Classify `input`, honouring an explicit override when it names a
/// registered intent. Unknown overrides are ignored.
pub fn classify(
    input: &str,
    explicit_type: Option<&str>,
    rules: &RuleSet,
    scoring: &ScoringConfig,
    fallback: &FallbackConfig,
) -> Classification {
    if let Some(rule) = explicit_type.and_then(|kind| rules.get(kind)) {
        return Classification {
            intent_name: rule.intent_name.clone(),
            target_pipeline: rule.target_pipeline.clone(),
            source: MatchSource::Override,
            score: 0.0,
            scores: Vec::new(),
        };
    }

    let scores = score_intents(input, rules, scoring);
    let winner = best_index(&scores).map(|index| (index, scores[index].total()));

    match winner {
        Some((index, score)) if score >= scoring.min_score => {
            let rule = &rules.rules()[index];
            Classification {
                intent_name: rule.intent_name.clone(),
                target_pipeline: rule.target_pipeline.clone(),
                source: MatchSource::Rule,
                score,
                scores,
            }
        }
        other => Classification {
            intent_name: fallback.intent.clone(),
            target_pipeline: fallback.pipeline.clone(),
            source: MatchSource::Fallback,
            score: other.map(|(_, score)| score).unwrap_or(0.0),
            scores,
        },
    }
}
