//! Intent rule table
//!
//! Rules are plain data: an intent name, a list of regular expressions, a
//! list of keywords and the pipeline that serves the intent. The order of
//! the table is the registration order, and ties in scoring go to the
//! rule registered first.

use ahash::AHashSet;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Canonical intent names.
pub mod intents {
    pub const CONTENT_GENERATION: &str = "content_generation";
    pub const QUESTION_ANSWERING: &str = "question_answering";
    pub const MATERIAL_ADAPTATION: &str = "material_adaptation";
    pub const VISUAL_AID: &str = "visual_aid";
    pub const ASSESSMENT: &str = "assessment";
    pub const LESSON_PLANNING: &str = "lesson_planning";
}

/// Canonical pipeline identifiers.
pub mod pipelines {
    pub const CONTENT_GENERATOR: &str = "ContentGenerator";
    pub const KNOWLEDGE_EXPLAINER: &str = "KnowledgeExplainer";
    pub const MATERIAL_ADAPTER: &str = "MaterialAdapter";
    pub const VISUAL_AID: &str = "VisualAid";
    pub const ASSESSMENT: &str = "Assessment";
    pub const LESSON_PLANNER: &str = "LessonPlanner";
}

/// Uncompiled rule, as written in code or in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRule {
    pub intent_name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub target_pipeline: String,
}

impl IntentRule {
    pub fn new(intent_name: &str, patterns: &[&str], keywords: &[&str], target_pipeline: &str) -> Self {
        Self {
            intent_name: intent_name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            target_pipeline: target_pipeline.to_string(),
        }
    }
}

/// A rule ready for scoring.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub intent_name: String,
    pub target_pipeline: String,
    /// Case-insensitive, in declaration order.
    pub patterns: Vec<Regex>,
    /// Lowercased and de-duplicated, in declaration order.
    pub keywords: Vec<String>,
}

impl CompiledRule {
    fn compile(rule: &IntentRule) -> Result<Self, ConfigError> {
        let patterns = rule
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidPattern {
                        intent: rule.intent_name.clone(),
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = AHashSet::with_capacity(rule.keywords.len());
        let keywords = rule
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| seen.insert(k.clone()))
            .collect();

        Ok(Self {
            intent_name: rule.intent_name.clone(),
            target_pipeline: rule.target_pipeline.clone(),
            patterns,
            keywords,
        })
    }
}

/// Immutable, ordered set of compiled rules.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Validate and compile `rules`, keeping their order.
    pub fn compile(rules: &[IntentRule]) -> Result<Self, ConfigError> {
        validate_rules(rules).map_err(|errors| ConfigError::Validation(errors.join("\n")))?;
        let rules = rules.iter().map(CompiledRule::compile).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The built-in six-rule table.
    pub fn canonical() -> Self {
        // The canonical table is covered by tests; failure here is a programming error
        Self::compile(&canonical_rules()).expect("canonical rule table is valid")
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn get(&self, intent_name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.intent_name == intent_name)
    }

    pub fn contains(&self, intent_name: &str) -> bool {
        self.get(intent_name).is_some()
    }

    /// Intent names in registration order.
    pub fn intent_names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.intent_name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Semantic checks on a rule list. Pattern syntax is checked at compile time.
pub fn validate_rules(rules: &[IntentRule]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut names = AHashSet::with_capacity(rules.len());

    for (index, rule) in rules.iter().enumerate() {
        if rule.intent_name.trim().is_empty() {
            errors.push(format!("rules[{index}].intent_name must not be empty"));
        } else if !names.insert(rule.intent_name.as_str()) {
            errors.push(format!("rules[{index}].intent_name '{}' is registered twice", rule.intent_name));
        }
        if rule.target_pipeline.trim().is_empty() {
            errors.push(format!("rules[{index}].target_pipeline must not be empty"));
        }
        if rule.keywords.iter().any(|k| k.trim().is_empty()) {
            errors.push(format!("rules[{index}].keywords must not contain empty entries"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The canonical rule table, in registration order.
pub fn canonical_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            intents::CONTENT_GENERATION,
            &[
                r"(create|generate|write|make).*?(story|lesson|content|explanation)",
                r"(tell|create).*?(story|tale)",
                r"(explain|describe).*?(concept|topic|subject)",
                r"(content|material).*?(generation|creation)",
            ],
            &["story", "lesson", "content", "explanation", "generate", "create", "write"],
            pipelines::CONTENT_GENERATOR,
        ),
        IntentRule::new(
            intents::QUESTION_ANSWERING,
            &[
                r"(what|how|why|when|where|who).*?\?",
                r"(explain|tell me|help).*?(about|with)",
                r"(question|ask|doubt|clarify)",
                r"(can you|could you|please).*?(help|explain|tell)",
            ],
            &["what", "how", "why", "question", "ask", "help", "explain"],
            pipelines::KNOWLEDGE_EXPLAINER,
        ),
        IntentRule::new(
            intents::MATERIAL_ADAPTATION,
            &[
                r"(worksheet|exercise|activity).*?(create|make|generate)",
                r"(textbook|book|page).*?(adapt|convert|transform)",
                r"(grade.*?level|difficulty.*?level)",
                r"(image|picture|photo).*?(worksheet|exercise)",
            ],
            &["worksheet", "exercise", "textbook", "adapt", "grade", "level"],
            pipelines::MATERIAL_ADAPTER,
        ),
        IntentRule::new(
            intents::VISUAL_AID,
            &[
                r"(diagram|chart|visual|drawing).*?(create|make|generate)",
                r"(blackboard|board).*?(diagram|drawing)",
                r"(visual.*?aid|visual.*?help)",
                r"(draw|sketch|illustrate)",
            ],
            &["diagram", "visual", "drawing", "chart", "blackboard", "draw"],
            pipelines::VISUAL_AID,
        ),
        IntentRule::new(
            intents::ASSESSMENT,
            &[
                r"(reading|fluency|pronunciation).*?(assessment|evaluation|check)",
                r"(audio|voice|speech).*?(evaluate|assess|check)",
                r"(student.*?reading|reading.*?student)",
            ],
            &["reading", "fluency", "assessment", "audio", "evaluate", "speech"],
            pipelines::ASSESSMENT,
        ),
        IntentRule::new(
            intents::LESSON_PLANNING,
            &[
                r"(lesson.*?plan|weekly.*?plan|plan.*?lesson)",
                r"(schedule|planning|curriculum)",
                r"(week.*?activity|daily.*?activity)",
                r"(plan.*?week|plan.*?day)",
            ],
            &["lesson", "plan", "schedule", "weekly", "curriculum", "activity"],
            pipelines::LESSON_PLANNER,
        ),
    ]
}
