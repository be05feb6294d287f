//! Rule-based response engine.
//!
//! Case-folds the input and walks the rule table in priority order; the first
//! rule with a keyword hit wins. No scoring, no merging of categories.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::topics::{default_rules, Category, QuickTopic, TopicRule, FALLBACK_RESPONSE};
use crate::error::AppError;

/// Outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub response: String,
    /// Keyword that selected the rule, `None` for the fallback.
    pub matched_keyword: Option<String>,
}

/// A rule with its keywords compiled into one matcher.
struct CompiledRule {
    category: Category,
    matcher: Regex,
    response: String,
}

/// Classifies free text into a [`Category`] and serves canned answers.
pub struct ResponseEngine {
    rules: Vec<CompiledRule>,
    fallback: String,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseEngine {
    /// Engine over the built-in District 1 rule table.
    pub fn new() -> Self {
        // NOTE: the built-in keywords are plain words, so compilation cannot fail.
        Self::with_rules(default_rules()).expect("Invalid regex: default topic rules")
    }

    /// Engine over a custom rule table, evaluated in the given order.
    ///
    /// A keyword matches anywhere in the lower-cased input, inside longer
    /// words too: `register` hits "unregistered", `rat` hits "crime rate".
    pub fn with_rules(rules: Vec<TopicRule>) -> Result<Self, AppError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let alternatives: Vec<String> = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .map(|k| regex::escape(&k))
                .collect();

            if alternatives.is_empty() {
                return Err(AppError::Config(format!(
                    "rule '{}' has no keywords",
                    rule.category
                )));
            }

            let pattern = alternatives.join("|");
            let matcher = Regex::new(&pattern)
                .map_err(|e| AppError::Config(format!("rule '{}': {}", rule.category, e)))?;

            compiled.push(CompiledRule {
                category: rule.category,
                matcher,
                response: rule.response,
            });
        }

        Ok(Self {
            rules: compiled,
            fallback: FALLBACK_RESPONSE.to_string(),
        })
    }

    fn normalize(input: &str) -> String {
        input.trim().to_lowercase()
    }

    /// Classify the topic of a message.
    pub fn classify(&self, input: &str) -> Category {
        self.respond(input).category
    }

    /// Canned answer for a category.
    pub fn answer(&self, category: Category) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.category == category)
            .map(|rule| rule.response.as_str())
            .unwrap_or(&self.fallback)
    }

    /// Classify and answer in one pass.
    pub fn respond(&self, input: &str) -> Classification {
        let normalized = Self::normalize(input);

        for rule in &self.rules {
            if let Some(hit) = rule.matcher.find(&normalized) {
                debug!(category = %rule.category, keyword = hit.as_str(), "topic rule matched");
                return Classification {
                    category: rule.category,
                    response: rule.response.clone(),
                    matched_keyword: Some(hit.as_str().to_string()),
                };
            }
        }

        Classification {
            category: Category::Fallback,
            response: self.fallback.clone(),
            matched_keyword: None,
        }
    }

    /// Fixed answer for a quick-select button id. Unknown ids yield `None`.
    pub fn quick_answer(&self, topic_id: &str) -> Option<(QuickTopic, &'static str)> {
        QuickTopic::from_id(topic_id).map(|topic| (topic, topic.answer()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voting_detection() {
        let engine = ResponseEngine::new();

        assert_eq!(engine.classify("How do I register to vote?"), Category::Voting);
        assert_eq!(engine.classify("VOTING in district 1"), Category::Voting);
        assert_eq!(engine.classify("When is voter registration due"), Category::Voting);
    }

    #[test]
    fn test_candidate_detection() {
        let engine = ResponseEngine::new();

        assert_eq!(engine.classify("Tell me about Yussuf"), Category::Candidate);
        assert_eq!(engine.classify("who is the imam running?"), Category::Candidate);
    }

    #[test]
    fn test_priority_order_wins() {
        let engine = ResponseEngine::new();

        // Voting outranks candidate and contact.
        assert_eq!(
            engine.classify("Can I contact Yussuf about how to vote?"),
            Category::Voting
        );
        // Issues outrank resources.
        assert_eq!(
            engine.classify("I need help with a housing problem"),
            Category::Issues
        );
    }

    #[test]
    fn test_keywords_match_inside_words() {
        let engine = ResponseEngine::new();

        assert_eq!(engine.classify("There are rats on my street"), Category::Issues);
        assert_eq!(engine.classify("What's the crime rate?"), Category::Issues);
        assert_eq!(engine.classify("what a celebration"), Category::Issues);

        let result = engine.respond("I'm unregistered, what now?");
        assert_eq!(result.category, Category::Voting);
        assert_eq!(result.matched_keyword.as_deref(), Some("register"));
    }

    #[test]
    fn test_fallback() {
        let engine = ResponseEngine::new();

        let result = engine.respond("What time is it?");
        assert_eq!(result.category, Category::Fallback);
        assert_eq!(result.response, FALLBACK_RESPONSE);
        assert_eq!(result.matched_keyword, None);

        assert_eq!(engine.answer(Category::Fallback), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_custom_rules_require_keywords() {
        let rules = vec![TopicRule::new(Category::Contact, &["  "], "x")];
        assert!(matches!(
            ResponseEngine::with_rules(rules),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_quick_answer() {
        let engine = ResponseEngine::new();

        let (topic, answer) = engine.quick_answer("resources").unwrap();
        assert_eq!(topic, QuickTopic::Resources);
        assert!(answer.contains("311"));

        assert!(engine.quick_answer("parking").is_none());
    }
}
