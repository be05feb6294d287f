//! Topic rule table.
//!
//! The canned answers the District 1 assistant gives, kept apart from the
//! matching code so the table can be reviewed and tested on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic an input was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Voter registration, polling, ballots
    Voting,
    /// The candidate himself
    Candidate,
    /// Homelessness, housing, street safety
    Issues,
    /// City services and community resources
    Resources,
    /// Requests for other languages
    Language,
    /// Reaching the campaign
    Contact,
    /// Nothing matched
    Fallback,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Voting => "voting",
            Category::Candidate => "candidate",
            Category::Issues => "issues",
            Category::Resources => "resources",
            Category::Language => "language",
            Category::Contact => "contact",
            Category::Fallback => "fallback",
        }
    }
}

/// One row of the rule table: any keyword hit selects `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    pub category: Category,
    pub keywords: Vec<String>,
    pub response: String,
}

impl TopicRule {
    pub fn new(category: Category, keywords: &[&str], response: &str) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            response: response.to_string(),
        }
    }
}

pub const VOTING_RESPONSE: &str = "You can register to vote at vote.utah.gov! Make sure you're registered by the deadline. District 1 polling locations will be announced closer to election day. Need help with the process? I'm here to guide you! 🗳️";

pub const CANDIDATE_RESPONSE: &str = "Imam Yussuf Abdi is a visionary leader combining spiritual guidance with AI innovation! He's focused on ending homelessness, improving public safety, and using technology to better serve District 1. You can learn more about his platform on this website or contact the campaign directly. 👤";

pub const ISSUES_RESPONSE: &str = "District 1 faces real challenges: rising homelessness, street cleanliness issues including pest control, neglected public spaces, and housing shortages. Yussuf Abdi has data-driven solutions to address these problems through technology, community engagement, and smart policy. What specific issue concerns you most? 🏠";

pub const RESOURCES_RESPONSE: &str = "District 1 has various community resources! For immediate help, call 311 or visit slc.gov. Community centers, nonprofits, and local services are available. If you're facing a specific challenge, I can help connect you to the right resource. What do you need help with? 🏢";

pub const LANGUAGE_RESPONSE: &str = "I'm designed to help in multiple languages! While I'm most fluent in English, I can try to assist in Spanish, Somali, or Arabic. For complex issues in other languages, I recommend contacting the campaign directly for a human translator. ¿Cómo puedo ayudarte? 🌍";

pub const CONTACT_RESPONSE: &str = "You can reach the campaign at info@voteyussuf.com or (555) 123-4567. For immediate questions, I'm here to help! You can also visit the contact section of this website for more ways to get involved. 📞";

/// Returned when no rule matches.
pub const FALLBACK_RESPONSE: &str = "That's a great question! I'm still learning about that topic, but here are some helpful resources: visit vote.utah.gov for voting info, slc.gov for city services, or contact the campaign at info@voteyussuf.com. Is there something specific about District 1 I can help you with? 🤔";

/// The default rules, in priority order.
pub fn default_rules() -> Vec<TopicRule> {
    vec![
        TopicRule::new(
            Category::Voting,
            &["vote", "voting", "register"],
            VOTING_RESPONSE,
        ),
        TopicRule::new(
            Category::Candidate,
            &["yussuf", "abdi", "candidate", "imam"],
            CANDIDATE_RESPONSE,
        ),
        TopicRule::new(
            Category::Issues,
            &["homeless", "housing", "rat", "mice", "problem"],
            ISSUES_RESPONSE,
        ),
        TopicRule::new(
            Category::Resources,
            &["resource", "help", "service", "community center"],
            RESOURCES_RESPONSE,
        ),
        TopicRule::new(
            Category::Language,
            &["spanish", "somali", "arabic", "language"],
            LANGUAGE_RESPONSE,
        ),
        TopicRule::new(
            Category::Contact,
            &["contact", "phone", "email", "campaign"],
            CONTACT_RESPONSE,
        ),
    ]
}

/// Quick-select buttons shown under the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickTopic {
    Voting,
    Candidate,
    Issues,
    Resources,
}

impl QuickTopic {
    pub const ALL: [QuickTopic; 4] = [
        QuickTopic::Voting,
        QuickTopic::Candidate,
        QuickTopic::Issues,
        QuickTopic::Resources,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuickTopic::Voting => "voting",
            QuickTopic::Candidate => "candidate",
            QuickTopic::Issues => "issues",
            QuickTopic::Resources => "resources",
        }
    }

    /// Button caption.
    pub fn caption(&self) -> &'static str {
        match self {
            QuickTopic::Voting => "How to vote?",
            QuickTopic::Candidate => "About Yussuf",
            QuickTopic::Issues => "District issues",
            QuickTopic::Resources => "Local resources",
        }
    }

    /// The question recorded on the visitor's behalf.
    pub fn question(&self) -> &'static str {
        match self {
            QuickTopic::Voting => "How do I register to vote in District 1?",
            QuickTopic::Candidate => "Tell me about Yussuf Abdi",
            QuickTopic::Issues => "What are the main issues in District 1?",
            QuickTopic::Resources => "What resources are available in District 1?",
        }
    }

    pub fn answer(&self) -> &'static str {
        match self {
            QuickTopic::Voting => "You can register to vote online at vote.utah.gov or visit any DMV office. You need to be 18+ and a Utah resident. For District 1 specific information, make sure your address is within the district boundaries.",
            QuickTopic::Candidate => "Imam Yussuf Abdi is running for Salt Lake City Council District 1. He's a spiritual leader, AI advocate, and entrepreneur focused on ending homelessness, improving public safety, and using technology to serve residents better.",
            QuickTopic::Issues => "Key challenges include rising homelessness, street cleanliness and pest control, neglected public spaces, housing shortages, and weak communication between city leadership and residents.",
            QuickTopic::Resources => "District 1 has community centers, parks, schools, and various nonprofit organizations. For specific locations and services, I recommend contacting Salt Lake City services at slc.gov or calling 311.",
        }
    }

    /// Looks up a button id; unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }
}

impl FromStr for QuickTopic {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickTopic::ALL
            .into_iter()
            .find(|topic| topic.id() == s.trim())
            .ok_or(())
    }
}
