use super::domain::{ComplaintCategory, ComplaintPriority};

/// Category, urgency, and safety signal inferred from a complaint narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub safety_flag: bool,
}

impl Classification {
    /// Conservative default used when no classifier is wired in.
    pub const fn fallback() -> Self {
        Classification {
            category: ComplaintCategory::Other,
            priority: ComplaintPriority::Medium,
            safety_flag: false,
        }
    }
}

/// Pluggable classification seam. The registry invokes whatever classifier
/// it was constructed with and accepts the result as-is.
pub trait ComplaintClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

/// Classifier that always returns [`Classification::fallback`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackClassifier;

impl ComplaintClassifier for FallbackClassifier {
    fn classify(&self, _text: &str) -> Classification {
        Classification::fallback()
    }
}

/// Keyword-substring heuristic. A deliberate placeholder for a real
/// classification service, kept only so intake can pre-sort the admin queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

const CATEGORY_KEYWORDS: &[(&[&str], ComplaintCategory)] = &[
    (&["class", "exam", "grade"], ComplaintCategory::Academic),
    (&["hostel", "room", "warden"], ComplaintCategory::Hostel),
    (&["safety", "danger", "hazard"], ComplaintCategory::Safety),
    (&["library", "book"], ComplaintCategory::Library),
    (&["bus", "transport"], ComplaintCategory::Transport),
    (&["fee", "payment", "refund"], ComplaintCategory::Financial),
];

const CRITICAL_KEYWORDS: &[&str] = &["urgent", "emergency", "critical"];
const HIGH_KEYWORDS: &[&str] = &["safety", "harassment"];

impl ComplaintClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

        let category = CATEGORY_KEYWORDS
            .iter()
            .find(|(words, _)| contains_any(words))
            .map(|(_, category)| *category)
            .unwrap_or(ComplaintCategory::Other);

        let priority = if contains_any(CRITICAL_KEYWORDS) {
            ComplaintPriority::Critical
        } else if contains_any(HIGH_KEYWORDS) {
            ComplaintPriority::High
        } else {
            ComplaintPriority::Medium
        };

        Classification {
            category,
            priority,
            safety_flag: category == ComplaintCategory::Safety,
        }
    }
}
