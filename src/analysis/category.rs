// Rule-based categorization.
//
// Each category owns a short list of literal terms. A category's score is the
// number of distinct terms that appear anywhere in the lowercased comment
// (substring match, so "labs" and "collaboration" both hit "lab"). The highest
// score wins; ties go to whichever category is declared first in the rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Course,
    Faculty,
    Facilities,
    Events,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Course,
        Category::Faculty,
        Category::Facilities,
        Category::Events,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Course => "course",
            Category::Faculty => "faculty",
            Category::Facilities => "facilities",
            Category::Events => "events",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: {s}"))
    }
}

/// The keyword lists used for scoring, in priority order.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<(Category, Vec<String>)>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(vec![
            (
                Category::Course,
                &[
                    "course",
                    "subject",
                    "curriculum",
                    "syllabus",
                    "assignment",
                    "exam",
                    "test",
                ][..],
            ),
            (
                Category::Faculty,
                &["teacher", "professor", "instructor", "faculty", "teaching"][..],
            ),
            (
                Category::Facilities,
                &[
                    "facility",
                    "building",
                    "lab",
                    "library",
                    "classroom",
                    "infrastructure",
                ][..],
            ),
            (
                Category::Events,
                &[
                    "event",
                    "program",
                    "seminar",
                    "workshop",
                    "conference",
                    "activity",
                ][..],
            ),
        ])
    }
}

impl CategoryRules {
    /// Build rules from (category, terms) pairs. Earlier pairs win ties.
    pub fn new(rules: Vec<(Category, &[&str])>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(cat, terms)| (cat, terms.iter().map(|t| t.to_lowercase()).collect()))
                .collect(),
        }
    }

    /// Per-category scores in priority order. Exposed for diagnostics.
    pub fn scores(&self, text: &str) -> Vec<(Category, usize)> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .map(|(cat, terms)| {
                let hits = terms.iter().filter(|t| lower.contains(t.as_str())).count();
                (*cat, hits)
            })
            .collect()
    }

    /// Pick the best-scoring category, or `General` when nothing matches.
    pub fn categorize(&self, text: &str) -> Category {
        let mut best = (Category::General, 0usize);
        for (cat, score) in self.scores(text) {
            // Strictly greater: an equal later score never displaces an earlier one
            if score > best.1 {
                best = (cat, score);
            }
        }
        best.0
    }
}
