//! Match score computation.
//!
//! Each sub-score is an integer percentage. The overall `match_score` is a
//! weighted sum of the four sub-scores:
//!
//! | Sub-score    | Weight |
//! |--------------|--------|
//! | industry     | 30     |
//! | programme    | 20     |
//! | skills       | 30     |
//! | preference   | 20     |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const INDUSTRY_WEIGHT: i32 = 30;
pub const PROGRAMME_WEIGHT: i32 = 20;
pub const SKILLS_WEIGHT: i32 = 30;
pub const PREFERENCE_WEIGHT: i32 = 20;

/// Scoring-relevant fields of a mentor enrollment.
#[derive(Debug, Clone, Copy)]
pub struct MentorProfile<'a> {
    pub industry: Option<&'a str>,
    pub programme: Option<&'a str>,
    pub skills: &'a [String],
}

/// Scoring-relevant fields of a mentee registration.
#[derive(Debug, Clone, Copy)]
pub struct MenteeProfile<'a> {
    pub industry: Option<&'a str>,
    pub programme: Option<&'a str>,
    pub interests: &'a [String],
}

/// Per-dimension scores, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoreBreakdown {
    pub industry_score: i16,
    pub programme_score: i16,
    pub skills_score: i16,
    pub preference_score: i16,
}

impl ScoreBreakdown {
    /// Score a mentee against a mentor. `choice_order` is the mentor's
    /// 1-based rank in the mentee's preferences, if any.
    pub fn compute(
        mentee: &MenteeProfile<'_>,
        mentor: &MentorProfile<'_>,
        choice_order: Option<i16>,
    ) -> Self {
        Self {
            industry_score: exact_match_score(mentee.industry, mentor.industry),
            programme_score: exact_match_score(mentee.programme, mentor.programme),
            skills_score: skills_score(mentee.interests, mentor.skills),
            preference_score: preference_score(choice_order),
        }
    }

    /// Weighted composition into the overall percentage.
    pub fn match_score(&self) -> i16 {
        let weighted = INDUSTRY_WEIGHT * i32::from(self.industry_score)
            + PROGRAMME_WEIGHT * i32::from(self.programme_score)
            + SKILLS_WEIGHT * i32::from(self.skills_score)
            + PREFERENCE_WEIGHT * i32::from(self.preference_score);
        // Weights sum to 100; +50 rounds half-up.
        ((weighted + 50) / 100).clamp(0, 100) as i16
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 100 when both sides are present and equal ignoring case, else 0.
pub fn exact_match_score(a: Option<&str>, b: Option<&str>) -> i16 {
    match (a.map(normalize), b.map(normalize)) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => 100,
        _ => 0,
    }
}

/// Share of the mentee's distinct interests covered by the mentor's skills.
pub fn skills_score(interests: &[String], skills: &[String]) -> i16 {
    let interests: HashSet<String> = interests
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();
    if interests.is_empty() {
        return 0;
    }
    let skills: HashSet<String> = skills.iter().map(|s| normalize(s)).collect();
    let covered = interests.intersection(&skills).count();
    ((covered as f64 / interests.len() as f64) * 100.0).round() as i16
}

/// 1st choice 100, 2nd 67, 3rd 33, anything else 0.
pub fn preference_score(choice_order: Option<i16>) -> i16 {
    match choice_order {
        Some(1) => 100,
        Some(2) => 67,
        Some(3) => 33,
        _ => 0,
    }
}
