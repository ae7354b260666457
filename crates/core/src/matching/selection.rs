//! Choosing the next mentor for a mentee registration.
//!
//! The mentee's ranked choices are walked first; the first enrolled,
//! untried mentor with spare capacity wins. If none qualifies, the
//! highest-scoring eligible mentor is chosen, ties going to the mentor
//! with the lighter load and then the lower user id.

use crate::matching::scoring::{MenteeProfile, MentorProfile, ScoreBreakdown};
use crate::matching::{MATCH_TYPE_ALGORITHMIC, MATCH_TYPE_PREFERRED, MAX_PREFERENCES};
use crate::types::DbId;

/// A mentor enrolled in the program, with their current active load.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub mentor_user_id: DbId,
    pub profile: MentorProfile<'a>,
    pub active_load: i64,
    pub capacity: i64,
}

impl Candidate<'_> {
    pub fn has_capacity(&self) -> bool {
        self.active_load < self.capacity
    }
}

/// Everything selection needs to know about a registration.
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput<'a> {
    pub mentee_user_id: DbId,
    pub mentee: MenteeProfile<'a>,
    /// Ranked mentor user ids, best first.
    pub preferred_mentor_ids: &'a [DbId],
    /// Mentors already proposed for this registration (any status).
    pub tried_mentor_ids: &'a [DbId],
    pub candidates: &'a [Candidate<'a>],
}

/// The chosen mentor and the score to record on the new match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub mentor_user_id: DbId,
    pub match_type: &'static str,
    pub preferred_choice_order: Option<i16>,
    pub breakdown: ScoreBreakdown,
    pub match_score: i16,
}

impl SelectionInput<'_> {
    fn is_eligible(&self, candidate: &Candidate<'_>) -> bool {
        candidate.mentor_user_id != self.mentee_user_id
            && candidate.has_capacity()
            && !self.tried_mentor_ids.contains(&candidate.mentor_user_id)
    }
}

/// Pick the next mentor, or `None` when nobody is eligible.
pub fn select_next(input: &SelectionInput<'_>) -> Option<Selection> {
    select_preferred(input).or_else(|| select_by_score(input))
}

fn select_preferred(input: &SelectionInput<'_>) -> Option<Selection> {
    input
        .preferred_mentor_ids
        .iter()
        .take(MAX_PREFERENCES)
        .enumerate()
        .find_map(|(idx, mentor_id)| {
            let candidate = input
                .candidates
                .iter()
                .find(|c| c.mentor_user_id == *mentor_id)?;
            if !input.is_eligible(candidate) {
                return None;
            }
            let order = idx as i16 + 1;
            let breakdown = ScoreBreakdown::compute(&input.mentee, &candidate.profile, Some(order));
            Some(Selection {
                mentor_user_id: candidate.mentor_user_id,
                match_type: MATCH_TYPE_PREFERRED,
                preferred_choice_order: Some(order),
                match_score: breakdown.match_score(),
                breakdown,
            })
        })
}

fn select_by_score(input: &SelectionInput<'_>) -> Option<Selection> {
    input
        .candidates
        .iter()
        .filter(|c| input.is_eligible(c))
        .map(|c| {
            let breakdown = ScoreBreakdown::compute(&input.mentee, &c.profile, None);
            (c, breakdown, breakdown.match_score())
        })
        .max_by(|(a, _, score_a), (b, _, score_b)| {
            score_a
                .cmp(score_b)
                .then_with(|| b.active_load.cmp(&a.active_load))
                .then_with(|| b.mentor_user_id.cmp(&a.mentor_user_id))
        })
        .map(|(c, breakdown, match_score)| Selection {
            mentor_user_id: c.mentor_user_id,
            match_type: MATCH_TYPE_ALGORITHMIC,
            preferred_choice_order: None,
            breakdown,
            match_score,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct Fixture {
        interests: Vec<String>,
        rust_skills: Vec<String>,
        sql_skills: Vec<String>,
        no_skills: Vec<String>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                interests: strings(&["rust", "sql"]),
                rust_skills: strings(&["rust"]),
                sql_skills: strings(&["rust", "sql"]),
                no_skills: Vec::new(),
            }
        }

        fn mentee(&self) -> MenteeProfile<'_> {
            MenteeProfile {
                industry: Some("Software"),
                programme: Some("CS"),
                interests: &self.interests,
            }
        }

        fn mentor<'a>(
            &'a self,
            skills: &'a [String],
            load: i64,
            capacity: i64,
            id: DbId,
        ) -> Candidate<'a> {
            Candidate {
                mentor_user_id: id,
                profile: MentorProfile {
                    industry: Some("Software"),
                    programme: None,
                    skills,
                },
                active_load: load,
                capacity,
            }
        }
    }

    fn input<'a>(
        fx: &'a Fixture,
        preferred: &'a [DbId],
        tried: &'a [DbId],
        candidates: &'a [Candidate<'a>],
    ) -> SelectionInput<'a> {
        SelectionInput {
            mentee_user_id: 1,
            mentee: fx.mentee(),
            preferred_mentor_ids: preferred,
            tried_mentor_ids: tried,
            candidates,
        }
    }

    #[test]
    fn first_preference_wins_even_with_lower_score() {
        let fx = Fixture::new();
        let candidates = [
            fx.mentor(&fx.no_skills, 0, 3, 10),
            fx.mentor(&fx.sql_skills, 0, 3, 11),
        ];
        let picked = select_next(&input(&fx, &[10, 11], &[], &candidates)).unwrap();
        assert_eq!(picked.mentor_user_id, 10);
        assert_eq!(picked.match_type, MATCH_TYPE_PREFERRED);
        assert_eq!(picked.preferred_choice_order, Some(1));
        assert_eq!(picked.breakdown.preference_score, 100);
    }

    #[test]
    fn tried_preference_moves_to_next_choice() {
        let fx = Fixture::new();
        let candidates = [
            fx.mentor(&fx.no_skills, 0, 3, 10),
            fx.mentor(&fx.rust_skills, 0, 3, 11),
        ];
        let picked = select_next(&input(&fx, &[10, 11], &[10], &candidates)).unwrap();
        assert_eq!(picked.mentor_user_id, 11);
        assert_eq!(picked.preferred_choice_order, Some(2));
        assert_eq!(picked.breakdown.preference_score, 67);
    }

    #[test]
    fn full_preference_is_skipped() {
        let fx = Fixture::new();
        let candidates = [
            fx.mentor(&fx.rust_skills, 2, 2, 10),
            fx.mentor(&fx.rust_skills, 0, 2, 12),
        ];
        let picked = select_next(&input(&fx, &[10, 99, 12], &[], &candidates)).unwrap();
        assert_eq!(picked.mentor_user_id, 12);
        assert_eq!(picked.preferred_choice_order, Some(3));
    }

    #[test]
    fn falls_back_to_highest_score() {
        let fx = Fixture::new();
        let candidates = [
            fx.mentor(&fx.rust_skills, 0, 3, 20),
            fx.mentor(&fx.sql_skills, 1, 3, 21),
        ];
        let picked = select_next(&input(&fx, &[10], &[10], &candidates)).unwrap();
        assert_eq!(picked.mentor_user_id, 21);
        assert_eq!(picked.match_type, MATCH_TYPE_ALGORITHMIC);
        assert_eq!(picked.preferred_choice_order, None);
        assert_eq!(picked.breakdown.preference_score, 0);
        assert_eq!(picked.breakdown.skills_score, 100);
    }

    #[test]
    fn score_ties_go_to_lighter_load_then_lower_id() {
        let fx = Fixture::new();
        let candidates = [
            fx.mentor(&fx.rust_skills, 2, 5, 30),
            fx.mentor(&fx.rust_skills, 1, 5, 32),
            fx.mentor(&fx.rust_skills, 1, 5, 31),
        ];
        let picked = select_next(&input(&fx, &[], &[], &candidates)).unwrap();
        assert_eq!(picked.mentor_user_id, 31);
    }

    #[test]
    fn mentee_is_never_matched_with_themselves() {
        let fx = Fixture::new();
        let candidates = [fx.mentor(&fx.sql_skills, 0, 3, 1)];
        assert_eq!(select_next(&input(&fx, &[1], &[], &candidates)), None);
    }

    #[test]
    fn nobody_eligible_returns_none() {
        let fx = Fixture::new();
        let candidates = [
            fx.mentor(&fx.sql_skills, 3, 3, 40),
            fx.mentor(&fx.sql_skills, 0, 3, 41),
        ];
        assert_eq!(select_next(&input(&fx, &[], &[41], &candidates)), None);
        assert_eq!(select_next(&input(&fx, &[], &[], &[])), None);
    }

    #[test]
    fn only_first_three_preferences_count() {
        let fx = Fixture::new();
        let candidates = [fx.mentor(&fx.no_skills, 0, 3, 14)];
        let picked = select_next(&input(&fx, &[11, 12, 13, 14], &[], &candidates)).unwrap();
        assert_eq!(picked.match_type, MATCH_TYPE_ALGORITHMIC);
    }
}
