use {
    std::cmp::Reverse,
    serde::{
        Deserialize,
        Serialize,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    /// Qualifier placement, lower is better.
    pub rank: Option<u32>,
    /// Live race room score, higher is better.
    pub score: Option<i64>,
    #[serde(default)]
    pub first_pick: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rank: None,
            score: None,
            first_pick: false,
        }
    }

    pub fn with_score(name: impl Into<String>, score: Option<i64>) -> Self {
        Self { score, ..Self::new(name) }
    }

    pub fn is(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

/// Racer names are compared case-insensitively, including non-ASCII letters.
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// One entry of the qualifier standings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Placement {
    pub name: String,
    pub place: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingMode {
    /// Sanctioned matches: order by qualifier placement.
    Sanctioned,
    /// Casual races: order by racetime.gg score.
    Casual,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("only {matched} participant(s) could be found in the rankings")]
    InsufficientRankingData {
        matched: usize,
    },
}

/// Copies qualifier placements onto the participants they belong to.
pub fn apply_placements(participants: &mut [Participant], placements: &[Placement]) {
    for participant in participants {
        participant.rank = placements.iter()
            .filter(|placement| participant.is(&placement.name))
            .map(|placement| placement.place)
            .min();
    }
}

/// Orders participants by draft priority, highest first. Sorting is stable, so ties keep their input order.
pub fn rank(mut participants: Vec<Participant>, mode: RankingMode) -> Result<Vec<Participant>, RankingError> {
    match mode {
        RankingMode::Sanctioned => {
            let matched = participants.iter().filter(|participant| participant.rank.is_some()).count();
            if matched < 2 {
                return Err(RankingError::InsufficientRankingData { matched })
            }
            participants.sort_by_key(|participant| (participant.rank.is_none(), participant.rank));
        }
        RankingMode::Casual => participants.sort_by_key(|participant| Reverse(participant.score.unwrap_or_default())),
    }
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(participants: &[Participant]) -> Vec<&str> {
        participants.iter().map(|participant| &*participant.name).collect()
    }

    #[test]
    fn sanctioned_orders_by_placement() {
        let mut participants = vec![Participant::new("bob"), Participant::new("Carol"), Participant::new("alice")];
        apply_placements(&mut participants, &[
            Placement { name: format!("Alice"), place: 1 },
            Placement { name: format!("Bob"), place: 7 },
            Placement { name: format!("Dave"), place: 2 },
        ]);
        let ranked = rank(participants, RankingMode::Sanctioned).unwrap();
        assert_eq!(names(&ranked), ["alice", "bob", "Carol"]);
        assert_eq!(ranked[0].rank, Some(1));
    }

    #[test]
    fn names_ignore_case() {
        assert!(same_name("Alice", "aLiCe"));
        assert!(same_name("Émile", "émile"));
        assert!(same_name("ΣΑΡΑ", "σαρα"));
        assert!(!same_name("Émile", "emile"));
        assert!(!same_name("Alice", "Alic"));
    }

    #[test]
    fn sanctioned_needs_two_matches() {
        let mut participants = vec![Participant::new("Alice"), Participant::new("Eve")];
        apply_placements(&mut participants, &[Placement { name: format!("Alice"), place: 3 }]);
        assert_eq!(rank(participants, RankingMode::Sanctioned), Err(RankingError::InsufficientRankingData { matched: 1 }));
    }

    #[test]
    fn casual_orders_by_score_with_stable_ties() {
        let participants = vec![
            Participant::with_score("Alice", None),
            Participant::with_score("Bob", Some(1200)),
            Participant::with_score("Carol", Some(0)),
            Participant::with_score("Dave", Some(1500)),
        ];
        let ranked = rank(participants, RankingMode::Casual).unwrap();
        assert_eq!(names(&ranked), ["Dave", "Bob", "Alice", "Carol"]);
    }
}
