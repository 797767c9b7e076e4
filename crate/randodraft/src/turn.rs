use serde::{
    Deserialize,
    Serialize,
};

/// Per-participant ban and pick allotments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub bans: u8,
    pub major_picks: u8,
    pub minor_picks: u8,
}

/// Tracks whose turn it is and how much of each phase has been used up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnScheduler {
    participants: usize,
    current_index: usize,
    first_index: usize,
    ban_count: usize,
    /// Pick slots used so far. Slots of a tier that ran out of settings count as used.
    pick_count: usize,
    limits: Limits,
}

impl TurnScheduler {
    pub fn new(participants: usize, limits: Limits) -> Self {
        Self {
            current_index: 0,
            first_index: 0,
            ban_count: 0,
            pick_count: 0,
            participants, limits,
        }
    }

    pub fn current_index(&self) -> usize { self.current_index }
    pub fn ban_count(&self) -> usize { self.ban_count }
    pub fn pick_count(&self) -> usize { self.pick_count }

    pub fn total_bans(&self) -> usize {
        usize::from(self.limits.bans) * self.participants
    }

    pub fn major_quota(&self) -> usize {
        usize::from(self.limits.major_picks) * self.participants
    }

    pub fn total_picks(&self) -> usize {
        (usize::from(self.limits.major_picks) + usize::from(self.limits.minor_picks)) * self.participants
    }

    /// Makes the participant at `index` the one who starts each phase, and gives them the turn.
    pub fn set_first(&mut self, index: usize) {
        assert!(index < self.participants, "first pick index out of range");
        self.first_index = index;
        self.current_index = index;
    }

    pub fn restart_from_first(&mut self) {
        self.current_index = self.first_index;
    }

    pub fn advance_turn(&mut self) {
        self.current_index = (self.current_index + 1) % self.participants;
    }

    /// Counts a ban or skip and passes the turn on.
    pub fn record_ban(&mut self) {
        self.ban_count += 1;
        self.advance_turn();
    }

    pub fn record_pick(&mut self) {
        self.pick_count += 1;
        self.advance_turn();
    }

    /// Gives up the remaining major pick slots, used when the major tier is empty.
    pub fn forfeit_major_picks(&mut self) {
        self.pick_count = self.pick_count.max(self.major_quota());
    }

    pub fn forfeit_minor_picks(&mut self) {
        self.pick_count = self.pick_count.max(self.total_picks());
    }

    pub fn forfeit_bans(&mut self) {
        self.ban_count = self.ban_count.max(self.total_bans());
    }

    pub fn bans_done(&self) -> bool {
        self.ban_count >= self.total_bans()
    }

    pub fn major_picks_done(&self) -> bool {
        self.pick_count >= self.major_quota()
    }

    pub fn picks_done(&self) -> bool {
        self.pick_count >= self.total_picks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_EACH: Limits = Limits { bans: 1, major_picks: 1, minor_picks: 1 };

    #[test]
    fn two_participants_alternate() {
        let mut turn = TurnScheduler::new(2, ONE_EACH);
        turn.set_first(1);
        let mut seen = vec![turn.current_index()];
        turn.record_ban();
        seen.push(turn.current_index());
        turn.record_ban();
        seen.push(turn.current_index());
        turn.record_pick();
        seen.push(turn.current_index());
        assert_eq!(seen, [1, 0, 1, 0]);
        assert!(turn.bans_done());
        assert!(!turn.major_picks_done());
    }

    #[test]
    fn round_robin_for_more_participants() {
        let mut turn = TurnScheduler::new(3, Limits { bans: 2, major_picks: 0, minor_picks: 0 });
        let order = (0..6).map(|_| {
            let current = turn.current_index();
            turn.record_ban();
            current
        }).collect::<Vec<_>>();
        assert_eq!(order, [0, 1, 2, 0, 1, 2]);
        assert!(turn.bans_done());
        assert!(turn.picks_done());
    }

    #[test]
    fn quotas_scale_with_participants() {
        let turn = TurnScheduler::new(3, Limits { bans: 1, major_picks: 2, minor_picks: 1 });
        assert_eq!(turn.total_bans(), 3);
        assert_eq!(turn.major_quota(), 6);
        assert_eq!(turn.total_picks(), 9);
    }

    #[test]
    fn forfeiting_major_picks_keeps_minor_slots() {
        let mut turn = TurnScheduler::new(2, Limits { bans: 0, major_picks: 2, minor_picks: 1 });
        turn.record_pick();
        turn.forfeit_major_picks();
        assert!(turn.major_picks_done());
        assert!(!turn.picks_done());
        turn.record_pick();
        turn.record_pick();
        assert!(turn.picks_done());
    }
}
