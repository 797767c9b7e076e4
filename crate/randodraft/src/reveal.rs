//! Publishing the drafted settings, possibly only after a delay.

use {
    chrono::{
        DateTime,
        TimeDelta,
        Utc,
    },
    crate::{
        format_duration,
        session::{
            DraftSession,
            Phase,
        },
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    Published {
        summary: String,
        /// The room should only admit invited entrants from now on.
        restrict_entry: bool,
    },
    AlreadyRevealed,
    /// `remaining` is `None` while the seed hasn't been generated yet.
    NotYet {
        remaining: Option<TimeDelta>,
    },
    NotComplete,
}

impl RevealOutcome {
    pub fn reply(&self, sender: &str) -> String {
        match self {
            Self::Published { summary, .. } => format!("Drafted settings: {summary}"),
            Self::AlreadyRevealed => format!("The settings have already been revealed."),
            Self::NotYet { remaining: Some(remaining) } => format!("Sorry {sender}, the settings will be revealed in {}.", format_duration(*remaining)),
            Self::NotYet { remaining: None } => format!("Sorry {sender}, the settings will be revealed once the seed has been generated."),
            Self::NotComplete => format!("Sorry {sender}, the draft isn't finished yet."),
        }
    }
}

/// When a delayed reveal becomes possible, if the session has one.
pub fn reveal_time(session: &DraftSession) -> Option<DateTime<Utc>> {
    if session.kind().is_gated() && session.phase() == Phase::Complete {
        Some(session.generated_at()? + session.reveal_delay())
    } else {
        None
    }
}

pub fn may_reveal(session: &DraftSession, now: DateTime<Utc>) -> bool {
    session.phase() == Phase::Complete && (!session.kind().is_gated() || reveal_time(session).is_some_and(|at| now >= at))
}

pub fn reveal(session: &mut DraftSession, now: DateTime<Utc>) -> RevealOutcome {
    match session.phase() {
        Phase::Revealed => RevealOutcome::AlreadyRevealed,
        Phase::Complete => if may_reveal(session, now) {
            session.mark_revealed();
            RevealOutcome::Published {
                summary: session.summary(),
                restrict_entry: session.kind().is_gated(),
            }
        } else {
            RevealOutcome::NotYet { remaining: reveal_time(session).map(|at| at - now) }
        },
        Phase::Setup | Phase::OrderSelection | Phase::Ban | Phase::MajorPick | Phase::MinorPick | Phase::Cancelled => RevealOutcome::NotComplete,
    }
}

#[cfg(test)]
mod tests {
    use {
        rand::{
            SeedableRng as _,
            rngs::StdRng,
        },
        crate::{
            SessionKind,
            catalog::{
                Fragment,
                SettingPool,
            },
            seed::GeneratedSeed,
            session::SessionConfig,
            turn::Limits,
        },
        super::*,
    };

    fn completed(kind: SessionKind, generated_at: Option<DateTime<Utc>>) -> DraftSession {
        let mut session = DraftSession::new(SessionConfig {
            participants: Vec::default(),
            limits: Limits { bans: 0, major_picks: 0, minor_picks: 0 },
            random_count: 2,
            allow_default_picks: false,
            preset: format!("s6"),
            base: Fragment::default(),
            pool: SettingPool::tournament().unwrap(),
            reveal_delay: TimeDelta::minutes(10),
            kind,
        }).unwrap();
        session.begin(&mut StdRng::seed_from_u64(7));
        if let Some(generated_at) = generated_at {
            session.record_seed(GeneratedSeed { id: format!("1"), uri: format!("https://ootrandomizer.com/seed/get?id=1") }, generated_at);
        }
        session
    }

    #[test]
    fn random_sessions_reveal_right_away() {
        let now = Utc::now();
        let mut session = completed(SessionKind::Random, None);
        assert!(may_reveal(&session, now));
        assert!(matches!(reveal(&mut session, now), RevealOutcome::Published { restrict_entry: false, .. }));
        assert_eq!(reveal(&mut session, now), RevealOutcome::AlreadyRevealed);
    }

    #[test]
    fn qualifier_waits_for_seed() {
        let now = Utc::now();
        let mut session = completed(SessionKind::Qualifier, None);
        assert!(!may_reveal(&session, now));
        assert_eq!(reveal(&mut session, now), RevealOutcome::NotYet { remaining: None });
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn qualifier_gate_opens_after_delay() {
        let generated_at = Utc::now();
        let mut session = completed(SessionKind::Qualifier, Some(generated_at));
        assert_eq!(reveal_time(&session), Some(generated_at + TimeDelta::minutes(10)));
        let early = reveal(&mut session, generated_at + TimeDelta::minutes(2));
        assert_eq!(early, RevealOutcome::NotYet { remaining: Some(TimeDelta::minutes(8)) });
        assert!(early.reply("Alice").contains("8 minutes"));
        assert!(may_reveal(&session, generated_at + TimeDelta::minutes(10)));
        assert!(matches!(reveal(&mut session, generated_at + TimeDelta::minutes(11)), RevealOutcome::Published { restrict_entry: true, .. }));
        assert_eq!(reveal(&mut session, generated_at + TimeDelta::minutes(12)), RevealOutcome::AlreadyRevealed);
        assert_eq!(reveal_time(&session), None);
    }
}
