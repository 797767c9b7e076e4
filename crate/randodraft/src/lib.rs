//! Settings draft engine for randomizer race rooms.
//!
//! A [`room::Room`] receives chat messages, and for each race room owns at most one [`session::DraftSession`] which negotiates
//! the settings of the race through bans and picks (or picks them at random), after which the compiled settings are handed
//! to a [`source::SeedGenerator`].

use {
    std::fmt,
    chrono::TimeDelta,
    itertools::Itertools as _,
    serde::{
        Deserialize,
        Serialize,
    },
    crate::ranking::RankingMode,
};

pub mod catalog;
pub mod command;
pub mod compile;
pub mod ranking;
pub mod reveal;
pub mod room;
pub mod seed;
pub mod session;
pub mod source;
pub mod turn;

/// A setting together with the option it was drafted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub setting: String,
    pub option: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    /// Bans and picks between drafters ordered by room score.
    Manual,
    /// Bans and picks between drafters ordered by qualifier placement.
    Tournament,
    /// Settings are chosen at random and announced right away.
    Random,
    /// Settings are chosen at random and kept secret until the reveal delay has passed.
    Qualifier,
}

impl SessionKind {
    pub fn ranking_mode(self) -> Option<RankingMode> {
        match self {
            Self::Manual => Some(RankingMode::Casual),
            Self::Tournament => Some(RankingMode::Sanctioned),
            Self::Random | Self::Qualifier => None,
        }
    }

    pub fn is_automated(self) -> bool {
        matches!(self, Self::Random | Self::Qualifier)
    }

    /// Whether the drafted settings stay hidden until the reveal gate opens.
    pub fn is_gated(self) -> bool {
        matches!(self, Self::Qualifier)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual draft"),
            Self::Tournament => write!(f, "tournament draft"),
            Self::Random => write!(f, "random draft"),
            Self::Qualifier => write!(f, "qualifier draft"),
        }
    }
}

/// Joins items as an English list: `a`, `a and b`, `a, b, and c`.
pub fn natjoin<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> Option<String> {
    let mut items = items.into_iter().map(|item| item.to_string()).collect_vec();
    Some(match items.len() {
        0 => return None,
        1 => items.remove(0),
        2 => format!("{} and {}", items[0], items[1]),
        _ => {
            let last = items.pop()?;
            format!("{}, and {last}", items.into_iter().format(", "))
        }
    })
}

/// Formats a duration the way it's shown in chat, e.g. `1 hour and 5 minutes`.
pub fn format_duration(duration: TimeDelta) -> String {
    let mut parts = Vec::default();
    let hours = duration.num_hours();
    if hours > 0 {
        parts.push(format!("{hours} hour{}", if hours == 1 { "" } else { "s" }));
    }
    let minutes = duration.num_minutes() % 60;
    if minutes > 0 {
        parts.push(format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" }));
    }
    let seconds = duration.num_seconds() % 60;
    if seconds > 0 {
        parts.push(format!("{seconds} second{}", if seconds == 1 { "" } else { "s" }));
    }
    natjoin(parts).unwrap_or_else(|| format!("0 seconds"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natjoin_lists() {
        assert_eq!(natjoin(Vec::<&str>::default()), None);
        assert_eq!(natjoin(["bridge"]).as_deref(), Some("bridge"));
        assert_eq!(natjoin(["bridge", "deku"]).as_deref(), Some("bridge and deku"));
        assert_eq!(natjoin(["bridge", "deku", "keys"]).as_deref(), Some("bridge, deku, and keys"));
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(TimeDelta::minutes(8)), "8 minutes");
        assert_eq!(format_duration(TimeDelta::seconds(3661)), "1 hour, 1 minute, and 1 second");
        assert_eq!(format_duration(TimeDelta::zero()), "0 seconds");
    }
}
