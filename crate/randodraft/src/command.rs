//! Parsing of chat commands.

use {
    std::collections::HashSet,
    crate::{
        ranking::same_name,
        session::DraftError,
        turn::Limits,
    },
};

const MANUAL_USAGE: &str = "!draft manual <drafter> <drafter> [<drafter>…] <bans> <major_picks> <minor_picks> [preset] [--tournament] [--allow_default_picks]";
const RANDOM_USAGE: &str = "!draft random <count> [preset] [--qualifier] [--allow_default_picks]";
const DRAFT_USAGE: &str = "!draft manual|random|cancel|status|retry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Draft(DraftCommand),
    First,
    Second,
    /// Arguments are checked by the session, so a wrong count gets a usage hint only when it's the sender's turn.
    Ban(Vec<String>),
    Skip,
    Pick(Vec<String>),
    Settings(Option<String>),
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftCommand {
    Manual(ManualParams),
    Random(RandomParams),
    Cancel,
    Status,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualParams {
    /// In the order given, before ranking.
    pub drafters: Vec<String>,
    pub limits: Limits,
    pub preset: Option<String>,
    pub tournament: bool,
    pub allow_default_picks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomParams {
    pub count: u8,
    pub preset: Option<String>,
    pub qualifier: bool,
    pub allow_default_picks: bool,
}

impl Command {
    /// Returns `None` for messages that aren't commands this bot handles.
    pub fn parse(text: &str) -> Option<Result<Self, DraftError>> {
        let mut words = text.split_whitespace();
        let name = words.next()?.strip_prefix('!')?.to_lowercase();
        let args = words.map(str::to_owned).collect::<Vec<_>>();
        Some(Ok(match &*name {
            "draft" => return Some(parse_draft(args).map(Self::Draft)),
            "first" => Self::First,
            "second" => Self::Second,
            "ban" => Self::Ban(args),
            "skip" => Self::Skip,
            "pick" => Self::Pick(args),
            "settings" => Self::Settings(args.into_iter().next().map(|setting| setting.to_lowercase())),
            "reveal" => Self::Reveal,
            _ => return None,
        }))
    }
}

fn parse_draft(args: Vec<String>) -> Result<DraftCommand, DraftError> {
    let mut args = args.into_iter();
    let Some(subcommand) = args.next() else { return Err(DraftError::InvalidSyntax { usage: DRAFT_USAGE }) };
    let rest = args.collect::<Vec<_>>();
    let bare = rest.is_empty();
    let no_args = |command: DraftCommand| if bare { Ok(command) } else { Err(DraftError::InvalidSyntax { usage: DRAFT_USAGE }) };
    match &*subcommand.to_lowercase() {
        "manual" => parse_manual(rest).map(DraftCommand::Manual),
        "random" => parse_random(rest).map(DraftCommand::Random),
        "cancel" => no_args(DraftCommand::Cancel),
        "status" => no_args(DraftCommand::Status),
        "retry" => no_args(DraftCommand::Retry),
        _ => Err(DraftError::InvalidSyntax { usage: DRAFT_USAGE }),
    }
}

/// Splits `--flags` from positional arguments. Flags not in `known` are a syntax error.
fn split_flags(args: Vec<String>, known: &[&str], usage: &'static str) -> Result<(Vec<String>, HashSet<String>), DraftError> {
    let mut positional = Vec::default();
    let mut flags = HashSet::default();
    for arg in args {
        if let Some(flag) = arg.strip_prefix("--") {
            let flag = flag.to_lowercase();
            if !known.contains(&&*flag) {
                return Err(DraftError::InvalidSyntax { usage })
            }
            flags.insert(flag);
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, flags))
}

fn parse_manual(args: Vec<String>) -> Result<ManualParams, DraftError> {
    let syntax = || DraftError::InvalidSyntax { usage: MANUAL_USAGE };
    let (positional, flags) = split_flags(args, &["tournament", "allow_default_picks"], MANUAL_USAGE)?;
    // the three counts come last, optionally followed by a preset, so drafter names may be numbers too
    let (rest, preset) = match positional.split_last() {
        Some((last, rest)) if last.parse::<u8>().is_err() => (rest, Some(last.to_lowercase())),
        _ => (&*positional, None),
    };
    let Some(counts_start) = rest.len().checked_sub(3) else { return Err(syntax()) };
    let (drafters, [bans, major_picks, minor_picks]) = rest.split_at(counts_start) else { return Err(syntax()) };
    let limits = Limits {
        bans: bans.parse().map_err(|_| syntax())?,
        major_picks: major_picks.parse().map_err(|_| syntax())?,
        minor_picks: minor_picks.parse().map_err(|_| syntax())?,
    };
    if drafters.len() < 2 {
        return Err(DraftError::InsufficientParticipants)
    }
    for (idx, drafter) in drafters.iter().enumerate() {
        if drafters[..idx].iter().any(|earlier| same_name(earlier, drafter)) {
            return Err(DraftError::DuplicateDrafter(drafter.clone()))
        }
    }
    Ok(ManualParams {
        drafters: drafters.to_vec(),
        tournament: flags.contains("tournament"),
        allow_default_picks: flags.contains("allow_default_picks"),
        limits, preset,
    })
}

fn parse_random(args: Vec<String>) -> Result<RandomParams, DraftError> {
    let syntax = || DraftError::InvalidSyntax { usage: RANDOM_USAGE };
    let (positional, flags) = split_flags(args, &["qualifier", "allow_default_picks"], RANDOM_USAGE)?;
    let (count, preset) = match &*positional {
        [count] => (count, None),
        [count, preset] => (count, Some(preset.to_lowercase())),
        _ => return Err(syntax()),
    };
    Ok(RandomParams {
        count: count.parse().map_err(|_| syntax())?,
        qualifier: flags.contains("qualifier"),
        allow_default_picks: flags.contains("allow_default_picks"),
        preset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Command, DraftError> {
        Command::parse(text).expect("not a command")
    }

    #[test]
    fn ignores_chatter() {
        assert_eq!(Command::parse("gl hf"), None);
        assert_eq!(Command::parse("!seed s6"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn turn_commands() {
        assert_eq!(parse("!FIRST"), Ok(Command::First));
        assert_eq!(parse("!ban bridge"), Ok(Command::Ban(vec![format!("bridge")])));
        assert_eq!(parse("!pick keys anywhere"), Ok(Command::Pick(vec![format!("keys"), format!("anywhere")])));
        assert_eq!(parse("!settings Bridge"), Ok(Command::Settings(Some(format!("bridge")))));
        assert_eq!(parse("!settings"), Ok(Command::Settings(None)));
    }

    #[test]
    fn manual_draft() {
        assert_eq!(parse("!draft manual Alice Bob 1 1 1 s6 --tournament"), Ok(Command::Draft(DraftCommand::Manual(ManualParams {
            drafters: vec![format!("Alice"), format!("Bob")],
            limits: Limits { bans: 1, major_picks: 1, minor_picks: 1 },
            preset: Some(format!("s6")),
            tournament: true,
            allow_default_picks: false,
        }))));
        assert_eq!(parse("!draft manual Alice 1 1 1"), Err(DraftError::InsufficientParticipants));
        assert_eq!(parse("!draft manual Alice alice 1 1 1"), Err(DraftError::DuplicateDrafter(format!("alice"))));
        assert_eq!(parse("!draft manual Alice Bob 1 1"), Err(DraftError::InvalidSyntax { usage: MANUAL_USAGE }));
        assert_eq!(parse("!draft manual Alice Bob 1 1 1 --fast"), Err(DraftError::InvalidSyntax { usage: MANUAL_USAGE }));
        assert_eq!(parse("!draft manual Alice Bob 1 1 1 s6 extra"), Err(DraftError::InvalidSyntax { usage: MANUAL_USAGE }));
    }

    #[test]
    fn numeric_drafter_names() {
        assert_eq!(parse("!draft manual 42 Bob 2 1 0 --allow_default_picks"), Ok(Command::Draft(DraftCommand::Manual(ManualParams {
            drafters: vec![format!("42"), format!("Bob")],
            limits: Limits { bans: 2, major_picks: 1, minor_picks: 0 },
            preset: None,
            tournament: false,
            allow_default_picks: true,
        }))));
        assert_eq!(parse("!draft manual Alice 7 1 1 1 S7"), Ok(Command::Draft(DraftCommand::Manual(ManualParams {
            drafters: vec![format!("Alice"), format!("7")],
            limits: Limits { bans: 1, major_picks: 1, minor_picks: 1 },
            preset: Some(format!("s7")),
            tournament: false,
            allow_default_picks: false,
        }))));
    }

    #[test]
    fn random_draft() {
        assert_eq!(parse("!draft random 4 --qualifier"), Ok(Command::Draft(DraftCommand::Random(RandomParams {
            count: 4,
            preset: None,
            qualifier: true,
            allow_default_picks: false,
        }))));
        assert_eq!(parse("!draft random lots"), Err(DraftError::InvalidSyntax { usage: RANDOM_USAGE }));
        assert_eq!(parse("!draft cancel"), Ok(Command::Draft(DraftCommand::Cancel)));
        assert_eq!(parse("!draft"), Err(DraftError::InvalidSyntax { usage: DRAFT_USAGE }));
    }
}
