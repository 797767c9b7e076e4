use {
    std::collections::{
        BTreeMap,
        BTreeSet,
    },
    chrono::{
        DateTime,
        TimeDelta,
        Utc,
    },
    itertools::Itertools as _,
    rand::prelude::*,
    serde::{
        Deserialize,
        Serialize,
    },
    crate::{
        Selection,
        SessionKind,
        catalog::{
            Fragment,
            SettingPool,
            Tier,
        },
        compile::compile,
        format_duration,
        natjoin,
        ranking::{
            Participant,
            RankingError,
        },
        seed::{
            GeneratedSeed,
            GenerationError,
        },
        turn::{
            Limits,
            TurnScheduler,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Setup,
    OrderSelection,
    Ban,
    MajorPick,
    MinorPick,
    Complete,
    Revealed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Revealed | Self::Cancelled)
    }

    pub fn pick_tier(self) -> Option<Tier> {
        match self {
            Self::MajorPick => Some(Tier::Major),
            Self::MinorPick => Some(Tier::Minor),
            _ => None,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Setup => "the draft is being set up",
            Self::OrderSelection => "the draft order is being decided",
            Self::Ban => "it's time for bans",
            Self::MajorPick => "it's time for major picks",
            Self::MinorPick => "it's time for minor picks",
            Self::Complete | Self::Revealed => "the draft is over",
            Self::Cancelled => "the draft was cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    First,
    Second,
}

/// A turn-based draft command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Order(Order),
    Ban(&'a [String]),
    Skip,
    Pick(&'a [String]),
}

impl Action<'_> {
    /// The phases in which this action is accepted. Checked before anything else.
    pub fn phases(&self) -> &'static [Phase] {
        match self {
            Self::Order(_) => &[Phase::OrderSelection],
            Self::Ban(_) | Self::Skip => &[Phase::Ban],
            Self::Pick(_) => &[Phase::MajorPick, Phase::MinorPick],
        }
    }

    fn command(&self) -> &'static str {
        match self {
            Self::Order(Order::First) => "!first",
            Self::Order(Order::Second) => "!second",
            Self::Ban(_) => "!ban",
            Self::Skip => "!skip",
            Self::Pick(_) => "!pick",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)] Generation(#[from] GenerationError),
    #[error(transparent)] Ranking(#[from] RankingError),
    #[error("{setting} was set to its default option {option}")]
    DefaultOption {
        setting: String,
        option: String,
    },
    #[error("a draft is already in progress")]
    DraftInProgress,
    #[error("drafter {0} given more than once")]
    DuplicateDrafter(String),
    #[error("the drafted settings are still hidden")]
    Hidden,
    #[error("a draft needs at least two drafters")]
    InsufficientParticipants,
    #[error("invalid syntax, usage: {usage}")]
    InvalidSyntax {
        usage: &'static str,
    },
    #[error("drafter {0} is not in the race room")]
    MissingDrafter(String),
    #[error("no draft in progress")]
    NoDraft,
    #[error("no failed seed to retry")]
    NothingToRetry,
    #[error("preset source unavailable: {0}")]
    PresetUnavailable(String),
    #[error("ranking source unavailable: {0}")]
    RankingUnavailable(String),
    #[error("unknown option {option:?} of setting {setting}")]
    UnknownOption {
        setting: String,
        option: String,
        available: Vec<String>,
    },
    #[error("unknown preset {preset:?}")]
    UnknownPreset {
        preset: String,
        available: Vec<String>,
    },
    #[error("unknown setting {0:?}")]
    UnknownSetting(String),
    #[error("{command} is not valid while {}", .phase.description())]
    WrongPhase {
        command: &'static str,
        phase: Phase,
        /// Only drafters are told about commands sent at the wrong time.
        participant: bool,
    },
    #[error("only race monitors may {action}")]
    Unprivileged {
        action: &'static str,
    },
    #[error("{setting} is a {tier} setting")]
    WrongTier {
        setting: String,
        tier: Tier,
    },
    #[error("not the sender's turn")]
    WrongTurn,
}

impl DraftError {
    /// The chat reply for this error, or `None` if it should be ignored silently.
    pub fn reply(&self, sender: &str) -> Option<String> {
        Some(match self {
            Self::Generation(_) => format!("Sorry, but it looks like the seed failed to generate. Use !draft retry to try again."),
            Self::Ranking(RankingError::InsufficientRankingData { .. }) => format!("Sorry {sender}, I couldn't find enough of the drafters in the qualifier rankings. Please try again."),
            Self::DefaultOption { setting, option } => format!("Sorry {sender}, {option} is already the default for {setting}. Pick a different option."),
            Self::DraftInProgress => format!("Sorry {sender}, there is already a draft in progress. Use !draft cancel first."),
            Self::DuplicateDrafter(_) => format!("You may not assign the same drafter more than once. Please try again."),
            Self::Hidden => format!("Sorry {sender}, the settings for this race are hidden until they're revealed."),
            Self::InsufficientParticipants => format!("Sorry {sender}, a draft needs at least two drafters."),
            Self::InvalidSyntax { usage } => format!("Invalid syntax. Usage: {usage}"),
            Self::MissingDrafter(name) => format!("Unable to locate {name} in the room. Please try again."),
            Self::NoDraft => format!("Sorry {sender}, there is no draft in progress."),
            Self::NothingToRetry => format!("Sorry {sender}, there is no failed seed to retry."),
            Self::PresetUnavailable(_) => format!("Sorry {sender}, I couldn't load the presets right now. Please try again later."),
            Self::RankingUnavailable(_) => format!("Sorry {sender}, I couldn't load the qualifier rankings right now. Please try again later."),
            Self::UnknownOption { setting, option, available } => format!(
                "Sorry {sender}, {option} is not an option for {setting}. Available options: {}",
                natjoin(available).unwrap_or_else(|| format!("none")),
            ),
            Self::UnknownPreset { preset, available } => format!(
                "Sorry {sender}, I don't recognise the preset {preset}. Valid presets are: {}",
                natjoin(available).unwrap_or_else(|| format!("none")),
            ),
            Self::UnknownSetting(setting) => format!("Sorry {sender}, {setting} is not available. Use !settings to see what's left."),
            Self::WrongPhase { participant: false, .. } | Self::WrongTurn => return None,
            Self::WrongPhase { command, phase, participant: true } => format!("Sorry {sender}, you can't use {command} now, {}.", phase.description()),
            Self::Unprivileged { action } => format!("Sorry {sender}, only race monitors can {action}."),
            Self::WrongTier { setting, tier } => format!("Sorry {sender}, {setting} is a {tier} setting and can't be picked right now."),
        })
    }
}

/// Everything needed to set up a session. Drafters are expected in priority order.
pub struct SessionConfig {
    pub kind: SessionKind,
    pub participants: Vec<Participant>,
    pub limits: Limits,
    pub random_count: u8,
    pub allow_default_picks: bool,
    pub preset: String,
    pub base: Fragment,
    pub pool: SettingPool,
    pub reveal_delay: TimeDelta,
}

/// The settings draft of one race room.
///
/// All state needed to continue the draft lives here, so it can be serialized between messages and restored as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSession {
    kind: SessionKind,
    phase: Phase,
    participants: Vec<Participant>,
    turn: TurnScheduler,
    random_count: u8,
    allow_default_picks: bool,
    pool: SettingPool,
    picks: Vec<Selection>,
    /// Settings that were picked at their default option, allowed by `--allow_default_picks`.
    #[serde(default)]
    default_picks: BTreeSet<String>,
    bans: Vec<Selection>,
    /// Human-readable `Setting: Option` text for each ban and pick, keyed by setting.
    descriptions: BTreeMap<String, String>,
    data: Fragment,
    preset: String,
    base: Fragment,
    submitted: bool,
    seed: Option<GeneratedSeed>,
    generated_at: Option<DateTime<Utc>>,
    reveal_delay_secs: i64,
}

impl DraftSession {
    pub fn new(config: SessionConfig) -> Result<Self, DraftError> {
        let SessionConfig { kind, participants, limits, random_count, allow_default_picks, preset, base, mut pool, reveal_delay } = config;
        if !kind.is_automated() && participants.len() < 2 {
            return Err(DraftError::InsufficientParticipants)
        }
        if !allow_default_picks {
            pool.remove_noop_options(&base);
        }
        Ok(Self {
            phase: Phase::Setup,
            turn: TurnScheduler::new(participants.len().max(1), limits),
            picks: Vec::default(),
            default_picks: BTreeSet::default(),
            bans: Vec::default(),
            descriptions: BTreeMap::default(),
            data: Fragment::default(),
            submitted: false,
            seed: None,
            generated_at: None,
            reveal_delay_secs: reveal_delay.num_seconds(),
            kind, participants, random_count, allow_default_picks, pool, preset, base,
        })
    }

    pub fn kind(&self) -> SessionKind { self.kind }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn participants(&self) -> &[Participant] { &self.participants }
    pub fn turn(&self) -> &TurnScheduler { &self.turn }
    pub fn pool(&self) -> &SettingPool { &self.pool }
    pub fn picks(&self) -> &[Selection] { &self.picks }
    pub fn bans(&self) -> &[Selection] { &self.bans }
    pub fn data(&self) -> &Fragment { &self.data }
    pub fn preset(&self) -> &str { &self.preset }
    pub fn seed(&self) -> Option<&GeneratedSeed> { self.seed.as_ref() }
    pub fn generated_at(&self) -> Option<DateTime<Utc>> { self.generated_at }

    /// Whether the settings have been handed to the seed generator at least once.
    pub fn is_submitted(&self) -> bool { self.submitted }

    pub fn reveal_delay(&self) -> TimeDelta {
        TimeDelta::seconds(self.reveal_delay_secs)
    }

    pub fn is_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|participant| participant.is(name))
    }

    /// The drafter whose turn it is, if the draft is waiting on one.
    pub fn current_participant(&self) -> Option<&Participant> {
        match self.phase {
            Phase::OrderSelection => self.participants.first(),
            Phase::Ban | Phase::MajorPick | Phase::MinorPick => self.participants.get(self.turn.current_index()),
            Phase::Setup | Phase::Complete | Phase::Revealed | Phase::Cancelled => None,
        }
    }

    /// Leaves the setup phase: asks for the draft order, or for automated sessions drafts everything right away.
    pub fn begin(&mut self, rng: &mut impl Rng) -> Vec<String> {
        let mut messages = Vec::default();
        if self.phase != Phase::Setup {
            return messages
        }
        if self.kind.is_automated() {
            self.draft_randomly(rng);
            self.phase = Phase::Complete;
            messages.push(self.completion_message());
        } else if self.participants.len() == 2 {
            self.phase = Phase::OrderSelection;
            messages.push(format!(
                "{}, you have the higher seed. Choose whether you want to ban first or second with !first or !second.",
                self.participants[0].name,
            ));
        } else {
            self.start_bans(0, &mut messages);
        }
        messages
    }

    pub fn apply(&mut self, sender: &str, action: Action<'_>) -> Result<Vec<String>, DraftError> {
        if !action.phases().contains(&self.phase) {
            return Err(DraftError::WrongPhase {
                command: action.command(),
                phase: self.phase,
                participant: self.is_participant(sender),
            })
        }
        let current = self.current_participant().ok_or(DraftError::WrongTurn)?;
        if !current.is(sender) {
            return Err(DraftError::WrongTurn)
        }
        let current = current.name.clone();
        let mut messages = Vec::default();
        match action {
            Action::Order(order) => {
                let first = match order {
                    Order::First => 0,
                    Order::Second => 1,
                };
                messages.push(format!("{current} will ban {}.", match order { Order::First => "first", Order::Second => "second" }));
                self.start_bans(first, &mut messages);
            }
            Action::Ban(args) => {
                let [setting] = args else { return Err(DraftError::InvalidSyntax { usage: "!ban <setting>" }) };
                let setting = setting.to_lowercase();
                let (tier, _) = self.pool.find(&setting).ok_or_else(|| DraftError::UnknownSetting(setting.clone()))?;
                let removed = self.pool.remove(tier, &setting).map_err(|_| DraftError::UnknownSetting(setting.clone()))?;
                self.data.extend(removed.default.data.iter().map(|(key, value)| (key.clone(), value.clone())));
                let description = format!("{}: {}", removed.name, removed.default.label);
                messages.push(format!("{current} banned {}.", removed.name));
                self.descriptions.insert(setting.clone(), description);
                self.bans.push(Selection { setting, option: removed.default.key });
                self.turn.record_ban();
                self.advance(&mut messages);
            }
            Action::Skip => {
                messages.push(format!("{current} skipped their ban."));
                self.turn.record_ban();
                self.advance(&mut messages);
            }
            Action::Pick(args) => {
                let [setting, option] = args else { return Err(DraftError::InvalidSyntax { usage: "!pick <setting> <option>" }) };
                let (setting, option) = (setting.to_lowercase(), option.to_lowercase());
                let tier = self.phase.pick_tier().ok_or(DraftError::WrongTurn)?;
                let Some(draftable) = self.pool.get(tier, &setting) else {
                    return Err(if self.pool.get(tier.other(), &setting).is_some() {
                        DraftError::WrongTier { setting, tier: tier.other() }
                    } else {
                        DraftError::UnknownSetting(setting)
                    })
                };
                let Some(chosen) = draftable.option(&option) else {
                    return Err(DraftError::UnknownOption {
                        available: draftable.other.iter().map(|option| option.key.clone()).collect(),
                        setting, option,
                    })
                };
                let is_default = draftable.is_default(&option);
                if is_default && !self.allow_default_picks {
                    return Err(DraftError::DefaultOption { setting, option })
                }
                let description = format!("{}: {}", draftable.name, chosen.label);
                self.data.extend(chosen.data.iter().map(|(key, value)| (key.clone(), value.clone())));
                messages.push(format!("{current} picked {description}."));
                self.pool.remove(tier, &setting).map_err(|_| DraftError::UnknownSetting(setting.clone()))?;
                self.descriptions.insert(setting.clone(), description);
                if is_default {
                    self.default_picks.insert(setting.clone());
                }
                self.picks.push(Selection { setting, option });
                self.turn.record_pick();
                self.advance(&mut messages);
            }
        }
        Ok(messages)
    }

    fn start_bans(&mut self, first: usize, messages: &mut Vec<String>) {
        self.turn.set_first(first);
        for (idx, participant) in self.participants.iter_mut().enumerate() {
            participant.first_pick = idx == first;
        }
        self.phase = Phase::Ban;
        self.advance(messages);
    }

    /// Moves past phases that are used up or have nothing left to draft, then announces whose turn it is.
    fn advance(&mut self, messages: &mut Vec<String>) {
        loop {
            match self.phase {
                Phase::Ban => if self.turn.bans_done() || self.pool.is_empty() {
                    self.turn.forfeit_bans();
                    self.turn.restart_from_first();
                    self.phase = Phase::MajorPick;
                    if self.turn.total_bans() > 0 {
                        messages.push(format!("Bans are done."));
                    }
                } else {
                    messages.push(format!("{}, it's your turn to ban a setting. Use !ban <setting> or !skip.", self.turn_name()));
                    break
                },
                Phase::MajorPick => if self.turn.major_picks_done() || self.pool.draftable(Tier::Major).next().is_none() {
                    self.turn.forfeit_major_picks();
                    self.phase = Phase::MinorPick;
                } else {
                    messages.push(format!("{}, pick a major setting with !pick <setting> <option>. Use !settings to see what's left.", self.turn_name()));
                    break
                },
                Phase::MinorPick => if self.turn.picks_done() || self.pool.draftable(Tier::Minor).next().is_none() {
                    self.turn.forfeit_minor_picks();
                    self.phase = Phase::Complete;
                    messages.push(self.completion_message());
                    break
                } else {
                    messages.push(format!("{}, pick a minor setting with !pick <setting> <option>. Use !settings to see what's left.", self.turn_name()));
                    break
                },
                Phase::Setup | Phase::OrderSelection | Phase::Complete | Phase::Revealed | Phase::Cancelled => break,
            }
        }
    }

    fn turn_name(&self) -> &str {
        self.current_participant().map_or("Everyone", |participant| &participant.name)
    }

    fn completion_message(&self) -> String {
        if self.kind.is_gated() {
            format!(
                "Settings have been drafted. They will be revealed {} after the seed is rolled.",
                format_duration(self.reveal_delay()),
            )
        } else {
            format!("The draft is complete. {}", self.summary())
        }
    }

    /// Picks the requested number of settings at random: the first half (rounded up) from the major tier, the rest from the minor tier.
    fn draft_randomly(&mut self, rng: &mut impl Rng) {
        let count = usize::from(self.random_count);
        let major_count = count.div_ceil(2);
        for idx in 0..count {
            let preferred = if idx < major_count { Tier::Major } else { Tier::Minor };
            let Some((tier, key)) = [preferred, preferred.other()].into_iter()
                .find_map(|tier| Some((tier, self.pool.draftable(tier).choose(rng)?.key.clone())))
            else { break };
            let Ok(setting) = self.pool.remove(tier, &key) else { break };
            let Some(option) = setting.other.choose(rng) else { continue };
            self.data.extend(option.data.iter().map(|(key, value)| (key.clone(), value.clone())));
            self.descriptions.insert(key.clone(), format!("{}: {}", setting.name, option.label));
            self.picks.push(Selection { setting: key, option: option.key.clone() });
        }
    }

    /// Lists the settings that can currently be drafted, or the options of one setting.
    pub fn settings_listing(&self, setting: Option<&str>) -> Result<String, DraftError> {
        if self.kind.is_gated() && self.phase != Phase::Revealed {
            return Err(DraftError::Hidden)
        }
        if let Some(setting) = setting {
            let setting = setting.to_lowercase();
            let (tier, setting) = self.pool.find(&setting).ok_or(DraftError::UnknownSetting(setting))?;
            return Ok(format!(
                "{} ({tier}): {} (default: {})",
                setting.name,
                setting.other.iter().map(|option| format!("{} ({})", option.key, option.label)).format(", "),
                setting.default.key,
            ))
        }
        let tiers = match self.phase {
            Phase::MajorPick => &[Tier::Major][..],
            Phase::MinorPick => &[Tier::Minor][..],
            Phase::Setup | Phase::OrderSelection | Phase::Ban => &Tier::ALL[..],
            Phase::Complete | Phase::Revealed | Phase::Cancelled => return Ok(format!("The draft is over. {}", self.summary())),
        };
        Ok(tiers.iter().map(|&tier| format!(
            "Remaining {tier} settings: {}",
            natjoin(self.pool.draftable(tier).map(|setting| &setting.key)).unwrap_or_else(|| format!("none")),
        )).join(" | "))
    }

    pub fn status(&self) -> String {
        match self.phase {
            Phase::Setup => format!("The {} is being set up.", self.kind),
            Phase::OrderSelection | Phase::Ban | Phase::MajorPick | Phase::MinorPick => format!(
                "The {} is in progress, {}. Waiting on {}. Bans: {}/{}, picks: {}/{}.",
                self.kind,
                self.phase.description(),
                self.turn_name(),
                self.turn.ban_count(), self.turn.total_bans(),
                self.turn.pick_count(), self.turn.total_picks(),
            ),
            Phase::Complete => if let Some(ref seed) = self.seed {
                format!("The {} is complete. Seed: {}", self.kind, seed.uri)
            } else if self.submitted {
                format!("The {} is complete, but the seed failed to generate. Use !draft retry to try again.", self.kind)
            } else {
                format!("The {} is complete.", self.kind)
            },
            Phase::Revealed => format!("The {} is complete and its settings have been revealed.", self.kind),
            Phase::Cancelled => format!("The {} was cancelled.", self.kind),
        }
    }

    /// Bans and picks in a single line of chat.
    pub fn summary(&self) -> String {
        let describe = |selections: &[Selection]| natjoin(selections.iter().map(|selection| self.descriptions.get(&selection.setting).unwrap_or(&selection.setting)));
        let mut parts = Vec::default();
        if let Some(picks) = describe(&self.picks) {
            parts.push(format!("Picks: {picks}."));
        }
        if let Some(bans) = describe(&self.bans) {
            parts.push(format!("Bans: {bans}."));
        }
        if parts.is_empty() {
            format!("No settings were drafted.")
        } else {
            parts.join(" ")
        }
    }

    /// The settings to send to the seed generator. Picks of a default option take no part in the cross-setting rules.
    pub fn compile(&self) -> Fragment {
        let changed = self.picks.iter().filter(|pick| !self.default_picks.contains(&pick.setting)).cloned().collect_vec();
        compile(&self.base, &self.data, &changed)
    }

    pub fn cancel(&mut self) -> Result<(), DraftError> {
        if self.phase.is_terminal() {
            return Err(DraftError::WrongPhase { command: "!draft cancel", phase: self.phase, participant: true })
        }
        self.phase = Phase::Cancelled;
        Ok(())
    }

    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// Records a successfully generated seed. The reveal delay counts from `now`.
    pub fn record_seed(&mut self, seed: GeneratedSeed, now: DateTime<Utc>) {
        self.seed = Some(seed);
        self.generated_at = Some(now);
    }

    pub(crate) fn mark_revealed(&mut self) {
        self.phase = Phase::Revealed;
    }
}
