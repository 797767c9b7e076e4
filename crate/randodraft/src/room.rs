//! Ties chat commands, the draft session and the outside services of one race room together.

use {
    chrono::{
        DateTime,
        TimeDelta,
        Utc,
    },
    rand::Rng,
    serde::{
        Deserialize,
        Serialize,
    },
    tokio::time::Instant,
    crate::{
        SessionKind,
        catalog::{
            Fragment,
            SettingPool,
        },
        command::{
            Command,
            DraftCommand,
            ManualParams,
            RandomParams,
        },
        format_duration,
        ranking::{
            self,
            Participant,
            same_name,
        },
        reveal::{
            self,
            RevealOutcome,
        },
        seed::{
            Polling,
            generate_and_wait,
        },
        session::{
            Action,
            DraftError,
            DraftSession,
            Order,
            Phase,
            SessionConfig,
        },
        source::{
            PresetSource,
            RankingSource,
            SeedGenerator,
        },
        turn::Limits,
    },
};

/// Something the bot should do in the race room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Message(String),
    /// A message that should also be pinned.
    Pinned(String),
    RaceInfo(String),
    JoinPolicy(JoinPolicy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinPolicy {
    Open,
    InviteOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub name: String,
    pub score: Option<i64>,
}

pub struct RoomConfig {
    pub default_preset: String,
    pub pool: SettingPool,
    pub polling: Polling,
    pub reveal_delay: TimeDelta,
}

impl RoomConfig {
    pub fn new(pool: SettingPool) -> Self {
        Self {
            default_preset: format!("s6"),
            polling: Polling::default(),
            reveal_delay: TimeDelta::minutes(10),
            pool,
        }
    }
}

pub struct Room {
    config: RoomConfig,
    entrants: Vec<Entrant>,
    monitors: Vec<String>,
    join_policy: JoinPolicy,
    session: Option<DraftSession>,
}

impl Room {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            entrants: Vec::default(),
            monitors: Vec::default(),
            join_policy: JoinPolicy::Open,
            session: None,
            config,
        }
    }

    pub fn session(&self) -> Option<&DraftSession> { self.session.as_ref() }
    pub fn join_policy(&self) -> JoinPolicy { self.join_policy }

    /// Restores a session saved earlier, e.g. after a restart. Replaces any current session.
    pub fn restore(&mut self, session: DraftSession) {
        self.session = Some(session);
    }

    pub fn enter(&mut self, name: &str, score: Option<i64>) {
        if let Some(entrant) = self.entrants.iter_mut().find(|entrant| same_name(&entrant.name, name)) {
            entrant.score = score;
        } else {
            self.entrants.push(Entrant { name: name.to_owned(), score });
        }
    }

    pub fn leave(&mut self, name: &str) {
        self.entrants.retain(|entrant| !same_name(&entrant.name, name));
    }

    pub fn add_monitor(&mut self, name: &str) {
        if !self.is_monitor(name) {
            self.monitors.push(name.to_owned());
        }
    }

    pub fn is_monitor(&self, name: &str) -> bool {
        self.monitors.iter().any(|monitor| same_name(monitor, name))
    }

    /// Handles one chat message. Messages of a room must be handled one at a time, in the order they arrived.
    pub async fn handle<S: RankingSource + PresetSource + SeedGenerator>(&mut self, site: &S, sender: &str, text: &str, now: DateTime<Utc>, rng: &mut impl Rng) -> Vec<Output> {
        let command = match Command::parse(text) {
            None => return Vec::default(),
            Some(Ok(command)) => command,
            Some(Err(e)) => return error_outputs(sender, e),
        };
        let result = match command {
            Command::Draft(DraftCommand::Manual(params)) => self.start_manual(site, sender, params, now, rng).await,
            Command::Draft(DraftCommand::Random(params)) => self.start_random(site, sender, params, now, rng).await,
            Command::Draft(DraftCommand::Cancel) => self.cancel(sender),
            Command::Draft(DraftCommand::Status) => self.active_session()
                .map(|session| vec![Output::Message(session.status())]),
            Command::Draft(DraftCommand::Retry) => self.retry(site, sender, now).await,
            Command::First => self.act(site, sender, Action::Order(Order::First), now).await,
            Command::Second => self.act(site, sender, Action::Order(Order::Second), now).await,
            Command::Ban(args) => self.act(site, sender, Action::Ban(&args), now).await,
            Command::Skip => self.act(site, sender, Action::Skip, now).await,
            Command::Pick(args) => self.act(site, sender, Action::Pick(&args), now).await,
            Command::Settings(setting) => self.session.as_ref().ok_or(DraftError::NoDraft)
                .and_then(|session| session.settings_listing(setting.as_deref()))
                .map(|listing| vec![Output::Message(listing)]),
            Command::Reveal => self.reveal(sender, now),
        };
        result.unwrap_or_else(|e| error_outputs(sender, e))
    }

    /// When the pending timed reveal should happen, if any.
    pub fn reveal_deadline(&self) -> Option<DateTime<Utc>> {
        reveal::reveal_time(self.session.as_ref()?)
    }

    /// Performs the timed reveal if its deadline has passed.
    pub fn reveal_due(&mut self, now: DateTime<Utc>) -> Vec<Output> {
        if self.reveal_deadline().is_some_and(|deadline| deadline <= now) {
            self.reveal("", now).unwrap_or_default()
        } else {
            Vec::default()
        }
    }

    fn active_session(&self) -> Result<&DraftSession, DraftError> {
        self.session.as_ref().filter(|session| session.phase() != Phase::Cancelled).ok_or(DraftError::NoDraft)
    }

    fn check_can_start(&self, sender: &str) -> Result<(), DraftError> {
        if !self.is_monitor(sender) {
            return Err(DraftError::Unprivileged { action: "start a draft" })
        }
        if self.session.as_ref().is_some_and(|session| !session.phase().is_terminal()) {
            return Err(DraftError::DraftInProgress)
        }
        Ok(())
    }

    async fn load_preset<S: PresetSource>(&self, site: &S, preset: Option<String>) -> Result<(String, Fragment), DraftError> {
        let preset = preset.unwrap_or_else(|| self.config.default_preset.clone());
        match site.preset(&preset).await {
            Ok(Some(base)) => Ok((preset, base)),
            Ok(None) => {
                let mut available = site.presets().await.map_err(|e| DraftError::PresetUnavailable(e.to_string()))?;
                available.sort();
                Err(DraftError::UnknownPreset { preset, available })
            }
            Err(e) => Err(DraftError::PresetUnavailable(e.to_string())),
        }
    }

    async fn start_manual<S: RankingSource + PresetSource + SeedGenerator>(&mut self, site: &S, sender: &str, params: ManualParams, now: DateTime<Utc>, rng: &mut impl Rng) -> Result<Vec<Output>, DraftError> {
        self.check_can_start(sender)?;
        let mut participants = params.drafters.iter().map(|drafter| -> Result<_, DraftError> {
            let entrant = self.entrants.iter().find(|entrant| same_name(&entrant.name, drafter)).ok_or_else(|| DraftError::MissingDrafter(drafter.clone()))?;
            Ok(Participant::with_score(entrant.name.clone(), entrant.score))
        }).collect::<Result<Vec<_>, DraftError>>()?;
        let kind = if params.tournament { SessionKind::Tournament } else { SessionKind::Manual };
        if kind == SessionKind::Tournament {
            let placements = site.placements().await.map_err(|e| DraftError::RankingUnavailable(e.to_string()))?;
            ranking::apply_placements(&mut participants, &placements);
        }
        if let Some(mode) = kind.ranking_mode() {
            participants = ranking::rank(participants, mode)?;
        }
        let (preset, base) = self.load_preset(site, params.preset).await?;
        let session = DraftSession::new(SessionConfig {
            limits: params.limits,
            random_count: 0,
            allow_default_picks: params.allow_default_picks,
            pool: self.config.pool.clone(),
            reveal_delay: self.config.reveal_delay,
            kind, participants, preset, base,
        })?;
        self.begin(site, session, now, rng).await
    }

    async fn start_random<S: PresetSource + SeedGenerator>(&mut self, site: &S, sender: &str, params: RandomParams, now: DateTime<Utc>, rng: &mut impl Rng) -> Result<Vec<Output>, DraftError> {
        self.check_can_start(sender)?;
        let (preset, base) = self.load_preset(site, params.preset).await?;
        let session = DraftSession::new(SessionConfig {
            kind: if params.qualifier { SessionKind::Qualifier } else { SessionKind::Random },
            participants: Vec::default(),
            limits: Limits { bans: 0, major_picks: 0, minor_picks: 0 },
            random_count: params.count,
            allow_default_picks: params.allow_default_picks,
            pool: self.config.pool.clone(),
            reveal_delay: self.config.reveal_delay,
            preset, base,
        })?;
        self.begin(site, session, now, rng).await
    }

    async fn begin<S: SeedGenerator>(&mut self, site: &S, mut session: DraftSession, now: DateTime<Utc>, rng: &mut impl Rng) -> Result<Vec<Output>, DraftError> {
        let mut outputs = vec![Output::Message(format!("Starting a {} with the {} preset.", session.kind(), session.preset()))];
        outputs.extend(session.begin(rng).into_iter().map(Output::Message));
        let complete = session.phase() == Phase::Complete;
        self.session = Some(session);
        if complete {
            self.finalize(site, now, &mut outputs).await;
        }
        Ok(outputs)
    }

    async fn act<S: SeedGenerator>(&mut self, site: &S, sender: &str, action: Action<'_>, now: DateTime<Utc>) -> Result<Vec<Output>, DraftError> {
        // turn commands outside of a draft are ordinary chat
        let Some(session) = self.session.as_mut() else { return Ok(Vec::default()) };
        let mut outputs = session.apply(sender, action)?.into_iter().map(Output::Message).collect::<Vec<_>>();
        if session.phase() == Phase::Complete {
            self.finalize(site, now, &mut outputs).await;
        }
        Ok(outputs)
    }

    /// Compiles the drafted settings and waits for the seed.
    async fn finalize<S: SeedGenerator>(&mut self, site: &S, now: DateTime<Utc>, outputs: &mut Vec<Output>) {
        let Some(session) = self.session.as_mut() else { return };
        let settings = session.compile();
        session.mark_submitted();
        let started = Instant::now();
        match generate_and_wait(site, &settings, self.config.polling).await {
            Ok(seed) => {
                let generated_at = now + TimeDelta::from_std(started.elapsed()).unwrap_or(TimeDelta::zero());
                let hash = site.hash(&seed.id).await.ok().flatten();
                outputs.push(Output::RaceInfo(if let Some(hash) = hash { format!("{hash}\n{}", seed.uri) } else { seed.uri.clone() }));
                outputs.push(Output::Message(if session.kind().is_gated() {
                    format!("Here is your seed: {}. The settings will be revealed in {}.", seed.uri, format_duration(session.reveal_delay()))
                } else {
                    format!("Here is your seed: {}", seed.uri)
                }));
                session.record_seed(seed, generated_at);
            }
            Err(e) => outputs.extend(error_outputs("", e.into())),
        }
    }

    fn cancel(&mut self, sender: &str) -> Result<Vec<Output>, DraftError> {
        let is_monitor = self.is_monitor(sender);
        let session = self.session.as_mut().filter(|session| !session.phase().is_terminal()).ok_or(DraftError::NoDraft)?;
        if !is_monitor {
            if !session.is_participant(sender) {
                return Err(DraftError::Unprivileged { action: "cancel this draft" })
            }
            if session.is_submitted() {
                return Err(DraftError::Unprivileged { action: "cancel a draft once its seed has been rolled" })
            }
        }
        session.cancel()?;
        Ok(vec![Output::Message(format!("The draft has been cancelled."))])
    }

    async fn retry<S: SeedGenerator>(&mut self, site: &S, sender: &str, now: DateTime<Utc>) -> Result<Vec<Output>, DraftError> {
        let session = self.active_session()?;
        if !self.is_monitor(sender) && !session.is_participant(sender) {
            return Err(DraftError::Unprivileged { action: "retry the seed" })
        }
        if session.phase() != Phase::Complete || !session.is_submitted() || session.seed().is_some() {
            return Err(DraftError::NothingToRetry)
        }
        let mut outputs = vec![Output::Message(format!("Rolling the seed again."))];
        self.finalize(site, now, &mut outputs).await;
        Ok(outputs)
    }

    fn reveal(&mut self, sender: &str, now: DateTime<Utc>) -> Result<Vec<Output>, DraftError> {
        let session = self.session.as_mut().ok_or(DraftError::NoDraft)?;
        let outcome = reveal::reveal(session, now);
        let mut outputs = Vec::default();
        match outcome {
            RevealOutcome::Published { restrict_entry, .. } => {
                outputs.push(Output::Pinned(outcome.reply(sender)));
                if restrict_entry {
                    self.join_policy = JoinPolicy::InviteOnly;
                    outputs.push(Output::JoinPolicy(JoinPolicy::InviteOnly));
                }
            }
            RevealOutcome::AlreadyRevealed | RevealOutcome::NotYet { .. } | RevealOutcome::NotComplete => outputs.push(Output::Message(outcome.reply(sender))),
        }
        Ok(outputs)
    }
}

fn error_outputs(sender: &str, e: DraftError) -> Vec<Output> {
    e.reply(sender).map(Output::Message).into_iter().collect()
}
