use {
    std::{
        collections::BTreeMap,
        fmt,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    serde_json::Value as Json,
};

mod ast;

/// The catalog used when a draft is started without `--catalog`.
const TOURNAMENT_CATALOG: &str = include_str!("../../../../assets/draft/tournament.draft.rs");

/// A flat mapping of randomizer settings to values.
pub type Fragment = serde_json::Map<String, Json>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Major,
    Minor,
}

impl Tier {
    pub const ALL: [Self; 2] = [Self::Major, Self::Minor];

    pub fn other(self) -> Self {
        match self {
            Self::Major => Self::Minor,
            Self::Minor => Self::Major,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftOption {
    pub key: String,
    pub label: String,
    pub data: Fragment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub name: String,
    pub default: DraftOption,
    pub other: Vec<DraftOption>,
}

impl Setting {
    pub fn option(&self, key: &str) -> Option<&DraftOption> {
        self.options().find(|option| option.key == key)
    }

    pub fn is_default(&self, key: &str) -> bool {
        self.default.key == key
    }

    pub fn options(&self) -> impl Iterator<Item = &DraftOption> {
        std::iter::once(&self.default).chain(&self.other)
    }

    /// Whether there is anything left to pick for this setting.
    pub fn is_draftable(&self) -> bool {
        !self.other.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("setting {setting} defined in both tiers")]
    DuplicateSetting {
        setting: String,
    },
    #[error("unknown option {option:?} of setting {setting}")]
    UnknownOption {
        setting: String,
        option: String,
    },
    #[error("unknown {tier} setting {setting:?}")]
    UnknownSetting {
        tier: Tier,
        setting: String,
    },
}

/// The settings that can still be drafted in one room.
///
/// Settings only ever leave the pool: once banned or picked, a key is gone for the rest of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingPool {
    major: BTreeMap<String, Setting>,
    minor: BTreeMap<String, Setting>,
}

impl SettingPool {
    pub fn new(major: BTreeMap<String, Setting>, minor: BTreeMap<String, Setting>) -> Result<Self, CatalogError> {
        if let Some(setting) = major.keys().find(|&key| minor.contains_key(key)) {
            return Err(CatalogError::DuplicateSetting { setting: setting.clone() })
        }
        Ok(Self { major, minor })
    }

    /// Parses a catalog in `.draft.rs` format.
    pub fn parse(source: &str) -> syn::Result<Self> {
        syn::parse_str(source)
    }

    /// The built-in tournament catalog.
    pub fn tournament() -> syn::Result<Self> {
        Self::parse(TOURNAMENT_CATALOG)
    }

    pub fn tier(&self, tier: Tier) -> &BTreeMap<String, Setting> {
        match tier {
            Tier::Major => &self.major,
            Tier::Minor => &self.minor,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut BTreeMap<String, Setting> {
        match tier {
            Tier::Major => &mut self.major,
            Tier::Minor => &mut self.minor,
        }
    }

    pub fn get(&self, tier: Tier, key: &str) -> Option<&Setting> {
        self.tier(tier).get(key)
    }

    /// Looks a setting up in both tiers.
    pub fn find(&self, key: &str) -> Option<(Tier, &Setting)> {
        Tier::ALL.into_iter().find_map(|tier| Some((tier, self.get(tier, key)?)))
    }

    pub fn len(&self) -> usize {
        self.major.len() + self.minor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.major.is_empty() && self.minor.is_empty()
    }

    /// Settings of the given tier which still have a non-default option.
    pub fn draftable(&self, tier: Tier) -> impl Iterator<Item = &Setting> {
        self.tier(tier).values().filter(|setting| setting.is_draftable())
    }

    pub fn remove(&mut self, tier: Tier, key: &str) -> Result<Setting, CatalogError> {
        self.tier_mut(tier).remove(key).ok_or_else(|| CatalogError::UnknownSetting { tier, setting: key.to_owned() })
    }

    pub fn resolve(&self, tier: Tier, key: &str, option: &str) -> Result<&Fragment, CatalogError> {
        let setting = self.get(tier, key).ok_or_else(|| CatalogError::UnknownSetting { tier, setting: key.to_owned() })?;
        let option = setting.option(option).ok_or_else(|| CatalogError::UnknownOption { setting: key.to_owned(), option: option.to_owned() })?;
        Ok(&option.data)
    }

    /// Drops options whose entire fragment is already part of `base`, since picking them would change nothing.
    ///
    /// Default options are kept because bans still apply them. Settings left with nothing to pick are removed.
    pub fn remove_noop_options(&mut self, base: &Fragment) {
        for tier in Tier::ALL {
            let settings = self.tier_mut(tier);
            for setting in settings.values_mut() {
                setting.other.retain(|option| !option.data.iter().all(|(key, value)| base.get(key) == Some(value)));
            }
            settings.retain(|_, setting| setting.is_draftable());
        }
    }
}

/// Uppercases the first character and lowercases the rest, used for settings and options without a display name.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::default(),
    }
}
