//! Client for the ootrandomizer.com API.

use {
    std::collections::HashMap,
    itertools::Itertools as _,
    serde::Deserialize,
    serde_json::Value as Json,
    tokio::sync::OnceCell,
    randodraft::{
        catalog::Fragment,
        ranking::Placement,
        seed::{
            GeneratedSeed,
            SeedStatus,
        },
        source::{
            PresetSource,
            RankingSource,
            SeedGenerator,
        },
    },
};

const SEED_PUBLIC: &str = "https://ootrandomizer.com/seed/get";
const SEED_ENDPOINT: &str = "https://ootrandomizer.com/api/v2/seed/create";
const STATUS_ENDPOINT: &str = "https://ootrandomizer.com/api/v2/seed/status";
const DETAILS_ENDPOINT: &str = "https://ootrandomizer.com/api/v2/seed/details";
const PRESET_ENDPOINT: &str = "https://ootrandomizer.com/rtgg/ootr_presets.json";
const SETTINGS_ENDPOINT: &str = "https://raw.githubusercontent.com/TestRunnerSRL/OoT-Randomizer/release/data/presets_default.json";
const QUALIFIER_PLACEMENT_ENDPOINT: &str = "https://ootrandomizer.com/tournament/seedsOnly";

/// Race info icon names for the items of a seed's file hash.
fn hash_icon(item: &str) -> &str {
    match item {
        "Beans" => "HashBeans",
        "Big Magic" => "HashBigMagic",
        "Bombchu" => "HashBombchu",
        "Boomerang" => "HashBoomerang",
        "Boss Key" => "HashBossKey",
        "Bottled Fish" => "HashBottledFish",
        "Bottled Milk" => "HashBottledMilk",
        "Bow" => "HashBow",
        "Compass" => "HashCompass",
        "Cucco" => "HashCucco",
        "Deku Nut" => "HashDekuNut",
        "Deku Stick" => "HashDekuStick",
        "Fairy Ocarina" => "HashFairyOcarina",
        "Frog" => "HashFrog",
        "Gold Scale" => "HashGoldScale",
        "Heart Container" => "HashHeart",
        "Hover Boots" => "HashHoverBoots",
        "Kokiri Tunic" => "HashKokiriTunic",
        "Lens of Truth" => "HashLensOfTruth",
        "Longshot" => "HashLongshot",
        "Map" => "HashMap",
        "Mask of Truth" => "HashMaskOfTruth",
        "Master Sword" => "HashMasterSword",
        "Megaton Hammer" => "HashHammer",
        "Mirror Shield" => "HashMirrorShield",
        "Mushroom" => "HashMushroom",
        "Saw" => "HashSaw",
        "Silver Gauntlets" => "HashSilvers",
        "Skull Token" => "HashSkullToken",
        "Slingshot" => "HashSlingshot",
        "SOLD OUT" => "HashSoldOut",
        "Stone of Agony" => "HashStoneOfAgony",
        _ => item,
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Json(#[from] serde_json::Error),
    #[error(transparent)] Reqwest(#[from] reqwest::Error),
    #[error("unexpected preset list format")]
    PresetFormat,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetInfo {
    full_name: String,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: Json,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsResponse {
    settings_log: Option<String>,
}

#[derive(Deserialize)]
struct SettingsLog {
    file_hash: Vec<String>,
}

pub(crate) struct Zsr {
    http: reqwest::Client,
    api_key: String,
    presets: OnceCell<HashMap<String, Fragment>>,
}

impl Zsr {
    pub(crate) fn new(api_key: String) -> Result<Self, Error> {
        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("randobot/", env!("CARGO_PKG_VERSION")))
                .build()?,
            presets: OnceCell::default(),
            api_key,
        })
    }

    /// Preset short names mapped to their settings. Presets whose settings aren't published are left out.
    async fn preset_map(&self) -> Result<&HashMap<String, Fragment>, Error> {
        self.presets.get_or_try_init(|| async {
            let presets = self.http.get(PRESET_ENDPOINT).send().await?.error_for_status()?.json::<HashMap<String, PresetInfo>>().await?;
            let mut settings = match self.http.get(SETTINGS_ENDPOINT).send().await?.error_for_status()?.json::<Json>().await? {
                Json::Object(settings) => settings,
                _ => return Err(Error::PresetFormat),
            };
            Ok::<_, Error>(presets.into_iter().filter_map(|(key, info)| match settings.remove(&info.full_name)? {
                Json::Object(fragment) => Some((key, fragment)),
                _ => None,
            }).collect())
        }).await
    }
}

impl PresetSource for Zsr {
    type Error = Error;

    async fn preset(&self, name: &str) -> Result<Option<Fragment>, Error> {
        Ok(self.preset_map().await?.get(name).cloned())
    }

    async fn presets(&self) -> Result<Vec<String>, Error> {
        Ok(self.preset_map().await?.keys().cloned().collect())
    }
}

impl RankingSource for Zsr {
    type Error = Error;

    async fn placements(&self) -> Result<Vec<Placement>, Error> {
        Ok(self.http.get(QUALIFIER_PLACEMENT_ENDPOINT).send().await?.error_for_status()?.json().await?)
    }
}

impl SeedGenerator for Zsr {
    type Error = Error;

    async fn generate(&self, settings: &Fragment) -> Result<GeneratedSeed, Error> {
        let CreateResponse { id } = self.http.post(SEED_ENDPOINT)
            .query(&[("key", &*self.api_key), ("encrypt", "true")])
            .json(settings)
            .send().await?
            .error_for_status()?
            .json().await?;
        let id = match id {
            Json::String(id) => id,
            id => id.to_string(),
        };
        Ok(GeneratedSeed {
            uri: format!("{SEED_PUBLIC}?id={id}"),
            id,
        })
    }

    async fn status(&self, id: &str) -> Result<SeedStatus, Error> {
        let StatusResponse { status } = self.http.get(STATUS_ENDPOINT)
            .query(&[("id", id), ("key", &*self.api_key)])
            .send().await?
            .error_for_status()?
            .json().await?;
        Ok(match status {
            0 => SeedStatus::Pending,
            1 => SeedStatus::Ready,
            _ => SeedStatus::Failed,
        })
    }

    async fn hash(&self, id: &str) -> Result<Option<String>, Error> {
        let DetailsResponse { settings_log } = self.http.get(DETAILS_ENDPOINT)
            .query(&[("id", id), ("key", &*self.api_key)])
            .send().await?
            .error_for_status()?
            .json().await?;
        // the settings log is itself JSON, encoded as a string
        let Some(settings_log) = settings_log else { return Ok(None) };
        let Ok(SettingsLog { file_hash }) = serde_json::from_str(&settings_log) else { return Ok(None) };
        Ok(Some(file_hash.iter().map(|item| hash_icon(item)).join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_icons() {
        assert_eq!(hash_icon("Megaton Hammer"), "HashHammer");
        assert_eq!(hash_icon("SOLD OUT"), "HashSoldOut");
        assert_eq!(hash_icon("Triforce"), "Triforce");
    }
}
