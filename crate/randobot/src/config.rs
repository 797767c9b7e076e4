use {
    std::path::PathBuf,
    serde::Deserialize,
    wheel::fs,
};
#[cfg(windows)] use directories::ProjectDirs;
#[cfg(unix)] use xdg::BaseDirectories;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Config {
    /// ootrandomizer.com API key
    pub(crate) api_key: String,
    #[serde(default)]
    pub(crate) log: bool,
    #[serde(default = "make_default_preset")]
    pub(crate) default_preset: String,
    #[serde(default = "make_status_checks")]
    pub(crate) status_checks: u16,
    /// in seconds
    #[serde(default = "make_one")]
    pub(crate) status_interval: u64,
    /// in minutes
    #[serde(default = "make_ten")]
    pub(crate) reveal_delay: i64,
}

fn make_default_preset() -> String { format!("s6") }
fn make_status_checks() -> u16 { 50 }
fn make_one() -> u64 { 1 }
fn make_ten() -> i64 { 10 }

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Wheel(#[from] wheel::Error),
    #[cfg(unix)]
    #[error("config file not found")]
    MissingConfigFile,
    #[cfg(windows)]
    #[error("user folder not found")]
    MissingHomeDir,
}

impl Config {
    /// Reads the config from `path` if given, otherwise from the platform's config directory.
    pub(crate) async fn load(path: Option<PathBuf>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Ok(fs::read_json(path).await?)
        }
        #[cfg(unix)] {
            if let Some(config_path) = BaseDirectories::new().find_config_file("randobot.json") {
                Ok(fs::read_json(config_path).await?)
            } else {
                Err(Error::MissingConfigFile)
            }
        }
        #[cfg(windows)] {
            Ok(fs::read_json(ProjectDirs::from("com", "ootrandomizer", "randobot").ok_or(Error::MissingHomeDir)?.config_dir().join("config.json")).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = serde_json::from_str::<Config>(r#"{"apiKey": "hunter2"}"#).unwrap();
        assert_eq!(config.api_key, "hunter2");
        assert!(!config.log);
        assert_eq!(config.default_preset, "s6");
        assert_eq!(config.status_checks, 50);
        assert_eq!(config.status_interval, 1);
        assert_eq!(config.reveal_delay, 10);
    }
}
