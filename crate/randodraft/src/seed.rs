use {
    std::time::Duration,
    serde::{
        Deserialize,
        Serialize,
    },
    tokio::time::sleep,
    crate::{
        catalog::Fragment,
        source::SeedGenerator,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSeed {
    pub id: String,
    /// Public URL of the seed.
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeedStatus {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("seed generator reported a failure")]
    Failed,
    #[error("seed generator error: {0}")]
    Site(String),
    #[error("seed still pending after {0} status checks")]
    TimedOut(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    pub max_attempts: u16,
    pub interval: Duration,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            interval: Duration::from_secs(1),
        }
    }
}

/// Submits the settings and waits until the seed is done, checking its status at most `polling.max_attempts` times.
pub async fn generate_and_wait<S: SeedGenerator>(site: &S, settings: &Fragment, polling: Polling) -> Result<GeneratedSeed, GenerationError> {
    let seed = site.generate(settings).await.map_err(|e| GenerationError::Site(e.to_string()))?;
    for _ in 0..polling.max_attempts {
        sleep(polling.interval).await;
        match site.status(&seed.id).await.map_err(|e| GenerationError::Site(e.to_string()))? {
            SeedStatus::Pending => {}
            SeedStatus::Ready => return Ok(seed),
            SeedStatus::Failed => return Err(GenerationError::Failed),
        }
    }
    Err(GenerationError::TimedOut(polling.max_attempts))
}

#[cfg(test)]
mod tests {
    use {
        std::{
            collections::VecDeque,
            convert::Infallible,
            sync::Mutex,
        },
        tokio::time::Instant,
        super::*,
    };

    struct Scripted {
        statuses: Mutex<VecDeque<SeedStatus>>,
        checks: Mutex<u16>,
    }

    impl Scripted {
        fn new(statuses: impl IntoIterator<Item = SeedStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into_iter().collect()),
                checks: Mutex::new(0),
            }
        }
    }

    impl SeedGenerator for Scripted {
        type Error = Infallible;

        async fn generate(&self, _: &Fragment) -> Result<GeneratedSeed, Infallible> {
            Ok(GeneratedSeed { id: format!("1234"), uri: format!("https://ootrandomizer.com/seed/get?id=1234") })
        }

        async fn status(&self, _: &str) -> Result<SeedStatus, Infallible> {
            *self.checks.lock().unwrap() += 1;
            Ok(self.statuses.lock().unwrap().pop_front().unwrap_or(SeedStatus::Pending))
        }

        async fn hash(&self, _: &str) -> Result<Option<String>, Infallible> {
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_until_ready() {
        let site = Scripted::new([SeedStatus::Pending, SeedStatus::Pending, SeedStatus::Ready]);
        let start = Instant::now();
        let seed = generate_and_wait(&site, &Fragment::default(), Polling::default()).await.unwrap();
        assert_eq!(seed.id, "1234");
        assert_eq!(*site.checks.lock().unwrap(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_stops_polling() {
        let site = Scripted::new([SeedStatus::Pending, SeedStatus::Failed, SeedStatus::Ready]);
        assert_eq!(generate_and_wait(&site, &Fragment::default(), Polling::default()).await, Err(GenerationError::Failed));
        assert_eq!(*site.checks.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let site = Scripted::new([]);
        let polling = Polling { max_attempts: 5, interval: Duration::from_secs(2) };
        assert_eq!(generate_and_wait(&site, &Fragment::default(), polling).await, Err(GenerationError::TimedOut(5)));
        assert_eq!(*site.checks.lock().unwrap(), 5);
    }
}
