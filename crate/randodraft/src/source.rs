//! The outside services a draft depends on.

use {
    std::{
        fmt,
        future::Future,
    },
    crate::{
        catalog::Fragment,
        ranking::Placement,
        seed::{
            GeneratedSeed,
            SeedStatus,
        },
    },
};

/// Qualifier standings, used to order drafters in tournament drafts.
pub trait RankingSource {
    type Error: fmt::Display;

    fn placements(&self) -> impl Future<Output = Result<Vec<Placement>, Self::Error>> + Send;
}

/// Named base settings for seeds.
pub trait PresetSource {
    type Error: fmt::Display;

    /// Returns `Ok(None)` if there is no preset with this name.
    fn preset(&self, name: &str) -> impl Future<Output = Result<Option<Fragment>, Self::Error>> + Send;
    /// The names of all presets, listed when an unknown one is requested.
    fn presets(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}

pub trait SeedGenerator {
    type Error: fmt::Display;

    /// Submits settings for generation. The seed is usually not ready yet when this returns.
    fn generate(&self, settings: &Fragment) -> impl Future<Output = Result<GeneratedSeed, Self::Error>> + Send;
    fn status(&self, id: &str) -> impl Future<Output = Result<SeedStatus, Self::Error>> + Send;
    /// The file hash of a finished seed, as shown in race info.
    fn hash(&self, id: &str) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;
}
