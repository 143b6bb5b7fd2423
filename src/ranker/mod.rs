//! Candidate ranking and selection.
//!
//! Selection runs in two stages:
//!
//! 1. **Local**: records already on disk, bucketed into four tiers
//!    (anime + primary, anime + secondary, anime only, other match). Too
//!    few candidates overall abandons this stage so the local pool does
//!    not go stale.
//! 2. **Remote**: anime-tagged records not yet on disk, bucketed into
//!    primary / secondary / unclassified tiers. The pick is downloaded
//!    before it is returned; a failed download discards the turn.
//!
//! A fixed diversity probability skips stage 1 entirely. Every successful
//! pick is pushed into the [`UsageHistory`].

pub mod anime;
pub mod keywords;

pub use anime::{is_anime, is_anime_tagged};
pub use keywords::{MatchStrength, SearchKeywords, infer_filename_emotions, keywords_for};

use crate::catalog::{Catalog, EmojiRecord};
use crate::config::SelectionConfig;
use crate::download::Downloader;
use crate::emotion::{EmotionLabel, UserEmotion};
use crate::history::UsageHistory;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const LOCAL_TIERS: [&str; 4] = ["anime+primary", "anime+secondary", "anime", "other"];

/// Picks an emoji for an emotion and keeps the usage history.
#[derive(Debug)]
pub struct CandidateRanker {
    config: SelectionConfig,
    history: UsageHistory,
    downloader: Downloader,
    rng: StdRng,
}

impl CandidateRanker {
    #[must_use]
    pub fn new(config: &SelectionConfig, downloader: Downloader) -> Self {
        Self::with_rng(config, downloader, StdRng::from_entropy())
    }

    /// Deterministic ranker for tests and reproducible runs.
    #[must_use]
    pub fn with_seed(config: &SelectionConfig, downloader: Downloader, seed: u64) -> Self {
        Self::with_rng(config, downloader, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SelectionConfig, downloader: Downloader, rng: StdRng) -> Self {
        Self {
            config: config.clone(),
            history: UsageHistory::new(config.history_capacity),
            downloader,
            rng,
        }
    }

    #[must_use]
    pub fn history(&self) -> &UsageHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut UsageHistory {
        &mut self.history
    }

    #[must_use]
    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Select an emoji for a reply emotion.
    pub async fn select_for_emotion(
        &mut self,
        catalog: &Catalog,
        emotion: EmotionLabel,
    ) -> Option<EmojiRecord> {
        self.select(catalog, &SearchKeywords::for_emotion(emotion))
            .await
    }

    /// Select for a reply emotion, widening the secondary keywords with the
    /// user's affect.
    pub async fn select_for_turn(
        &mut self,
        catalog: &Catalog,
        emotion: EmotionLabel,
        user_emotion: UserEmotion,
    ) -> Option<EmojiRecord> {
        let keywords = SearchKeywords::for_emotion(emotion).with_user_emotion(user_emotion);
        self.select(catalog, &keywords).await
    }

    /// Run both search stages with explicit keywords.
    pub async fn select(
        &mut self,
        catalog: &Catalog,
        keywords: &SearchKeywords,
    ) -> Option<EmojiRecord> {
        if catalog.is_empty() {
            tracing::debug!("catalog is empty, nothing to select");
            return None;
        }
        let present = catalog.local_presence().await;

        if self.rng.gen_bool(self.config.diversity_probability.clamp(0.0, 1.0)) {
            tracing::info!("diversity roll: skipping local search");
        } else if let Some(record) = self.pick_local(catalog.records(), &present, keywords) {
            return Some(record);
        }
        self.pick_remote(catalog.records(), &present, keywords)
            .await
    }

    /// Stage 1 on its own: choose among records already on disk.
    pub async fn search_local(
        &mut self,
        catalog: &Catalog,
        keywords: &SearchKeywords,
    ) -> Option<EmojiRecord> {
        let present = catalog.local_presence().await;
        self.pick_local(catalog.records(), &present, keywords)
    }

    /// Stage 2 on its own: choose a record not yet on disk and download it.
    pub async fn search_remote(
        &mut self,
        catalog: &Catalog,
        keywords: &SearchKeywords,
    ) -> Option<EmojiRecord> {
        let present = catalog.local_presence().await;
        self.pick_remote(catalog.records(), &present, keywords)
            .await
    }

    fn pick_local(
        &mut self,
        records: &[EmojiRecord],
        present: &[bool],
        keywords: &SearchKeywords,
    ) -> Option<EmojiRecord> {
        let mut tiers: [Vec<&EmojiRecord>; 4] = Default::default();
        for (record, _) in records.iter().zip(present).filter(|(_, local)| **local) {
            let tier = match (is_anime_tagged(record), keywords.match_record(record)) {
                (true, MatchStrength::Primary) => 0,
                (true, MatchStrength::Secondary) => 1,
                (true, MatchStrength::None) => 2,
                (false, MatchStrength::None) => continue,
                (false, _) => 3,
            };
            tiers[tier].push(record);
        }

        let total: usize = tiers.iter().map(Vec::len).sum();
        if total < self.config.min_local_candidates {
            tracing::info!(
                total,
                minimum = self.config.min_local_candidates,
                "too few local candidates, going remote"
            );
            return None;
        }

        let mut chosen = None;
        for (tier, name) in tiers.iter().zip(LOCAL_TIERS) {
            let fresh = self.history.without_recent(tier);
            if let Some(record) = fresh.choose(&mut self.rng) {
                chosen = Some((*record, name));
                break;
            }
        }

        let (record, tier) = match chosen {
            Some(found) => found,
            None => {
                let cleared = self.history.clear();
                tracing::debug!(cleared, "every local tier recently used, history reset");
                let (tier, name) = tiers
                    .iter()
                    .zip(LOCAL_TIERS)
                    .find(|(tier, _)| !tier.is_empty())?;
                (*tier.choose(&mut self.rng)?, name)
            }
        };

        self.history.record(record.identity());
        tracing::info!(tier, name = %record.name, category = %record.category, "selected local emoji");
        Some(record.clone())
    }

    async fn pick_remote(
        &mut self,
        records: &[EmojiRecord],
        present: &[bool],
        keywords: &SearchKeywords,
    ) -> Option<EmojiRecord> {
        let mut perfect = Vec::new();
        let mut good = Vec::new();
        let mut unclassified = Vec::new();
        let mut not_local = Vec::new();

        for (record, local) in records.iter().zip(present) {
            if *local || !record.is_usable() || record.url.is_empty() {
                continue;
            }
            not_local.push(record);
            if !is_anime_tagged(record) {
                continue;
            }
            match keywords.match_record(record) {
                MatchStrength::Primary => perfect.push(record),
                MatchStrength::Secondary => good.push(record),
                MatchStrength::None => unclassified.push(record),
            }
        }

        let (pool, tier) = if !perfect.is_empty() {
            (perfect, "anime+primary")
        } else if !good.is_empty() {
            (good, "anime+secondary")
        } else if !unclassified.is_empty() {
            (self.sample(unclassified), "anime")
        } else if !not_local.is_empty() {
            (self.sample(not_local), "any remote")
        } else {
            let usable = records.iter().filter(|r| r.is_usable()).collect();
            (self.sample(usable), "any")
        };

        let candidates = self.history.filter_recent(pool);
        let Some(record) = candidates.choose(&mut self.rng).copied() else {
            tracing::info!("no remote candidate found");
            return None;
        };

        tracing::info!(tier, name = %record.name, category = %record.category, "selected remote emoji");
        if !self.downloader.fetch(record).await {
            tracing::warn!(name = %record.name, "on-demand download failed, dropping selection");
            return None;
        }

        self.history.record(record.identity());
        Some(record.clone())
    }

    /// Down-sample to the configured cap.
    fn sample<'a>(&mut self, pool: Vec<&'a EmojiRecord>) -> Vec<&'a EmojiRecord> {
        let cap = self.config.remote_sample_cap;
        if pool.len() <= cap {
            return pool;
        }
        pool.choose_multiple(&mut self.rng, cap).copied().collect()
    }
}
