//! Session word supply: a read-mostly per-level cache over a `WordSource`
//! so draws during play are synchronous, plus the draw-and-shuffle rules
//! for each difficulty pool.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::engine::dda::CefrLevel;
use crate::words::{DifficultyId, Word, WordSource};

/// How many words beyond the session size to request, for better shuffles.
const FETCH_HEADROOM: usize = 2;
const MIN_FETCH: usize = 50;

pub struct WordSupply {
    source: Box<dyn WordSource>,
    cache: HashMap<CefrLevel, Vec<Word>>,
    warnings: Vec<String>,
    session_size: usize,
    rng: SmallRng,
}

impl WordSupply {
    pub fn new(source: Box<dyn WordSource>, session_size: usize) -> Self {
        Self::with_rng(source, session_size, SmallRng::from_entropy())
    }

    #[allow(dead_code)] // Used by tests for deterministic shuffles
    pub fn with_rng(source: Box<dyn WordSource>, session_size: usize, rng: SmallRng) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            warnings: Vec::new(),
            session_size: session_size.max(1),
            rng,
        }
    }

    /// Populate every level's cache up front so mid-game swaps are instant.
    pub fn prefetch_all(&mut self) {
        for level in CefrLevel::ALL {
            self.ensure_level(level);
        }
    }

    fn ensure_level(&mut self, level: CefrLevel) {
        if self.cache.contains_key(&level) {
            return;
        }
        let limit = (self.session_size * FETCH_HEADROOM).max(MIN_FETCH);
        match self.source.fetch_words(level, limit) {
            Ok(words) => {
                if words.is_empty() {
                    self.warnings
                        .push(format!("no words available for level {}", level.label()));
                }
                self.cache.insert(level, words);
            }
            Err(e) => {
                self.warnings
                    .push(format!("word fetch failed for {}: {e}", level.label()));
                self.cache.insert(level, Vec::new());
            }
        }
    }

    /// A fresh shuffled session list for one level. An empty cache falls
    /// back to the lowest level that has words; if nothing does, the caller
    /// gets an empty list and must not enter play.
    pub fn draw_for_level(&mut self, level: CefrLevel) -> Vec<Word> {
        self.ensure_level(level);
        if self.cache.get(&level).is_none_or(|words| words.is_empty()) {
            if let Some(fallback) = self.lowest_populated_level() {
                if fallback != level {
                    self.warnings.push(format!(
                        "level {} empty, falling back to {}",
                        level.label(),
                        fallback.label()
                    ));
                    return self.draw_cached(fallback);
                }
            }
            return Vec::new();
        }
        self.draw_cached(level)
    }

    pub fn draw_for_difficulty(
        &mut self,
        difficulty: DifficultyId,
        dda_level: CefrLevel,
    ) -> Vec<Word> {
        match difficulty {
            DifficultyId::Cefr(level) => self.draw_for_level(level),
            DifficultyId::Dda => self.draw_for_level(dda_level),
            DifficultyId::Endless => self.draw_endless(),
        }
    }

    fn draw_endless(&mut self) -> Vec<Word> {
        for level in CefrLevel::ALL {
            self.ensure_level(level);
        }
        let mut pool: Vec<Word> = CefrLevel::ALL
            .iter()
            .filter_map(|level| self.cache.get(level))
            .flatten()
            .cloned()
            .collect();
        pool.shuffle(&mut self.rng);
        pool.truncate(self.session_size);
        pool
    }

    fn draw_cached(&mut self, level: CefrLevel) -> Vec<Word> {
        let mut words = self.cache.get(&level).cloned().unwrap_or_default();
        words.shuffle(&mut self.rng);
        words.truncate(self.session_size);
        words
    }

    fn lowest_populated_level(&self) -> Option<CefrLevel> {
        CefrLevel::ALL
            .iter()
            .copied()
            .find(|level| self.cache.get(level).is_some_and(|words| !words.is_empty()))
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordSourceError;

    struct FakeSource {
        per_level: usize,
        empty_levels: Vec<CefrLevel>,
        failing_levels: Vec<CefrLevel>,
    }

    impl FakeSource {
        fn new(per_level: usize) -> Self {
            Self {
                per_level,
                empty_levels: Vec::new(),
                failing_levels: Vec::new(),
            }
        }
    }

    impl WordSource for FakeSource {
        fn fetch_words(
            &mut self,
            level: CefrLevel,
            limit: usize,
        ) -> Result<Vec<Word>, WordSourceError> {
            if self.failing_levels.contains(&level) {
                return Err(WordSourceError::Fetch("boom".into()));
            }
            if self.empty_levels.contains(&level) {
                return Ok(Vec::new());
            }
            Ok((0..self.per_level.min(limit))
                .map(|i| Word {
                    word: format!("{}-{}", level.code(), i),
                    meaning: format!("meaning {i}"),
                    level: Some(level.code().to_string()),
                    kind: None,
                })
                .collect())
        }
    }

    fn seeded(source: FakeSource, session_size: usize) -> WordSupply {
        WordSupply::with_rng(Box::new(source), session_size, SmallRng::seed_from_u64(7))
    }

    #[test]
    fn draw_is_a_shuffled_subset_of_one_level() {
        let mut supply = seeded(FakeSource::new(40), 20);
        let draw = supply.draw_for_level(CefrLevel::B1);
        assert_eq!(draw.len(), 20);
        for word in &draw {
            assert!(word.word.starts_with("b1-"));
        }
        // Non-repeating within a draw.
        let mut seen: Vec<&str> = draw.iter().map(|w| w.word.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn successive_draws_are_fresh_lists() {
        let mut supply = seeded(FakeSource::new(40), 20);
        let first = supply.draw_for_level(CefrLevel::A1);
        let second = supply.draw_for_level(CefrLevel::A1);
        assert_eq!(first.len(), second.len());
        assert_ne!(
            first.iter().map(|w| &w.word).collect::<Vec<_>>(),
            second.iter().map(|w| &w.word).collect::<Vec<_>>(),
            "seeded shuffles should differ between draws"
        );
    }

    #[test]
    fn empty_level_falls_back_to_lowest_populated() {
        let mut source = FakeSource::new(30);
        source.empty_levels = vec![CefrLevel::C2];
        let mut supply = seeded(source, 10);
        supply.prefetch_all();

        let draw = supply.draw_for_level(CefrLevel::C2);
        assert_eq!(draw.len(), 10);
        assert!(draw.iter().all(|w| w.word.starts_with("a1-")));
        assert!(
            supply
                .warnings()
                .iter()
                .any(|w| w.contains("falling back"))
        );
    }

    #[test]
    fn total_outage_yields_empty_list_not_panic() {
        let mut source = FakeSource::new(30);
        source.failing_levels = CefrLevel::ALL.to_vec();
        let mut supply = seeded(source, 10);
        let draw = supply.draw_for_level(CefrLevel::A2);
        assert!(draw.is_empty());
        assert!(!supply.warnings().is_empty());
    }

    #[test]
    fn endless_mixes_levels() {
        let mut supply = seeded(FakeSource::new(10), 30);
        let draw = supply.draw_for_difficulty(DifficultyId::Endless, CefrLevel::A1);
        assert_eq!(draw.len(), 30);
        let distinct_levels: std::collections::HashSet<_> =
            draw.iter().filter_map(|w| w.level.clone()).collect();
        assert!(distinct_levels.len() > 1);
    }

    #[test]
    fn dda_difficulty_draws_the_given_level() {
        let mut supply = seeded(FakeSource::new(40), 15);
        let draw = supply.draw_for_difficulty(DifficultyId::Dda, CefrLevel::B2);
        assert!(draw.iter().all(|w| w.word.starts_with("b2-")));
    }

    #[test]
    fn fetch_failure_is_a_warning_not_an_error() {
        let mut source = FakeSource::new(30);
        source.failing_levels = vec![CefrLevel::A1];
        let mut supply = seeded(source, 10);
        supply.prefetch_all();
        assert!(supply.warnings().iter().any(|w| w.contains("a1") || w.contains("A1")));
        // Other levels are unaffected.
        assert_eq!(supply.draw_for_level(CefrLevel::A2).len(), 10);
    }
}
