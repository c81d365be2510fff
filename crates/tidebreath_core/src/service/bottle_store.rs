//! Bottle store use-case API.
//!
//! # Responsibility
//! - Create seed and user bottles with random placement.
//! - Expose the ordered, read-only bottle collection.
//!
//! # Invariants
//! - Placement is sampled once per message and stored with it.
//! - A rejected `add` leaves the collection unchanged.
//! - The store is append-only for the process lifetime.

use crate::config::BottleConfig;
use crate::error::{CoreResult, ValidationError};
use crate::model::bottle::{BottleId, BottleMessage, BottleOrigin, BottleReading, Placement};
use crate::random::RandomSource;
use crate::repo::bottle_repo::BottleRepository;
use log::info;

/// Built-in example message used to populate the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub text: &'static str,
    pub author: &'static str,
}

/// Seed catalog; sampled with replacement.
pub const SEED_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        text: "The ocean calms the restless soul.",
        author: "A Wanderer",
    },
    CatalogEntry {
        text: "Just breathe. You are exactly where you need to be.",
        author: "Sarah",
    },
    CatalogEntry {
        text: "Let the tides wash away your worries.",
        author: "Ocean Friend",
    },
    CatalogEntry {
        text: "Every wave is a new beginning.",
        author: "Unknown",
    },
    CatalogEntry {
        text: "You're doing great. Keep going.",
        author: "Max",
    },
];

/// Bottle creation and lookup over a repository.
pub struct BottleStore<R: BottleRepository> {
    repo: R,
    random: Box<dyn RandomSource>,
    config: BottleConfig,
}

impl<R: BottleRepository> BottleStore<R> {
    pub fn new(repo: R, random: Box<dyn RandomSource>, config: BottleConfig) -> Self {
        Self {
            repo,
            random,
            config,
        }
    }

    /// Spawns `count` catalog messages at random positions.
    ///
    /// # Errors
    /// - `ValidationError::ZeroSeedCount` when `count == 0`.
    pub fn seed(&mut self, count: usize) -> CoreResult<Vec<BottleMessage>> {
        if count == 0 {
            return Err(ValidationError::ZeroSeedCount.into());
        }

        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let entry = SEED_CATALOG[self.random.next_index(SEED_CATALOG.len())];
            let message = self.create(entry.text, Some(entry.author), BottleOrigin::Seed)?;
            created.push(message);
        }

        info!(
            "event=bottles_seeded module=bottle_store status=ok count={} total={}",
            created.len(),
            self.repo.len()
        );
        Ok(created)
    }

    /// Creates a user bottle.
    ///
    /// # Contract
    /// - `author` defaults to `Anonymous` when `None` or blank.
    /// - Returns the stored message.
    ///
    /// # Errors
    /// - `ValidationError::EmptyText` when `text` is blank after trimming.
    pub fn add(&mut self, text: &str, author: Option<&str>) -> CoreResult<BottleMessage> {
        let message = self.create(text, author, BottleOrigin::User)?;
        info!(
            "event=bottle_added module=bottle_store status=ok bottle_id={} text_len={} total={}",
            message.id(),
            message.text().chars().count(),
            self.repo.len()
        );
        Ok(message)
    }

    /// Every bottle created so far, in creation order.
    pub fn all(&self) -> &[BottleMessage] {
        self.repo.all()
    }

    pub fn get(&self, id: BottleId) -> Option<&BottleMessage> {
        self.repo.get(id)
    }

    /// Read-modal view of one bottle.
    pub fn read(&self, id: BottleId) -> Option<BottleReading> {
        self.repo.get(id).map(BottleMessage::reading)
    }

    fn create(
        &mut self,
        text: &str,
        author: Option<&str>,
        origin: BottleOrigin,
    ) -> CoreResult<BottleMessage> {
        // Rejected input consumes no samples.
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }

        let placement = self.sample_placement();
        let bob_delay_ms = self.sample_bob_delay();
        let message = BottleMessage::new(text, author, placement, bob_delay_ms, origin)?;
        self.repo.append(message.clone());
        Ok(message)
    }

    fn sample_placement(&mut self) -> Placement {
        let left_percent = self.config.left_percent.sample(self.random.next_unit());
        let bottom_percent = self.config.bottom_percent.sample(self.random.next_unit());
        Placement {
            left_percent,
            bottom_percent,
        }
    }

    fn sample_bob_delay(&mut self) -> u32 {
        let max = f64::from(self.config.bob_delay_max_ms);
        (self.random.next_unit() * max) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{BottleStore, SEED_CATALOG};
    use crate::config::BottleConfig;
    use crate::error::{CoreError, ValidationError};
    use crate::model::bottle::{BottleOrigin, DEFAULT_AUTHOR};
    use crate::random::ScriptedRandom;
    use crate::repo::bottle_repo::InMemoryBottleRepository;

    fn store(samples: Vec<f64>) -> BottleStore<InMemoryBottleRepository> {
        BottleStore::new(
            InMemoryBottleRepository::new(),
            Box::new(ScriptedRandom::new(samples)),
            BottleConfig::default(),
        )
    }

    #[test]
    fn add_maps_samples_onto_placement_ranges() {
        let mut store = store(vec![0.5, 0.25, 0.5]);
        let message = store.add("hello", Some("Max")).expect("valid bottle");

        assert_eq!(message.placement().left_percent, 50.0);
        assert_eq!(message.placement().bottom_percent, 10.0);
        assert_eq!(message.bob_delay_ms(), 1_000);
        assert_eq!(message.origin(), BottleOrigin::User);
    }

    #[test]
    fn add_without_author_uses_anonymous() {
        let mut store = store(vec![0.0]);
        let message = store.add("hello", None).expect("valid bottle");
        assert_eq!(message.author(), DEFAULT_AUTHOR);
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn rejected_add_leaves_store_unchanged() {
        let mut store = store(vec![0.1]);
        store.add("kept", None).expect("valid bottle");

        let err = store.add("   ", Some("X")).expect_err("blank text must fail");
        assert_eq!(err, CoreError::Validation(ValidationError::EmptyText));
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].text(), "kept");
    }

    #[test]
    fn seed_samples_catalog_with_replacement() {
        // index, left, bottom, bob for each of the three seeds
        let mut store = store(vec![
            0.0, 0.1, 0.1, 0.1, //
            0.0, 0.2, 0.2, 0.2, //
            0.99, 0.3, 0.3, 0.3,
        ]);
        let created = store.seed(3).expect("seed");

        assert_eq!(created.len(), 3);
        assert_eq!(created[0].text(), SEED_CATALOG[0].text);
        assert_eq!(created[1].text(), SEED_CATALOG[0].text);
        assert_eq!(created[2].text(), SEED_CATALOG[SEED_CATALOG.len() - 1].text);
        assert!(created.iter().all(|m| m.origin() == BottleOrigin::Seed));
    }

    #[test]
    fn seed_zero_is_rejected() {
        let mut store = store(vec![0.0]);
        let err = store.seed(0).expect_err("zero seed must fail");
        assert_eq!(err, CoreError::Validation(ValidationError::ZeroSeedCount));
        assert!(store.all().is_empty());
    }

    #[test]
    fn read_formats_quote_and_attribution() {
        let mut store = store(vec![0.0]);
        let id = store.add("calm", Some("Sam")).expect("valid bottle").id();
        let reading = store.read(id).expect("stored bottle");
        assert_eq!(reading.quoted_text, "\"calm\"");
        assert_eq!(reading.attribution, "- Sam");
    }
}
