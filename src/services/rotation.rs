use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Results shown per topic before a new topic is picked
pub const MAX_TOPIC_ITERATIONS: usize = 5;
/// Chance of switching topic early on any request
pub const TOPIC_SWITCH_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
struct TopicCursor {
    topic: String,
    iterations: usize,
}

/// The topic to search and which of its results to show
#[derive(Debug, Clone, PartialEq)]
pub struct RotationStep {
    pub topic: String,
    pub result_index: usize,
}

/// Cycles through candidate topics per preference combination
///
/// Each combination keeps one current topic and walks its results one by one.
/// A new topic is drawn when there is none yet, after
/// [`MAX_TOPIC_ITERATIONS`] results, or at random with
/// [`TOPIC_SWITCH_CHANCE`].
#[derive(Debug)]
pub struct RotationTracker {
    cursors: HashMap<String, TopicCursor>,
    max_iterations: usize,
    switch_chance: f64,
    rng: StdRng,
}

impl Default for RotationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            cursors: HashMap::new(),
            max_iterations: MAX_TOPIC_ITERATIONS,
            switch_chance: TOPIC_SWITCH_CHANCE,
            rng,
        }
    }

    /// Overrides the early-switch probability (clamped to 0.0..=1.0)
    pub fn with_switch_chance(mut self, chance: f64) -> Self {
        self.switch_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Advances the cursor for `key`, returns `None` when `topics` is empty
    pub fn next(&mut self, key: &str, topics: &[String]) -> Option<RotationStep> {
        if topics.is_empty() {
            return None;
        }

        let switch_early = self.rng.gen_bool(self.switch_chance);
        let needs_new_topic = match self.cursors.get(key) {
            None => true,
            Some(cursor) => {
                cursor.iterations >= self.max_iterations
                    || switch_early
                    || !topics.contains(&cursor.topic)
            }
        };

        if needs_new_topic {
            let topic = topics.choose(&mut self.rng)?.clone();
            self.cursors.insert(
                key.to_string(),
                TopicCursor {
                    topic,
                    iterations: 1,
                },
            );
        } else if let Some(cursor) = self.cursors.get_mut(key) {
            cursor.iterations += 1;
        }

        self.cursors.get(key).map(|cursor| RotationStep {
            topic: cursor.topic.clone(),
            result_index: cursor.iterations - 1,
        })
    }

    pub fn current_topic(&self, key: &str) -> Option<&str> {
        self.cursors.get(key).map(|cursor| cursor.topic.as_str())
    }

    pub fn reset(&mut self) {
        self.cursors.clear();
    }
}

/// Ids already returned to a session
#[derive(Debug, Clone, Default)]
pub struct ShownSet<T: Eq + Hash> {
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> ShownSet<T> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    pub fn contains(&self, id: &T) -> bool {
        self.seen.contains(id)
    }

    /// Records an id, returns `false` if it had been shown already
    pub fn record(&mut self, id: T) -> bool {
        self.seen.insert(id)
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = T>) {
        self.seen.extend(ids);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn snapshot(&self) -> HashSet<T> {
        self.seen.clone()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}
