//! The game container
//!
//! `Game` owns everything a playthrough needs: the state, the content
//! catalog, the config, the event RNG and the save slot. Reducers are
//! methods on `Game`; each one mutates state, marks the game dirty and
//! persists. `flush` then notifies subscribers once per batch.
//!
//! AI-backed actions are split in two: a `begin_*` reducer returns an
//! `AiRequest` (or applies a local fallback directly), the caller awaits
//! the proxy without holding any borrow on the game, and an `apply_*`
//! reducer folds the result in.

pub mod actions;
pub mod duel;
pub mod events;
pub mod replay;
pub mod roleplay;
pub mod scene;
pub mod summary;

pub use actions::{ActionReport, UndoOutcome};
pub use duel::{local_question_bank, score_locally};
pub use scene::{EventView, OptionView, SceneView, TaskView};

use crate::content::{Catalog, Scene};
use crate::core::config::GameConfig;
use crate::core::error::{Result, SimError};
use crate::llm::{AiAction, HealthStatus};
use crate::state::{save, ContentMode, GameState, LoadFailure};
use crate::storage::SaveStore;
use crate::ui::state::UiState;
use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Render callback invoked by `flush`
pub type Subscriber = Box<dyn FnMut(&GameState)>;

pub struct Game {
    state: GameState,
    catalog: Catalog,
    config: GameConfig,
    rng: ChaCha8Rng,
    store: Box<dyn SaveStore>,
    ai_status: HealthStatus,
    in_flight: AHashSet<AiAction>,
    subscribers: Vec<Subscriber>,
    dirty: bool,
}

impl Game {
    /// Fresh game with default state; the save slot is not read
    pub fn new(catalog: Catalog, config: GameConfig, store: Box<dyn SaveStore>) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            state: GameState::new(),
            catalog,
            config,
            rng,
            store,
            ai_status: HealthStatus::default(),
            in_flight: AHashSet::new(),
            subscribers: Vec::new(),
            dirty: true,
        }
    }

    /// Game restored from the save slot when one is present
    pub fn boot(catalog: Catalog, config: GameConfig, store: Box<dyn SaveStore>) -> Self {
        let mut game = Self::new(catalog, config, store);
        if !game.load_saved() {
            tracing::info!("No usable save, starting a new game");
        }
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ai_status(&self) -> &HealthStatus {
        &self.ai_status
    }

    pub fn set_ai_status(&mut self, status: HealthStatus) {
        self.ai_status = status;
        self.mark_dirty();
    }

    /// Mutable access to transient UI flags
    pub fn ui_mut(&mut self) -> &mut UiState {
        self.mark_dirty();
        &mut self.state.ui
    }

    /// Drop toast and error once shown; does not request a render
    pub fn acknowledge_messages(&mut self) {
        self.state.ui.clear_messages();
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.catalog.scene(&self.state.scene_id)
    }

    // === RENDER COALESCING ===

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Notify subscribers if anything changed since the last flush
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
        true
    }

    // === PERSISTENCE ===

    /// Write the save blob; failures are logged and reported as `false`
    pub fn save(&mut self) -> bool {
        let blob = match save::encode(&self.state, &self.config.app_version) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to encode save: {}", e);
                return false;
            }
        };
        match self.store.set(&self.config.save_key, &blob) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to write save: {}", e);
                false
            }
        }
    }

    /// Replace the state from the save slot; `false` when there is no usable save
    pub fn load_saved(&mut self) -> bool {
        let raw = match self.store.get(&self.config.save_key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to read save: {}", e);
                return false;
            }
        };
        match save::decode(raw.as_deref(), &self.config) {
            Ok(state) => {
                self.state = state;
                self.mark_dirty();
                tracing::info!("Loaded save at scene {}", self.state.scene_id);
                true
            }
            Err(LoadFailure::Missing) => false,
            Err(LoadFailure::Corrupt) => {
                tracing::warn!("Ignoring corrupt save");
                false
            }
        }
    }

    /// Reset to a new playthrough, keeping only the content mode
    pub fn restart(&mut self) {
        let content_mode = self.state.content_mode;
        self.state = GameState {
            content_mode,
            ..GameState::new()
        };
        self.in_flight.clear();
        tracing::info!("Game restarted");
        self.commit();
    }

    pub fn set_content_mode(&mut self, mode: ContentMode) {
        if self.state.content_mode != mode {
            self.state.content_mode = mode;
            self.commit();
        }
    }

    /// Mark dirty and persist; the tail of every reducer
    pub(crate) fn commit(&mut self) {
        self.mark_dirty();
        self.save();
    }

    // === IN-FLIGHT AI REQUESTS ===

    pub fn is_in_flight(&self, action: AiAction) -> bool {
        self.in_flight.contains(&action)
    }

    pub(crate) fn begin_ai(&mut self, action: AiAction) -> Result<()> {
        if !self.in_flight.insert(action) {
            return Err(SimError::Busy(action.to_string()));
        }
        self.state.ui.loading = true;
        self.mark_dirty();
        Ok(())
    }

    pub(crate) fn end_ai(&mut self, action: AiAction) {
        self.in_flight.remove(&action);
        self.state.ui.loading = !self.in_flight.is_empty();
        self.mark_dirty();
    }

    pub(crate) fn ai_available(&self) -> bool {
        self.ai_status.available()
    }
}
