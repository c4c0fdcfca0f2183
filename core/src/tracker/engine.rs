//! Tick-driven overlay engine.
//!
//! Owns the distribution, the processor registry, the activation cache, and
//! every tracker's per-position state. Each tick evaluates the transition
//! table once per tracked position:
//!
//! | current state | scheduler result        | action                       |
//! |---------------|-------------------------|------------------------------|
//! | Hidden        | none                    | no-op                        |
//! | Hidden        | window w                | load + render, emit Show     |
//! | Showing(a)    | none                    | emit Hide                    |
//! | Showing(a)    | window w, same id       | no-op                        |
//! | Showing(a)    | window w, different id  | load + render, emit Switch   |
//!
//! Positions are evaluated independently: a load failure at one position
//! logs a warning, leaves that position hidden (retried on the next tick
//! that selects the same window), and never blocks sibling positions.
//! Ticks may arrive at any cadence and timestamps may jump in either
//! direction (seeks); the same table covers every case.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use overcue_types::{ActivationDoc, ExternalId};

use crate::cache::{ActivationCache, LoadError};
use crate::model::{Activation, Distribution, TimeWindow};
use crate::registry::{ProcessorRegistry, SegmentProcessor};
use crate::render::{RenderTree, TemplateRenderer};
use crate::schedule;

use super::state::{DisplayCommand, PositionState, TrackerHandle, TrackerState};

/// The external collaborator that fetches activation documents.
///
/// Implementations must fail rather than hang; the engine imposes no
/// timeout of its own.
pub trait ActivationSource: Send + Sync {
    fn fetch(
        &self,
        external_id: &ExternalId,
    ) -> impl Future<Output = Result<ActivationDoc, LoadError>> + Send;
}

impl<T: ActivationSource> ActivationSource for Arc<T> {
    fn fetch(
        &self,
        external_id: &ExternalId,
    ) -> impl Future<Output = Result<ActivationDoc, LoadError>> + Send {
        (**self).fetch(external_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown tracker handle")]
    UnknownTracker,
}

/// One overlay session: a distribution plus the machinery to schedule and
/// render it. Multiple engines are fully independent.
pub struct OverlayEngine<S> {
    distribution: Distribution,
    source: S,
    registry: RwLock<ProcessorRegistry>,
    renderer: TemplateRenderer,
    cache: ActivationCache,
    trackers: Mutex<HashMap<u64, TrackerState>>,
    next_handle: AtomicU64,
}

impl<S: ActivationSource> OverlayEngine<S> {
    /// Create an engine for a loaded distribution. The registry starts with
    /// the built-in segment kinds.
    pub fn new(distribution: Distribution, source: S) -> Self {
        Self {
            distribution,
            source,
            registry: RwLock::new(ProcessorRegistry::with_builtins()),
            renderer: TemplateRenderer::new(),
            cache: ActivationCache::new(),
            trackers: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn cache(&self) -> &ActivationCache {
        &self.cache
    }

    /// Register (or override) the processor for a segment kind.
    pub fn register_processor(
        &self,
        kind: impl Into<String>,
        processor: Arc<dyn SegmentProcessor>,
    ) {
        self.registry
            .write()
            .expect("processor registry poisoned")
            .register(kind, processor);
    }

    /// Start tracking a set of positions. Every position starts `Hidden`.
    pub fn create_tracking<I, P>(&self, positions: I) -> TrackerHandle
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut state = TrackerState::default();
        for position in positions {
            state.positions.insert(position.into(), PositionState::Hidden);
        }

        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.trackers
            .lock()
            .expect("tracker map poisoned")
            .insert(id, state);
        TrackerHandle { id }
    }

    /// Stop tracking and release per-position state.
    ///
    /// Loads still in flight for this handle complete harmlessly: the tick
    /// that started them re-checks the handle before applying anything.
    pub fn destroy_tracking(&self, handle: &TrackerHandle) -> bool {
        self.trackers
            .lock()
            .expect("tracker map poisoned")
            .remove(&handle.id)
            .is_some()
    }

    /// Current state of one tracked position.
    pub fn position_state(&self, handle: &TrackerHandle, position: &str) -> Option<PositionState> {
        self.trackers
            .lock()
            .expect("tracker map poisoned")
            .get(&handle.id)?
            .positions
            .get(position)
            .cloned()
    }

    /// Evaluate one playback instant and return the display mutations the
    /// native layer must apply.
    ///
    /// Commands are emitted in position-sorted order. Feeding the same
    /// timestamp twice yields commands only on the first call.
    pub async fn on_tick(
        &self,
        handle: &TrackerHandle,
        timestamp_ms: u64,
    ) -> Result<Vec<DisplayCommand>, EngineError> {
        let snapshot: Vec<(String, PositionState)> = {
            let trackers = self.trackers.lock().expect("tracker map poisoned");
            let tracker = trackers.get(&handle.id).ok_or(EngineError::UnknownTracker)?;
            tracker
                .positions
                .iter()
                .map(|(position, state)| (position.clone(), state.clone()))
                .collect()
        };

        let mut outcomes = Vec::with_capacity(snapshot.len());
        for (position, current) in snapshot {
            let winner = schedule::resolve_active(
                &position,
                timestamp_ms,
                self.distribution.windows_for(&position),
            )
            .cloned();
            let (next, command) = self.evaluate_position(&position, current, winner).await;
            outcomes.push((position, next, command));
        }

        // Stale-completion guard: the handle may have been destroyed while a
        // load was in flight. Apply and emit nothing in that case.
        let mut trackers = self.trackers.lock().expect("tracker map poisoned");
        let Some(tracker) = trackers.get_mut(&handle.id) else {
            tracing::debug!(handle = handle.id, "tracking destroyed mid-tick, discarding results");
            return Ok(Vec::new());
        };

        let mut commands = Vec::new();
        for (position, next, command) in outcomes {
            if let Some(state) = tracker.positions.get_mut(&position) {
                *state = next;
                commands.extend(command);
            }
        }
        Ok(commands)
    }

    /// Apply the transition table to one position.
    async fn evaluate_position(
        &self,
        position: &str,
        current: PositionState,
        winner: Option<TimeWindow>,
    ) -> (PositionState, Option<DisplayCommand>) {
        match (current, winner) {
            (PositionState::Hidden, None) => (PositionState::Hidden, None),

            (PositionState::Hidden, Some(window)) => match self.render_window(&window).await {
                Ok(tree) => {
                    tracing::debug!(position, external_id = %window.external_id, "showing");
                    let command = DisplayCommand::Show {
                        position: position.to_string(),
                        tree,
                        settings: window.settings.clone(),
                    };
                    (
                        PositionState::Showing {
                            external_id: window.external_id.clone(),
                            window,
                        },
                        Some(command),
                    )
                }
                Err(error) => {
                    tracing::warn!(
                        position,
                        external_id = %window.external_id,
                        %error,
                        "activation load failed, staying hidden"
                    );
                    (PositionState::Hidden, None)
                }
            },

            (PositionState::Showing { .. }, None) => {
                tracing::debug!(position, "hiding");
                (
                    PositionState::Hidden,
                    Some(DisplayCommand::Hide {
                        position: position.to_string(),
                    }),
                )
            }

            // Same activation still active; the winning window instance may
            // differ without any visible transition.
            (current @ PositionState::Showing { .. }, Some(window))
                if current.showing() == Some(&window.external_id) =>
            {
                (current, None)
            }

            (PositionState::Showing { .. }, Some(window)) => {
                match self.render_window(&window).await {
                    Ok(tree) => {
                        tracing::debug!(position, external_id = %window.external_id, "switching");
                        let command = DisplayCommand::Switch {
                            position: position.to_string(),
                            tree,
                            settings: window.settings.clone(),
                        };
                        (
                            PositionState::Showing {
                                external_id: window.external_id.clone(),
                                window,
                            },
                            Some(command),
                        )
                    }
                    Err(error) => {
                        tracing::warn!(
                            position,
                            external_id = %window.external_id,
                            %error,
                            "switch target failed to load, hiding"
                        );
                        (
                            PositionState::Hidden,
                            Some(DisplayCommand::Hide {
                                position: position.to_string(),
                            }),
                        )
                    }
                }
            }
        }
    }

    /// Load (through the cache) and render the activation a window refers to.
    async fn render_window(&self, window: &TimeWindow) -> Result<RenderTree, LoadError> {
        let external_id = &window.external_id;
        let activation = self
            .cache
            .get_or_load(external_id, || self.load_activation(external_id))
            .await?;

        let registry = self.registry.read().expect("processor registry poisoned");
        let outcome = self.renderer.render(&registry, &activation, false);
        for warning in &outcome.warnings {
            tracing::warn!(activation = %activation.id, %warning, "segment degraded during render");
        }
        Ok(outcome.tree)
    }

    async fn load_activation(&self, external_id: &ExternalId) -> Result<Activation, LoadError> {
        let doc = self.source.fetch(external_id).await?;
        let build = Activation::from_doc(doc)?;
        for issue in &build.issues {
            tracing::warn!(%external_id, %issue, "dropped part of activation during load");
        }
        Ok(build.activation)
    }
}
