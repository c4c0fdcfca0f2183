//! Per-position visibility state and display mutation commands.

use std::collections::BTreeMap;

use serde::Serialize;

use overcue_types::{ExternalId, SettingsMap};

use crate::model::TimeWindow;
use crate::render::RenderTree;

/// Identifies one overlay session's tracking state.
///
/// Handles are engine-scoped: state created by one engine is invisible to
/// every other, so two concurrently playing videos cannot interfere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackerHandle {
    pub(crate) id: u64,
}

/// Visibility state of one tracked position.
///
/// At most one activation is current per position at any instant. The state
/// is mutated only by the engine, once per tick, never concurrently for the
/// same position.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PositionState {
    #[default]
    Hidden,
    Showing {
        external_id: ExternalId,
        window: TimeWindow,
    },
}

impl PositionState {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// External id of the currently showing activation, if any.
    pub fn showing(&self) -> Option<&ExternalId> {
        match self {
            Self::Hidden => None,
            Self::Showing { external_id, .. } => Some(external_id),
        }
    }
}

/// A display mutation for the native layer to apply.
///
/// `Show`/`Switch` carry the rendered tree together with the winning
/// window's position-scoped settings (alignment etc.), so the native layer
/// needs no second query to place the content. Commands serialize with a
/// `type` tag for shells that apply them across a bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DisplayCommand {
    Show {
        position: String,
        tree: RenderTree,
        settings: SettingsMap,
    },
    Hide {
        position: String,
    },
    Switch {
        position: String,
        tree: RenderTree,
        settings: SettingsMap,
    },
}

impl DisplayCommand {
    pub fn position(&self) -> &str {
        match self {
            Self::Show { position, .. }
            | Self::Hide { position }
            | Self::Switch { position, .. } => position,
        }
    }
}

/// All tracked positions of one handle, keyed in sorted order so command
/// emission order is documented and stable.
#[derive(Debug, Default)]
pub(crate) struct TrackerState {
    pub positions: BTreeMap<String, PositionState>,
}
