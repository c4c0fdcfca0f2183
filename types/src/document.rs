//! Wire-format documents consumed by the engine.
//!
//! These structs mirror the published JSON shape one-to-one and perform no
//! validation beyond what serde requires; the engine's model layer turns
//! them into validated runtime values. Field names on the wire are
//! camelCase.
//!
//! Segment children are deliberately kept as raw [`serde_json::Value`]s:
//! one malformed node must not abort deserialization of the whole template,
//! so nodes are converted one at a time further up the stack.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::external_id::ExternalId;
use crate::settings::SettingsMap;

// ═══════════════════════════════════════════════════════════════════════════
// Distribution
// ═══════════════════════════════════════════════════════════════════════════

/// A named bundle of activations and their time windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionDoc {
    pub id: String,
    pub name: String,

    /// One entry per referenced activation, in declaration order.
    #[serde(default)]
    pub data: Vec<DistributionEntryDoc>,
}

/// An activation reference plus the windows during which it may show.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntryDoc {
    pub external_id: ExternalId,

    /// Each instance becomes one time window.
    #[serde(default)]
    pub instances: Vec<InstanceDoc>,
}

/// A scheduled appearance of an activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDoc {
    /// Playback position at which the window opens, in milliseconds.
    pub start_time: u64,

    /// Playback position at which the window closes (exclusive), in milliseconds.
    pub end_time: u64,

    #[serde(default)]
    pub settings: InstanceSettingsDoc,
}

/// Position key plus opaque position-scoped settings (alignment etc.).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettingsDoc {
    pub position: Option<String>,

    /// Everything else is passed through to the native layer untouched.
    #[serde(flatten)]
    pub extra: SettingsMap,
}

// ═══════════════════════════════════════════════════════════════════════════
// Activation
// ═══════════════════════════════════════════════════════════════════════════

/// A piece of overlay content with a rendering template.
///
/// Fetched lazily by external id and immutable once published under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationDoc {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub settings: Option<ActivationSettingsDoc>,

    /// Ordered sequence of named blocks.
    #[serde(default)]
    pub template: Vec<TemplateBlockDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationSettingsDoc {
    /// Design-time preview override; ignored during live playback.
    #[serde(default)]
    pub preview: Option<PreviewDoc>,

    #[serde(flatten)]
    pub extra: SettingsMap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDoc {
    #[serde(default)]
    pub template: Vec<TemplateBlockDoc>,
}

/// One named block of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBlockDoc {
    pub name: String,

    #[serde(default)]
    pub settings: BlockSettingsDoc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSettingsDoc {
    /// Segment nodes, kept raw so a bad node can be dropped individually.
    #[serde(default)]
    pub segments: Vec<Value>,

    #[serde(flatten)]
    pub extra: SettingsMap,
}

// ═══════════════════════════════════════════════════════════════════════════
// Segment nodes
// ═══════════════════════════════════════════════════════════════════════════

/// A single node of the declarative content tree.
///
/// `row` and `column` nodes carry children in `segments`; leaf kinds carry
/// `content` and/or `settings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentNodeDoc {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub content: Option<Value>,

    #[serde(default)]
    pub settings: Option<SettingsMap>,

    /// Child nodes, raw for per-node fault isolation.
    #[serde(default)]
    pub segments: Option<Vec<Value>>,
}
