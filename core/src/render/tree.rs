//! Platform-neutral render tree.
//!
//! The output of template rendering: a tree of primitive descriptions any
//! native UI layer can materialize. The engine never retains these; they are
//! owned by whoever asked for the render.

use serde::Serialize;

use overcue_types::SettingsMap;
use overcue_types::settings::Alignment;

/// Direction a container stacks its children in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackAxis {
    Horizontal,
    Vertical,
}

/// Resolved text presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: Option<f64>,
    /// Color as written in the document (e.g. "#ffcc00"); the native layer
    /// owns the actual color space.
    pub color: Option<String>,
    pub align: Option<Alignment>,
}

/// A renderable primitive description.
///
/// Serializes with a `type` tag so shells that materialize out-of-process
/// (over an FFI or IPC bridge) can consume trees as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RenderPrimitive {
    Text {
        content: String,
        style: TextStyle,
    },
    Image {
        source: String,
        alt: Option<String>,
    },
    Button {
        label: String,
        /// Opaque action reference (URL, deep link) executed by the shell.
        action: Option<String>,
    },
    Stack {
        axis: StackAxis,
        gap: Option<f64>,
        align: Option<Alignment>,
    },
    /// Stand-in for a segment that could not be resolved.
    Placeholder,
    /// Output of an app-registered processor for a custom kind.
    Custom {
        kind: String,
        props: SettingsMap,
    },
}

/// One node of the render tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub primitive: RenderPrimitive,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn leaf(primitive: RenderPrimitive) -> Self {
        Self {
            primitive,
            children: Vec::new(),
        }
    }

    pub fn with_children(primitive: RenderPrimitive, children: Vec<RenderNode>) -> Self {
        Self {
            primitive,
            children,
        }
    }

    pub fn placeholder() -> Self {
        Self::leaf(RenderPrimitive::Placeholder)
    }
}

/// One rendered template block, declaration order preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderBlock {
    pub name: String,
    pub nodes: Vec<RenderNode>,
}

/// The fully rendered output for one activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTree {
    pub activation_id: String,
    pub blocks: Vec<RenderBlock>,
}
