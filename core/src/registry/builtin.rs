//! Built-in segment processors.
//!
//! `text`, `image`, and `button` are leaves; `row` and `column` are
//! structural and wrap their already-rendered children in a stack.

use overcue_types::settings::{get_alignment, get_f64, get_str};

use crate::model::SegmentNode;
use crate::render::{RenderNode, RenderPrimitive, StackAxis, TextStyle};

use super::{SegmentError, SegmentProcessor};

/// `text`: content string with optional size/color/alignment settings.
pub struct TextProcessor;

impl SegmentProcessor for TextProcessor {
    fn process(
        &self,
        node: &SegmentNode,
        _children: Vec<RenderNode>,
    ) -> Result<RenderNode, SegmentError> {
        let content = node
            .content_str()
            .or_else(|| get_str(&node.settings, "text"))
            .ok_or(SegmentError::MissingField { field: "content" })?;

        Ok(RenderNode::leaf(RenderPrimitive::Text {
            content: content.to_string(),
            style: TextStyle {
                size: get_f64(&node.settings, "fontSize"),
                color: get_str(&node.settings, "color").map(str::to_string),
                align: get_alignment(&node.settings, "alignment"),
            },
        }))
    }
}

/// `image`: source from content or `url`/`src` settings, optional alt text.
pub struct ImageProcessor;

impl SegmentProcessor for ImageProcessor {
    fn process(
        &self,
        node: &SegmentNode,
        _children: Vec<RenderNode>,
    ) -> Result<RenderNode, SegmentError> {
        let source = node
            .content_str()
            .or_else(|| get_str(&node.settings, "url"))
            .or_else(|| get_str(&node.settings, "src"))
            .ok_or(SegmentError::MissingField { field: "source" })?;

        Ok(RenderNode::leaf(RenderPrimitive::Image {
            source: source.to_string(),
            alt: get_str(&node.settings, "alt").map(str::to_string),
        }))
    }
}

/// `button`: label from content or `label` setting, optional action.
pub struct ButtonProcessor;

impl SegmentProcessor for ButtonProcessor {
    fn process(
        &self,
        node: &SegmentNode,
        _children: Vec<RenderNode>,
    ) -> Result<RenderNode, SegmentError> {
        let label = node
            .content_str()
            .or_else(|| get_str(&node.settings, "label"))
            .ok_or(SegmentError::MissingField { field: "label" })?;

        let action = get_str(&node.settings, "action")
            .or_else(|| get_str(&node.settings, "url"))
            .map(str::to_string);

        Ok(RenderNode::leaf(RenderPrimitive::Button {
            label: label.to_string(),
            action,
        }))
    }
}

/// `row` / `column`: structural container stacking rendered children.
pub struct StackProcessor {
    axis: StackAxis,
}

impl StackProcessor {
    pub fn row() -> Self {
        Self {
            axis: StackAxis::Horizontal,
        }
    }

    pub fn column() -> Self {
        Self {
            axis: StackAxis::Vertical,
        }
    }
}

impl SegmentProcessor for StackProcessor {
    fn process(
        &self,
        node: &SegmentNode,
        children: Vec<RenderNode>,
    ) -> Result<RenderNode, SegmentError> {
        Ok(RenderNode::with_children(
            RenderPrimitive::Stack {
                axis: self.axis,
                gap: get_f64(&node.settings, "gap"),
                align: get_alignment(&node.settings, "alignment"),
            },
            children,
        ))
    }
}
