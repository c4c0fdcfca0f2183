//! Activation content and its rendering template.

use overcue_types::{ActivationDoc, TemplateBlockDoc};

use super::segment::SegmentNode;
use super::validation::{ValidationError, ValidationIssue};

/// One named block of a template, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBlock {
    pub name: String,
    pub segments: Vec<SegmentNode>,
}

/// A validated activation, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub id: String,
    pub name: String,
    template: Vec<TemplateBlock>,
    preview_template: Option<Vec<TemplateBlock>>,
}

/// Result of building an activation: the value plus any parts dropped
/// along the way.
#[derive(Debug, Clone)]
pub struct ActivationBuild {
    pub activation: Activation,
    pub issues: Vec<ValidationIssue>,
}

impl Activation {
    /// Validate a wire document into an activation.
    ///
    /// Malformed segment nodes are dropped individually (recorded in
    /// `issues`); the activation as a whole is rejected only when no usable
    /// segment remains in its live template.
    pub fn from_doc(doc: ActivationDoc) -> Result<ActivationBuild, ValidationError> {
        let mut issues = Vec::new();

        let template = build_blocks(doc.template, &mut issues);
        if template.iter().all(|block| block.segments.is_empty()) {
            return Err(ValidationError::EmptyTemplate { id: doc.id });
        }

        // A present-but-empty preview is treated as absent so preview
        // rendering falls back to the live template.
        let preview_template = doc
            .settings
            .and_then(|s| s.preview)
            .map(|p| build_blocks(p.template, &mut issues))
            .filter(|blocks| blocks.iter().any(|block| !block.segments.is_empty()));

        Ok(ActivationBuild {
            activation: Activation {
                id: doc.id,
                name: doc.name,
                template,
                preview_template,
            },
            issues,
        })
    }

    pub fn template(&self) -> &[TemplateBlock] {
        &self.template
    }

    /// The template to render: the preview override when requested and
    /// present, the live template otherwise.
    pub fn template_for(&self, preview: bool) -> &[TemplateBlock] {
        if preview
            && let Some(preview_template) = &self.preview_template
        {
            return preview_template;
        }
        &self.template
    }
}

fn build_blocks(
    blocks: Vec<TemplateBlockDoc>,
    issues: &mut Vec<ValidationIssue>,
) -> Vec<TemplateBlock> {
    blocks
        .into_iter()
        .map(|block| {
            let segments = block
                .settings
                .segments
                .into_iter()
                .filter_map(|value| SegmentNode::from_value(value, &block.name, issues))
                .collect();
            TemplateBlock {
                name: block.name,
                segments,
            }
        })
        .collect()
}
