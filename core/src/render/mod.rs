//! Template rendering
//!
//! Walks an activation's template in declaration order and resolves every
//! segment node through the processor registry, producing a platform-neutral
//! [`RenderTree`]. Children render before their parent so structural kinds
//! compose already-resolved subtrees.
//!
//! Rendering is a pure function of its inputs: it never mutates the
//! activation, performs no I/O, and the same activation can be rendered for
//! two positions at once without interference. Node-level problems degrade
//! to a placeholder primitive plus a warning; the render as a whole never
//! fails.

mod tree;

pub use tree::{RenderBlock, RenderNode, RenderPrimitive, RenderTree, StackAxis, TextStyle};

use crate::model::{Activation, SegmentNode};
use crate::registry::{ProcessorRegistry, SegmentError};

/// A node-level problem encountered during a render.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderWarning {
    #[error("no processor for segment kind {kind:?} in block {block:?}")]
    UnknownKind { kind: String, block: String },

    #[error("segment kind {kind:?} in block {block:?} failed: {source}")]
    Segment {
        kind: String,
        block: String,
        #[source]
        source: SegmentError,
    },
}

/// A rendered tree plus the warnings collected along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub tree: RenderTree,
    pub warnings: Vec<RenderWarning>,
}

/// Resolves activation templates into render trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an activation's template.
    ///
    /// `preview` selects the design-time preview template when the
    /// activation carries one, falling back to the live template otherwise.
    pub fn render(
        &self,
        registry: &ProcessorRegistry,
        activation: &Activation,
        preview: bool,
    ) -> RenderOutcome {
        let mut warnings = Vec::new();

        let blocks = activation
            .template_for(preview)
            .iter()
            .map(|block| RenderBlock {
                name: block.name.clone(),
                nodes: block
                    .segments
                    .iter()
                    .map(|node| render_node(registry, node, &block.name, &mut warnings))
                    .collect(),
            })
            .collect();

        RenderOutcome {
            tree: RenderTree {
                activation_id: activation.id.clone(),
                blocks,
            },
            warnings,
        }
    }
}

/// Render one node, children first.
fn render_node(
    registry: &ProcessorRegistry,
    node: &SegmentNode,
    block: &str,
    warnings: &mut Vec<RenderWarning>,
) -> RenderNode {
    let children = node
        .children
        .iter()
        .map(|child| render_node(registry, child, block, warnings))
        .collect();

    let Some(processor) = registry.resolve(&node.kind) else {
        warnings.push(RenderWarning::UnknownKind {
            kind: node.kind.clone(),
            block: block.to_string(),
        });
        return RenderNode::placeholder();
    };

    match processor.process(node, children) {
        Ok(rendered) => rendered,
        Err(source) => {
            warnings.push(RenderWarning::Segment {
                kind: node.kind.clone(),
                block: block.to_string(),
                source,
            });
            RenderNode::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Activation;

    fn activation(json: &str) -> Activation {
        Activation::from_doc(serde_json::from_str(json).unwrap())
            .unwrap()
            .activation
    }

    fn registry() -> ProcessorRegistry {
        ProcessorRegistry::with_builtins()
    }

    #[test]
    fn test_renders_blocks_in_declaration_order() {
        let act = activation(
            r#"{
                "id": "a1", "name": "Two blocks",
                "template": [
                    { "name": "header", "settings": { "segments": [ { "type": "text", "content": "one" } ] } },
                    { "name": "footer", "settings": { "segments": [ { "type": "text", "content": "two" } ] } }
                ]
            }"#,
        );

        let outcome = TemplateRenderer::new().render(&registry(), &act, false);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.tree.activation_id, "a1");

        let names: Vec<&str> = outcome.tree.blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["header", "footer"]);
    }

    #[test]
    fn test_children_rendered_into_structural_parent() {
        let act = activation(
            r#"{
                "id": "a2", "name": "Nested",
                "template": [ { "name": "main", "settings": { "segments": [
                    { "type": "row", "segments": [
                        { "type": "text", "content": "left" },
                        { "type": "column", "segments": [ { "type": "text", "content": "deep" } ] }
                    ] }
                ] } } ]
            }"#,
        );

        let outcome = TemplateRenderer::new().render(&registry(), &act, false);
        assert!(outcome.warnings.is_empty());

        let row = &outcome.tree.blocks[0].nodes[0];
        assert!(matches!(
            row.primitive,
            RenderPrimitive::Stack { axis: StackAxis::Horizontal, .. }
        ));
        assert_eq!(row.children.len(), 2);
        assert_eq!(row.children[1].children.len(), 1);
    }

    #[test]
    fn test_unknown_kind_degrades_to_placeholder() {
        let act = activation(
            r#"{
                "id": "a3", "name": "Mixed",
                "template": [ { "name": "main", "settings": { "segments": [
                    { "type": "text", "content": "fine" },
                    { "type": "unknown-xyz" },
                    { "type": "text", "content": "also fine" }
                ] } } ]
            }"#,
        );

        let outcome = TemplateRenderer::new().render(&registry(), &act, false);

        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            outcome.warnings[0],
            RenderWarning::UnknownKind { ref kind, .. } if kind == "unknown-xyz"
        ));

        let nodes = &outcome.tree.blocks[0].nodes;
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[0].primitive, RenderPrimitive::Text { .. }));
        assert!(matches!(nodes[1].primitive, RenderPrimitive::Placeholder));
        assert!(matches!(nodes[2].primitive, RenderPrimitive::Text { .. }));
    }

    #[test]
    fn test_processor_failure_degrades_to_placeholder() {
        // text node without content makes the builtin processor fail
        let act = activation(
            r#"{
                "id": "a4", "name": "Bad text",
                "template": [ { "name": "main", "settings": { "segments": [
                    { "type": "text" },
                    { "type": "text", "content": "ok" }
                ] } } ]
            }"#,
        );

        let outcome = TemplateRenderer::new().render(&registry(), &act, false);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            outcome.tree.blocks[0].nodes[0].primitive,
            RenderPrimitive::Placeholder
        ));
        assert!(matches!(
            outcome.tree.blocks[0].nodes[1].primitive,
            RenderPrimitive::Text { .. }
        ));
    }

    #[test]
    fn test_preview_mode_selects_preview_template() {
        let act = activation(
            r#"{
                "id": "a5", "name": "P",
                "settings": { "preview": { "template": [
                    { "name": "main", "settings": { "segments": [ { "type": "text", "content": "preview" } ] } }
                ] } },
                "template": [ { "name": "main", "settings": { "segments": [ { "type": "text", "content": "live" } ] } } ]
            }"#,
        );

        let renderer = TemplateRenderer::new();
        let preview = renderer.render(&registry(), &act, true);
        let live = renderer.render(&registry(), &act, false);

        let text_of = |outcome: &RenderOutcome| match &outcome.tree.blocks[0].nodes[0].primitive {
            RenderPrimitive::Text { content, .. } => content.clone(),
            other => panic!("expected text, got {other:?}"),
        };
        assert_eq!(text_of(&preview), "preview");
        assert_eq!(text_of(&live), "live");
    }

    #[test]
    fn test_tree_serializes_with_type_tags() {
        let act = activation(
            r#"{
                "id": "a7", "name": "Bridged",
                "template": [ { "name": "main", "settings": { "segments": [
                    { "type": "row", "segments": [ { "type": "text", "content": "hi" } ] }
                ] } } ]
            }"#,
        );

        let outcome = TemplateRenderer::new().render(&registry(), &act, false);
        let json = serde_json::to_value(&outcome.tree).unwrap();

        let row = &json["blocks"][0]["nodes"][0];
        assert_eq!(row["primitive"]["type"], "stack");
        assert_eq!(row["primitive"]["axis"], "horizontal");
        assert_eq!(row["children"][0]["primitive"]["type"], "text");
        assert_eq!(row["children"][0]["primitive"]["content"], "hi");
    }

    #[test]
    fn test_render_is_repeatable() {
        let act = activation(
            r#"{
                "id": "a6", "name": "Stable",
                "template": [ { "name": "main", "settings": { "segments": [
                    { "type": "row", "segments": [ { "type": "button", "content": "Go" } ] }
                ] } } ]
            }"#,
        );

        let renderer = TemplateRenderer::new();
        let first = renderer.render(&registry(), &act, false);
        let second = renderer.render(&registry(), &act, false);
        assert_eq!(first, second);
    }
}
