//! Segment processor registry
//!
//! Maps a segment kind tag to the handler that turns nodes of that kind into
//! render primitives. The five built-in kinds are pre-registered; apps extend
//! (or override) by registering their own processors under any tag.
//!
//! Resolution of an unknown kind is a typed not-found, never a panic: the
//! renderer decides how to degrade, the registry just answers the lookup.

mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::SegmentNode;
use crate::render::RenderNode;

pub use builtin::{ButtonProcessor, ImageProcessor, StackProcessor, TextProcessor};

/// A processor failed to resolve a node it was asked about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("missing required {field}")]
    MissingField { field: &'static str },

    #[error("{0}")]
    Invalid(String),
}

/// Turns one segment node into a render primitive.
///
/// Container kinds receive their children already rendered, so a processor
/// can compose size-dependent layout without re-walking the tree; leaf
/// processors ignore `children`.
pub trait SegmentProcessor: Send + Sync {
    fn process(
        &self,
        node: &SegmentNode,
        children: Vec<RenderNode>,
    ) -> Result<RenderNode, SegmentError>;
}

/// Registry of segment processors keyed by kind tag.
#[derive(Clone)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn SegmentProcessor>>,
}

impl ProcessorRegistry {
    /// An empty registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// A registry with the five built-in kinds pre-registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("text", Arc::new(TextProcessor));
        registry.register("image", Arc::new(ImageProcessor));
        registry.register("button", Arc::new(ButtonProcessor));
        registry.register("row", Arc::new(StackProcessor::row()));
        registry.register("column", Arc::new(StackProcessor::column()));
        registry
    }

    /// Register a processor for a kind. Re-registering a kind replaces the
    /// previous processor (last writer wins), which is how apps override
    /// built-ins.
    pub fn register(&mut self, kind: impl Into<String>, processor: Arc<dyn SegmentProcessor>) {
        self.processors.insert(kind.into(), processor);
    }

    /// Look up the processor for a kind. `None` means no processor is
    /// registered; the caller chooses whether to skip, substitute, or fail.
    pub fn resolve(&self, kind: &str) -> Option<Arc<dyn SegmentProcessor>> {
        self.processors.get(kind).cloned()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.processors.keys().map(String::as_str)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("ProcessorRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderPrimitive;

    struct FixedProcessor(&'static str);

    impl SegmentProcessor for FixedProcessor {
        fn process(
            &self,
            _node: &SegmentNode,
            _children: Vec<RenderNode>,
        ) -> Result<RenderNode, SegmentError> {
            Ok(RenderNode::leaf(RenderPrimitive::Text {
                content: self.0.to_string(),
                style: Default::default(),
            }))
        }
    }

    fn text_node() -> SegmentNode {
        SegmentNode {
            kind: "text".into(),
            content: Some("x".into()),
            settings: Default::default(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = ProcessorRegistry::with_builtins();
        for kind in ["text", "image", "button", "row", "column"] {
            assert!(registry.resolve(kind).is_some(), "missing builtin {kind}");
        }
    }

    #[test]
    fn test_unknown_kind_resolves_to_none() {
        let registry = ProcessorRegistry::with_builtins();
        assert!(registry.resolve("unknown-xyz").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = ProcessorRegistry::with_builtins();
        registry.register("text", Arc::new(FixedProcessor("override")));

        let node = registry
            .resolve("text")
            .unwrap()
            .process(&text_node(), Vec::new())
            .unwrap();
        assert!(matches!(
            node.primitive,
            RenderPrimitive::Text { ref content, .. } if content == "override"
        ));
    }

    #[test]
    fn test_custom_kind_registration() {
        struct CountdownProcessor;

        impl SegmentProcessor for CountdownProcessor {
            fn process(
                &self,
                node: &SegmentNode,
                _children: Vec<RenderNode>,
            ) -> Result<RenderNode, SegmentError> {
                Ok(RenderNode::leaf(RenderPrimitive::Custom {
                    kind: node.kind.clone(),
                    props: node.settings.clone(),
                }))
            }
        }

        let mut registry = ProcessorRegistry::with_builtins();
        registry.register("countdown", Arc::new(CountdownProcessor));

        let node = SegmentNode {
            kind: "countdown".into(),
            content: None,
            settings: serde_json::json!({ "until": 90000 })
                .as_object()
                .unwrap()
                .clone(),
            children: Vec::new(),
        };
        let rendered = registry
            .resolve("countdown")
            .unwrap()
            .process(&node, Vec::new())
            .unwrap();
        assert!(matches!(
            rendered.primitive,
            RenderPrimitive::Custom { ref kind, ref props }
                if kind == "countdown" && props.contains_key("until")
        ));
    }
}
