//! Segment content tree.
//!
//! Built bottom-up from raw JSON values, so the tree is acyclic by
//! construction and a malformed node drops out individually instead of
//! taking the whole template with it.

use overcue_types::{SegmentNodeDoc, SettingsMap};

use super::validation::ValidationIssue;

/// One node of an activation's content tree.
///
/// The `kind` tag is open-ended: the five built-in kinds (`text`, `image`,
/// `button`, `row`, `column`) are known to the default registry, and apps
/// may register processors for their own tags.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentNode {
    pub kind: String,
    pub content: Option<serde_json::Value>,
    pub settings: SettingsMap,
    pub children: Vec<SegmentNode>,
}

impl SegmentNode {
    /// Convert one raw value into a node, recursing into children.
    ///
    /// Returns `None` (after recording an issue) when the value is not a
    /// segment object; malformed children are dropped the same way while
    /// their siblings survive.
    pub fn from_value(
        value: serde_json::Value,
        block: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<SegmentNode> {
        let doc: SegmentNodeDoc = match serde_json::from_value(value) {
            Ok(doc) => doc,
            Err(err) => {
                issues.push(ValidationIssue::MalformedSegment {
                    block: block.to_string(),
                    detail: err.to_string(),
                });
                return None;
            }
        };

        let children = doc
            .segments
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| Self::from_value(child, block, issues))
            .collect();

        Some(SegmentNode {
            kind: doc.kind,
            content: doc.content,
            settings: doc.settings.unwrap_or_default(),
            children,
        })
    }

    /// Content coerced to text, for leaf kinds whose payload is a string.
    pub fn content_str(&self) -> Option<&str> {
        self.content.as_ref().and_then(|v| v.as_str())
    }
}
