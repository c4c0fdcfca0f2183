//! Validated runtime model
//!
//! This module turns wire documents ([`overcue_types::document`]) into the
//! immutable values the engine schedules and renders:
//! - **Distribution**: loaded once per session, owns every time window
//! - **Activation**: fetched lazily by external id, cached for the session
//! - **Segment nodes**: the declarative content tree inside a template
//!
//! Loading is fails-closed with partial-failure semantics: a window whose
//! interval is inverted, or a segment node that does not parse, is dropped
//! and recorded as a [`ValidationIssue`] while its siblings survive. Only
//! document-level problems (unreadable file, malformed JSON, an activation
//! with no usable template at all) fail the whole load.

mod activation;
mod distribution;
mod segment;
mod validation;

pub use activation::{Activation, ActivationBuild, TemplateBlock};
pub use distribution::{Distribution, DistributionEntry, DistributionLoad, TimeWindow};
pub use segment::SegmentNode;
pub use validation::{ParseError, ValidationError, ValidationIssue};
