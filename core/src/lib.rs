pub mod cache;
pub mod model;
pub mod registry;
pub mod render;
pub mod schedule;
pub mod tracker;

// Re-exports for convenience
pub use cache::{ActivationCache, LoadError};
pub use model::{
    Activation, Distribution, DistributionLoad, ParseError, SegmentNode, TemplateBlock, TimeWindow,
    ValidationError, ValidationIssue,
};
pub use registry::{ProcessorRegistry, SegmentError, SegmentProcessor};
pub use render::{
    RenderBlock, RenderNode, RenderOutcome, RenderPrimitive, RenderTree, RenderWarning,
    TemplateRenderer,
};
pub use schedule::resolve_active;
pub use tracker::{
    ActivationSource, DisplayCommand, EngineError, OverlayEngine, PositionState, TrackerHandle,
};
