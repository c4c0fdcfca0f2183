pub mod document;
pub mod external_id;
pub mod settings;

// Re-exports for convenience
pub use document::{
    ActivationDoc, ActivationSettingsDoc, BlockSettingsDoc, DistributionDoc, DistributionEntryDoc,
    InstanceDoc, InstanceSettingsDoc, PreviewDoc, SegmentNodeDoc, TemplateBlockDoc,
};
pub use external_id::ExternalId;
pub use settings::SettingsMap;
