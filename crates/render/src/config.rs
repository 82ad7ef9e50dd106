use serde::{Deserialize, Serialize};

/// What a render does when an entity has a non-finite position or a
/// non-positive size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEntityPolicy {
    /// Fail the whole render before anything is drawn.
    #[default]
    Abort,
    /// Leave the entity out of the frame and log a warning.
    Skip,
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub invalid_entity_policy: InvalidEntityPolicy,
}

impl RenderConfig {
    /// Settings that skip malformed entities instead of failing the frame.
    pub fn lenient() -> Self {
        Self {
            invalid_entity_policy: InvalidEntityPolicy::Skip,
        }
    }
}
