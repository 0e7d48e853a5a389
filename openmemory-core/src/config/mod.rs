pub mod defaults;

mod consolidation_config;
mod decay_config;
mod embedding_config;
mod encryption_config;
mod hsg_config;
mod lock_config;
mod retrieval_config;
mod scheduler_config;
mod storage_config;
mod temporal_config;
mod waypoint_config;

pub use consolidation_config::ConsolidationConfig;
pub use decay_config::DecayConfig;
pub use embedding_config::EmbeddingConfig;
pub use encryption_config::EncryptionConfig;
pub use hsg_config::HsgConfig;
pub use lock_config::LockConfig;
pub use retrieval_config::RetrievalConfig;
pub use scheduler_config::SchedulerConfig;
pub use storage_config::StorageConfig;
pub use temporal_config::TemporalConfig;
pub use waypoint_config::WaypointConfig;

use serde::{Deserialize, Serialize};

/// The full, literal-default configuration tree for an OpenMemory instance.
/// There is no file-loading layer in scope; callers construct one with
/// `OpenMemoryConfig::default()` and override fields directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenMemoryConfig {
    pub retrieval: RetrievalConfig,
    pub decay: DecayConfig,
    pub consolidation: ConsolidationConfig,
    pub waypoints: WaypointConfig,
    pub locks: LockConfig,
    pub scheduler: SchedulerConfig,
    pub encryption: EncryptionConfig,
    pub storage: StorageConfig,
    pub embeddings: EmbeddingConfig,
    pub temporal: TemporalConfig,
    pub hsg: HsgConfig,
}
