mod base;
mod lock;
mod salience;
mod sector;
mod tenant;
mod temporal;
mod vector_record;
mod waypoint;

pub use base::Memory;
pub use lock::SystemLock;
pub use salience::Salience;
pub use sector::{Sector, SectorConfig, SectorWeight};
pub use tenant::TenantScope;
pub use temporal::{TemporalEdge, TemporalFact};
pub use vector_record::{ScoredVector, VectorRecord};
pub use waypoint::Waypoint;
