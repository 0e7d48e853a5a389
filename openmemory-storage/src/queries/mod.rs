pub mod memory_crud;
pub mod memory_query;
pub mod temporal_crud;
pub mod tenant_rewrite;
pub mod waypoint_crud;
