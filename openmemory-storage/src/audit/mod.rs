//! Append-only audit log: one row per mutating operation against a memory.

use rusqlite::{params, Connection};
use serde_json::Value;
use uuid::Uuid;

use openmemory_core::errors::OpenMemoryResult;
use openmemory_core::memory::TenantScope;

use crate::to_storage_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOperation {
    Create,
    Update,
    Delete,
    Consolidate,
    Decay,
}

impl AuditOperation {
    fn as_str(self) -> &'static str {
        match self {
            AuditOperation::Create => "create",
            AuditOperation::Update => "update",
            AuditOperation::Delete => "delete",
            AuditOperation::Consolidate => "consolidate",
            AuditOperation::Decay => "decay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditActor {
    System,
    User,
}

impl AuditActor {
    fn as_str(self) -> &'static str {
        match self {
            AuditActor::System => "system",
            AuditActor::User => "user",
        }
    }
}

pub struct AuditLogger;

impl AuditLogger {
    pub fn log(
        conn: &Connection,
        memory_id: Uuid,
        tenant: &TenantScope,
        operation: AuditOperation,
        actor: AuditActor,
        detail: Value,
    ) -> OpenMemoryResult<()> {
        conn.execute(
            "INSERT INTO memory_audit_log (memory_id, tenant_id, operation, actor, detail_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                memory_id.to_string(),
                tenant.tenant_id(),
                operation.as_str(),
                actor.as_str(),
                detail.to_string(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(())
    }
}
