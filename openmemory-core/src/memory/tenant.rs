use serde::{Deserialize, Serialize};

/// The three-valued tenant scope used by every read and write path
/// (spec.md §5): a request either addresses one tenant, explicitly
/// addresses rows with no tenant, or spans every tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantScope {
    /// Scoped to exactly one tenant id.
    Tenant(String),
    /// Scoped to rows with no tenant set at all.
    None,
    /// Unscoped: matches every tenant. Reserved for maintenance and
    /// administrative callers; never the default.
    Any,
}

impl TenantScope {
    pub fn of(tenant_id: impl Into<String>) -> Self {
        TenantScope::Tenant(tenant_id.into())
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TenantScope::Any)
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            TenantScope::Tenant(id) => Some(id.as_str()),
            TenantScope::None | TenantScope::Any => None,
        }
    }
}
