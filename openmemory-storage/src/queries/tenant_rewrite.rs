use openmemory_core::errors::{OpenMemoryResult, StorageError};
use openmemory_core::memory::TenantScope;

/// Builds the `AND ...` clause enforcing a [`TenantScope`], to be spliced
/// into a query immediately after its `WHERE 1=1` anchor.
///
/// `TenantScope::Any` contributes no predicate at all: callers that reach
/// it have already decided to see every tenant's rows (maintenance tasks),
/// so the rewriter must not silently narrow the query.
pub fn tenant_clause(tenant: &TenantScope) -> (&'static str, Option<String>) {
    match tenant {
        TenantScope::Tenant(id) => ("AND tenant_id = ?", Some(id.clone())),
        TenantScope::None => ("AND tenant_id IS NULL", None),
        TenantScope::Any => ("", None),
    }
}

/// Splices `tenant_clause(tenant)` into `sql` at its first `/*TENANT*/`
/// marker. Rejects `sql` if its quotes or parentheses are unbalanced, since
/// an unbalanced fragment means the marker isn't actually sitting in the
/// WHERE clause the caller thinks it is.
pub fn inject_tenant_predicate(sql: &str, tenant: &TenantScope) -> OpenMemoryResult<String> {
    validate_balanced(sql)?;

    let (clause, _) = tenant_clause(tenant);
    let marker = "/*TENANT*/";
    let Some(pos) = sql.find(marker) else {
        return Err(StorageError::RewriteFailed { reason: "query has no /*TENANT*/ marker".into() }.into());
    };

    let mut rewritten = String::with_capacity(sql.len() + clause.len());
    rewritten.push_str(&sql[..pos]);
    rewritten.push_str(clause);
    rewritten.push_str(&sql[pos + marker.len()..]);
    Ok(rewritten)
}

/// Checks that single quotes, double quotes, and parentheses are balanced,
/// ignoring characters inside quoted literals so an unbalanced paren
/// *inside* a string doesn't trip a false positive.
fn validate_balanced(sql: &str) -> OpenMemoryResult<()> {
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut paren_depth: i32 = 0;

    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double_quote => {
                if in_single_quote && chars.peek() == Some(&'\'') {
                    chars.next(); // escaped '' inside a literal
                } else {
                    in_single_quote = !in_single_quote;
                }
            }
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            '(' if !in_single_quote && !in_double_quote => paren_depth += 1,
            ')' if !in_single_quote && !in_double_quote => paren_depth -= 1,
            _ => {}
        }
        if paren_depth < 0 {
            return Err(StorageError::RewriteFailed { reason: "unbalanced closing parenthesis".into() }.into());
        }
    }

    if in_single_quote || in_double_quote {
        return Err(StorageError::RewriteFailed { reason: "unterminated quote".into() }.into());
    }
    if paren_depth != 0 {
        return Err(StorageError::RewriteFailed { reason: "unbalanced parentheses".into() }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_scope_produces_expected_clause() {
        let (clause, param) = tenant_clause(&TenantScope::of("acme"));
        assert_eq!(clause, "AND tenant_id = ?");
        assert_eq!(param.as_deref(), Some("acme"));

        let (clause, param) = tenant_clause(&TenantScope::None);
        assert_eq!(clause, "AND tenant_id IS NULL");
        assert_eq!(param, None);

        let (clause, param) = tenant_clause(&TenantScope::Any);
        assert_eq!(clause, "");
        assert_eq!(param, None);
    }

    #[test]
    fn injects_at_marker() {
        let sql = "SELECT * FROM memories WHERE 1=1 /*TENANT*/ ORDER BY created_at";
        let rewritten = inject_tenant_predicate(sql, &TenantScope::of("acme")).unwrap();
        assert_eq!(rewritten, "SELECT * FROM memories WHERE 1=1 AND tenant_id = ? ORDER BY created_at");
    }

    #[test]
    fn rejects_missing_marker() {
        let sql = "SELECT * FROM memories WHERE 1=1 ORDER BY created_at";
        assert!(inject_tenant_predicate(sql, &TenantScope::of("acme")).is_err());
    }

    #[test]
    fn rejects_unbalanced_parens() {
        let sql = "SELECT * FROM memories WHERE (1=1 /*TENANT*/";
        assert!(inject_tenant_predicate(sql, &TenantScope::of("acme")).is_err());
    }

    #[test]
    fn tolerates_parens_inside_string_literals() {
        let sql = "SELECT * FROM memories WHERE tags_json = '(not a paren)' AND 1=1 /*TENANT*/";
        let rewritten = inject_tenant_predicate(sql, &TenantScope::Any).unwrap();
        assert!(rewritten.contains("(not a paren)"));
    }
}
