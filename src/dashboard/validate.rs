//! Static checks on catalog entries.
//!
//! Parses each slot's SQL to confirm it is a single read-only SELECT and that
//! every column its chart references is among the names the query projects.

use sqlparser::ast::{Expr, SelectItem, SetExpr, Statement};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use tracing::warn;

use super::{Catalog, Slot};
use crate::error::{DashError, Result};

/// Outcome of checking one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    /// Every directive field is projected by the query.
    Verified,
    /// The query could not be analysed; the check happens at render time instead.
    Unverified(String),
}

/// What a query projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Output column names, lowercased, in order.
    Names(Vec<String>),
    /// The projection contains a wildcard, so its names depend on the table.
    Wildcard,
    /// The statement is not a query.
    NotSelect,
}

/// Output column names of a single SELECT.
///
/// Unaliased expressions get the positional names the query service assigns
/// (`_col0`, `_col1`, ...). SQL the parser rejects, and shapes it cannot name
/// columns for, are returned as `Err` with a reason.
pub fn projection_names(sql: &str) -> std::result::Result<Projection, String> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql).map_err(|e| e.to_string())?;

    let query = match statements.as_slice() {
        [Statement::Query(query)] => query,
        [_] => return Ok(Projection::NotSelect),
        _ => return Err(format!("expected one statement, found {}", statements.len())),
    };
    let SetExpr::Select(select) = query.body.as_ref() else {
        return Err("set operations are not analysed".to_string());
    };

    let mut names = Vec::with_capacity(select.projection.len());
    for (idx, item) in select.projection.iter().enumerate() {
        let name = match item {
            SelectItem::ExprWithAlias { alias, .. } => alias.value.clone(),
            SelectItem::UnnamedExpr(Expr::Identifier(ident)) => ident.value.clone(),
            SelectItem::UnnamedExpr(Expr::CompoundIdentifier(parts)) => match parts.last() {
                Some(ident) => ident.value.clone(),
                None => format!("_col{idx}"),
            },
            SelectItem::UnnamedExpr(_) => format!("_col{idx}"),
            SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => {
                return Ok(Projection::Wildcard)
            }
        };
        names.push(name.to_lowercase());
    }
    Ok(Projection::Names(names))
}

/// Checks one slot's directive against its query's projection.
///
/// A statement that parses but is not a SELECT, or a directive field the
/// query does not project, is a configuration error. SQL the generic parser
/// cannot handle is reported as unverified.
pub fn check_slot(slot: &Slot) -> Result<FieldCheck> {
    let names = match projection_names(&slot.sql) {
        Ok(Projection::Names(names)) => names,
        Ok(Projection::Wildcard) => {
            return Ok(FieldCheck::Unverified(
                "projection uses a wildcard".to_string(),
            ))
        }
        Ok(Projection::NotSelect) => {
            return Err(DashError::config(format!(
                "'{}' is not a read-only SELECT",
                slot.title
            )))
        }
        Err(reason) => return Ok(FieldCheck::Unverified(reason)),
    };

    let missing: Vec<&str> = slot
        .directive
        .fields()
        .into_iter()
        .filter(|f| !names.iter().any(|n| n.eq_ignore_ascii_case(f)))
        .collect();
    if !missing.is_empty() {
        return Err(DashError::config(format!(
            "'{}' charts {} but its query only returns {}",
            slot.title,
            missing.join(", "),
            names.join(", ")
        )));
    }
    Ok(FieldCheck::Verified)
}

/// Checks every slot in a catalog, stopping at the first defect.
pub fn validate_catalog(catalog: &Catalog) -> Result<Vec<(String, FieldCheck)>> {
    let mut checks = Vec::new();
    for slot in catalog.slots() {
        let check = check_slot(slot)?;
        if let FieldCheck::Unverified(reason) = &check {
            warn!(slot = %slot.title, "Could not verify chart columns: {}", reason);
        }
        checks.push((slot.title.clone(), check));
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{catalog, ChartDirective};

    #[test]
    fn test_projection_names_aliases_and_columns() {
        let projection = projection_names(
            "SELECT s.region, city, SUM(t.net_amount) AS Revenue, COUNT(*) FROM t JOIN s ON t.id = s.id",
        )
        .unwrap();
        assert_eq!(
            projection,
            Projection::Names(vec![
                "region".to_string(),
                "city".to_string(),
                "revenue".to_string(),
                "_col3".to_string(),
            ])
        );
    }

    #[test]
    fn test_projection_wildcard_is_unknown() {
        assert_eq!(
            projection_names("SELECT * FROM t").unwrap(),
            Projection::Wildcard
        );
    }

    #[test]
    fn test_non_select_rejected() {
        let slot = Slot::new(
            "Cleanup",
            "DELETE FROM sales",
            ChartDirective::table("a", "b"),
        );
        assert!(matches!(check_slot(&slot), Err(DashError::Config(_))));
    }

    #[test]
    fn test_missing_field_is_config_defect() {
        let slot = Slot::new(
            "Revenue by Region",
            "SELECT region, SUM(net_amount) AS revenue FROM t GROUP BY region",
            ChartDirective::bar("region", "total_revenue"),
        );
        let err = check_slot(&slot).unwrap_err();
        assert!(err.to_string().contains("total_revenue"));
    }

    #[test]
    fn test_matching_fields_verified() {
        let slot = Slot::new(
            "Top Stores",
            "SELECT store_id, SUM(net_amount) AS revenue FROM t GROUP BY store_id LIMIT 15",
            ChartDirective::bar("store_id", "revenue"),
        );
        assert_eq!(check_slot(&slot).unwrap(), FieldCheck::Verified);
    }

    #[test]
    fn test_unparseable_sql_is_unverified() {
        let slot = Slot::new(
            "Broken",
            "SELEC region FROM t",
            ChartDirective::bar("region", "revenue"),
        );
        assert!(matches!(
            check_slot(&slot).unwrap(),
            FieldCheck::Unverified(_)
        ));
    }

    #[test]
    fn test_builtin_catalogs_have_no_defects() {
        for catalog in [catalog::overview(), catalog::detailed()] {
            let checks = validate_catalog(&catalog).unwrap();
            assert_eq!(checks.len(), catalog.slots().count());
        }
    }

    #[test]
    fn test_builtin_simple_queries_verified() {
        let catalog = catalog::overview();
        let checks = validate_catalog(&catalog).unwrap();
        let payment = checks
            .iter()
            .find(|(title, _)| title == "Revenue by Payment Method")
            .unwrap();
        assert_eq!(payment.1, FieldCheck::Verified);
    }
}
