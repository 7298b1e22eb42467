use crate::error::{DeriveError, Result};
use crate::model::{Attribute, Constraint, DBNAME, Entity};

/// Synthesize the default physical name for a declared identifier.
///
/// An underscore is inserted before every run of uppercase letters that is
/// not at the start and not already preceded by one: `OrderLine` becomes
/// `ORDER_LINE`, `orderID` becomes `ORDER_ID`.
pub fn default_dbname(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c.is_uppercase() {
            if let Some(p) = prev {
                if !p.is_uppercase() && p != '_' {
                    out.push('_');
                }
            }
        }
        out.extend(c.to_uppercase());
        prev = Some(c);
    }

    out
}

/// Parameter `index` of the `kind` constraint, if the constraint is attached.
///
/// A constraint that is present but too short is an error: multi-column
/// overrides must name every column.
pub fn constraint_param<'a>(
    constraints: &'a [Constraint],
    kind: &str,
    index: usize,
    owner: (&str, &str),
) -> Result<Option<&'a str>> {
    let Some(constraint) = constraints.iter().find(|c| c.kind == kind) else {
        return Ok(None);
    };
    match constraint.params.get(index) {
        Some(param) => Ok(Some(param.as_str())),
        None => Err(DeriveError::MissingNamingParameter {
            entity: owner.0.to_string(),
            attribute: owner.1.to_string(),
            index,
        }),
    }
}

/// Resolve `name` against the `kind` override at `index`, falling back to
/// the synthesized default.
pub fn resolve_name(
    name: &str,
    constraints: &[Constraint],
    kind: &str,
    index: usize,
    owner: (&str, &str),
) -> Result<String> {
    Ok(match constraint_param(constraints, kind, index, owner)? {
        Some(param) => param.to_string(),
        None => default_dbname(name),
    })
}

/// Physical table name of an entity.
pub fn table_name(entity: &Entity) -> Result<String> {
    resolve_name(
        &entity.name,
        &entity.constraints,
        DBNAME,
        0,
        (&entity.name, &entity.name),
    )
}

/// Physical column name of a single-column attribute.
pub fn column_name(owner: &Entity, attr: &Attribute) -> Result<String> {
    resolve_name(
        &attr.name,
        &attr.constraints,
        DBNAME,
        0,
        (&owner.name, &attr.name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrType, DBCOLS, Primitive};

    #[test]
    fn test_default_dbname() {
        assert_eq!(default_dbname("OrderLine"), "ORDER_LINE");
        assert_eq!(default_dbname("orderId"), "ORDER_ID");
        assert_eq!(default_dbname("orderID"), "ORDER_ID");
        assert_eq!(default_dbname("name"), "NAME");
        assert_eq!(default_dbname("owner_id"), "OWNER_ID");
        assert_eq!(default_dbname("last_Name"), "LAST_NAME");
    }

    #[test]
    fn test_equal_identifiers_synthesize_equal_names() {
        assert_eq!(default_dbname("createdAt"), default_dbname("createdAt"));
    }

    #[test]
    fn test_explicit_override_wins() {
        let entity = Entity::new("OrderLine").with_constraint(DBNAME, &["order_lines"]);
        assert_eq!(table_name(&entity).unwrap(), "order_lines");

        let plain = Entity::new("OrderLine");
        assert_eq!(table_name(&plain).unwrap(), "ORDER_LINE");
    }

    #[test]
    fn test_column_name() {
        let owner = Entity::new("User");
        let attr = Attribute::new("firstName", AttrType::primitive(Primitive::Text));
        assert_eq!(column_name(&owner, &attr).unwrap(), "FIRST_NAME");

        let attr = attr.with_constraint(DBNAME, &["fname"]);
        assert_eq!(column_name(&owner, &attr).unwrap(), "fname");
    }

    #[test]
    fn test_missing_parameter() {
        let attr = Attribute::new("a", AttrType::entity("Second")).with_constraint(DBCOLS, &["trt"]);

        assert_eq!(
            constraint_param(&attr.constraints, DBCOLS, 0, ("First", "a")).unwrap(),
            Some("trt")
        );
        let err = constraint_param(&attr.constraints, DBCOLS, 1, ("First", "a")).unwrap_err();
        assert_eq!(
            err,
            DeriveError::MissingNamingParameter {
                entity: "First".to_string(),
                attribute: "a".to_string(),
                index: 1,
            }
        );
    }

    #[test]
    fn test_absent_constraint_is_not_an_error() {
        let attr = Attribute::new("a", AttrType::entity("Second"));
        assert_eq!(
            constraint_param(&attr.constraints, DBCOLS, 3, ("First", "a")).unwrap(),
            None
        );
    }
}
