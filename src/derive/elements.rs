use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{DeriveError, Result};
use crate::model::Entity;
use crate::naming::{default_dbname, table_name};

use super::{Column, Deriver, Element, EntityElements, ForeignKeyConstraint, Relationship};

/// Elements folded so far; columns sharing a name collapse into one.
#[derive(Default)]
struct Merged {
    elements: Vec<Element>,
    /// Column name -> index into `elements`
    columns: HashMap<String, usize>,
}

impl Merged {
    fn push(mut self, entity: &str, element: Element) -> Result<Self> {
        if let Element::Column(column) = &element {
            if let Some(&i) = self.columns.get(&column.name) {
                if let Element::Column(existing) = &mut self.elements[i] {
                    merge_column(entity, existing, column)?;
                }
                return Ok(self);
            }
            self.columns.insert(column.name.clone(), self.elements.len());
        }
        self.elements.push(element);
        Ok(self)
    }
}

/// Fold `incoming` into `existing`: keys are OR-ed, nullability is AND-ed.
fn merge_column(entity: &str, existing: &mut Column, incoming: &Column) -> Result<()> {
    if existing.dbname != incoming.dbname {
        return Err(DeriveError::ColumnNameConflict {
            entity: entity.to_string(),
            column: existing.name.clone(),
            first: existing.dbname.clone(),
            second: incoming.dbname.clone(),
        });
    }
    if existing.dbtype != incoming.dbtype {
        return Err(DeriveError::ColumnTypeConflict {
            entity: entity.to_string(),
            column: existing.name.clone(),
            first: existing.dbtype.clone(),
            second: incoming.dbtype.clone(),
        });
    }

    trace!(
        entity,
        column = %existing.name,
        from = %incoming.origin.attribute,
        "merging column"
    );
    existing.pk |= incoming.pk;
    existing.fk |= incoming.fk;
    existing.nullable &= incoming.nullable;
    if existing.fk_target.is_none() {
        existing.fk_target = incoming.fk_target.clone();
    }
    Ok(())
}

/// Give every relationship's key columns the merged flags of the table column
/// they stand for. Each path keeps its own `fk_target`.
fn sync_fk_columns(elements: &mut [Element]) {
    let flags: HashMap<String, (bool, bool, bool)> = elements
        .iter()
        .filter_map(Element::as_column)
        .map(|c| (c.name.clone(), (c.pk, c.fk, c.nullable)))
        .collect();

    for element in elements.iter_mut() {
        if let Element::Relationship(rel) = element {
            for column in &mut rel.fk_columns {
                if let Some(&(pk, fk, nullable)) = flags.get(&column.name) {
                    column.pk = pk;
                    column.fk = fk;
                    column.nullable = nullable;
                }
            }
        }
    }
}

impl<'m> Deriver<'m> {
    /// Every column and relationship `entity`'s table exposes, plus the
    /// composite foreign keys among them.
    ///
    /// Elements introduced by other entities' references come first, then
    /// those of `entity`'s own attributes, each in declaration order.
    pub fn ent_elements(&self, entity: &'m Entity) -> Result<EntityElements> {
        let mut derived = Vec::new();

        for &attr in self.index.referrers(&entity.name) {
            let rel = self.target_rel(entity, attr)?;
            if rel.fk_columns.is_empty() {
                continue;
            }
            push_relationship(&mut derived, rel);
        }

        for attr in &entity.attributes {
            if attr.is_entity_ref() {
                push_relationship(&mut derived, self.own_rel(entity, attr)?);
            } else {
                derived.extend(self.own_columns(entity, attr)?.into_iter().map(Element::Column));
            }
        }

        let mut elements = derived
            .into_iter()
            .try_fold(Merged::default(), |merged, element| {
                merged.push(&entity.name, element)
            })?
            .elements;
        sync_fk_columns(&mut elements);

        let mut seen = HashSet::new();
        for element in &elements {
            if !seen.insert(element.name()) {
                return Err(DeriveError::DuplicateMember {
                    entity: entity.name.clone(),
                    name: element.name().to_string(),
                });
            }
        }

        let fk_constraints = if self.options.composite_keys {
            let table = table_name(entity)?;
            elements
                .iter()
                .filter_map(Element::as_relationship)
                .filter(|r| r.fk_columns.len() > 1)
                .map(|r| ForeignKeyConstraint {
                    name: format!("FK_{table}_{}", default_dbname(&r.name)),
                    columns: r.fk_columns.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        debug!(
            entity = %entity.name,
            elements = elements.len(),
            fk_constraints = fk_constraints.len(),
            "derived entity elements"
        );

        Ok(EntityElements {
            elements,
            fk_constraints,
        })
    }
}

/// Queue a relationship's columns followed by the relationship itself.
fn push_relationship(derived: &mut Vec<Element>, rel: Relationship) {
    derived.extend(rel.fk_columns.iter().cloned().map(Element::Column));
    derived.push(Element::Relationship(rel));
}
