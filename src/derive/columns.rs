//! Columns introduced on an entity's table by a single attribute.
//!
//! Where the columns of a reference land depends on the multiplicity pair
//! (own upper bound, back-reference upper bound):
//!
//! | own | back | columns |
//! |-----|------|---------|
//! | 1   | *    | on the declaring entity |
//! | 1   | 1    | on the declaring entity |
//! | *   | 1    | on the referenced entity |
//! | *   | *    | none (needs an association entity) |

use crate::error::{DeriveError, Result};
use crate::index::AttrRef;
use crate::model::{AttrType, Attribute, DBCOLS, DBNAME, Entity};
use crate::naming::{column_name, constraint_param, resolve_name, table_name};

use super::{Column, DbType, Deriver, KeyPart, Origin};

impl<'m> Deriver<'m> {
    /// Columns `entity`'s table carries because of `attr`.
    ///
    /// `attr` is either declared on `entity` or references it from another
    /// entity. Self-references are treated as declared on `entity`; use
    /// [`Deriver::target_columns`] for their referenced side.
    pub fn columns(&self, entity: &'m Entity, attr: AttrRef<'m>) -> Result<Vec<Column>> {
        if std::ptr::eq(attr.owner, entity) {
            self.own_columns(entity, attr.attr)
        } else {
            self.target_columns(entity, attr)
        }
    }

    /// Columns of an attribute declared on `entity`.
    pub fn own_columns(&self, entity: &'m Entity, attr: &'m Attribute) -> Result<Vec<Column>> {
        let dbtype = match &attr.typ {
            AttrType::Primitive(p) => DbType::from(*p),
            AttrType::Enum(name) => self.enum_type(entity, attr, name)?,
            AttrType::Entity(_) if attr.multiplicity.is_many() => return Ok(Vec::new()),
            AttrType::Entity(_) => {
                let target = self.index.target_of(entity, attr)?;
                return self.fk_columns(
                    entity,
                    AttrRef::new(entity, attr),
                    target,
                    &attr.name,
                    attr.id,
                    attr.multiplicity.is_optional(),
                );
            }
        };

        Ok(vec![Column {
            name: attr.name.clone(),
            dbname: column_name(entity, attr)?,
            entity: entity.name.clone(),
            origin: Origin::from(AttrRef::new(entity, attr)),
            pk: attr.id,
            fk: false,
            fk_target: None,
            dbtype,
            nullable: attr.multiplicity.is_optional(),
        }])
    }

    /// Columns `attr`, declared on another entity, places on the entity it references.
    pub fn target_columns(&self, entity: &'m Entity, attr: AttrRef<'m>) -> Result<Vec<Column>> {
        let back = attr.attr.other_multiplicity();
        if !attr.attr.multiplicity.is_many() || back.is_many() {
            return Ok(Vec::new());
        }

        let backref = self.backref_name(attr.owner, attr.attr);
        self.fk_columns(
            entity,
            attr,
            attr.owner,
            &backref,
            attr.attr.containment(),
            back.is_optional(),
        )
    }

    /// Foreign-key columns on `entity` pointing at `target`'s primary key.
    fn fk_columns(
        &self,
        entity: &'m Entity,
        source: AttrRef<'m>,
        target: &'m Entity,
        rel_name: &str,
        pk: bool,
        nullable: bool,
    ) -> Result<Vec<Column>> {
        let parts = self.key_parts(target)?;
        if parts.is_empty() {
            return Err(DeriveError::MissingPrimaryKey {
                entity: source.owner.name.clone(),
                attribute: source.attr.name.clone(),
                target: target.name.clone(),
            });
        }

        let table = table_name(target)?;
        let names = self.fk_names(source.owner, source.attr, rel_name, &parts)?;

        Ok(parts
            .into_iter()
            .zip(names)
            .map(|(part, (name, dbname))| Column {
                name,
                dbname,
                entity: entity.name.clone(),
                origin: Origin::from(source),
                pk,
                fk: true,
                fk_target: Some(format!("{table}.{}", part.dbname)),
                dbtype: part.dbtype,
                nullable,
            })
            .collect())
    }

    /// `(name, dbname)` of each foreign-key column `owner.attr` introduces for `parts`.
    ///
    /// A `dbcols` override names every column. Without one, a single column
    /// is called `<rel_name>_id` and composite columns take the names of the
    /// resolved key attributes.
    pub(crate) fn fk_names(
        &self,
        owner: &Entity,
        attr: &Attribute,
        rel_name: &str,
        parts: &[KeyPart<'m>],
    ) -> Result<Vec<(String, String)>> {
        let ctx = (owner.name.as_str(), attr.name.as_str());

        if attr.constraint(DBCOLS).is_some() {
            return (0..parts.len())
                .map(|i| {
                    let name = constraint_param(&attr.constraints, DBCOLS, i, ctx)?
                        .unwrap_or_default()
                        .to_string();
                    Ok((name.clone(), name))
                })
                .collect();
        }

        if let [_] = parts {
            let name = format!("{rel_name}_id");
            let dbname = resolve_name(&name, &attr.constraints, DBNAME, 0, ctx)?;
            return Ok(vec![(name, dbname)]);
        }

        Ok(parts
            .iter()
            .map(|p| (p.attr.name.clone(), p.attr_dbname.clone()))
            .collect())
    }
}
