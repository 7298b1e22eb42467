use std::collections::HashSet;

use tracing::{debug, warn};

use crate::derive::Deriver;
use crate::error::{DeriveError, Result};
use crate::index::AttrRef;
use crate::model::{AttrType, DBCOLS, Entity, Model};

/// Validate `model` with default options.
pub fn validate(model: &Model) -> Result<()> {
    Deriver::new(model).validate()
}

impl<'m> Deriver<'m> {
    pub fn validate(&self) -> Result<()> {
        for entity in &self.model.entities {
            self.check_members(entity)?;
            self.pk_attrs(entity)?;
            self.check_references(entity)?;
        }
        debug!(
            model = %self.model.name,
            entities = self.model.entities.len(),
            "model validated"
        );
        Ok(())
    }

    /// Attribute names are unique and every named type exists.
    fn check_members(&self, entity: &'m Entity) -> Result<()> {
        let mut names = HashSet::new();
        for attr in &entity.attributes {
            if !names.insert(attr.name.as_str()) {
                return Err(DeriveError::DuplicateMember {
                    entity: entity.name.clone(),
                    name: attr.name.clone(),
                });
            }
            match &attr.typ {
                AttrType::Entity(_) => {
                    self.index.target_of(entity, attr)?;
                }
                AttrType::Enum(name) => {
                    self.enum_type(entity, attr, name)?;
                }
                AttrType::Primitive(_) => {}
            }
        }
        Ok(())
    }

    /// Every reference placing columns on `entity` must get distinct names.
    ///
    /// A second reference to an already reached entity needs a `dbcols`
    /// override unless that entity has a single-column key, whose default
    /// `<name>_id` column is already distinct.
    fn check_references(&self, entity: &'m Entity) -> Result<()> {
        let mut sources: Vec<(AttrRef<'m>, &'m Entity)> = Vec::new();
        let mut backrefs = HashSet::new();
        for r in self.index.referrers(&entity.name) {
            if r.attr.multiplicity.is_many() && !r.attr.other_multiplicity().is_many() {
                if !backrefs.insert(self.backref_name(r.owner, r.attr)) {
                    return Err(DeriveError::AmbiguousReference {
                        entity: r.owner.name.clone(),
                        attribute: r.attr.name.clone(),
                        target: entity.name.clone(),
                    });
                }
                sources.push((*r, r.owner));
            }
        }
        for attr in entity.attributes.iter().filter(|a| a.is_entity_ref()) {
            if !attr.multiplicity.is_many() {
                sources.push((AttrRef::new(entity, attr), self.index.target_of(entity, attr)?));
            } else if attr.other_multiplicity().is_many() {
                warn!(
                    entity = %entity.name,
                    attribute = %attr.name,
                    "many-to-many reference introduces no columns, model an association entity"
                );
            }
        }

        let mut reached = HashSet::new();
        for (source, target) in sources {
            let parts = self.key_parts(target)?;
            if parts.is_empty() {
                return Err(DeriveError::MissingPrimaryKey {
                    entity: source.owner.name.clone(),
                    attribute: source.attr.name.clone(),
                    target: target.name.clone(),
                });
            }

            if let Some(cols) = source.attr.constraint(DBCOLS) {
                if cols.params.len() < parts.len() {
                    return Err(DeriveError::MissingNamingParameter {
                        entity: source.owner.name.clone(),
                        attribute: source.attr.name.clone(),
                        index: cols.params.len(),
                    });
                }
                continue;
            }

            if !reached.insert(target.name.as_str()) && parts.len() > 1 {
                return Err(DeriveError::AmbiguousReference {
                    entity: source.owner.name.clone(),
                    attribute: source.attr.name.clone(),
                    target: target.name.clone(),
                });
            }
        }
        Ok(())
    }
}
