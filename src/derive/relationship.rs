use crate::error::Result;
use crate::index::AttrRef;
use crate::model::{Attribute, Entity};

use super::{Deriver, Relationship};

impl<'m> Deriver<'m> {
    /// Relationship of `entity` created by the entity-reference `attr`.
    ///
    /// Self-references are oriented from the declaring side; see
    /// [`Deriver::target_rel`] for the other one.
    pub fn rel(&self, entity: &'m Entity, attr: AttrRef<'m>) -> Result<Relationship> {
        if std::ptr::eq(attr.owner, entity) {
            self.own_rel(entity, attr.attr)
        } else {
            self.target_rel(entity, attr)
        }
    }

    /// Relationship named after `attr`, declared on `entity`.
    pub fn own_rel(&self, entity: &'m Entity, attr: &'m Attribute) -> Result<Relationship> {
        let target = self.index.target_of(entity, attr)?;
        Ok(Relationship {
            name: attr.name.clone(),
            target: target.name.clone(),
            fk_columns: self.own_columns(entity, attr)?,
            backref: self.backref_name(entity, attr),
            self_referential: target.name == entity.name,
        })
    }

    /// Back-side relationship on the entity `attr` references.
    pub fn target_rel(&self, entity: &'m Entity, attr: AttrRef<'m>) -> Result<Relationship> {
        Ok(Relationship {
            name: self.backref_name(attr.owner, attr.attr),
            target: attr.owner.name.clone(),
            fk_columns: self.target_columns(entity, attr)?,
            backref: attr.attr.name.clone(),
            self_referential: attr.owner.name == entity.name,
        })
    }
}
