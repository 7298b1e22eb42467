use std::collections::{HashMap, HashSet};

use crate::error::{DeriveError, Result};
use crate::model::{Attribute, Entity, Model};

/// An attribute together with the entity declaring it.
#[derive(Debug, Clone, Copy)]
pub struct AttrRef<'m> {
    pub owner: &'m Entity,
    pub attr: &'m Attribute,
}

impl<'m> AttrRef<'m> {
    pub fn new(owner: &'m Entity, attr: &'m Attribute) -> Self {
        Self { owner, attr }
    }
}

/// Built once per model; read-only afterwards.
#[derive(Debug)]
pub struct ModelIndex<'m> {
    entities: HashMap<&'m str, &'m Entity>,
    enums: HashSet<&'m str>,
    /// Entity name -> entity-reference attributes targeting it, in model order
    referrers: HashMap<&'m str, Vec<AttrRef<'m>>>,
}

impl<'m> ModelIndex<'m> {
    pub fn build(model: &'m Model) -> Self {
        let entities = model
            .entities
            .iter()
            .map(|e| (e.name.as_str(), e))
            .collect();
        let enums = model.enums.iter().map(|e| e.name.as_str()).collect();

        let mut referrers: HashMap<&str, Vec<AttrRef<'m>>> = HashMap::new();
        for owner in &model.entities {
            for attr in &owner.attributes {
                if let Some(target) = attr.target() {
                    referrers
                        .entry(target)
                        .or_default()
                        .push(AttrRef::new(owner, attr));
                }
            }
        }

        Self {
            entities,
            enums,
            referrers,
        }
    }

    pub fn entity(&self, name: &str) -> Option<&'m Entity> {
        self.entities.get(name).copied()
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    /// The entity referenced by `attr`, which must be an entity reference.
    pub fn target_of(&self, owner: &Entity, attr: &Attribute) -> Result<&'m Entity> {
        let target = attr.target().unwrap_or_default();
        self.entity(target).ok_or_else(|| DeriveError::UnknownEntity {
            entity: owner.name.clone(),
            attribute: attr.name.clone(),
            target: target.to_string(),
        })
    }

    /// Entity-reference attributes, declared anywhere, whose target is `entity`.
    pub fn referrers(&self, entity: &str) -> &[AttrRef<'m>] {
        self.referrers
            .get(entity)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }
}
