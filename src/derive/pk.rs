use crate::error::{DeriveError, Result};
use crate::model::{AttrType, Attribute, Entity};
use crate::naming::column_name;

use super::{DbType, Deriver};

/// One physical column of an entity's resolved primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPart<'m> {
    /// Non-reference attribute the column ultimately stores.
    pub attr: &'m Attribute,
    /// Physical name of `attr` on the entity declaring it.
    pub attr_dbname: String,
    /// Column name on the keyed entity's table.
    pub name: String,
    /// Physical column name on the keyed entity's table.
    pub dbname: String,
    pub dbtype: DbType,
}

impl<'m> Deriver<'m> {
    /// Flat, ordered physical attributes composing `entity`'s primary key.
    pub fn pk_attrs(&self, entity: &'m Entity) -> Result<Vec<&'m Attribute>> {
        Ok(self.key_parts(entity)?.into_iter().map(|p| p.attr).collect())
    }

    /// Resolved primary key of `entity` together with the physical columns
    /// holding it on `entity`'s own table.
    pub fn key_parts(&self, entity: &'m Entity) -> Result<Vec<KeyPart<'m>>> {
        let mut resolving = Vec::new();
        self.resolve_key(entity, &mut resolving)
    }

    fn resolve_key(
        &self,
        entity: &'m Entity,
        resolving: &mut Vec<&'m str>,
    ) -> Result<Vec<KeyPart<'m>>> {
        if resolving.contains(&entity.name.as_str()) {
            let mut path: Vec<String> = resolving.iter().map(|s| s.to_string()).collect();
            path.push(entity.name.clone());
            return Err(DeriveError::CyclicPrimaryKey {
                entity: entity.name.clone(),
                path,
            });
        }
        resolving.push(&entity.name);

        let mut parts = Vec::new();
        for attr in entity.attributes.iter().filter(|a| a.id) {
            let dbtype = match &attr.typ {
                AttrType::Entity(_) => {
                    let target = self.index.target_of(entity, attr)?;
                    let target_parts = self.resolve_key(target, resolving)?;
                    if target_parts.is_empty() {
                        return Err(DeriveError::MissingPrimaryKey {
                            entity: entity.name.clone(),
                            attribute: attr.name.clone(),
                            target: target.name.clone(),
                        });
                    }
                    let names = self.fk_names(entity, attr, &attr.name, &target_parts)?;
                    parts.extend(target_parts.into_iter().zip(names).map(
                        |(part, (name, dbname))| KeyPart {
                            name,
                            dbname,
                            ..part
                        },
                    ));
                    continue;
                }
                AttrType::Primitive(p) => DbType::from(*p),
                AttrType::Enum(name) => self.enum_type(entity, attr, name)?,
            };
            let dbname = column_name(entity, attr)?;
            parts.push(KeyPart {
                attr,
                attr_dbname: dbname.clone(),
                name: attr.name.clone(),
                dbname,
                dbtype,
            });
        }

        resolving.pop();
        Ok(parts)
    }

    pub(crate) fn enum_type(&self, owner: &Entity, attr: &Attribute, name: &str) -> Result<DbType> {
        if self.index.has_enum(name) {
            Ok(DbType::Enum(name.to_string()))
        } else {
            Err(DeriveError::UnknownEnum {
                entity: owner.name.clone(),
                attribute: attr.name.clone(),
                target: name.to_string(),
            })
        }
    }
}
