use serde::Serialize;

use crate::derive::{Column, Deriver, Element, ForeignKeyConstraint, Relationship};
use crate::error::Result;
use crate::model::{CATEGORY, DISPLAY, Entity, EnumDef, Model};
use crate::naming::table_name;
use crate::options::Options;

/// Derived relational schema of a whole model, as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIR {
    pub name: String,
    pub tables: Vec<TableIR>,
    pub enums: Vec<EnumDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableIR {
    pub entity: String,
    pub table: String,
    pub category: Option<Vec<String>>,
    pub display: Option<Vec<String>>,
    pub elements: Vec<Element>,
    pub fk_constraints: Vec<ForeignKeyConstraint>,
}

impl SchemaIR {
    /// Validate `model`, then derive every entity's table in declaration order.
    pub fn derive(model: &Model, options: &Options) -> Result<Self> {
        let deriver = Deriver::with_options(model, options.clone());
        deriver.validate()?;

        let tables = model
            .entities
            .iter()
            .map(|e| TableIR::derive(&deriver, e))
            .collect::<Result<Vec<_>>>()?;

        Ok(SchemaIR {
            name: model.name.clone(),
            tables,
            enums: model.enums.clone(),
        })
    }

    pub fn table(&self, entity: &str) -> Option<&TableIR> {
        self.tables.iter().find(|t| t.entity == entity)
    }
}

impl TableIR {
    pub fn derive<'m>(deriver: &Deriver<'m>, entity: &'m Entity) -> Result<Self> {
        let derived = deriver.ent_elements(entity)?;
        let params = |kind: &str| entity.constraint(kind).map(|c| c.params.clone());

        Ok(TableIR {
            entity: entity.name.clone(),
            table: table_name(entity)?,
            category: params(CATEGORY),
            display: params(DISPLAY),
            elements: derived.elements,
            fk_constraints: derived.fk_constraints,
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.elements.iter().filter_map(Element::as_column)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.elements.iter().filter_map(Element::as_relationship)
    }

    pub fn primary_key(&self) -> Vec<&Column> {
        self.columns().filter(|c| c.pk).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::fixtures::*;
    use crate::error::DeriveError;
    use crate::model::DBNAME;

    #[test]
    fn test_schema_tables() {
        let schema = SchemaIR::derive(&shop(), &Options::default()).unwrap();

        let tables: Vec<(&str, &str)> = schema
            .tables
            .iter()
            .map(|t| (t.entity.as_str(), t.table.as_str()))
            .collect();
        assert_eq!(
            tables,
            vec![
                ("Customer", "CUSTOMER"),
                ("Order", "ORDER"),
                ("OrderLine", "ORDER_LINE"),
                ("Product", "PRODUCT"),
            ]
        );
        assert_eq!(schema.enums.len(), 1);
    }

    #[test]
    fn test_primary_key_includes_containment_columns() {
        let schema = SchemaIR::derive(&shop(), &Options::default()).unwrap();
        let line = schema.table("OrderLine").unwrap();

        let pk: Vec<&str> = line.primary_key().iter().map(|c| c.dbname.as_str()).collect();
        assert_eq!(pk, vec!["ORDER_ID", "LINE_NO"]);
        assert_eq!(line.relationships().count(), 2);
    }

    #[test]
    fn test_presentation_metadata() {
        let mut model = shop();
        model.entities[0] = model.entities[0]
            .clone()
            .with_constraint(CATEGORY, &["Sales"])
            .with_constraint(DISPLAY, &["name"])
            .with_constraint(DBNAME, &["clients"]);

        let schema = SchemaIR::derive(&model, &Options::default()).unwrap();
        let customer = schema.table("Customer").unwrap();
        assert_eq!(customer.table, "clients");
        assert_eq!(customer.category, Some(vec!["Sales".to_string()]));
        assert_eq!(customer.display, Some(vec!["name".to_string()]));
        assert_eq!(schema.table("Order").unwrap().category, None);

        let order = schema.table("Order").unwrap();
        let customer_id = order.columns().find(|c| c.name == "customer_id").unwrap();
        assert_eq!(customer_id.fk_target.as_deref(), Some("clients.ID"));
    }

    #[test]
    fn test_validation_runs_first() {
        let model = Model::new("m")
            .with_entity(Entity::new("A").with_attr(int("x").id()).with_attr(int("x")));
        assert!(matches!(
            SchemaIR::derive(&model, &Options::default()),
            Err(DeriveError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let schema = SchemaIR::derive(&chain(Some(&["trt", "vrt"])), &Options::default()).unwrap();
        let json = serde_json::to_value(&schema).unwrap();

        let first = &json["tables"][0];
        assert_eq!(first["table"], "FIRST");
        assert_eq!(first["elements"][0]["kind"], "column");
        assert_eq!(first["elements"][0]["name"], "trt");
        assert_eq!(first["elements"][2]["kind"], "relationship");
        assert_eq!(first["fk_constraints"][0]["name"], "FK_FIRST_A");
    }
}
