mod columns;
mod elements;
mod pk;
mod relationship;
mod types;

pub use pk::KeyPart;
pub use types::{
    Column, DbType, Element, EntityElements, ForeignKeyConstraint, Origin, Relationship,
};

use crate::index::{AttrRef, ModelIndex};
use crate::model::{Attribute, Entity, Model, Reference};
use crate::options::Options;

pub struct Deriver<'m> {
    pub(crate) model: &'m Model,
    pub(crate) index: ModelIndex<'m>,
    pub(crate) options: Options,
}

impl<'m> Deriver<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self::with_options(model, Options::default())
    }

    pub fn with_options(model: &'m Model, options: Options) -> Self {
        Self {
            model,
            index: ModelIndex::build(model),
            options,
        }
    }

    pub fn entity(&self, name: &str) -> Option<&'m Entity> {
        self.index.entity(name)
    }

    /// Look up `entity.attribute`.
    pub fn attr(&self, entity: &str, attribute: &str) -> Option<AttrRef<'m>> {
        let owner = self.index.entity(entity)?;
        let attr = owner.attr(attribute)?;
        Some(AttrRef::new(owner, attr))
    }

    /// Name of the edge on the referenced side of `owner.attr`.
    pub fn backref_name(&self, owner: &Entity, attr: &Attribute) -> String {
        match &attr.reference {
            Some(Reference {
                bidirectional: true,
                other_side: Some(name),
                ..
            }) => name.clone(),
            _ => self.options.backref_case.apply(&owner.name),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Models shared by the derivation tests.

    use crate::model::{
        AttrType, Attribute, DBCOLS, Entity, EnumDef, Model, Multiplicity, Primitive, Reference,
    };

    pub fn int(name: &str) -> Attribute {
        Attribute::new(name, AttrType::primitive(Primitive::Int))
    }

    pub fn string(name: &str, len: u32) -> Attribute {
        Attribute::new(name, AttrType::primitive(Primitive::String(Some(len))))
    }

    pub fn reference(name: &str, target: &str) -> Attribute {
        Attribute::new(name, AttrType::entity(target))
    }

    /// `First { a: Second }`, `Second { #b: Third }`, `Third { #c: int  #d: string(10) }`
    pub fn chain(dbcols: Option<&[&str]>) -> Model {
        let mut a = reference("a", "Second");
        if let Some(cols) = dbcols {
            a = a.with_constraint(DBCOLS, cols);
        }
        Model::new("test")
            .with_entity(Entity::new("First").with_attr(a))
            .with_entity(Entity::new("Second").with_attr(reference("b", "Third").id()))
            .with_entity(
                Entity::new("Third")
                    .with_attr(int("c").id())
                    .with_attr(string("d", 10).id()),
            )
    }

    /// Customers place orders made of contained order lines.
    pub fn shop() -> Model {
        Model::new("shop")
            .with_enum(
                EnumDef::new("Status")
                    .with_literal("OPEN", "O")
                    .with_literal("CLOSED", "C"),
            )
            .with_entity(
                Entity::new("Customer")
                    .with_attr(int("id").id())
                    .with_attr(string("name", 80))
                    .with_attr(
                        reference("orders", "Order")
                            .many()
                            .with_reference(Reference::bidirectional("customer")),
                    ),
            )
            .with_entity(
                Entity::new("Order")
                    .with_attr(int("id").id())
                    .with_attr(Attribute::new("status", AttrType::enumeration("Status")))
                    .with_attr(
                        reference("lines", "OrderLine")
                            .many()
                            .with_reference(Reference::containment()),
                    ),
            )
            .with_entity(
                Entity::new("OrderLine")
                    .with_attr(int("lineNo").id())
                    .with_attr(reference("product", "Product"))
                    .with_attr(int("quantity")),
            )
            .with_entity(
                Entity::new("Product")
                    .with_attr(string("sku", 20).id())
                    .with_attr(
                        Attribute::new("price", AttrType::primitive(Primitive::Decimal(10, 2)))
                            .optional(),
                    ),
            )
    }

    /// `Parent` holds `refs` to `Child` with the given own/back multiplicities.
    pub fn pair(own: Multiplicity, back: Multiplicity) -> Model {
        Model::new("pair")
            .with_entity(
                Entity::new("Parent").with_attr(int("id").id()).with_attr(
                    reference("refs", "Child")
                        .with_multiplicity(own)
                        .with_reference(
                            Reference::bidirectional("parent").with_other_multiplicity(back),
                        ),
                ),
            )
            .with_entity(Entity::new("Child").with_attr(int("code").id()))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::options::BackrefCase;

    #[test]
    fn test_attr_lookup() {
        let model = shop();
        let deriver = Deriver::new(&model);

        let r = deriver.attr("Order", "lines").unwrap();
        assert_eq!(r.owner.name, "Order");
        assert_eq!(r.attr.name, "lines");
        assert!(deriver.attr("Order", "missing").is_none());
        assert!(deriver.attr("Missing", "id").is_none());
    }

    #[test]
    fn test_backref_name() {
        let model = shop();
        let deriver = Deriver::new(&model);

        let orders = deriver.attr("Customer", "orders").unwrap();
        assert_eq!(deriver.backref_name(orders.owner, orders.attr), "customer");

        let product = deriver.attr("OrderLine", "product").unwrap();
        assert_eq!(deriver.backref_name(product.owner, product.attr), "orderline");

        let snake = Deriver::with_options(
            &model,
            Options {
                backref_case: BackrefCase::Snake,
                ..Options::default()
            },
        );
        assert_eq!(snake.backref_name(product.owner, product.attr), "order_line");
    }
}
