use std::fmt;

use serde::Serialize;

use crate::index::AttrRef;
use crate::model::Primitive;

/// Semantic column type tag; renderers map it to their own type system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DbType {
    Integer,
    Float,
    Boolean,
    String(Option<u32>),
    Text,
    Decimal { precision: u32, scale: u32 },
    Date,
    DateTime,
    Enum(String),
}

impl From<Primitive> for DbType {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Int => Self::Integer,
            Primitive::Float => Self::Float,
            Primitive::Bool => Self::Boolean,
            Primitive::String(len) => Self::String(len),
            Primitive::Text => Self::Text,
            Primitive::Decimal(precision, scale) => Self::Decimal { precision, scale },
            Primitive::Date => Self::Date,
            // Time of day is stored with its date
            Primitive::Time | Primitive::DateTime => Self::DateTime,
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "Integer"),
            Self::Float => write!(f, "Float"),
            Self::Boolean => write!(f, "Boolean"),
            Self::String(Some(len)) => write!(f, "String({len})"),
            Self::String(None) => write!(f, "String"),
            Self::Text => write!(f, "Text"),
            Self::Decimal { precision, scale } => write!(f, "Decimal({precision}, {scale})"),
            Self::Date => write!(f, "Date"),
            Self::DateTime => write!(f, "DateTime"),
            Self::Enum(name) => write!(f, "Enum({name})"),
        }
    }
}

/// The attribute a derived element originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub entity: String,
    pub attribute: String,
}

impl From<AttrRef<'_>> for Origin {
    fn from(r: AttrRef<'_>) -> Self {
        Self {
            entity: r.owner.name.clone(),
            attribute: r.attr.name.clone(),
        }
    }
}

/// A physical column on one entity's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Field identifier in the generated host language.
    pub name: String,
    /// Physical column name.
    pub dbname: String,
    /// Entity whose table carries the column.
    pub entity: String,
    pub origin: Origin,
    pub pk: bool,
    pub fk: bool,
    /// `TABLE.COLUMN` referenced by a foreign-key column
    pub fk_target: Option<String>,
    pub dbtype: DbType,
    pub nullable: bool,
}

/// Navigational edge between two entities, seen from the owning side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub name: String,
    /// Target entity name.
    pub target: String,
    /// Columns realizing the edge on this side; empty for a pure many-side edge.
    pub fk_columns: Vec<Column>,
    /// Name of the edge on the target side.
    pub backref: String,
    pub self_referential: bool,
}

/// Composite foreign key spanning two or more columns of one relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyConstraint {
    pub name: String,
    pub columns: Vec<Column>,
}

impl ForeignKeyConstraint {
    pub fn column_dbnames(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.dbname.as_str()).collect()
    }

    pub fn targets(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| c.fk_target.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Column(Column),
    Relationship(Relationship),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Self::Column(c) => &c.name,
            Self::Relationship(r) => &r.name,
        }
    }

    pub fn as_column(&self) -> Option<&Column> {
        match self {
            Self::Column(c) => Some(c),
            Self::Relationship(_) => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Self::Relationship(r) => Some(r),
            Self::Column(_) => None,
        }
    }
}

/// Everything one entity's table exposes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EntityElements {
    pub elements: Vec<Element>,
    pub fk_constraints: Vec<ForeignKeyConstraint>,
}

impl EntityElements {
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.elements.iter().filter_map(Element::as_column)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.elements.iter().filter_map(Element::as_relationship)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns().find(|c| c.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.elements.iter().map(Element::name).collect()
    }
}
