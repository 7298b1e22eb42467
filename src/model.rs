use serde::{Deserialize, Serialize};

/// Constraint kind carrying an explicit table or column name.
pub const DBNAME: &str = "dbname";
/// Constraint kind carrying explicit column names for multi-column attributes.
pub const DBCOLS: &str = "dbcols";
/// Constraint kind carrying an entity's presentation category.
pub const CATEGORY: &str = "category";
/// Constraint kind carrying the attributes used to display an entity.
pub const DISPLAY: &str = "display";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: AttrType,
    #[serde(default)]
    pub multiplicity: Multiplicity,
    /// Participates in the owner's primary key.
    #[serde(default)]
    pub id: bool,
    #[serde(default)]
    pub reference: Option<Reference>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    Primitive(Primitive),
    Enum(String),
    Entity(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Int,
    Float,
    Bool,
    /// Optional maximum length.
    String(Option<u32>),
    Text,
    /// Precision and scale.
    Decimal(u32, u32),
    Date,
    Time,
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upper {
    One,  // 1
    Many, // *
}

/// Reference descriptor of an entity-reference attribute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub bidirectional: bool,
    /// Navigational name on the referenced entity.
    #[serde(default)]
    pub other_side: Option<String>,
    #[serde(default)]
    pub containment: bool,
    /// Multiplicity of the back-reference as seen from the referenced entity.
    #[serde(default)]
    pub other_multiplicity: Option<Multiplicity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub kind: String,
    #[serde(default)]
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    #[serde(default)]
    pub literals: Vec<EnumLiteral>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumLiteral {
    pub name: String,
    pub code: String,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_enum(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_constraint(mut self, kind: &str, params: &[&str]) -> Self {
        self.constraints.push(Constraint::new(kind, params));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn constraint(&self, kind: &str) -> Option<&Constraint> {
        find_constraint(&self.constraints, kind)
    }
}

impl Attribute {
    /// A required single-valued attribute.
    pub fn new(name: impl Into<String>, typ: AttrType) -> Self {
        Self {
            name: name.into(),
            typ,
            multiplicity: Multiplicity::ONE,
            id: false,
            reference: None,
            constraints: Vec::new(),
        }
    }

    /// Mark as identifying (`#name` in the ER notation).
    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.multiplicity.lower = 0;
        self
    }

    pub fn many(mut self) -> Self {
        self.multiplicity = Multiplicity::MANY;
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_constraint(mut self, kind: &str, params: &[&str]) -> Self {
        self.constraints.push(Constraint::new(kind, params));
        self
    }

    /// Name of the referenced entity, if this is an entity-reference attribute.
    pub fn target(&self) -> Option<&str> {
        match &self.typ {
            AttrType::Entity(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_entity_ref(&self) -> bool {
        matches!(self.typ, AttrType::Entity(_))
    }

    pub fn constraint(&self, kind: &str) -> Option<&Constraint> {
        find_constraint(&self.constraints, kind)
    }

    pub fn containment(&self) -> bool {
        self.reference.as_ref().is_some_and(|r| r.containment)
    }

    /// Multiplicity of the back-reference at the referenced entity.
    ///
    /// Defaults to `*` for single-valued references. Multi-valued references
    /// default to `1..1` when containing and `0..1` otherwise.
    pub fn other_multiplicity(&self) -> Multiplicity {
        if let Some(m) = self.reference.as_ref().and_then(|r| r.other_multiplicity) {
            return m;
        }
        match self.multiplicity.upper {
            Upper::One => Multiplicity::MANY,
            Upper::Many if self.containment() => Multiplicity::ONE,
            Upper::Many => Multiplicity::OPTIONAL,
        }
    }
}

impl AttrType {
    pub fn primitive(p: Primitive) -> Self {
        Self::Primitive(p)
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self::Entity(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }
}

impl Multiplicity {
    pub const ONE: Self = Self { lower: 1, upper: Upper::One };
    pub const OPTIONAL: Self = Self { lower: 0, upper: Upper::One };
    pub const MANY: Self = Self { lower: 0, upper: Upper::Many };

    pub fn is_many(&self) -> bool {
        self.upper == Upper::Many
    }

    pub fn is_optional(&self) -> bool {
        self.lower == 0
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::ONE
    }
}

impl Reference {
    /// A bidirectional reference whose other side is named `other_side`.
    pub fn bidirectional(other_side: impl Into<String>) -> Self {
        Self {
            bidirectional: true,
            other_side: Some(other_side.into()),
            ..Self::default()
        }
    }

    pub fn containment() -> Self {
        Self {
            containment: true,
            ..Self::default()
        }
    }

    pub fn with_other_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.other_multiplicity = Some(multiplicity);
        self
    }
}

impl Constraint {
    pub fn new(kind: &str, params: &[&str]) -> Self {
        Self {
            kind: kind.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            literals: Vec::new(),
        }
    }

    pub fn with_literal(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.literals.push(EnumLiteral {
            name: name.into(),
            code: code.into(),
        });
        self
    }
}

fn find_constraint<'a>(constraints: &'a [Constraint], kind: &str) -> Option<&'a Constraint> {
    constraints.iter().find(|c| c.kind == kind)
}
