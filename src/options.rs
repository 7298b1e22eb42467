use heck::ToSnakeCase;
use thiserror::Error;

/// How a default back-reference name is synthesized from an entity name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackrefCase {
    /// `OrderLine` -> `orderline`
    #[default]
    Lower,
    /// `OrderLine` -> `order_line`
    Snake,
}

impl BackrefCase {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lower" => Some(Self::Lower),
            "snake" => Some(Self::Snake),
            _ => None,
        }
    }

    pub fn apply(&self, entity_name: &str) -> String {
        match self {
            Self::Lower => entity_name.to_lowercase(),
            Self::Snake => entity_name.to_snake_case(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("Undefined derivation parameter \"{0}\"")]
    Unknown(String),
    #[error("Invalid value \"{value}\" for parameter \"{key}\"")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Emit one constraint per multi-column relationship.
    pub composite_keys: bool,
    pub backref_case: BackrefCase,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            composite_keys: true,
            backref_case: BackrefCase::default(),
        }
    }
}

impl Options {
    /// Apply a string parameter, as supplied by generator configuration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "composite_keys" => {
                self.composite_keys = match value {
                    "true" | "yes" | "1" => true,
                    "false" | "no" | "0" => false,
                    _ => return Err(invalid()),
                };
            }
            "backref_case" => {
                self.backref_case = BackrefCase::from_str(value).ok_or_else(invalid)?;
            }
            _ => return Err(OptionError::Unknown(key.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backref_case() {
        assert_eq!(BackrefCase::Lower.apply("OrderLine"), "orderline");
        assert_eq!(BackrefCase::Snake.apply("OrderLine"), "order_line");
    }

    #[test]
    fn test_set_options() {
        let mut options = Options::default();
        assert!(options.composite_keys);

        options.set("composite_keys", "false").unwrap();
        options.set("backref_case", "snake").unwrap();
        assert!(!options.composite_keys);
        assert_eq!(options.backref_case, BackrefCase::Snake);
    }

    #[test]
    fn test_unknown_option() {
        let mut options = Options::default();
        assert_eq!(
            options.set("flask_admin", "true"),
            Err(OptionError::Unknown("flask_admin".to_string()))
        );
        assert!(matches!(
            options.set("composite_keys", "maybe"),
            Err(OptionError::InvalidValue { .. })
        ));
    }
}
