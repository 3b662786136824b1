//! The YAML document that drives a run.
//!
//! ```yaml
//! input_data_path: data/customers.csv   # or csv_path
//! output_data_path: data/filtered.csv
//! debug: false
//! fields:
//!   - customer_id: integer
//!   - first_name: string
//!   - state               # no declaration, type is inferred
//! filters:
//!   state: NY
//! ```
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding::all::UTF_8;
use encoding::label::encoding_from_whatwg_label;
use encoding::EncodingRef;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::{ConfigError, ParseError};
use crate::types::{ColumnType, Value};

/// A column to read, optionally with the type it must be cast to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: Option<ColumnType>,
}

impl FieldSpec {
    pub fn new(name: &str, ty: Option<ColumnType>) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            ty,
        }
    }
}

struct FieldSpecVisitor;

impl<'de> Visitor<'de> for FieldSpecVisitor {
    type Value = FieldSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a column name or a single `name: type` entry")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldSpec, E> {
        Ok(FieldSpec::new(v, None))
    }

    fn visit_map<A>(self, mut map: A) -> Result<FieldSpec, A::Error>
    where
        A: MapAccess<'de>,
    {
        let (name, ty) = match map.next_entry::<String, ColumnType>()? {
            Some(entry) => entry,
            None => return Err(de::Error::custom("field entry has no column name")),
        };

        if let Some(other) = map.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "field entry for `{}` also names `{}`, use one entry per column",
                name, other
            )));
        }

        Ok(FieldSpec { name, ty: Some(ty) })
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D>(deserializer: D) -> Result<FieldSpec, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FieldSpecVisitor)
    }
}

/// A reason a loaded configuration cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingFields,
    BlankFieldName,
    DuplicateField(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Violation::MissingFields => write!(f, "`fields` is missing or empty"),
            Violation::BlankFieldName => write!(f, "`fields` contains a blank column name"),
            Violation::DuplicateField(ref name) => {
                write!(f, "field `{}` is listed more than once", name)
            }
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Typed view of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct Config {
    #[serde(default, alias = "csv_path")]
    pub input_data_path: Option<PathBuf>,

    #[serde(default)]
    pub output_data_path: Option<PathBuf>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<FieldSpec>,

    /// Column name to the exact value a kept row must hold there.
    #[serde(default, deserialize_with = "null_as_default")]
    pub filters: BTreeMap<String, Value>,

    #[serde(default)]
    pub debug: bool,

    /// WHATWG label of the input encoding, utf-8 when absent.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl Config {
    /// Reads and parses the document at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ParseError> {
        let path = path.as_ref();

        let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&text).map_err(|source| ParseError::Yaml {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Every problem that keeps this configuration from driving a run.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.fields.is_empty() {
            violations.push(Violation::MissingFields);
        }

        let mut seen = HashSet::with_capacity(self.fields.len());

        for field in self.fields.iter() {
            if field.name.trim().is_empty() {
                if !violations.contains(&Violation::BlankFieldName) {
                    violations.push(Violation::BlankFieldName);
                }
            } else if !seen.insert(field.name.as_str()) {
                let violation = Violation::DuplicateField(field.name.clone());

                if !violations.contains(&violation) {
                    violations.push(violation);
                }
            }
        }

        violations
    }

    /// Whether `violations()` comes back empty.
    pub fn validate(&self) -> bool {
        self.violations().is_empty()
    }

    pub fn into_valid(self) -> Result<Config, ConfigError> {
        let violations = self.violations();

        if violations.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }

    pub fn input_path(&self) -> Result<&Path, ConfigError> {
        self.input_data_path
            .as_deref()
            .ok_or(ConfigError::MissingPath("input_data_path"))
    }

    pub fn output_path(&self) -> Result<&Path, ConfigError> {
        self.output_data_path
            .as_deref()
            .ok_or(ConfigError::MissingPath("output_data_path"))
    }

    pub fn input_encoding(&self) -> Result<EncodingRef, ConfigError> {
        match self.encoding {
            None => Ok(UTF_8 as EncodingRef),
            Some(ref label) => encoding_from_whatwg_label(label)
                .ok_or_else(|| ConfigError::UnknownEncoding(label.clone())),
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

impl FromStr for Config {
    type Err = ParseError;

    fn from_str(document: &str) -> Result<Config, Self::Err> {
        serde_yaml::from_str(document).map_err(|source| ParseError::Yaml {
            origin: "inline document".to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, FieldSpec, Violation};
    use crate::error::{ConfigError, ParseError};
    use crate::types::{ColumnType, Value};
    use std::path::Path;

    #[test]
    fn load_sample() {
        let config = Config::load("test/assets/config/sample_config.yaml").unwrap();

        assert_eq!(
            config.input_path().unwrap(),
            Path::new("test/assets/customers.csv")
        );
        assert_eq!(config.fields[0], FieldSpec::new("customer_id", Some(ColumnType::Integer)));
        assert_eq!(config.filters.get("state"), Some(&Value::from("NY")));
        assert!(config.validate());
    }

    #[test]
    fn load_missing_file() {
        match Config::load("test/assets/config/nope.yaml") {
            Err(ParseError::Io { .. }) => {}
            other => panic!("expected an io parse error, got {:?}", other),
        }
    }

    #[test]
    fn load_malformed_document() {
        match Config::load("test/assets/config/malformed.yaml") {
            Err(ParseError::Yaml { .. }) => {}
            other => panic!("expected a yaml parse error, got {:?}", other),
        }
    }

    #[test]
    fn validate_requires_fields() {
        let valid: Config = "fields: [last_name, city]".parse().unwrap();
        let missing: Config = "invalid_key: value".parse().unwrap();
        let empty: Config = "fields: []".parse().unwrap();
        let null: Config = "fields:".parse().unwrap();
        let blank: Config = "fields: ['  ', city]".parse().unwrap();

        assert!(valid.validate());
        assert!(!missing.validate());
        assert!(!empty.validate());
        assert!(!null.validate());
        assert!(!blank.validate());
        assert_eq!(missing.violations(), vec![Violation::MissingFields]);
        assert_eq!(blank.violations(), vec![Violation::BlankFieldName]);
    }

    #[test]
    fn duplicate_fields_are_violations() {
        let config: Config = "fields: [city, {city: string}, state]".parse().unwrap();

        assert_eq!(
            config.violations(),
            vec![Violation::DuplicateField("city".to_string())]
        );

        match config.into_valid() {
            Err(ConfigError::Invalid(v)) => assert_eq!(v.len(), 1),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn plain_and_typed_fields() {
        let config: Config = "
fields:
  - customer_id: int
  - first_name
  - phone: str
"
        .parse()
        .unwrap();

        assert_eq!(
            config.fields,
            vec![
                FieldSpec::new("customer_id", Some(ColumnType::Integer)),
                FieldSpec::new("first_name", None),
                FieldSpec::new("phone", Some(ColumnType::String)),
            ]
        );
        assert_eq!(config.field_names(), vec!["customer_id", "first_name", "phone"]);
    }

    #[test]
    fn unknown_type_is_a_parse_error() {
        let result = "fields:\n  - customer_id: uuid".parse::<Config>();

        match result {
            Err(ParseError::Yaml { source, .. }) => {
                assert!(source.to_string().contains("unknown column type `uuid`"))
            }
            other => panic!("expected a yaml parse error, got {:?}", other),
        }
    }

    #[test]
    fn field_entry_with_two_columns_is_rejected() {
        assert!("fields:\n  - {a: int, b: str}".parse::<Config>().is_err());
    }

    #[test]
    fn csv_path_is_an_alias() {
        let config: Config = "csv_path: in.csv\nfields: [a]".parse().unwrap();

        assert_eq!(config.input_path().unwrap(), Path::new("in.csv"));
        assert!("csv_path: a.csv\ninput_data_path: b.csv".parse::<Config>().is_err());
    }

    #[test]
    fn paths_are_required_when_used() {
        let config: Config = "fields: [a]".parse().unwrap();

        match config.output_path() {
            Err(ConfigError::MissingPath("output_data_path")) => {}
            other => panic!("expected missing output path, got {:?}", other),
        }
        match config.input_path() {
            Err(ConfigError::MissingPath("input_data_path")) => {}
            other => panic!("expected missing input path, got {:?}", other),
        }
    }

    #[test]
    fn filter_values_must_be_scalars() {
        assert!("fields: [a]\nfilters:\n  a: [1, 2]".parse::<Config>().is_err());
    }

    #[test]
    fn encodings() {
        let config: Config = "fields: [a]\nencoding: latin1".parse().unwrap();
        assert!(config.input_encoding().is_ok());

        let config: Config = "fields: [a]\nencoding: klingon".parse().unwrap();
        match config.input_encoding() {
            Err(ConfigError::UnknownEncoding(label)) => assert_eq!(label, "klingon"),
            other => panic!("expected unknown encoding, got {:?}", other.map(|e| e.name())),
        }
    }
}
