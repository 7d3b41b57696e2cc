use getset::{Getters, Setters};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::conventions::{strip_type_prefix, FREE_MEMBERS_SUFFIX};
use crate::error::Error;

/// Identifier-keyed table preserving declaration order.
pub type Table<T> = IndexMap<String, T>;

/// Field name -> default value, as written in an initializer macro.
pub type Defaults = IndexMap<String, FieldDefault>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Category {
    #[display(fmt = "enum")]
    Enum,
    #[display(fmt = "bitmask")]
    Bitmask,
    #[display(fmt = "class")]
    Class,
    #[display(fmt = "function")]
    Function,
    #[display(fmt = "struct")]
    Struct,
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enum" => Ok(Category::Enum),
            "bitmask" => Ok(Category::Bitmask),
            "class" => Ok(Category::Class),
            "function" => Ok(Category::Function),
            "struct" => Ok(Category::Struct),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[get = "pub"]
pub struct Param {
    #[serde(rename = "type")]
    ctype: String,
    name: String,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[get = "pub"]
pub struct Function {
    params: Vec<Param>,

    #[serde(rename = "return")]
    return_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Literal(String),
    Nested(Defaults),
}

#[derive(Clone, Constructor, Getters, Setters, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[get = "pub"]
    #[serde(rename = "type")]
    ctype: String,

    #[get = "pub"]
    name: String,

    #[get = "pub"]
    #[set = "pub(crate)"]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<FieldDefault>,
}

/// Sealed intermediate representation of a header.
///
/// Only [`crate::builder::IrBuilder`] produces one from source text; afterwards it is read-only.
#[derive(Clone, Constructor, Getters, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[get = "pub"]
pub struct Ir {
    #[serde(rename = "enum")]
    enums: Table<Vec<String>>,

    #[serde(rename = "bitmask")]
    bitmasks: Table<Vec<String>>,

    #[serde(rename = "class")]
    classes: Table<Table<Function>>,

    #[serde(rename = "function")]
    functions: Table<Function>,

    #[serde(rename = "struct")]
    structs: Table<Vec<Field>>,
}

impl Ir {
    /// Whether `name` (with or without the type prefix) is a key of the given table.
    pub fn is_a(&self, name: &str, category: Category) -> bool {
        let key = strip_type_prefix(name);
        match category {
            Category::Enum => self.enums.contains_key(key),
            Category::Bitmask => self.bitmasks.contains_key(key),
            Category::Class => self.classes.contains_key(key),
            Category::Function => self.functions.contains_key(key),
            Category::Struct => self.structs.contains_key(key),
        }
    }

    /// Structs owning heap data come with a `<Struct>FreeMembers` free function.
    pub fn has_free_members(&self, struct_name: &str) -> bool {
        self.functions
            .contains_key(&format!("{}{}", struct_name, FREE_MEMBERS_SUFFIX))
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Ir> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ir {
        let mut classes = Table::new();
        classes.insert(String::from("Buffer"), Table::new());
        let mut functions = Table::new();
        functions.insert(
            String::from("AdapterInfoFreeMembers"),
            Function::new(vec![], String::from("void")),
        );
        Ir::new(Table::new(), Table::new(), classes, functions, Table::new())
    }

    #[test]
    fn test_is_a_accepts_prefixed_names() {
        let ir = sample();
        assert!(ir.is_a("WGPUBuffer", Category::Class));
        assert!(ir.is_a("Buffer", Category::Class));
        assert!(!ir.is_a("WGPUBuffer", Category::Struct));
        assert!(!ir.is_a("WGPUDevice", Category::Class));
    }

    #[test]
    fn test_has_free_members() {
        let ir = sample();
        assert!(ir.has_free_members("AdapterInfo"));
        assert!(!ir.has_free_members("Color"));
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("class".parse::<Category>().unwrap(), Category::Class);
        assert_eq!(Category::Bitmask.to_string(), "bitmask");
        match "klass".parse::<Category>() {
            Err(Error::UnknownCategory(name)) => assert_eq!(name, "klass"),
            other => panic!("Expected unknown category, got {:?}", other),
        }
    }

    #[test]
    fn test_json_layout() {
        let mut structs = Table::new();
        structs.insert(
            String::from("Color"),
            vec![
                Field::new(
                    String::from("double"),
                    String::from("r"),
                    Some(FieldDefault::Literal(String::from("0"))),
                ),
                Field::new(String::from("double"), String::from("g"), None),
            ],
        );
        let ir = Ir::new(Table::new(), Table::new(), Table::new(), Table::new(), structs);

        let json = serde_json::to_string(&ir).unwrap();
        assert_eq!(
            json,
            r#"{"enum":{},"bitmask":{},"class":{},"function":{},"struct":{"Color":[{"type":"double","name":"r","default":"0"},{"type":"double","name":"g"}]}}"#
        );
        assert_eq!(Ir::from_json(&json).unwrap(), ir);
    }
}
