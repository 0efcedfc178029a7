// Method manifest
//
// TOML description of a single method, used by the command line tool in place
// of a front end:
//
//   name = "main"
//   offset = [0, 0]
//   body = ["5.@"]
//
//   [[parameters]]
//   name = "n"
//
//   [[variables]]
//   name = "table"
//   size = 4
//   init = [1, 2, 3]

use crate::codegen::error::CodeGenError;
use crate::codegen::fragment::GridFragment;
use crate::codegen::literals::Literal;
use crate::codegen::method::{Method, Variable};
use indexmap::IndexSet;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
}

impl From<ScalarValue> for Literal {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Bool(b) => Literal::Bool(b),
            ScalarValue::Int(i) => Literal::Int(i),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InitValue {
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableManifest {
    pub name: String,
    /// Present for arrays
    pub size: Option<usize>,
    pub init: Option<InitValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodManifest {
    pub name: String,
    #[serde(default)]
    pub offset: [i32; 2],
    #[serde(default)]
    pub parameters: Vec<VariableManifest>,
    #[serde(default)]
    pub variables: Vec<VariableManifest>,
    /// Already generated statement code, one string per grid row
    #[serde(default)]
    pub body: Vec<String>,
}

impl MethodManifest {
    pub fn from_toml_str(source: &str) -> Result<Self, CodeGenError> {
        toml::from_str(source).map_err(|e| CodeGenError::InvalidConfiguration(e.to_string()))
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.offset[0], self.offset[1])
    }

    /// Validate the declarations and build the method
    pub fn to_method(&self) -> Result<Method, CodeGenError> {
        let mut seen = IndexSet::new();
        for decl in self.variables.iter().chain(self.parameters.iter()) {
            if !seen.insert(decl.name.to_lowercase()) {
                return Err(self.invalid(format!("duplicate identifier '{}'", decl.name)));
            }
        }

        let mut parameters = Vec::with_capacity(self.parameters.len());
        for decl in &self.parameters {
            if decl.init.is_some() {
                return Err(self.invalid(format!(
                    "parameter '{}' cannot have an initializer",
                    decl.name
                )));
            }
            parameters.push(self.to_variable(decl)?);
        }

        let variables = self
            .variables
            .iter()
            .map(|decl| self.to_variable(decl))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Method {
            identifier: self.name.clone(),
            parameters,
            variables,
            body: GridFragment::from_lines(&self.body)?,
        })
    }

    fn to_variable(&self, decl: &VariableManifest) -> Result<Variable, CodeGenError> {
        match (decl.size, &decl.init) {
            (None, None) => Ok(Variable::value(&decl.name, Literal::default())),
            (None, Some(InitValue::Scalar(value))) => {
                Ok(Variable::value(&decl.name, Literal::from(*value)))
            }
            (None, Some(InitValue::List(_))) => Err(self.invalid(format!(
                "variable '{}' has a list initializer but no size",
                decl.name
            ))),
            (Some(0), _) => Err(self.invalid(format!("array '{}' has size 0", decl.name))),
            (Some(size), init) => {
                let initial: Vec<Literal> = match init {
                    None => Vec::new(),
                    Some(InitValue::Scalar(value)) => vec![Literal::from(*value); size],
                    Some(InitValue::List(values)) => {
                        values.iter().copied().map(Literal::from).collect()
                    }
                };
                if initial.len() > size {
                    return Err(self.invalid(format!(
                        "array '{}' has {} initial values but only {} elements",
                        decl.name,
                        initial.len(),
                        size
                    )));
                }
                Ok(Variable::array(&decl.name, size, initial))
            }
        }
    }

    fn invalid(&self, message: String) -> CodeGenError {
        CodeGenError::InvalidConfiguration(format!("method '{}': {}", self.name, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::method::VariableKind;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = MethodManifest::from_toml_str(
            r#"
            name = "main"
            offset = [4, 2]
            body = ["5.@"]

            [[parameters]]
            name = "n"

            [[variables]]
            name = "flag"
            init = true

            [[variables]]
            name = "table"
            size = 3
            init = [1, 2]
            "#,
        )
        .unwrap();

        assert_eq!(manifest.offset(), (4, 2));
        let method = manifest.to_method().unwrap();
        assert_eq!(method.identifier, "main");
        assert_eq!(method.parameters.len(), 1);
        assert_eq!(
            method.variables[0].kind,
            VariableKind::Value {
                initial: Literal::Bool(true)
            }
        );
        assert_eq!(
            method.variables[1].kind,
            VariableKind::Array {
                size: 3,
                initial: vec![Literal::Int(1), Literal::Int(2)]
            }
        );
        assert_eq!(method.body.width(), 3);
    }

    #[test]
    fn test_rejects_duplicate_identifiers() {
        let manifest = MethodManifest::from_toml_str(
            r#"
            name = "f"
            [[parameters]]
            name = "X"
            [[variables]]
            name = "x"
            "#,
        )
        .unwrap();
        assert!(matches!(
            manifest.to_method(),
            Err(CodeGenError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_array_initializer() {
        let manifest = MethodManifest::from_toml_str(
            r#"
            name = "f"
            [[variables]]
            name = "a"
            size = 1
            init = [1, 2]
            "#,
        )
        .unwrap();
        assert!(manifest.to_method().is_err());
    }

    #[test]
    fn test_rejects_parameter_initializer() {
        let manifest = MethodManifest::from_toml_str(
            r#"
            name = "f"
            [[parameters]]
            name = "a"
            init = 3
            "#,
        )
        .unwrap();
        assert!(manifest.to_method().is_err());
    }
}
