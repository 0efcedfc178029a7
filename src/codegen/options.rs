// Code generation options
//
// Read-only configuration fixed before generation starts. Loaded from TOML,
// every key is optional and falls back to the defaults below.

use crate::codegen::error::CodeGenError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// How numeric literals that are not single digits get encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRep {
    /// Push the value as a character in string mode
    CharConstant,
    /// Positional base-9 expansion
    Base9,
    /// Product-of-factors expansion
    Factorization,
}

impl fmt::Display for NumberRep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumberRep::CharConstant => write!(f, "char_constant"),
            NumberRep::Base9 => write!(f, "base9"),
            NumberRep::Factorization => write!(f, "factorization"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeGenOptions {
    /// Merge touching columns on horizontal appends
    pub compress_horizontal: bool,
    pub number_representation: NumberRep,
    /// Always encode 0..=9 as a single digit
    pub auto_digitize: bool,
    /// Minimum row width of the variable storage block
    pub default_var_width: usize,
    /// Glyph written into variable storage cells
    pub default_var_symbol: char,
    /// Glyph the serializer prints for cells without an instruction
    pub unused_glyph: char,
}

impl Default for CodeGenOptions {
    fn default() -> Self {
        CodeGenOptions {
            compress_horizontal: true,
            number_representation: NumberRep::Base9,
            auto_digitize: true,
            default_var_width: 16,
            default_var_symbol: ' ',
            unused_glyph: ' ',
        }
    }
}

impl CodeGenOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, CodeGenError> {
        let options: CodeGenOptions = toml::from_str(source)
            .map_err(|e| CodeGenError::InvalidConfiguration(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CodeGenError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            CodeGenError::IOError(format!("cannot read '{}': {}", path.display(), e))
        })?;
        log::debug!("Loading code generation options from {}", path.display());
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), CodeGenError> {
        if self.default_var_width == 0 {
            return Err(CodeGenError::InvalidConfiguration(
                "default_var_width must be at least 1".to_string(),
            ));
        }
        for (name, glyph) in [
            ("default_var_symbol", self.default_var_symbol),
            ("unused_glyph", self.unused_glyph),
        ] {
            if glyph.is_control() {
                return Err(CodeGenError::InvalidConfiguration(format!(
                    "{} must be a printable character, got {:?}",
                    name, glyph
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = CodeGenOptions::from_toml_str(
            r##"
            number_representation = "char_constant"
            default_var_symbol = "#"
            "##,
        )
        .unwrap();

        assert_eq!(options.number_representation, NumberRep::CharConstant);
        assert_eq!(options.default_var_symbol, '#');
        assert!(options.compress_horizontal);
        assert_eq!(options.default_var_width, 16);
    }

    #[test]
    fn test_unknown_representation_is_rejected() {
        let result = CodeGenOptions::from_toml_str(r#"number_representation = "roman""#);
        assert!(matches!(result, Err(CodeGenError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(CodeGenOptions::from_toml_str("compress_vertical = true").is_err());
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let result = CodeGenOptions::from_toml_str("default_var_width = 0");
        assert!(matches!(result, Err(CodeGenError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = CodeGenOptions::from_file("/nonexistent/befungen.toml");
        assert!(matches!(result, Err(CodeGenError::IOError(_))));
    }
}
