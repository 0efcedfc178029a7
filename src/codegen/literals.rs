// Literal encoder dispatcher
//
// Picks the cheapest applicable strategy for a constant and returns the grid
// fragment that pushes it. `reversed` asks for the layout read by a cursor
// travelling left.

use crate::codegen::command::{Command, CommandKind};
use crate::codegen::error::CodeGenError;
use crate::codegen::fragment::GridFragment;
use crate::codegen::number_strategies::{
    row_fragment, Base9Expansion, FactorizationExpansion, NumberStrategy,
};
use crate::codegen::options::{CodeGenOptions, NumberRep};

/// Compile-time constant handed over by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

impl Default for Literal {
    fn default() -> Self {
        Literal::Int(0)
    }
}

const QUOTE: i64 = '"' as i64;

pub struct LiteralEncoder {
    representation: NumberRep,
    auto_digitize: bool,
    base9: Box<dyn NumberStrategy>,
    factorization: Box<dyn NumberStrategy>,
}

impl LiteralEncoder {
    /// Encoder using the bundled base-9 and factorization strategies
    pub fn new(options: &CodeGenOptions) -> Self {
        Self::with_strategies(
            options,
            Box::new(Base9Expansion),
            Box::new(FactorizationExpansion),
        )
    }

    pub fn with_strategies(
        options: &CodeGenOptions,
        base9: Box<dyn NumberStrategy>,
        factorization: Box<dyn NumberStrategy>,
    ) -> Self {
        LiteralEncoder {
            representation: options.number_representation,
            auto_digitize: options.auto_digitize,
            base9,
            factorization,
        }
    }

    pub fn encode(&self, literal: Literal, reversed: bool) -> Result<GridFragment, CodeGenError> {
        match literal {
            Literal::Int(value) => self.encode_integer(value, reversed),
            Literal::Bool(value) => self.encode_boolean(value),
        }
    }

    pub fn encode_integer(&self, value: i64, reversed: bool) -> Result<GridFragment, CodeGenError> {
        if self.auto_digitize && (0..=9).contains(&value) {
            return Self::encode_digit(value as u8);
        }

        log::trace!(
            "encoding literal {} as {} (reversed: {})",
            value,
            self.representation,
            reversed
        );
        match self.representation {
            NumberRep::CharConstant => self.encode_stringmode(value, reversed),
            NumberRep::Base9 => Self::oriented(self.base9.encode(value)?, reversed),
            NumberRep::Factorization => {
                Self::oriented(self.factorization.encode(value)?, reversed)
            }
        }
    }

    pub fn encode_boolean(&self, value: bool) -> Result<GridFragment, CodeGenError> {
        Self::encode_digit(u8::from(value))
    }

    pub fn encode_digit(digit: u8) -> Result<GridFragment, CodeGenError> {
        GridFragment::single(Command::digit(digit)?)
    }

    /// Push the value as a character in string mode.
    ///
    /// A quote cannot appear inside string mode, so it is pushed as `#` minus one.
    /// Values without a printable character fall back to the base-9 expansion.
    pub fn encode_stringmode(
        &self,
        value: i64,
        reversed: bool,
    ) -> Result<GridFragment, CodeGenError> {
        if (0..=9).contains(&value) {
            return Self::encode_digit(value as u8);
        }

        let stringmode = Command::new(CommandKind::Stringmode);
        match value {
            QUOTE => {
                let fragment = row_fragment(&[
                    stringmode,
                    Command::chr('#'),
                    stringmode,
                    Command::digit(1)?,
                    Command::new(CommandKind::Sub),
                ])?;
                Self::oriented(fragment, reversed)
            }
            32..=126 => {
                let glyph = char::from(value as u8);
                row_fragment(&[stringmode, Command::chr(glyph), stringmode])
            }
            _ => {
                log::debug!(
                    "literal {} has no printable character, using base-9 expansion",
                    value
                );
                Self::oriented(self.base9.encode(value)?, reversed)
            }
        }
    }

    fn oriented(mut fragment: GridFragment, reversed: bool) -> Result<GridFragment, CodeGenError> {
        if reversed {
            fragment.mirror_x()?;
        }
        Ok(fragment)
    }
}

#[cfg(test)]
#[path = "literals_tests.rs"]
mod tests;
