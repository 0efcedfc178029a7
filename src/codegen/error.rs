// Code Generation Error Handling

use crate::codegen::tags::TagId;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CodeGenError {
    // Grid invariant violations
    InvalidCodeManipulation {
        x: i32,
        y: i32,
        message: String,
    },
    DuplicateTag {
        tag: TagId,
        x: i32,
        y: i32,
        existing_x: i32,
        existing_y: i32,
    },
    NonMirrorableCell {
        x: i32,
        y: i32,
        glyph: char,
    },

    // Unreachable branches and malformed generator state
    InternalInconsistency(String),

    // Configuration and IO
    InvalidConfiguration(String),
    IOError(String),
}

impl CodeGenError {
    pub fn occupied(x: i32, y: i32, message: impl Into<String>) -> Self {
        CodeGenError::InvalidCodeManipulation {
            x,
            y,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodeGenError::InvalidCodeManipulation { x, y, message } => {
                write!(f, "Invalid code manipulation at [{}, {}]: {}", x, y, message)
            }
            CodeGenError::DuplicateTag {
                tag,
                x,
                y,
                existing_x,
                existing_y,
            } => {
                write!(
                    f,
                    "Duplicate tag {} at [{}, {}], already placed at [{}, {}]",
                    tag, x, y, existing_x, existing_y
                )
            }
            CodeGenError::NonMirrorableCell { x, y, glyph } => {
                write!(
                    f,
                    "Cannot mirror fragment: cell '{}' at [{}, {}] depends on cursor direction",
                    glyph, x, y
                )
            }
            CodeGenError::InternalInconsistency(msg) => {
                write!(f, "Internal inconsistency: {}", msg)
            }
            CodeGenError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            CodeGenError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CodeGenError {}

impl From<std::io::Error> for CodeGenError {
    fn from(err: std::io::Error) -> Self {
        CodeGenError::IOError(err.to_string())
    }
}
