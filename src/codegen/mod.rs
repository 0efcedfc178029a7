// Code Generation Module
// Grid layout back end: fragments, literal encoding and method assembly

pub mod command;
pub mod error;
pub mod fragment;
pub mod fragment_combine;
pub mod literals;
pub mod manifest;
pub mod method;
pub mod number_strategies;
pub mod options;
pub mod pairing;
pub mod tags;

pub use command::{Command, CommandKind};
pub use error::CodeGenError;
pub use fragment::GridFragment;
pub use literals::{Literal, LiteralEncoder};
pub use method::{Method, MethodLayout, Variable, VariableKind};
pub use options::{CodeGenOptions, NumberRep};
pub use tags::{TagArena, TagId, TagKind};

use method::MethodGenerator;

/// Main code generator: owns the configuration, the literal strategies and the
/// tag arena shared by every method of one program
pub struct BefunGen {
    options: CodeGenOptions,
    literals: LiteralEncoder,
    tags: TagArena,
}

impl BefunGen {
    /// Create a generator; options are validated once, before any code is laid out
    pub fn new(options: CodeGenOptions) -> Result<Self, CodeGenError> {
        let literals = LiteralEncoder::new(&options);
        Self::with_literal_encoder(options, literals)
    }

    pub fn with_literal_encoder(
        options: CodeGenOptions,
        literals: LiteralEncoder,
    ) -> Result<Self, CodeGenError> {
        options.validate()?;
        Ok(BefunGen {
            options,
            literals,
            tags: TagArena::new(),
        })
    }

    pub fn options(&self) -> &CodeGenOptions {
        &self.options
    }

    pub fn literals(&self) -> &LiteralEncoder {
        &self.literals
    }

    pub fn tags(&self) -> &TagArena {
        &self.tags
    }

    /// Allocate a tag for front-end use (jump targets inside method bodies)
    pub fn allocate_tag(&mut self, kind: TagKind) -> TagId {
        self.tags.allocate(kind)
    }

    /// Lay out one method whose top-left corner will sit at (offset_x, offset_y)
    pub fn compile_method(
        &mut self,
        method: &Method,
        offset_x: i32,
        offset_y: i32,
    ) -> Result<MethodLayout, CodeGenError> {
        MethodGenerator::new(&self.options, &self.literals, &mut self.tags).generate(
            method, offset_x, offset_y,
        )
    }

    /// Serialize a fragment: one line per row, unused cells as the configured glyph
    pub fn render(&self, fragment: &GridFragment) -> String {
        let mut out = String::new();
        for line in fragment.to_lines(self.options.unused_glyph) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
