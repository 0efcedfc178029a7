// Method Layout Driver
//
// Builds the grid of one method by stacking four blocks vertically:
//
//   [variable storage]         one cell per value, one row segment per array
//   [variable initialization]  entry point at (0, 0) of this block
//   [parameter initialization] pops call arguments into their slots
//   [body]                     statement code, entered on row 0 from the left
//
// Initialization blocks are built from directional pairs: each two-row block
// runs the forward code of one variable left to right, turns down, then runs the
// mirrored code of the next one right to left and leaves through the lane on the
// left edge. Chaining blocks therefore needs nothing but vertical appends.

use crate::codegen::command::{Command, CommandKind};
use crate::codegen::error::CodeGenError;
use crate::codegen::fragment::GridFragment;
use crate::codegen::literals::{Literal, LiteralEncoder};
use crate::codegen::options::CodeGenOptions;
use crate::codegen::pairing::DirectionalPair;
use crate::codegen::tags::{TagArena, TagId, TagKind};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    Value { initial: Literal },
    /// Elements past the end of `initial` start at zero
    Array { size: usize, initial: Vec<Literal> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub identifier: String,
    pub kind: VariableKind,
}

impl Variable {
    pub fn value(identifier: &str, initial: Literal) -> Self {
        Variable {
            identifier: identifier.to_string(),
            kind: VariableKind::Value { initial },
        }
    }

    pub fn array(identifier: &str, size: usize, initial: Vec<Literal>) -> Self {
        Variable {
            identifier: identifier.to_string(),
            kind: VariableKind::Array { size, initial },
        }
    }

    /// Number of storage cells
    pub fn width(&self) -> usize {
        match &self.kind {
            VariableKind::Value { .. } => 1,
            VariableKind::Array { size, .. } => *size,
        }
    }

    /// Value stored into element `index` by the initialization code
    fn initial_value(&self, index: usize) -> Literal {
        match &self.kind {
            VariableKind::Value { initial } => *initial,
            VariableKind::Array { initial, .. } => initial.get(index).copied().unwrap_or_default(),
        }
    }
}

/// A method as handed over by the front end: names are unique, the body is
/// already generated.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub identifier: String,
    pub parameters: Vec<Variable>,
    /// Local variables, parameters excluded
    pub variables: Vec<Variable>,
    pub body: GridFragment,
}

/// Absolute program coordinate of a variable's first storage cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    pub x: i32,
    pub y: i32,
    pub tag: TagId,
}

#[derive(Debug, Clone)]
pub struct MethodLayout {
    pub fragment: GridFragment,
    pub entry_tag: TagId,
    /// Keyed by identifier, locals first then parameters
    pub slots: IndexMap<String, SlotPosition>,
}

impl MethodLayout {
    /// Fragment coordinate of the full-initialization entry point
    pub fn entry(&self) -> Option<(i32, i32)> {
        self.fragment.find_tag(self.entry_tag)
    }
}

/// Which initialization block a set of pairs is assembled into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairingBlock {
    Variables,
    Parameters,
}

pub struct MethodGenerator<'a> {
    options: &'a CodeGenOptions,
    literals: &'a LiteralEncoder,
    tags: &'a mut TagArena,
}

impl<'a> MethodGenerator<'a> {
    pub fn new(
        options: &'a CodeGenOptions,
        literals: &'a LiteralEncoder,
        tags: &'a mut TagArena,
    ) -> Self {
        MethodGenerator {
            options,
            literals,
            tags,
        }
    }

    /// Lay out `method` for placement with its top-left corner at (offset_x, offset_y)
    pub fn generate(
        &mut self,
        method: &Method,
        offset_x: i32,
        offset_y: i32,
    ) -> Result<MethodLayout, CodeGenError> {
        log::debug!(
            "Generating method '{}' at ({}, {}): {} variables, {} parameters",
            method.identifier,
            offset_x,
            offset_y,
            method.variables.len(),
            method.parameters.len()
        );

        let (storage, slots) = self.generate_variable_storage(method, offset_x, offset_y)?;
        log::debug!("  ├─ storage: {}", storage.describe());

        let entry_tag = self.tags.allocate(TagKind::MethodEntry {
            method: method.identifier.clone(),
        });
        let mut variable_init = self.generate_variable_initialization(method, &slots)?;
        variable_init.set_tag(0, 0, entry_tag)?;
        log::debug!("  ├─ variable initialization: {}", variable_init.describe());

        let parameter_init = self.generate_parameter_initialization(method, &slots)?;
        log::debug!("  ├─ parameter initialization: {}", parameter_init.describe());

        let body = Self::generate_body(&method.body)?;
        log::debug!("  ├─ body: {}", body.describe());

        let mut fragment = GridFragment::new();
        fragment.append_bottom(&storage)?;
        fragment.append_bottom(&variable_init)?;
        fragment.append_bottom(&parameter_init)?;
        fragment.append_bottom(&body)?;
        fragment.normalize();
        log::debug!("  └─ method '{}': {}", method.identifier, fragment.describe());

        Ok(MethodLayout {
            fragment,
            entry_tag,
            slots,
        })
    }

    /// Allocate one storage cell per value and a row segment per array.
    ///
    /// Rows are as wide as the largest array, but never narrower than the
    /// configured default. A new row starts when the current one is full, or when
    /// an array would not fit into what is left of it.
    fn generate_variable_storage(
        &mut self,
        method: &Method,
        offset_x: i32,
        offset_y: i32,
    ) -> Result<(GridFragment, IndexMap<String, SlotPosition>), CodeGenError> {
        let mut storage = GridFragment::new();
        let mut slots = IndexMap::new();

        let all = || method.variables.iter().chain(method.parameters.iter());
        let largest_array = all()
            .filter(|var| matches!(var.kind, VariableKind::Array { .. }))
            .map(Variable::width)
            .max()
            .unwrap_or(0);
        let row_width = largest_array.max(self.options.default_var_width) as i32;
        let symbol = Command::chr(self.options.default_var_symbol);

        let mut x = 0;
        let mut y = 0;
        for var in all() {
            if x >= row_width {
                x = 0;
                y += 1;
            }

            let tag = self.tags.allocate(TagKind::VariableSlot {
                method: method.identifier.clone(),
                variable: var.identifier.clone(),
            });

            let mut cells = GridFragment::new();
            match &var.kind {
                VariableKind::Value { .. } => cells.set(0, 0, symbol.with_tag(tag))?,
                VariableKind::Array { size, .. } => {
                    if *size == 0 {
                        return Err(CodeGenError::InternalInconsistency(format!(
                            "array '{}' in method '{}' has no elements",
                            var.identifier, method.identifier
                        )));
                    }
                    if x > 0 && x + *size as i32 > row_width {
                        x = 0;
                        y += 1;
                    }
                    cells.fill(0, 0, *size as i32, 1, symbol, Some(tag))?;
                }
            }

            storage.blit(x, y, &cells)?;
            let previous = slots.insert(
                var.identifier.clone(),
                SlotPosition {
                    x: offset_x + x,
                    y: offset_y + y,
                    tag,
                },
            );
            if previous.is_some() {
                return Err(CodeGenError::InternalInconsistency(format!(
                    "identifier '{}' declared twice in method '{}'",
                    var.identifier, method.identifier
                )));
            }
            x += cells.width();
        }

        Ok((storage, slots))
    }

    fn generate_variable_initialization(
        &self,
        method: &Method,
        slots: &IndexMap<String, SlotPosition>,
    ) -> Result<GridFragment, CodeGenError> {
        let mut pairs = Vec::with_capacity(method.variables.len() + 1);
        for var in &method.variables {
            let slot = Self::slot_of(slots, var)?;
            pairs.push(DirectionalPair::new(
                self.generate_initializer(var, slot, false)?,
                self.generate_initializer(var, slot, true)?,
            ));
        }

        let mut block = self.assemble_pairs(pairs, PairingBlock::Variables)?;
        // a method without locals still needs a cell to carry its entry point
        block.force_non_empty(Command::new(CommandKind::PcDown))?;
        Ok(block)
    }

    /// Arguments sit on the stack with the last parameter on top, so parameters
    /// are popped in reverse declaration order.
    fn generate_parameter_initialization(
        &self,
        method: &Method,
        slots: &IndexMap<String, SlotPosition>,
    ) -> Result<GridFragment, CodeGenError> {
        let mut pairs = Vec::with_capacity(method.parameters.len() + 1);
        for var in method.parameters.iter().rev() {
            let slot = Self::slot_of(slots, var)?;
            pairs.push(DirectionalPair::new(
                self.generate_set_from_stack(var, slot, false)?,
                self.generate_set_from_stack(var, slot, true)?,
            ));
        }

        self.assemble_pairs(pairs, PairingBlock::Parameters)
    }

    fn slot_of(
        slots: &IndexMap<String, SlotPosition>,
        var: &Variable,
    ) -> Result<SlotPosition, CodeGenError> {
        slots.get(&var.identifier).copied().ok_or_else(|| {
            CodeGenError::InternalInconsistency(format!(
                "variable '{}' has no storage slot",
                var.identifier
            ))
        })
    }

    /// `<value> <x> <y> p` for every storage cell of `var`
    fn generate_initializer(
        &self,
        var: &Variable,
        slot: SlotPosition,
        reversed: bool,
    ) -> Result<GridFragment, CodeGenError> {
        let mut code = GridFragment::new();
        for index in 0..var.width() {
            let value = self.literals.encode(var.initial_value(index), reversed)?;
            self.emit(&mut code, &value, reversed)?;
            self.emit_store(&mut code, slot.x + index as i32, slot.y, reversed)?;
        }
        code.normalize_x();
        Ok(code)
    }

    /// `<x> <y> p` for every storage cell of `var`, consuming the stack top.
    /// Array elements were pushed first to last, so the last one is popped first.
    fn generate_set_from_stack(
        &self,
        var: &Variable,
        slot: SlotPosition,
        reversed: bool,
    ) -> Result<GridFragment, CodeGenError> {
        let mut code = GridFragment::new();
        for index in (0..var.width()).rev() {
            self.emit_store(&mut code, slot.x + index as i32, slot.y, reversed)?;
        }
        code.normalize_x();
        Ok(code)
    }

    fn emit_store(
        &self,
        code: &mut GridFragment,
        x: i32,
        y: i32,
        reversed: bool,
    ) -> Result<(), CodeGenError> {
        let x = self.literals.encode_integer(x as i64, reversed)?;
        let y = self.literals.encode_integer(y as i64, reversed)?;
        let put = GridFragment::single(Command::new(CommandKind::ReflectSet))?;
        self.emit(code, &x, reversed)?;
        self.emit(code, &y, reversed)?;
        self.emit(code, &put, reversed)
    }

    /// Extend `code` in execution order: rightwards, or leftwards when reversed
    fn emit(
        &self,
        code: &mut GridFragment,
        part: &GridFragment,
        reversed: bool,
    ) -> Result<(), CodeGenError> {
        if reversed {
            code.append_left(part, self.options.compress_horizontal)
        } else {
            code.append_right(part, self.options.compress_horizontal)
        }
    }

    /// Stitch directional pairs into stacked two-row blocks.
    ///
    /// Row A is the forward code of the first pair, entered at its left edge and
    /// left through a downward turn at the shared right edge. Row B is the
    /// mirrored code of the second pair, entered at that right edge and left
    /// through a downward turn at its left edge, which lands on the next block.
    fn assemble_pairs(
        &self,
        mut pairs: Vec<DirectionalPair>,
        block_kind: PairingBlock,
    ) -> Result<GridFragment, CodeGenError> {
        if pairs.len() % 2 != 0 {
            pairs.push(DirectionalPair::empty());
        }
        if block_kind == PairingBlock::Variables {
            // widest first, so it sets the width every narrower row pads up to
            pairs.sort_by(|a, b| b.max_width().cmp(&a.max_width()));
        }

        let compress = self.options.compress_horizontal;
        let walkway = Command::walkway();
        let mut block = GridFragment::new();

        for chunk in pairs.chunks(2) {
            let (first, second) = match chunk {
                [first, second] => (first, second),
                _ => {
                    return Err(CodeGenError::InternalInconsistency(format!(
                        "unpaired directional fragment among {} pairs",
                        pairs.len()
                    )))
                }
            };

            let mut row_a = first.forward.clone();
            let mut row_b = second.mirrored.clone();
            row_a.normalize_x();
            row_b.normalize_x();

            let shared_width = row_a.max_x().max(row_b.max_x());

            match block_kind {
                PairingBlock::Variables => {
                    row_a.append_left_cell(0, Command::new(CommandKind::PcRight), compress)?;
                    row_b.append_left_cell(0, Command::new(CommandKind::PcDown), compress)?;
                }
                PairingBlock::Parameters => {
                    row_a.set(-1, 0, Command::new(CommandKind::PcRight))?;
                    row_b.set(-1, 0, Command::new(CommandKind::PcDown))?;
                }
            }

            row_a.fill(row_a.max_x(), 0, shared_width, 1, walkway, None)?;
            row_b.fill(row_b.max_x(), 0, shared_width, 1, walkway, None)?;

            row_a.set(shared_width, 0, Command::new(CommandKind::PcDown))?;
            row_b.set(shared_width, 0, Command::new(CommandKind::PcLeft))?;

            // lanes: A falls down its right edge into B, B falls down its left
            // edge into the next block
            row_a.fill_column_walkway(row_a.max_x() - 1, 1, row_a.max_y())?;
            row_a.fill_column_walkway(row_a.min_x(), row_a.min_y(), 0)?;
            row_b.fill_column_walkway(row_b.max_x() - 1, row_b.min_y(), 0)?;
            row_b.fill_column_walkway(row_b.min_x(), 1, row_b.max_y())?;

            row_a.normalize_x();
            row_b.normalize_x();

            block.append_bottom(&row_a)?;
            block.append_bottom(&row_b)?;
        }

        block.normalize_x();
        Ok(block)
    }

    /// Body entered on row 0 from the left, with a lane above it
    fn generate_body(body: &GridFragment) -> Result<GridFragment, CodeGenError> {
        let mut code = body.clone();
        code.normalize_x();
        code.set(-1, 0, Command::new(CommandKind::PcRight))?;
        code.normalize_x();
        code.fill_column_walkway(0, code.min_y(), 0)?;
        Ok(code)
    }
}

#[cfg(test)]
#[path = "method_tests.rs"]
mod tests;
