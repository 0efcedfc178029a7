// Grid Fragment
//
// A bounded, auto-expanding two dimensional block of Befunge commands. Bounds are
// half-open ([min_x, max_x) x [min_y, max_y)) and may extend into negative
// coordinates; storage is column-major and addressed relative to (min_x, min_y).
//
// Invariants checked on every mutation:
// - every in-bounds coordinate holds exactly one command (empty when backfilled)
// - a tag occurs at most once per fragment
// - a non-empty cell is never overwritten

use crate::codegen::command::{Command, CommandKind};
use crate::codegen::error::CodeGenError;
use crate::codegen::tags::TagId;
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridFragment {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,

    // columns[x - min_x][y - min_y]
    columns: Vec<Vec<Command>>,

    // tag -> absolute coordinate, kept in sync with `columns`
    tags: IndexMap<TagId, (i32, i32)>,
}

impl GridFragment {
    /// Create an empty fragment anchored at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding a single command at the origin
    pub fn single(command: Command) -> Result<Self, CodeGenError> {
        let mut fragment = Self::new();
        fragment.set(0, 0, command)?;
        Ok(fragment)
    }

    /// Build a fragment from rows of Befunge source text, one glyph per cell
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, CodeGenError> {
        let mut fragment = Self::new();
        for (y, line) in lines.iter().enumerate() {
            for (x, glyph) in line.as_ref().chars().enumerate() {
                fragment.set(x as i32, y as i32, Command::from_glyph(glyph))?;
            }
        }
        Ok(fragment)
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// True when the fragment covers no area at all
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && y >= self.min_y && x < self.max_x && y < self.max_y
    }

    fn expand(&mut self, x: i32, y: i32) {
        self.expand_x(x);
        self.expand_y(y);
    }

    fn expand_x(&mut self, x: i32) {
        let height = self.height() as usize;
        if x >= self.max_x {
            while self.max_x <= x {
                self.columns.push(vec![Command::unused(); height]);
                self.max_x += 1;
            }
        } else if x < self.min_x {
            while self.min_x > x {
                self.columns.insert(0, vec![Command::unused(); height]);
                self.min_x -= 1;
            }
        }
    }

    fn expand_y(&mut self, y: i32) {
        if y >= self.max_y {
            let grow = (y + 1 - self.max_y) as usize;
            for column in &mut self.columns {
                column.extend(std::iter::repeat(Command::unused()).take(grow));
            }
            self.max_y = y + 1;
        } else if y < self.min_y {
            let grow = (self.min_y - y) as usize;
            for column in &mut self.columns {
                column.splice(0..0, std::iter::repeat(Command::unused()).take(grow));
            }
            self.min_y = y;
        }
    }

    fn index(&self, x: i32, y: i32) -> (usize, usize) {
        ((x - self.min_x) as usize, (y - self.min_y) as usize)
    }

    /// Command at (x, y); out of bounds reads yield the empty command
    pub fn get(&self, x: i32, y: i32) -> Command {
        if !self.contains(x, y) {
            return Command::unused();
        }
        let (cx, cy) = self.index(x, y);
        self.columns[cx][cy]
    }

    /// Write a command, growing the bounds as needed
    pub fn set(&mut self, x: i32, y: i32, command: Command) -> Result<(), CodeGenError> {
        self.expand(x, y);

        let existing = self.get(x, y);
        if !existing.is_empty() {
            return Err(CodeGenError::occupied(
                x,
                y,
                format!(
                    "cell already holds '{}', cannot write '{}'",
                    existing.glyph(),
                    command.glyph()
                ),
            ));
        }

        if let Some(tag) = command.tag {
            if let Some(&(existing_x, existing_y)) = self.tags.get(&tag) {
                return Err(CodeGenError::DuplicateTag {
                    tag,
                    x,
                    y,
                    existing_x,
                    existing_y,
                });
            }
            self.tags.insert(tag, (x, y));
        }

        let (cx, cy) = self.index(x, y);
        self.columns[cx][cy] = command;
        Ok(())
    }

    /// Attach a tag to whatever occupies (x, y), e.g. an entry marker on a turn cell
    pub fn set_tag(&mut self, x: i32, y: i32, tag: TagId) -> Result<(), CodeGenError> {
        self.expand(x, y);

        if let Some(&(existing_x, existing_y)) = self.tags.get(&tag) {
            if (existing_x, existing_y) == (x, y) {
                return Ok(());
            }
            return Err(CodeGenError::DuplicateTag {
                tag,
                x,
                y,
                existing_x,
                existing_y,
            });
        }

        let (cx, cy) = self.index(x, y);
        let cell = &mut self.columns[cx][cy];
        if let Some(other) = cell.tag {
            return Err(CodeGenError::occupied(
                x,
                y,
                format!("cell already tagged with {}, cannot tag with {}", other, tag),
            ));
        }
        cell.tag = Some(tag);
        self.tags.insert(tag, (x, y));
        Ok(())
    }

    pub fn find_tag(&self, tag: TagId) -> Option<(i32, i32)> {
        self.tags.get(&tag).copied()
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains_key(&tag)
    }

    /// All tags with their current coordinates, in placement order
    pub fn tags(&self) -> impl Iterator<Item = (TagId, (i32, i32))> + '_ {
        self.tags.iter().map(|(tag, pos)| (*tag, *pos))
    }

    /// Every non-empty cell with its coordinate, column by column
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Command)> + '_ {
        self.columns.iter().enumerate().flat_map(move |(cx, column)| {
            column.iter().enumerate().filter_map(move |(cy, command)| {
                if command.is_empty() {
                    None
                } else {
                    Some((self.min_x + cx as i32, self.min_y + cy as i32, *command))
                }
            })
        })
    }

    pub fn normalize(&mut self) {
        self.normalize_x();
        self.normalize_y();
    }

    pub fn normalize_x(&mut self) {
        let offset = -self.min_x;
        self.min_x += offset;
        self.max_x += offset;
        for pos in self.tags.values_mut() {
            pos.0 += offset;
        }
    }

    pub fn normalize_y(&mut self) {
        let offset = -self.min_y;
        self.min_y += offset;
        self.max_y += offset;
        for pos in self.tags.values_mut() {
            pos.1 += offset;
        }
    }

    pub fn copy_normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    /// Fill [x1, x2) x [y1, y2) with `command`; `corner_tag` lands on the top-left cell
    pub fn fill(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        command: Command,
        corner_tag: Option<TagId>,
    ) -> Result<(), CodeGenError> {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };

        for x in x1..x2 {
            for y in y1..y2 {
                let cell = match corner_tag {
                    Some(tag) if x == x1 && y == y1 => command.with_tag(tag),
                    _ => command,
                };
                self.set(x, y, cell)?;
            }
        }
        Ok(())
    }

    /// Pad column `x` over rows [y1, y2) with walkway wherever the cell is still empty
    pub fn fill_column_walkway(&mut self, x: i32, y1: i32, y2: i32) -> Result<(), CodeGenError> {
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        for y in y1..y2 {
            if self.get(x, y).is_empty() {
                self.set(x, y, Command::walkway())?;
            }
        }
        Ok(())
    }

    /// Place `other` with its coordinate system shifted by (x, y)
    pub fn blit(&mut self, x: i32, y: i32, other: &GridFragment) -> Result<(), CodeGenError> {
        if other.is_empty() {
            return Ok(());
        }
        self.expand(x + other.min_x, y + other.min_y);
        self.expand(x + other.max_x - 1, y + other.max_y - 1);

        for (ox, oy, command) in other.cells() {
            self.set(x + ox, y + oy, command)?;
        }
        Ok(())
    }

    /// Drop column `x`; everything right of it moves one step left
    pub fn remove_column(&mut self, x: i32) -> Result<(), CodeGenError> {
        if x < self.min_x || x >= self.max_x {
            return Err(CodeGenError::InternalInconsistency(format!(
                "remove_column({}) outside of [{}, {})",
                x, self.min_x, self.max_x
            )));
        }

        let removed = self.columns.remove((x - self.min_x) as usize);
        for command in removed {
            if let Some(tag) = command.tag {
                self.tags.shift_remove(&tag);
            }
        }
        for pos in self.tags.values_mut() {
            if pos.0 > x {
                pos.0 -= 1;
            }
        }
        self.max_x -= 1;
        Ok(())
    }

    /// Drop row `y`; everything below it moves one step up
    pub fn remove_row(&mut self, y: i32) -> Result<(), CodeGenError> {
        if y < self.min_y || y >= self.max_y {
            return Err(CodeGenError::InternalInconsistency(format!(
                "remove_row({}) outside of [{}, {})",
                y, self.min_y, self.max_y
            )));
        }

        let row = (y - self.min_y) as usize;
        for column in &mut self.columns {
            let command = column.remove(row);
            if let Some(tag) = command.tag {
                self.tags.shift_remove(&tag);
            }
        }
        for pos in self.tags.values_mut() {
            if pos.1 > y {
                pos.1 -= 1;
            }
        }
        self.max_y -= 1;
        Ok(())
    }

    /// Reflect along x in place; the result is normalized on x
    pub fn mirror_x(&mut self) -> Result<(), CodeGenError> {
        if let Some((x, y, command)) = self
            .cells()
            .find(|(_, _, command)| !command.is_direction_independent())
        {
            return Err(CodeGenError::NonMirrorableCell {
                x,
                y,
                glyph: command.glyph(),
            });
        }

        let last = self.max_x - 1;
        self.columns.reverse();
        for pos in self.tags.values_mut() {
            pos.0 = last - pos.0;
        }
        self.max_x = self.width();
        self.min_x = 0;
        Ok(())
    }

    /// Mirrored copy, leaving `self` untouched
    pub fn mirrored(&self) -> Result<Self, CodeGenError> {
        let mut copy = self.clone();
        copy.mirror_x()?;
        Ok(copy)
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Guarantee a non-zero area by writing `command` at the origin of an empty fragment
    pub fn force_non_empty(&mut self, command: Command) -> Result<(), CodeGenError> {
        if self.is_empty() {
            self.set(0, 0, command)?;
        }
        Ok(())
    }

    /// Horizontal flat: exactly one row high
    pub fn is_h_flat(&self) -> bool {
        self.height() == 1
    }

    /// Vertical flat: exactly one column wide
    pub fn is_v_flat(&self) -> bool {
        self.width() == 1
    }

    pub fn is_row_single(&self, y: i32) -> bool {
        (self.min_x..self.max_x)
            .filter(|&x| !self.get(x, y).is_empty())
            .count()
            == 1
    }

    pub fn is_column_single(&self, x: i32) -> bool {
        (self.min_y..self.max_y)
            .filter(|&y| !self.get(x, y).is_empty())
            .count()
            == 1
    }

    pub fn first_row_is_single(&self) -> bool {
        self.is_row_single(self.min_y)
    }

    pub fn last_row_is_single(&self) -> bool {
        self.is_row_single(self.max_y - 1)
    }

    /// Rows of the grid in increasing y; unused cells become `unused_glyph`
    pub fn to_lines(&self, unused_glyph: char) -> Vec<String> {
        (self.min_y..self.max_y)
            .map(|y| {
                (self.min_x..self.max_x)
                    .map(|x| {
                        let command = self.get(x, y);
                        if command.kind == CommandKind::Unused {
                            unused_glyph
                        } else {
                            command.glyph()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// One-line bounds summary for logs
    pub fn describe(&self) -> String {
        format!(
            "[{} - {}, {} - {}] ({}x{})",
            self.min_x,
            self.max_x,
            self.min_y,
            self.max_y,
            self.width(),
            self.height()
        )
    }
}

impl fmt::Display for GridFragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in self.to_lines(' ') {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fragment_tests.rs"]
mod tests;
