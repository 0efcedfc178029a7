/// fragment_combine.rs
/// Composition and compression for GridFragment
///
/// Horizontal appends may merge the two touching boundary columns into a single
/// connector column when no instruction or tag would be lost. Vertical appends
/// never compress.
use crate::codegen::command::Command;
use crate::codegen::error::CodeGenError;
use crate::codegen::fragment::GridFragment;

impl GridFragment {
    /// New fragment with `right` placed directly after `left`; inputs are untouched
    pub fn combine_horizontal(
        left: &GridFragment,
        right: &GridFragment,
        compress: bool,
    ) -> Result<GridFragment, CodeGenError> {
        let mut combined = left.clone();
        combined.normalize_x();
        let mut tail = right.clone();
        tail.normalize_x();
        combined.append_right(&tail, compress)?;
        Ok(combined)
    }

    /// New fragment with `bottom` placed directly below `top`; inputs are untouched
    pub fn combine_vertical(
        top: &GridFragment,
        bottom: &GridFragment,
    ) -> Result<GridFragment, CodeGenError> {
        let mut combined = top.clone();
        combined.normalize_y();
        let mut tail = bottom.clone();
        tail.normalize_y();
        combined.append_bottom(&tail)?;
        Ok(combined)
    }

    pub fn append_right(
        &mut self,
        right: &GridFragment,
        compress: bool,
    ) -> Result<(), CodeGenError> {
        let mut right = right.clone();

        if compress {
            if let Some(connector) = Self::compress_horizontal(self, &right)? {
                self.remove_column(self.max_x() - 1)?;
                right.remove_column(right.min_x())?;
                self.append_right_direct(&connector)?;
            }
        }

        self.append_right_direct(&right)
    }

    pub fn append_right_cell(
        &mut self,
        row: i32,
        command: Command,
        compress: bool,
    ) -> Result<(), CodeGenError> {
        let mut cell = GridFragment::new();
        cell.set(0, row, command)?;
        self.append_right(&cell, compress)
    }

    fn append_right_direct(&mut self, right: &GridFragment) -> Result<(), CodeGenError> {
        let mut right = right.clone();
        right.normalize_x();
        let offset = self.max_x();
        self.blit(offset, 0, &right)
    }

    pub fn append_left(
        &mut self,
        left: &GridFragment,
        compress: bool,
    ) -> Result<(), CodeGenError> {
        let mut left = left.clone();

        if compress {
            if let Some(connector) = Self::compress_horizontal(&left, self)? {
                self.remove_column(self.min_x())?;
                left.remove_column(left.max_x() - 1)?;
                self.append_left_direct(&connector)?;
            }
        }

        self.append_left_direct(&left)
    }

    pub fn append_left_cell(
        &mut self,
        row: i32,
        command: Command,
        compress: bool,
    ) -> Result<(), CodeGenError> {
        let mut cell = GridFragment::new();
        cell.set(0, row, command)?;
        self.append_left(&cell, compress)
    }

    fn append_left_direct(&mut self, left: &GridFragment) -> Result<(), CodeGenError> {
        let mut left = left.clone();
        left.normalize_x();
        let offset = self.min_x() - left.max_x();
        self.blit(offset, 0, &left)
    }

    pub fn append_bottom(&mut self, bottom: &GridFragment) -> Result<(), CodeGenError> {
        let mut bottom = bottom.clone();
        bottom.normalize_y();
        let offset = self.max_y();
        self.blit(0, offset, &bottom)
    }

    pub fn append_bottom_cell(&mut self, col: i32, command: Command) -> Result<(), CodeGenError> {
        let mut cell = GridFragment::new();
        cell.set(col, 0, command)?;
        self.append_bottom(&cell)
    }

    pub fn append_top(&mut self, top: &GridFragment) -> Result<(), CodeGenError> {
        let mut top = top.clone();
        top.normalize_y();
        let offset = self.min_y() - top.max_y();
        self.blit(0, offset, &top)
    }

    pub fn append_top_cell(&mut self, col: i32, command: Command) -> Result<(), CodeGenError> {
        let mut cell = GridFragment::new();
        cell.set(col, 0, command)?;
        self.append_top(&cell)
    }

    /// Try to merge left's last column with right's first column.
    ///
    /// Looks at every row of the union of both y-extents. A row where both sides
    /// carry a tag, or both sides hold an instruction, rejects the whole merge.
    /// Otherwise each row keeps whichever side has an instruction and the single
    /// surviving tag. Returns the one-column connector, or `None` when the pair
    /// cannot be merged.
    pub fn compress_horizontal(
        left: &GridFragment,
        right: &GridFragment,
    ) -> Result<Option<GridFragment>, CodeGenError> {
        if left.width() == 0 || right.width() == 0 {
            return Ok(None);
        }

        let x_left = left.max_x() - 1;
        let x_right = right.min_x();
        let mut connector = GridFragment::new();

        let y_start = left.min_y().min(right.min_y());
        let y_end = left.max_y().max(right.max_y());
        for y in y_start..y_end {
            let l = left.get(x_left, y);
            let r = right.get(x_right, y);

            if l.tag.is_some() && r.tag.is_some() {
                return Ok(None);
            }
            let tag = l.tag.or(r.tag);

            // Two instructions never share a cell, not even identical ones
            let merged = match (l.is_unused(), r.is_unused()) {
                (true, true) => Command { tag, ..Command::unused() },
                (false, false) => return Ok(None),
                (false, true) => Command { tag, ..l },
                (true, false) => Command { tag, ..r },
            };
            connector.set(0, y, merged)?;
        }

        log::trace!(
            "compressed boundary columns {} | {} into {}",
            left.describe(),
            right.describe(),
            connector.describe()
        );
        Ok(Some(connector))
    }
}

#[cfg(test)]
#[path = "fragment_combine_tests.rs"]
mod tests;
