//! Sharded canvas matrix.
//!
//! The canvas is partitioned across `total_instances` workers by column:
//! instance `i` owns every column `x` with `x % total_instances == i`.
//! Only the owned stripe is stored, as a dense row-major array of
//! `ceil(width / total_instances) * height` color codes.

use crate::domain::color::ColorCode;

/// The owned stripe of the canvas together with the information a client
/// needs to lay it back onto the full canvas: column `offset + k * each_nth`
/// holds the k-th code of each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSnapshot {
    pub color_codes: Vec<ColorCode>,
    pub offset: usize,
    pub each_nth: usize,
}

/// Authoritative pixel state for one worker instance.
#[derive(Debug, Clone)]
pub struct CanvasMatrix {
    /// Color codes of the owned columns only, row-major.
    data: Vec<ColorCode>,
    /// Total canvas width in cells.
    width: usize,
    /// Total canvas height in cells.
    height: usize,

    instance_number: usize,
    total_instances: usize,
    /// `ceil(width / total_instances)`: columns stored per row.
    stripe_width: usize,
}

impl CanvasMatrix {
    pub fn new(
        width: usize,
        height: usize,
        instance_number: usize,
        total_instances: usize,
    ) -> Self {
        let stripe_width = width.div_ceil(total_instances);
        Self {
            data: vec![ColorCode(0); stripe_width * height],
            width,
            height,
            instance_number,
            total_instances,
            stripe_width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn instance_number(&self) -> usize {
        self.instance_number
    }

    pub fn total_instances(&self) -> usize {
        self.total_instances
    }

    /// Whether column `x` belongs to this instance.
    pub fn owns(&self, x: usize) -> bool {
        x % self.total_instances == self.instance_number
    }

    /// Read a cell. `None` if `(x, y)` is out of bounds or the column
    /// belongs to another instance.
    pub fn get(&self, x: usize, y: usize) -> Option<ColorCode> {
        if !self.in_bounds(x, y) || !self.owns(x) {
            return None;
        }
        Some(self.data[self.local_index(x, y)])
    }

    /// Write a cell. Returns `false` (leaving the matrix unchanged) if
    /// `(x, y)` is out of bounds or the column belongs to another instance.
    pub fn set(&mut self, x: usize, y: usize, color: ColorCode) -> bool {
        if !self.in_bounds(x, y) || !self.owns(x) {
            return false;
        }
        let index = self.local_index(x, y);
        self.data[index] = color;
        true
    }

    /// Dense copy of the owned stripe plus the layout pair clients use to
    /// reassemble the full canvas from all workers' stripes.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            color_codes: self.data.clone(),
            offset: self.instance_number,
            each_nth: self.total_instances,
        }
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn local_index(&self, x: usize, y: usize) -> usize {
        y * self.stripe_width + x / self.total_instances
    }
}
