use std::collections::HashMap;

/// Cell key on the horizontal plane: `(floor(x / size), floor(z / size))`.
pub type CellKey = (i32, i32);

/// Uniform spatial hash over the horizontal plane.
///
/// Stores indices of static colliders only. A rectangle is inserted into every
/// cell it touches, so a query only has to look at the cells its own bounding
/// square touches. Cells are created on first insert and never pruned: the
/// town is static and bounded, so the table stops growing after world build.
/// Queries only walk cells inside the populated extent, however large the
/// query rectangle.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
    /// Lowest and highest cell keys ever populated.
    extent: Option<(CellKey, CellKey)>,
}

impl SpatialGrid {
    /// Cell edge length used by the town (world units).
    pub const DEFAULT_CELL_SIZE: f32 = 10.0;

    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            extent: None,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing the point `(x, z)`.
    pub fn cell_key(&self, x: f32, z: f32) -> CellKey {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Inclusive cell range covered by a rectangle.
    fn cell_range(&self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> (CellKey, CellKey) {
        (self.cell_key(min_x, min_z), self.cell_key(max_x, max_z))
    }

    /// Bucket `index` into every cell the rectangle touches.
    pub fn insert_rect(&mut self, index: usize, min_x: f32, max_x: f32, min_z: f32, max_z: f32) {
        let ((x0, z0), (x1, z1)) = self.cell_range(min_x, max_x, min_z, max_z);
        for cx in x0..=x1 {
            for cz in z0..=z1 {
                self.cells.entry((cx, cz)).or_default().push(index);
            }
        }
        self.extent = Some(match self.extent {
            Some(((lx, lz), (hx, hz))) => ((lx.min(x0), lz.min(z0)), (hx.max(x1), hz.max(z1))),
            None => ((x0, z0), (x1, z1)),
        });
    }

    /// Visit every index bucketed in the cells the rectangle touches.
    ///
    /// An index spanning several cells is visited once per cell; callers doing
    /// a pure overlap test can ignore the repeats. Stops early and returns
    /// `true` as soon as `visit` does.
    pub fn any_in_rect(
        &self,
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
        mut visit: impl FnMut(usize) -> bool,
    ) -> bool {
        let Some(((lx, lz), (hx, hz))) = self.extent else {
            return false;
        };
        let ((x0, z0), (x1, z1)) = self.cell_range(min_x, max_x, min_z, max_z);
        for cx in x0.max(lx)..=x1.min(hx) {
            for cz in z0.max(lz)..=z1.min(hz) {
                if let Some(indices) = self.cells.get(&(cx, cz)) {
                    if indices.iter().any(|&i| visit(i)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Number of cells created so far.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_SIZE)
    }
}
