use super::*;

/// One resolution of the hierarchy: `side^D` cell heads, each the first
/// entity index of an intrusive list (0 when empty).
pub(crate) struct GridLevel {
    pub(crate) cells: Vec<u32>,
    pub(crate) side: u32,
    pub(crate) mask: u32,
    pub(crate) log: u32,
    pub(crate) cell_size: u32,
    pub(crate) inverse_cell_size: f32,
    pub(crate) live_count: u32,
    pub(crate) cache_idx: u8,
}

impl GridLevel {
    pub(crate) fn new(side: u32, cell_size: u32, dimension: usize) -> HshgResult<Self> {
        let log = side.trailing_zeros();
        let len = 1usize << (log as usize * dimension);
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| HshgError::OutOfMemory { requested: len })?;
        cells.resize(len, 0);
        Ok(Self {
            cells,
            side,
            mask: side - 1,
            log,
            cell_size,
            inverse_cell_size: 1.0 / cell_size as f32,
            live_count: 0,
            cache_idx: 0,
        })
    }

    // Mirror fold: period of two grid extents, even in x, neighbors stay neighbors
    #[inline(always)]
    pub(crate) fn axis_cell(&self, x: f32) -> u32 {
        let cell = (x.abs() * self.inverse_cell_size) as u32;
        if cell & self.side != 0 {
            self.mask - (cell & self.mask)
        } else {
            cell & self.mask
        }
    }

    #[inline(always)]
    pub(crate) fn flatten<const D: usize>(&self, coords: &[u32; D]) -> u32 {
        let mut idx = 0;
        for (axis, c) in coords.iter().enumerate() {
            idx |= c << (axis as u32 * self.log);
        }
        idx
    }

    #[inline(always)]
    pub(crate) fn cell_of<const D: usize>(&self, pos: &[f32; D]) -> u32 {
        let mut idx = 0;
        for (axis, x) in pos.iter().enumerate() {
            idx |= self.axis_cell(*x) << (axis as u32 * self.log);
        }
        idx
    }

    #[inline(always)]
    pub(crate) fn coords<const D: usize>(&self, cell: u32) -> [u32; D] {
        let mut coords = [0; D];
        for (axis, c) in coords.iter_mut().enumerate() {
            *c = (cell >> (axis as u32 * self.log)) & self.mask;
        }
        coords
    }

    /// Inclusive one-cell neighborhood around `coords`, clamped to the level.
    #[inline(always)]
    pub(crate) fn window<const D: usize>(&self, coords: &[u32; D]) -> ([u32; D], [u32; D]) {
        let mut lo = [0; D];
        let mut hi = [0; D];
        for axis in 0..D {
            lo[axis] = coords[axis].saturating_sub(1);
            hi[axis] = if coords[axis] != self.mask {
                coords[axis] + 1
            } else {
                coords[axis]
            };
        }
        (lo, hi)
    }

    /// Calls `f` with the head of every cell in the inclusive box `[lo, hi]`,
    /// first axis fastest.
    #[inline(always)]
    pub(crate) fn for_each_head<const D: usize, F: FnMut(u32)>(
        &self,
        lo: &[u32; D],
        hi: &[u32; D],
        mut f: F,
    ) {
        let mut cur = *lo;
        loop {
            f(self.cells[self.flatten(&cur) as usize]);
            let mut axis = 0;
            loop {
                if axis == D {
                    return;
                }
                if cur[axis] < hi[axis] {
                    cur[axis] += 1;
                    break;
                }
                cur[axis] = lo[axis];
                axis += 1;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRange {
    pub(crate) start: u32,
    pub(crate) end: u32,
}

/// Maps the world interval `[min, max]` on one axis to the inclusive range of
/// folded cells it touches on `level`.
///
/// Negative minima are moved by an even number of grid extents, which the
/// fold ignores. The number of extent boundaries crossed then decides the
/// shape: a plain interval, an interval touching one end of the axis, or the
/// whole axis.
pub(crate) fn map_range(
    level: &GridLevel,
    grid_size: f32,
    inverse_grid_size: f32,
    min: f32,
    max: f32,
) -> CellRange {
    let (lo, hi) = if min < 0.0 {
        let shift = ((-min * inverse_grid_size).trunc() * 2.0 + 2.0) * grid_size;
        (min + shift, max + shift)
    } else {
        (min, max)
    };
    let base = (lo * inverse_grid_size).trunc() * grid_size;
    let folds = ((hi - base) * inverse_grid_size) as u32;
    match folds {
        0 => {
            let a = level.axis_cell(lo);
            let b = level.axis_cell(hi);
            CellRange {
                start: a.min(b),
                end: a.max(b),
            }
        }
        1 => {
            let raw = (lo.abs() * level.inverse_cell_size) as u32;
            let end = level.axis_cell(hi);
            if raw & level.side != 0 {
                CellRange {
                    start: 0,
                    end: (level.mask - (raw & level.mask)).max(end),
                }
            } else {
                CellRange {
                    start: (raw & level.mask).min(end),
                    end: level.mask,
                }
            }
        }
        _ => CellRange {
            start: 0,
            end: level.mask,
        },
    }
}
