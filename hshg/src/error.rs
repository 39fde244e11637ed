use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HshgError {
    OutOfMemory { requested: usize },
    CapacityExhausted,
    CapacityBelowUsed { requested: u32, used: u32 },
    InvalidSide { side: u32 },
    InvalidCellSize { cell_size: u32 },
    GridTooLarge { side: u32, cell_size: u32, dimension: usize },
    InvalidDimension { dimension: usize },
    InvalidRadius { radius: f32 },
    InvalidPosition { axis: usize, value: f32 },
    InvalidExtent { axis: usize, min: f32, max: f32 },
    LevelNotAllocated { required: usize, allocated: usize },
}

pub type HshgResult<T> = Result<T, HshgError>;

impl fmt::Display for HshgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HshgError::OutOfMemory { requested } => {
                write!(f, "allocation failed (requested elements: {})", requested)
            }
            HshgError::CapacityExhausted => {
                write!(f, "entity index space is exhausted")
            }
            HshgError::CapacityBelowUsed { requested, used } => {
                write!(
                    f,
                    "capacity must not be below the number of used slots (requested: {}, used: {})",
                    requested, used
                )
            }
            HshgError::InvalidSide { side } => {
                write!(f, "grid side must be a power of two (side: {})", side)
            }
            HshgError::InvalidCellSize { cell_size } => {
                write!(
                    f,
                    "cell size must be a power of two (cell_size: {})",
                    cell_size
                )
            }
            HshgError::GridTooLarge {
                side,
                cell_size,
                dimension,
            } => {
                write!(
                    f,
                    "grid does not fit 32-bit cell indices (side: {}, cell_size: {}, dimension: {})",
                    side, cell_size, dimension
                )
            }
            HshgError::InvalidDimension { dimension } => {
                write!(f, "dimension must be at least 1 (dimension: {})", dimension)
            }
            HshgError::InvalidRadius { radius } => {
                write!(
                    f,
                    "radius must be finite and positive (radius: {})",
                    radius
                )
            }
            HshgError::InvalidPosition { axis, value } => {
                write!(
                    f,
                    "position must be finite (axis: {}, value: {})",
                    axis, value
                )
            }
            HshgError::InvalidExtent { axis, min, max } => {
                write!(
                    f,
                    "query extents must be finite with min <= max (axis: {}, min: {}, max: {})",
                    axis, min, max
                )
            }
            HshgError::LevelNotAllocated {
                required,
                allocated,
            } => {
                write!(
                    f,
                    "grid level is not allocated, call prealloc first (required: {}, allocated: {})",
                    required, allocated
                )
            }
        }
    }
}

impl std::error::Error for HshgError {}
