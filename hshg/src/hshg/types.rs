use super::{HshgError, HshgResult};

pub(crate) const INVALID_CELL: u32 = u32::MAX;
pub(crate) const MAX_LEVELS: usize = 32;

/// Handle of a live entity, stable until the next `optimize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    #[inline(always)]
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Entity<const D: usize> {
    pub(crate) pos: [f32; D],
    pub(crate) radius: f32,
    pub(crate) value: u32,
    pub(crate) cell: u32,
    pub(crate) next: u32,
    pub(crate) prev: u32,
    pub(crate) level: u8,
}

impl<const D: usize> Entity<D> {
    #[inline(always)]
    pub(crate) fn sentinel() -> Self {
        Self {
            pos: [0.0; D],
            radius: 0.0,
            value: 0,
            cell: INVALID_CELL,
            next: 0,
            prev: 0,
            level: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn is_live(&self) -> bool {
        self.cell != INVALID_CELL
    }

    #[inline(always)]
    pub fn pos(&self) -> [f32; D] {
        self.pos
    }

    #[inline(always)]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Caller-supplied value given at insertion.
    #[inline(always)]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline(always)]
    pub fn level(&self) -> usize {
        self.level as usize
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CachedLevel {
    pub(crate) level: u8,
    // Levels between this entry and the previous one; the first entry counts from level 0
    pub(crate) shift: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TraversalState {
    Idle,
    Updating { removed: bool },
    Colliding,
    Querying,
}

impl TraversalState {
    #[inline(always)]
    pub(crate) fn is_idle(self) -> bool {
        self == TraversalState::Idle
    }
}

#[inline(always)]
pub(crate) fn validate_radius(radius: f32) -> HshgResult<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(HshgError::InvalidRadius { radius })
    }
}

#[inline(always)]
pub(crate) fn validate_pos<const D: usize>(pos: &[f32; D]) -> HshgResult<()> {
    match pos.iter().position(|v| !v.is_finite()) {
        Some(axis) => Err(HshgError::InvalidPosition {
            axis,
            value: pos[axis],
        }),
        None => Ok(()),
    }
}

#[inline(always)]
pub(crate) fn validate_extent<const D: usize>(min: &[f32; D], max: &[f32; D]) -> HshgResult<()> {
    for axis in 0..D {
        let (lo, hi) = (min[axis], max[axis]);
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(HshgError::InvalidExtent {
                axis,
                min: lo,
                max: hi,
            });
        }
    }
    Ok(())
}
