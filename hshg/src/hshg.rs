use crate::collision_detection;
use crate::error::{HshgError, HshgResult};
use smallvec::SmallVec;

mod cache;
mod collide;
mod config;
mod core;
mod grid;
mod optimize;
mod pool;
mod query;
mod types;
mod update;

pub use config::{Config, HierarchyGrowth};
pub use types::{Entity, EntityId};
pub use update::EntityUpdate;

use grid::{map_range, GridLevel};
use types::{
    validate_extent, validate_pos, validate_radius, CachedLevel, TraversalState, INVALID_CELL,
    MAX_LEVELS,
};

/// Hierarchical spatial hash grid over `D`-dimensional spheres.
///
/// Entities live in a pool addressed by [`EntityId`]; each one is linked into
/// exactly one cell of exactly one grid level, picked from its radius. Finer
/// levels come first and every coarser level halves the side and doubles the
/// cell size.
pub struct Hshg<const D: usize> {
    entities: Vec<Entity<D>>,
    levels: Vec<GridLevel>,
    cache: SmallVec<[CachedLevel; MAX_LEVELS]>,
    old_cache: u32,
    new_cache: u32,
    state: TraversalState,
    forward: SmallVec<[[i32; D]; 16]>,
    cell_size: u32,
    cell_log: u32,
    grid_size: f32,
    inverse_grid_size: f32,
    free_entity: u32,
    capacity: u32,
    live: u32,
    growth: HierarchyGrowth,
}

pub type Hshg1 = Hshg<1>;
pub type Hshg2 = Hshg<2>;
pub type Hshg3 = Hshg<3>;
