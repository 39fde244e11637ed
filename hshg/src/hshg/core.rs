use super::*;
use std::mem::size_of;

impl<const D: usize> Hshg<D> {
    pub fn new(side: u32, cell_size: u32) -> HshgResult<Self> {
        Self::with_config(Config {
            side,
            cell_size,
            ..Default::default()
        })
    }

    pub fn with_config(config: Config) -> HshgResult<Self> {
        if D == 0 {
            return Err(HshgError::InvalidDimension { dimension: D });
        }
        if !config.side.is_power_of_two() {
            return Err(HshgError::InvalidSide { side: config.side });
        }
        if !config.cell_size.is_power_of_two() {
            return Err(HshgError::InvalidCellSize {
                cell_size: config.cell_size,
            });
        }
        let side_log = config.side.trailing_zeros();
        let cell_log = config.cell_size.trailing_zeros();
        if side_log as usize * D > 31 || side_log + cell_log > 31 {
            return Err(HshgError::GridTooLarge {
                side: config.side,
                cell_size: config.cell_size,
                dimension: D,
            });
        }
        let grid_size = config.side as f32 * config.cell_size as f32;
        let mut entities = Vec::new();
        let slots = config.pool_size as usize + 1;
        entities
            .try_reserve_exact(slots)
            .map_err(|_| HshgError::OutOfMemory { requested: slots })?;
        entities.push(Entity::sentinel());
        let mut hshg = Self {
            entities,
            levels: Vec::with_capacity(MAX_LEVELS),
            cache: SmallVec::new(),
            old_cache: 0,
            new_cache: 0,
            state: TraversalState::Idle,
            forward: forward_offsets::<D>(),
            cell_size: config.cell_size,
            cell_log,
            grid_size,
            inverse_grid_size: 1.0 / grid_size,
            free_entity: 0,
            capacity: config.pool_size.min(u32::MAX - 1),
            live: 0,
            growth: config.growth,
        };
        hshg.levels
            .push(GridLevel::new(config.side, config.cell_size, D)?);
        if let Some(max_radius) = config.max_radius {
            hshg.prealloc(max_radius)?;
        }
        Ok(hshg)
    }

    /// Allocates coarser levels until entities of radius `max_radius` have a
    /// level of their own, or until the coarsest level covers the whole grid.
    pub fn prealloc(&mut self, max_radius: f32) -> HshgResult<()> {
        debug_assert!(
            self.state.is_idle(),
            "prealloc() may not be called from any callback"
        );
        validate_radius(max_radius)?;
        let required = self.level_for(max_radius);
        while self.levels.len() <= required && !self.is_saturated() {
            self.grow_level()?;
        }
        Ok(())
    }

    #[inline(always)]
    pub fn levels_len(&self) -> usize {
        self.levels.len()
    }

    pub fn level_side(&self, level: usize) -> Option<u32> {
        self.levels.get(level).map(|level| level.side)
    }

    pub fn level_cell_size(&self, level: usize) -> Option<u32> {
        self.levels.get(level).map(|level| level.cell_size)
    }

    /// Extent covered by the finest level before coordinates fold.
    #[inline(always)]
    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Adds an entity and returns its id. `value` is handed back in every
    /// callback and survives `optimize`, unlike the id.
    pub fn insert(&mut self, pos: [f32; D], radius: f32, value: u32) -> HshgResult<EntityId> {
        debug_assert!(
            self.state.is_idle(),
            "insert() may not be called from any callback"
        );
        validate_pos(&pos)?;
        validate_radius(radius)?;
        let level = self.target_level(radius, self.growth == HierarchyGrowth::OnInsert)?;
        let idx = self.alloc()?;
        let entity = &mut self.entities[idx as usize];
        entity.pos = pos;
        entity.radius = radius;
        entity.value = value;
        entity.level = level as u8;
        self.link(idx);
        self.live += 1;
        Ok(EntityId(idx))
    }

    /// Memory needed by a hierarchy of finest side `side` grown all the way
    /// down, holding up to `entities_max` entities.
    pub fn memory_usage(side: u32, entities_max: u32) -> usize {
        let mut cells = 0usize;
        let mut levels = 0usize;
        let mut level_side = side.max(1);
        loop {
            cells = cells.saturating_add(
                (level_side as usize).saturating_pow(D as u32) * size_of::<u32>(),
            );
            levels += 1;
            level_side >>= 1;
            if level_side < 2 {
                break;
            }
        }
        size_of::<Self>()
            + levels * size_of::<GridLevel>()
            + cells
            + (entities_max as usize + 1) * size_of::<Entity<D>>()
    }

    #[inline(always)]
    pub(crate) fn is_saturated(&self) -> bool {
        self.levels.last().map_or(true, |level| level.side <= 2)
    }

    fn grow_level(&mut self) -> HshgResult<()> {
        let (side, cell_size) = match self.levels.last() {
            Some(top) => (top.side >> 1, top.cell_size << 1),
            None => return Ok(()),
        };
        let level = GridLevel::new(side, cell_size, D)?;
        log::debug!(
            "allocated grid level {} (side: {}, cell_size: {})",
            self.levels.len(),
            side,
            cell_size
        );
        self.levels.push(level);
        Ok(())
    }

    /// Level whose cells are wider than the entity's diameter.
    #[inline(always)]
    pub(crate) fn level_for(&self, radius: f32) -> usize {
        let diameter = (radius + radius) as u32;
        if diameter < self.cell_size {
            return 0;
        }
        (diameter.ilog2() - self.cell_log + 1) as usize
    }

    /// Resolves the level an entity of `radius` goes to, growing the
    /// hierarchy when `grow` is set. A saturated hierarchy takes any radius on
    /// its coarsest level since that level's neighborhood spans every cell.
    pub(crate) fn target_level(&mut self, radius: f32, grow: bool) -> HshgResult<usize> {
        let required = self.level_for(radius);
        if grow {
            while self.levels.len() <= required && !self.is_saturated() {
                self.grow_level()?;
            }
        }
        if required < self.levels.len() {
            Ok(required)
        } else if self.is_saturated() {
            Ok(self.levels.len() - 1)
        } else {
            Err(HshgError::LevelNotAllocated {
                required,
                allocated: self.levels.len(),
            })
        }
    }

    /// Pushes the entity onto the head of the cell list its position maps to.
    pub(crate) fn link(&mut self, idx: u32) {
        let entity = &self.entities[idx as usize];
        let level_idx = entity.level as usize;
        let level = &mut self.levels[level_idx];
        let cell = level.cell_of(&entity.pos);
        let head = level.cells[cell as usize];
        level.cells[cell as usize] = idx;
        if level.live_count == 0 {
            self.new_cache |= 1 << level_idx;
        }
        level.live_count += 1;
        if head != 0 {
            self.entities[head as usize].prev = idx;
        }
        let entity = &mut self.entities[idx as usize];
        entity.cell = cell;
        entity.next = head;
        entity.prev = 0;
    }

    pub(crate) fn unlink(&mut self, idx: u32) {
        let Entity {
            cell,
            next,
            prev,
            level,
            ..
        } = self.entities[idx as usize];
        let level_idx = level as usize;
        let level = &mut self.levels[level_idx];
        if prev == 0 {
            level.cells[cell as usize] = next;
        } else {
            self.entities[prev as usize].next = next;
        }
        if next != 0 {
            self.entities[next as usize].prev = prev;
        }
        level.live_count -= 1;
        if level.live_count == 0 {
            self.new_cache &= !(1 << level_idx);
        }
    }
}

/// Neighbor offsets whose last non-zero component is +1. Scanning them from
/// every cell reaches each adjacent pair of cells exactly once.
fn forward_offsets<const D: usize>() -> SmallVec<[[i32; D]; 16]> {
    let mut offsets = SmallVec::new();
    let mut offset = [-1i32; D];
    loop {
        if offset.iter().rev().find(|c| **c != 0) == Some(&1) {
            offsets.push(offset);
        }
        let mut axis = 0;
        loop {
            if axis == D {
                return offsets;
            }
            if offset[axis] < 1 {
                offset[axis] += 1;
                break;
            }
            offset[axis] = -1;
            axis += 1;
        }
    }
}
