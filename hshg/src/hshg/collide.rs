use super::*;

impl<const D: usize> Hshg<D> {
    /// Calls `f` once for every unordered pair of entities that may overlap.
    /// Pairs are candidates; use [`collision_detection::spheres_overlap`] or
    /// an equivalent check inside `f`.
    ///
    /// Each entity pairs with the rest of its own cell list, with the forward
    /// half of the adjacent cells on its level, and with the full clamped
    /// neighborhood on every coarser non-empty level.
    pub fn collide<F: FnMut(&Entity<D>, &Entity<D>)>(&mut self, mut f: F) {
        debug_assert!(
            self.state.is_idle(),
            "collide() may not be called from any callback"
        );
        self.state = TraversalState::Colliding;
        self.update_cache();
        let entities = &self.entities;
        let levels = &self.levels;
        let cache = &self.cache;
        for entity in entities.iter().skip(1) {
            if !entity.is_live() {
                continue;
            }
            walk_list(entities, entity.next, |other| f(entity, other));

            let level = &levels[entity.level as usize];
            let mut coords: [u32; D] = level.coords(entity.cell);
            for offset in self.forward.iter() {
                if let Some(neighbor) = offset_cell(level, &coords, offset) {
                    let head = level.cells[neighbor as usize];
                    walk_list(entities, head, |other| f(entity, other));
                }
            }

            for cached in &cache[level.cache_idx as usize + 1..] {
                let coarse = &levels[cached.level as usize];
                for c in coords.iter_mut() {
                    *c >>= cached.shift;
                }
                let (lo, hi) = coarse.window(&coords);
                coarse.for_each_head(&lo, &hi, |head| {
                    walk_list(entities, head, |other| f(entity, other))
                });
            }
        }
        self.state = TraversalState::Idle;
    }
}

#[inline(always)]
fn walk_list<const D: usize, F: FnMut(&Entity<D>)>(entities: &[Entity<D>], head: u32, mut f: F) {
    let mut idx = head;
    while idx != 0 {
        let entity = &entities[idx as usize];
        f(entity);
        idx = entity.next;
    }
}

#[inline(always)]
fn offset_cell<const D: usize>(
    level: &GridLevel,
    coords: &[u32; D],
    offset: &[i32; D],
) -> Option<u32> {
    let mut neighbor = [0u32; D];
    for axis in 0..D {
        let c = coords[axis] as i64 + offset[axis] as i64;
        if c < 0 || c > level.mask as i64 {
            return None;
        }
        neighbor[axis] = c as u32;
    }
    Some(level.flatten(&neighbor))
}
