use super::*;
use rayon::prelude::*;

/// The entity currently visited by [`Hshg::update`], with the structural
/// operations allowed on it.
pub struct EntityUpdate<'a, const D: usize> {
    hshg: &'a mut Hshg<D>,
    idx: u32,
}

impl<'a, const D: usize> EntityUpdate<'a, D> {
    #[inline(always)]
    pub fn id(&self) -> EntityId {
        EntityId(self.idx)
    }

    #[inline(always)]
    pub fn entity(&self) -> &Entity<D> {
        let entity = &self.hshg.entities[self.idx as usize];
        debug_assert!(entity.is_live(), "entity used after remove()");
        entity
    }

    #[inline(always)]
    pub fn pos(&self) -> [f32; D] {
        self.entity().pos
    }

    #[inline(always)]
    pub fn radius(&self) -> f32 {
        self.entity().radius
    }

    #[inline(always)]
    pub fn value(&self) -> u32 {
        self.entity().value
    }

    #[inline(always)]
    pub fn set_value(&mut self, value: u32) {
        if self.is_removed() {
            return;
        }
        self.hshg.entities[self.idx as usize].value = value;
    }

    // Past remove() the slot is on the free list; release builds ignore the call
    #[inline(always)]
    fn is_removed(&self) -> bool {
        let live = self.hshg.entities[self.idx as usize].is_live();
        debug_assert!(live, "entity used after remove()");
        !live
    }

    /// Moves the entity, relinking it only if it lands in another cell.
    pub fn relocate(&mut self, pos: [f32; D]) -> HshgResult<()> {
        validate_pos(&pos)?;
        if self.is_removed() {
            return Ok(());
        }
        let idx = self.idx;
        let hshg = &mut *self.hshg;
        let entity = &mut hshg.entities[idx as usize];
        entity.pos = pos;
        let cell = hshg.levels[entity.level as usize].cell_of(&pos);
        if cell != entity.cell {
            hshg.unlink(idx);
            hshg.link(idx);
        }
        Ok(())
    }

    /// Changes the radius, moving the entity to another level if needed. The
    /// hierarchy never grows here; a missing level leaves the entity as it was.
    pub fn resize(&mut self, radius: f32) -> HshgResult<()> {
        validate_radius(radius)?;
        if self.is_removed() {
            return Ok(());
        }
        let idx = self.idx;
        let hshg = &mut *self.hshg;
        let level = hshg.target_level(radius, false)?;
        let entity = &mut hshg.entities[idx as usize];
        entity.radius = radius;
        if entity.level as usize != level {
            hshg.unlink(idx);
            hshg.entities[idx as usize].level = level as u8;
            hshg.link(idx);
        }
        Ok(())
    }

    /// Unlinks the entity and frees its slot. The handle must not be used
    /// afterwards.
    pub fn remove(&mut self) {
        let idx = self.idx;
        let hshg = &mut *self.hshg;
        let live = hshg.entities[idx as usize].is_live();
        debug_assert!(live, "remove() called twice on the same entity");
        if !live {
            return;
        }
        hshg.unlink(idx);
        hshg.return_slot(idx);
        hshg.live -= 1;
        hshg.state = TraversalState::Updating { removed: true };
    }

    /// Runs a query from inside the update pass. Not allowed after any
    /// `remove` in the same pass; split such work over two passes.
    pub fn query<F: FnMut(&Entity<D>)>(
        &mut self,
        min: [f32; D],
        max: [f32; D],
        f: F,
    ) -> HshgResult<()> {
        debug_assert!(
            self.hshg.state == TraversalState::Updating { removed: false },
            "remove() and query() can't be mixed in the same update(), consider calling update() twice"
        );
        validate_extent(&min, &max)?;
        let hshg = &mut *self.hshg;
        let state = hshg.state;
        hshg.state = TraversalState::Querying;
        hshg.update_cache();
        hshg.query_cached(&min, &max, f);
        hshg.state = state;
        Ok(())
    }
}

impl<const D: usize> Hshg<D> {
    /// Visits every live entity once, in pool order.
    pub fn update<F: FnMut(&mut EntityUpdate<'_, D>)>(&mut self, mut f: F) {
        debug_assert!(
            self.state.is_idle(),
            "update() may not be called from any callback"
        );
        self.state = TraversalState::Updating { removed: false };
        let used = self.entities.len() as u32;
        for idx in 1..used {
            if !self.entities[idx as usize].is_live() {
                continue;
            }
            let mut entity = EntityUpdate {
                hshg: &mut *self,
                idx,
            };
            f(&mut entity);
        }
        self.state = TraversalState::Idle;
    }

    /// Read-only pass over the `idx`-th of `threads` contiguous, disjoint
    /// slices of the pool. Different partitions may run on different threads.
    pub fn update_partition<F: FnMut(&Entity<D>)>(&self, threads: usize, idx: usize, mut f: F) {
        debug_assert!(
            self.state.is_idle(),
            "update_partition() may not be called from any callback"
        );
        let threads = threads.max(1);
        let used = self.entities.len() - 1;
        let per = (used + threads - 1) / threads;
        let start = 1 + idx.saturating_mul(per).min(used);
        let end = (start + per).min(used + 1);
        for entity in &self.entities[start..end] {
            if entity.is_live() {
                f(entity);
            }
        }
    }

    /// Runs `update_partition` for every partition on the rayon pool.
    pub fn par_update<F: Fn(&Entity<D>) + Sync>(&self, f: F) {
        let threads = rayon::current_num_threads().max(1);
        (0..threads)
            .into_par_iter()
            .for_each(|idx| self.update_partition(threads, idx, &f));
    }
}
