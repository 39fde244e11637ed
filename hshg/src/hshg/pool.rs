use super::*;

impl<const D: usize> Hshg<D> {
    /// Resizes entity storage to hold `capacity` entities.
    pub fn set_capacity(&mut self, capacity: u32) -> HshgResult<()> {
        debug_assert!(
            self.state.is_idle(),
            "set_capacity() may not be called from any callback"
        );
        let used = self.used();
        if capacity < used {
            return Err(HshgError::CapacityBelowUsed {
                requested: capacity,
                used,
            });
        }
        if capacity == u32::MAX {
            return Err(HshgError::CapacityExhausted);
        }
        let slots = capacity as usize + 1;
        if slots > self.entities.capacity() {
            let additional = slots - self.entities.len();
            self.entities
                .try_reserve_exact(additional)
                .map_err(|_| HshgError::OutOfMemory { requested: slots })?;
        } else {
            self.entities.shrink_to(slots);
        }
        self.capacity = capacity;
        Ok(())
    }

    #[inline(always)]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of live entities.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.live as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots handed out so far, live or free.
    #[inline(always)]
    pub(crate) fn used(&self) -> u32 {
        (self.entities.len() - 1) as u32
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<D>> {
        if id.0 == 0 {
            return None;
        }
        self.entities
            .get(id.0 as usize)
            .filter(|entity| entity.is_live())
    }

    pub(crate) fn alloc(&mut self) -> HshgResult<u32> {
        if self.free_entity != 0 {
            let idx = self.free_entity;
            self.free_entity = self.entities[idx as usize].next;
            return Ok(idx);
        }
        if self.used() == self.capacity {
            let doubled = self.capacity.saturating_mul(2).max(1).min(u32::MAX - 1);
            if doubled == self.capacity {
                return Err(HshgError::CapacityExhausted);
            }
            log::debug!(
                "growing entity pool from {} to {} slots",
                self.capacity,
                doubled
            );
            self.set_capacity(doubled)?;
        }
        self.entities.push(Entity::sentinel());
        Ok(self.used())
    }

    pub(crate) fn return_slot(&mut self, idx: u32) {
        let entity = &mut self.entities[idx as usize];
        entity.cell = INVALID_CELL;
        entity.next = self.free_entity;
        entity.prev = 0;
        self.free_entity = idx;
    }
}
