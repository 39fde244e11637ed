use super::*;

impl<const D: usize> Hshg<D> {
    /// Repacks the pool in cell order so every cell list is contiguous, and
    /// drops the free list. All entity ids change; run `update` afterwards to
    /// pick up the new ids by `value`.
    pub fn optimize(&mut self) -> HshgResult<()> {
        debug_assert!(
            self.state.is_idle(),
            "optimize() may not be called from any callback"
        );
        let slots = self.capacity as usize + 1;
        let mut entities = Vec::new();
        entities
            .try_reserve_exact(slots)
            .map_err(|_| HshgError::OutOfMemory { requested: slots })?;
        entities.push(Entity::sentinel());
        for level in self.levels.iter_mut() {
            for head in level.cells.iter_mut() {
                let mut old = *head;
                if old == 0 {
                    continue;
                }
                *head = entities.len() as u32;
                while old != 0 {
                    let mut entity = self.entities[old as usize];
                    let idx = entities.len() as u32;
                    old = entity.next;
                    if entity.prev != 0 {
                        entity.prev = idx - 1;
                    }
                    if entity.next != 0 {
                        entity.next = idx + 1;
                    }
                    entities.push(entity);
                }
            }
        }
        log::debug!(
            "optimized entity pool: {} live, {} free slots dropped",
            entities.len() - 1,
            self.entities.len() - entities.len()
        );
        self.entities = entities;
        self.free_entity = 0;
        Ok(())
    }
}
