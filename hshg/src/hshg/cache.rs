use super::*;

impl<const D: usize> Hshg<D> {
    /// Rebuilds the list of non-empty levels if any level filled up or
    /// emptied since the last rebuild. `collide` and `query` do this on their
    /// own; call it before sharing the grid with `query_shared`.
    pub fn refresh_cache(&mut self) {
        debug_assert!(
            !matches!(self.state, TraversalState::Colliding),
            "refresh_cache() may not be called while colliding"
        );
        self.update_cache();
    }

    #[inline(always)]
    pub(crate) fn cache_is_fresh(&self) -> bool {
        self.old_cache == self.new_cache
    }

    pub(crate) fn update_cache(&mut self) {
        if self.cache_is_fresh() {
            return;
        }
        self.old_cache = self.new_cache;
        self.cache.clear();
        let mut shift = 0u8;
        for (idx, level) in self.levels.iter_mut().enumerate() {
            if level.live_count == 0 {
                shift += 1;
                continue;
            }
            level.cache_idx = self.cache.len() as u8;
            self.cache.push(CachedLevel {
                level: idx as u8,
                shift,
            });
            shift = 1;
        }
        log::trace!(
            "rebuilt level cache: {} of {} levels in use",
            self.cache.len(),
            self.levels.len()
        );
    }
}
