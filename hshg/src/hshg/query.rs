use super::*;

impl<const D: usize> Hshg<D> {
    /// Calls `f` for every entity whose bounding box touches the box
    /// `[min, max]`. Coordinates outside the grid extent are folded, so any
    /// finite box is accepted.
    pub fn query<F: FnMut(&Entity<D>)>(
        &mut self,
        min: [f32; D],
        max: [f32; D],
        f: F,
    ) -> HshgResult<()> {
        debug_assert!(
            self.state.is_idle(),
            "query() may not be called from any callback"
        );
        validate_extent(&min, &max)?;
        self.state = TraversalState::Querying;
        self.update_cache();
        self.query_cached(&min, &max, f);
        self.state = TraversalState::Idle;
        Ok(())
    }

    /// `query` through a shared reference, for several threads reading a
    /// quiescent grid. Needs `refresh_cache` after the last insert or removal.
    pub fn query_shared<F: FnMut(&Entity<D>)>(
        &self,
        min: [f32; D],
        max: [f32; D],
        f: F,
    ) -> HshgResult<()> {
        debug_assert!(
            self.cache_is_fresh(),
            "query_shared() needs refresh_cache() after levels fill up or empty"
        );
        validate_extent(&min, &max)?;
        self.query_cached(&min, &max, f);
        Ok(())
    }

    pub(crate) fn query_cached<F: FnMut(&Entity<D>)>(
        &self,
        min: &[f32; D],
        max: &[f32; D],
        mut f: F,
    ) {
        let finest = &self.levels[0];
        let mut start = [0u32; D];
        let mut end = [0u32; D];
        for axis in 0..D {
            let range = map_range(
                finest,
                self.grid_size,
                self.inverse_grid_size,
                min[axis],
                max[axis],
            );
            start[axis] = range.start;
            end[axis] = range.end;
        }
        let entities = &self.entities;
        for cached in self.cache.iter() {
            let level = &self.levels[cached.level as usize];
            let mut lo = [0u32; D];
            let mut hi = [0u32; D];
            for axis in 0..D {
                start[axis] >>= cached.shift;
                end[axis] >>= cached.shift;
                // Centers up to one cell outside the box can still reach into it
                lo[axis] = start[axis].saturating_sub(1);
                hi[axis] = if end[axis] != level.mask {
                    end[axis] + 1
                } else {
                    end[axis]
                };
            }
            level.for_each_head(&lo, &hi, |head| {
                let mut j = head;
                while j != 0 {
                    let entity = &entities[j as usize];
                    if collision_detection::sphere_box_intersects(entity, min, max) {
                        f(entity);
                    }
                    j = entity.next;
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_rejects_inverted_box() {
        let mut hshg = Hshg2::new(8, 4).unwrap();
        assert_eq!(
            hshg.query([1.0, 5.0], [2.0, 4.0], |_| {}),
            Err(HshgError::InvalidExtent {
                axis: 1,
                min: 5.0,
                max: 4.0
            })
        );
        assert!(matches!(
            hshg.query([f32::NEG_INFINITY, 0.0], [0.0, 0.0], |_| {}),
            Err(HshgError::InvalidExtent { axis: 0, .. })
        ));
    }

    #[test]
    fn query_touching_bounds_counts() {
        let mut hshg = Hshg2::new(8, 4).unwrap();
        hshg.prealloc(2.0).unwrap();
        hshg.insert([10.0, 10.0], 2.0, 0).unwrap();
        let mut hits = 0;
        hshg.query([12.0, 8.0], [20.0, 9.0], |_| hits += 1).unwrap();
        assert_eq!(hits, 1);
        let mut hits = 0;
        hshg.query([12.01, 8.0], [20.0, 9.0], |_| hits += 1).unwrap();
        assert_eq!(hits, 0);
    }

    #[test]
    fn query_shared_matches_query() {
        let mut hshg = Hshg2::new(8, 4).unwrap();
        hshg.prealloc(40.0).unwrap();
        hshg.insert([-30.0, 12.0], 1.0, 0).unwrap();
        hshg.insert([-35.0, 14.0], 5.0, 1).unwrap();
        hshg.insert([-70.0, 12.0], 30.0, 2).unwrap();
        hshg.refresh_cache();
        let mut shared = Vec::new();
        hshg.query_shared([-40.0, 10.0], [-31.5, 13.0], |entity| {
            shared.push(entity.value())
        })
        .unwrap();
        let mut exclusive = Vec::new();
        hshg.query([-40.0, 10.0], [-31.5, 13.0], |entity| {
            exclusive.push(entity.value())
        })
        .unwrap();
        shared.sort_unstable();
        exclusive.sort_unstable();
        assert_eq!(shared, vec![1, 2]);
        assert_eq!(shared, exclusive);
    }
}
