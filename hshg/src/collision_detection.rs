use crate::hshg::Entity;

// Exact sphere overlap, touching counts
pub fn spheres_overlap<const D: usize>(a: &Entity<D>, b: &Entity<D>) -> bool {
    let mut distance_sq = 0.0;
    for axis in 0..D {
        let d = a.pos[axis] - b.pos[axis];
        distance_sq += d * d;
    }
    let collision_distance = a.radius + b.radius;
    distance_sq <= collision_distance * collision_distance
}

// Check that the bounding box of the entity intersects the [min, max] box
pub fn sphere_box_intersects<const D: usize>(
    entity: &Entity<D>,
    min: &[f32; D],
    max: &[f32; D],
) -> bool {
    (0..D).all(|axis| {
        entity.pos[axis] + entity.radius >= min[axis]
            && entity.pos[axis] - entity.radius <= max[axis]
    })
}

pub fn sphere_contains_point<const D: usize>(entity: &Entity<D>, point: &[f32; D]) -> bool {
    let mut distance_sq = 0.0;
    for axis in 0..D {
        let d = entity.pos[axis] - point[axis];
        distance_sq += d * d;
    }
    distance_sq <= entity.radius * entity.radius
}
