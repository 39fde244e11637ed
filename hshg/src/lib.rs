pub mod collision_detection;
pub mod error;
pub mod hshg;

pub use error::{HshgError, HshgResult};
pub use hshg::{
    Config, Entity, EntityId, EntityUpdate, HierarchyGrowth, Hshg, Hshg1, Hshg2, Hshg3,
};
