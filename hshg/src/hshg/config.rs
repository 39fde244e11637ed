/// How the grid hierarchy reacts to an entity too large for every allocated level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HierarchyGrowth {
    /// Levels only come from `prealloc` or `Config::max_radius`; inserting an
    /// entity that needs a missing level fails.
    #[default]
    Fixed,
    /// `insert` allocates coarser levels as needed.
    OnInsert,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Cells per axis on the finest level, a power of two.
    pub side: u32,
    /// Edge length of a finest level cell, a power of two.
    pub cell_size: u32,
    pub pool_size: u32,
    /// Preallocate enough levels to hold entities up to this radius.
    pub max_radius: Option<f32>,
    pub growth: HierarchyGrowth,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            side: 128,
            cell_size: 32,
            pool_size: 4000,
            max_radius: None,
            growth: HierarchyGrowth::Fixed,
        }
    }
}
