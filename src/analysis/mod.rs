pub mod draft;
pub mod hero_stats;
pub mod meta;
