pub mod cache_name;
pub mod precache;
pub mod quote;
