// marksync state managers
// Managers own persistent state: the bookmark tree, the key-value store and the click statistics.

pub mod bookmark_store;
pub mod click_stats;
pub mod kv_store;
