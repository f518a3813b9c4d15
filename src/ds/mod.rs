pub mod frequency_buckets;
pub mod ghost_list;
pub mod order_list;
pub mod slot_arena;

pub use frequency_buckets::FrequencyBuckets;
pub use ghost_list::GhostList;
pub use order_list::OrderList;
pub use slot_arena::{SlotArena, SlotId};
