pub mod allocation_service;
pub mod allocator;
pub mod annotator;
pub mod currency;
pub mod engine;
pub mod ranker;

pub use allocation_service::AllocationService;
pub use allocator::{PoolAllocation, WaterfallAllocator};
pub use annotator::ValueAnnotator;
pub use currency::{Conversion, CurrencyConverter};
pub use engine::AllocationEngine;
pub use ranker::PriorityRanker;
