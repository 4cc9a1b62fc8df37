pub mod demand;
pub mod rate;
pub mod result;
pub mod snapshot;
pub mod stock;

pub use demand::{DemandLine, DemandLineRecord};
pub use rate::{ExchangeRate, ExchangeRateTable};
pub use result::{
    AllocationResult, AllocationRun, AllocationStatus, LineAllocation, PoolSummary,
    ProposedStatus, RankedDemandLine,
};
pub use snapshot::AllocationSnapshot;
pub use stock::{StockPosition, StockPositions};
