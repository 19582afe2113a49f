pub mod domain_ctx;
pub mod domain_flow;

pub use domain_ctx::DomainCtx;
pub use domain_flow::{DomainFlow, FlowFault, FlowOutcome};
