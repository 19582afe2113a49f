pub mod lighthouse_report;
pub mod ranked_domain;
pub mod vitals;

pub use lighthouse_report::{AuditEntry, LighthouseReport};
pub use ranked_domain::{OutputRecord, RankedDomain, ResolvedLink};
pub use vitals::{AuditId, VitalsResult};
