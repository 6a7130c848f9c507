#![forbid(unsafe_code)]

pub mod identity;
pub mod model;
pub mod quarter;

pub use model::{
    Artifact, Assessment, Control, Finding, Observation, QuarterRecord, Quarters, Remediation,
    Requirement, ScopeType, TestingStatus, User, UserId, clamp_score,
};
pub use quarter::Quarter;
