//! Rate table aggregate
//!
//! Time-bounded pricing rules per route, and the service types whose
//! multipliers scale the base rate.

pub mod model;
pub mod repository;

pub use model::{
    find_overlap, select_applicable, EffectiveWindow, NewRateRule, NewServiceType, RateRule, Route,
    ServiceType,
};
pub use repository::{RateRuleRepository, ServiceTypeRepository};
