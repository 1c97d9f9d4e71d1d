//! Cost codes module - domain models, services, and traits.

mod cost_codes_model;
mod cost_codes_service;
mod cost_codes_traits;

pub use cost_codes_model::{CostCode, NewCostCode};
pub use cost_codes_service::CostCodeService;
pub use cost_codes_traits::{CostCodeRepositoryTrait, CostCodeServiceTrait};
