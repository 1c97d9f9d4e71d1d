//! Work packs module - templated scopes of work with planned items and recorded expenses.

mod work_packs_model;
mod work_packs_service;
mod work_packs_traits;

pub use work_packs_model::{
    NewWorkPack, NewWorkPackExpense, NewWorkPackItem, WorkPack, WorkPackExpense, WorkPackItem,
};
pub use work_packs_service::WorkPackService;
pub use work_packs_traits::{WorkPackRepositoryTrait, WorkPackServiceTrait};
