pub mod budget;
pub mod compare;
pub mod plan;
