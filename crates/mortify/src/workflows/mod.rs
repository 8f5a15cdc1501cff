pub mod catalog;
pub mod viability;
