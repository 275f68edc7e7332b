pub mod comparator;
pub mod rule;
