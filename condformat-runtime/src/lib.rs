#[macro_use]
extern crate lazy_static;

pub mod color;
pub mod formatter;
