pub mod bbox;
pub mod grid;
pub mod labels;
pub mod rect;
pub mod remap;
