pub mod plan;
pub mod slice;
