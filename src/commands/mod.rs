pub mod batch;
pub mod extract;
pub mod styles;
