pub mod load_flow;

pub use load_flow::{LoadFlow, LoadReport};
