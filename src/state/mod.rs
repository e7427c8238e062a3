pub mod machine;
pub mod persistent;
pub mod single_flight;
#[allow(clippy::module_inception)]
pub mod state;
pub mod store;
