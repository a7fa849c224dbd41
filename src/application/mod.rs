pub mod catalog;
mod dependencies;
pub mod import;
pub mod lending;

pub use dependencies::ServiceDependencies;
