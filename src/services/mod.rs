pub mod recommendations;

pub use recommendations::recommend;
pub use recommendations::DEFAULT_LIMIT;
