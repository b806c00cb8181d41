pub mod file;
pub mod task;
pub mod traits;

// Re-export
pub use file::JsonFileStorage;
pub use task::TaskRepository;
pub use traits::TaskStorage;
