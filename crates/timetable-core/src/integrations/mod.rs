pub mod task_api;
pub mod traits;

pub use task_api::HttpTaskApi;
pub use traits::{TaskApi, TimerObserver};
