pub mod auth;
pub mod dispatch;
pub mod schema;
pub mod shared;
pub mod stats;
pub mod sync;
pub mod task;
pub mod trash;
