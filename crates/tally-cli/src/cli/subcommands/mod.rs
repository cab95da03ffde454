mod auth;
mod task;
mod trash;

pub use auth::{AuthCommands, LoginArgs};
pub use task::{AddArgs, TaskCommands, TaskFieldArgs};
pub use trash::TrashCommands;
