mod command;
mod query;

pub use self::command::{DynEventCommandRepository, EventCommandRepositoryTrait};
pub use self::query::{DynEventQueryRepository, EventQueryRepositoryTrait};
