mod command;
mod query;

pub use self::command::{DynRegistrationCommandRepository, RegistrationCommandRepositoryTrait};
pub use self::query::{DynRegistrationQueryRepository, RegistrationQueryRepositoryTrait};
