mod command;
mod query;

pub use self::command::{EventCommandService, EventCommandServiceDeps};
pub use self::query::{EventQueryService, browse_filter};
