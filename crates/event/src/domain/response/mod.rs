pub mod analytics;
pub mod api;
pub mod attendance;
pub mod event;
pub mod feedback;
pub mod organizer;
pub mod pagination;
pub mod registration;
