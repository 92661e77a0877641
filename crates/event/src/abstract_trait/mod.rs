pub mod event;
pub mod feedback;
pub mod notify;
pub mod organizer;
pub mod registration;
