pub mod event;
pub mod feedback;
pub mod memory;
pub mod organizer;
pub mod registration;
