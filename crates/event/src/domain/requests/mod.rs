pub mod attendance;
pub mod event;
pub mod feedback;
pub mod organizer;
pub mod payment;
pub mod registration;

pub(crate) fn default_page() -> i32 {
    1
}

pub(crate) fn default_page_size() -> i32 {
    10
}
