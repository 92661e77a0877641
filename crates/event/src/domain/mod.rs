pub mod identity;
pub mod patch;
pub mod requests;
pub mod ticket;
pub mod response;
