mod email;

pub use self::email::{EmailRequest, TICKET_EMAIL_TOPIC};
