mod email;
mod kafka;

pub use self::email::EmailService;
pub use self::kafka::KafkaEmailService;
