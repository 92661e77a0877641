mod database;
mod jwt;
mod kafka;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::jwt::JwtConfig;
pub use self::kafka::Kafka;
