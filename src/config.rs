use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub admin_password: String,
    pub host: IpAddr,
    pub port: u16,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://timetrack.db".to_string());

        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(pw) if !pw.is_empty() => pw,
            _ => {
                tracing::warn!("ADMIN_PASSWORD not set, using the built-in fallback password");
                DEFAULT_ADMIN_PASSWORD.to_string()
            }
        };

        let host = std::env::var("HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse()?;
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(12);

        Ok(Self {
            database_url,
            admin_password,
            host,
            port,
            session_ttl_hours,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    /// Configuration for tests: in-memory database and a fixed admin password.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            admin_password: "secret".to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            session_ttl_hours: 1,
        }
    }
}
