use chrono::NaiveTime;
use rosterly_core::coverage::CoverageWindow;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Daily window spanned by coverage-generated shifts.
    pub coverage_window: CoverageWindow,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `COVERAGE_DAY_START`   | `08:00`                    |
    /// | `COVERAGE_DAY_END`     | `17:00`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = CoverageWindow::default();
        let coverage_window = CoverageWindow {
            start_time: time_from_env("COVERAGE_DAY_START", defaults.start_time),
            end_time: time_from_env("COVERAGE_DAY_END", defaults.end_time),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            coverage_window,
        }
    }
}

/// Parse an `HH:MM` time-of-day from the environment, falling back to
/// `default` when unset. Misconfiguration fails fast at startup.
fn time_from_env(var: &str, default: NaiveTime) -> NaiveTime {
    match std::env::var(var) {
        Ok(raw) => NaiveTime::parse_from_str(&raw, "%H:%M")
            .unwrap_or_else(|e| panic!("{var} must be HH:MM, got '{raw}': {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_window_defaults_to_eight_to_five() {
        let window = CoverageWindow::default();
        assert_eq!(window.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(window.end_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }
}
