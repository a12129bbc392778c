use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DECKS: &str = "nouns,verbs,expressions";
const DEFAULT_ARCHIVE_SCHEDULE: &str = "0 0 3 * * *";
const DEFAULT_LOG_RETENTION_DAYS: usize = 14;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub decks: Vec<String>,
    /// Names from `DECKS` that were dropped as invalid, logged at startup.
    pub ignored_decks: Vec<String>,
    pub archive_worker_enabled: bool,
    pub archive_sweep_schedule: String,
    /// Directory for daily log files; `None` logs to stdout only.
    pub log_dir: Option<PathBuf>,
    pub log_retention_days: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let (decks, ignored_decks) = parse_decks(
            std::env::var("DECKS")
                .ok()
                .as_deref()
                .unwrap_or(DEFAULT_DECKS),
        );

        let archive_worker_enabled = std::env::var("ENABLE_ARCHIVE_WORKER")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let archive_sweep_schedule = std::env::var("ARCHIVE_SWEEP_SCHEDULE")
            .unwrap_or_else(|_| DEFAULT_ARCHIVE_SCHEDULE.to_string());

        let log_to_file = std::env::var("LOG_TO_FILE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = log_to_file.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("logs"))
        });

        let log_retention_days = std::env::var("LOG_RETENTION_DAYS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_LOG_RETENTION_DAYS);

        Self {
            host,
            port,
            log_level,
            data_dir,
            decks,
            ignored_decks,
            archive_worker_enabled,
            archive_sweep_schedule,
            log_dir,
            log_retention_days,
        }
    }

    /// Configuration for a given data directory, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            log_level: "info".to_string(),
            data_dir: data_dir.into(),
            decks: parse_decks(DEFAULT_DECKS).0,
            ignored_decks: Vec::new(),
            archive_worker_enabled: false,
            archive_sweep_schedule: DEFAULT_ARCHIVE_SCHEDULE.to_string(),
            log_dir: None,
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Deck names become directory names, so only `[a-z0-9_-]` is kept.
/// Returns the accepted names and the rejected ones.
fn parse_decks(raw: &str) -> (Vec<String>, Vec<String>) {
    let mut decks = Vec::new();
    let mut ignored = Vec::new();
    for name in raw.split(',').map(|s| s.trim().to_lowercase()) {
        if name.is_empty() {
            continue;
        }
        let valid = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            ignored.push(name);
        } else if !decks.contains(&name) {
            decks.push(name);
        }
    }
    (decks, ignored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decks_filters_invalid_names() {
        let (decks, ignored) = parse_decks("nouns, Verbs ,../etc,,nouns,phrasal_verbs,a b");
        assert_eq!(decks, vec!["nouns", "verbs", "phrasal_verbs"]);
        assert_eq!(ignored, vec!["../etc", "a b"]);
    }

    #[test]
    fn test_with_data_dir_defaults() {
        let config = Config::with_data_dir("/tmp/decks");
        assert_eq!(config.decks, vec!["nouns", "verbs", "expressions"]);
        assert!(!config.archive_worker_enabled);
        assert!(config.log_dir.is_none());
        assert!(config.ignored_decks.is_empty());
        assert_eq!(config.bind_addr().port(), 3000);
    }
}
