//! Process configuration, read once from the environment at startup.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::anyhow;
use tracing::info;

/// Fixed listen address.
pub const LISTEN_ADDR: &str = "0.0.0.0:80";

/// Where the inventory list is reachable once the server is up.
pub const LIST_URL: &str = "http://localhost/carros";

/// Which record/user store backs the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => Err(anyhow!("unknown store `{other}` (expected `sqlite` or `memory`)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory served for paths no route matches.
    pub public_dir: PathBuf,
    pub store: StoreKind,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            database_path: try_load("GARAGE_DATABASE", "banco.sqlite")?,
            public_dir: try_load("GARAGE_PUBLIC_DIR", "public")?,
            store: try_load("GARAGE_STORE", "sqlite")?,
        })
    }
}

fn try_load<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("invalid {key} value `{raw}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kind_is_case_insensitive() {
        assert_eq!("SQLite".parse::<StoreKind>().unwrap(), StoreKind::Sqlite);
        assert_eq!(" memory ".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("postgres".parse::<StoreKind>().is_err());
    }

    #[test]
    fn missing_variable_uses_default() {
        let path: PathBuf = try_load("GARAGE_TEST_SURELY_UNSET_VARIABLE", "banco.sqlite").unwrap();
        assert_eq!(path, PathBuf::from("banco.sqlite"));
    }
}
