use std::env;

use eyre::Result;
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<BotConfig> = OnceCell::new();

#[derive(Debug)]
pub struct BotConfig {
    pub database_url: Box<str>,
    pub redis_host: Box<str>,
    pub redis_port: u16,
    pub redis_db_idx: u8,
    pub github_token: Option<Box<str>>,
}

impl BotConfig {
    pub fn get() -> &'static Self {
        CONFIG
            .get()
            .expect("`BotConfig::init` must be called first")
    }

    pub fn init() -> Result<()> {
        let config = BotConfig {
            database_url: env_var("DATABASE_URL")?,
            redis_host: env_var("REDIS_HOST")?,
            redis_port: env_var("REDIS_PORT")?,
            redis_db_idx: env_var("REDIS_DB_IDX")?,
            github_token: optional_env_var("GITHUB_TOKEN")?,
        };

        if CONFIG.set(config).is_err() {
            warn!("CONFIG was already set");
        }

        Ok(())
    }
}

trait EnvKind: Sized {
    const EXPECTED: &'static str;

    fn from_str(s: String) -> Result<Self, String>;
}

macro_rules! env_kind {
    ($($ty:ty: |$arg:ident| $impl:block,)*) => {
        $(
            impl EnvKind for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_str($arg: String) -> Result<Self, String> {
                    $impl
                }
            }
        )*
    };
}

env_kind! {
    Box<str>: |s| { Ok(s.into_boxed_str()) },
    u8: |s| { s.parse().map_err(|_| s) },
    u16: |s| { s.parse().map_err(|_| s) },
}

fn env_var<T: EnvKind>(name: &str) -> Result<T> {
    let value = env::var(name).map_err(|_| eyre!("missing env variable `{name}`"))?;

    parse_env(name, value)
}

fn optional_env_var<T: EnvKind>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => parse_env(name, value).map(Some),
        _ => Ok(None),
    }
}

fn parse_env<T: EnvKind>(name: &str, value: String) -> Result<T> {
    T::from_str(value).map_err(|value| {
        eyre!(
            "failed to parse env variable `{name}={value}`; expected {expected}",
            expected = T::EXPECTED
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_kinds() {
        let port: u16 = parse_env("REDIS_PORT", "6379".to_owned()).unwrap();
        assert_eq!(port, 6379);

        let host: Box<str> = parse_env("REDIS_HOST", "localhost".to_owned()).unwrap();
        assert_eq!(host.as_ref(), "localhost");
    }

    #[test]
    fn parse_env_failure_names_variable() {
        let err = parse_env::<u8>("REDIS_DB_IDX", "256".to_owned()).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("REDIS_DB_IDX=256"), "{msg}");
        assert!(msg.contains("expected u8"), "{msg}");
    }
}
