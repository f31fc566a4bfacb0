use std::time::Duration;

use eyre::{Result, WrapErr};
use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use tsuki_cache::{HashRunner, RedisHash};
use tsuki_client::{Client, NetRunner};
use tsuki_psql::{Database, PoolConfig, PoolRunner};
use tsuki_util::spawn;

use super::BotConfig;

const META_BUCKET: &str = "tsuki:meta";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Context {
    pub cache: RedisHash,
    pub psql: Database,
    pub client: Client,
}

impl Context {
    pub async fn init() -> Result<Self> {
        let config = BotConfig::get();

        let cache = RedisHash::new(&config.redis_host, config.redis_port, config.redis_db_idx)
            .await
            .wrap_err("Failed to create redis pool")?;

        let psql = Database::create_pool(&PoolConfig::new(config.database_url.clone()), false)
            .await
            .wrap_err("Failed to create database pool")?;

        if config.github_token.is_none() {
            warn!("No github token provided, requests will be heavily ratelimited");
        }

        let client = Client::new(config.github_token.as_deref());

        Ok(Self {
            cache,
            psql,
            client,
        })
    }

    /// Make sure the database, redis and the http session are available and
    /// record the start time.
    pub async fn startup(&self) -> Result<()> {
        let probes: [BoxFuture<'_, Result<()>>; 3] = [
            self.probe_psql().boxed(),
            self.probe_cache().boxed(),
            self.probe_client().boxed(),
        ];

        let results = spawn(probes, Some(PROBE_TIMEOUT))
            .await
            .map_err(|_| eyre!("Startup checks timed out after {PROBE_TIMEOUT:?}"))?;

        for res in results {
            res?;
        }

        info!("Startup checks passed");

        Ok(())
    }

    async fn probe_psql(&self) -> Result<()> {
        let probe: Option<i32> = self
            .psql
            .fetchval("SELECT 1", &[], None, None)
            .await
            .wrap_err("Database is unreachable")?;

        debug!(?probe, "Database is reachable");

        Ok(())
    }

    async fn probe_cache(&self) -> Result<()> {
        let bucket = META_BUCKET.to_owned();
        let now = OffsetDateTime::now_utc().unix_timestamp().to_string();

        let first_start = self
            .cache
            .setx(&bucket, &"first_start".to_owned(), &now)
            .await
            .wrap_err("Redis is unreachable")?;

        if first_start {
            info!("Starting for the first time");
        }

        self.cache
            .set(&bucket, &"last_start".to_owned(), &now)
            .await
            .wrap_err("Failed to store start time")?;

        Ok(())
    }

    async fn probe_client(&self) -> Result<()> {
        self.client
            .acquire()
            .await
            .wrap_err("Failed to open http session")?;

        Ok(())
    }

    pub async fn shutdown(&self) {
        self.client.close().await;
        self.psql.close().await;

        info!("Closed all connections");
    }
}
