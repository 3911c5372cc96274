use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use snafu::ResultExt;
use tracing::instrument;

use super::*;

/// Ranked sets backed by Redis sorted sets.
///
/// The connection manager is cheap to clone and multiplexes every command over one connection,
/// reconnecting in the background when it drops. Commands are never resent.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context(ConnectSnafu { url })?;
        let connection = client
            .get_connection_manager()
            .await
            .context(ConnectSnafu { url })?;

        tracing::info!("connected to redis at `{}`", url);
        Ok(Self { connection })
    }

    fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl RankedStore for RedisStore {
    #[instrument(skip(self))]
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        self.connection()
            .zincr(key, member, delta)
            .await
            .context(CommandSnafu { command: "ZINCRBY", key })
    }

    #[instrument(skip(self))]
    async fn set_score(&self, key: &str, member: &str, score: f64) -> Result<()> {
        let _added: i64 = self
            .connection()
            .zadd(key, member, score)
            .await
            .context(CommandSnafu { command: "ZADD", key })?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        self.connection()
            .zscore(key, member)
            .await
            .context(CommandSnafu { command: "ZSCORE", key })
    }

    #[instrument(skip(self))]
    async fn range_descending(
        &self, key: &str, start: isize, stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        self.connection()
            .zrevrange_withscores(key, start, stop)
            .await
            .context(CommandSnafu { command: "ZREVRANGE", key })
    }

    async fn health_check(&self) -> bool {
        let reply: redis::RedisResult<String> =
            redis::cmd("PING").query_async(&mut self.connection()).await;

        match reply {
            Ok(pong) => pong == "PONG",
            Err(error) => {
                tracing::warn!(%error, "redis did not answer the health check");
                false
            }
        }
    }
}
