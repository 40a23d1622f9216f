use crate::domain_port::*;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};

const EXPIRE_IF_EQ: &str = include_str!("expire_if_eq.lua");

pub struct RedisKvBackend {
    conn: ConnectionManager,
    expire_if_eq: Script,
}

impl RedisKvBackend {
    pub fn new(conn: ConnectionManager) -> Self {
        RedisKvBackend {
            conn,
            expire_if_eq: Script::new(EXPIRE_IF_EQ),
        }
    }

    /// Open a client for `dsn` and wrap a connection manager around it.
    pub async fn connect(dsn: &str) -> Result<Self, KvError> {
        let client = redis::Client::open(dsn).map_err(store_error)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(store_error)?;
        Ok(Self::new(conn))
    }

    pub async fn ping(&self) -> Result<String, KvError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(store_error)
    }
}

fn store_error(e: RedisError) -> KvError {
    KvError::Store(e.to_string())
}

fn seconds(ttl_secs: u64) -> Result<i64, KvError> {
    i64::try_from(ttl_secs)
        .map_err(|_| KvError::Store(format!("invalid expire time: {}", ttl_secs)))
}

#[async_trait::async_trait]
impl KvBackend for RedisKvBackend {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn.clone();
        let val: Option<String> = conn.get(key).await.map_err(store_error)?;
        Ok(val)
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, KvError> {
        let mut conn = self.conn.clone();
        let applied: bool = conn
            .expire(key, seconds(ttl_secs)?)
            .await
            .map_err(store_error)?;
        Ok(applied)
    }

    async fn del(&self, key: &str) -> Result<bool, KvError> {
        let mut conn = self.conn.clone();
        let removed: usize = conn.del(key).await.map_err(store_error)?;
        Ok(removed > 0)
    }

    async fn expire_if_eq(
        &self,
        key: &str,
        expected: &str,
        ttl_secs: u64,
    ) -> Result<bool, KvError> {
        let mut conn = self.conn.clone();
        let status: i64 = self
            .expire_if_eq
            .key(key)
            .arg(expected)
            .arg(seconds(ttl_secs)?)
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(status == 1)
    }
}
