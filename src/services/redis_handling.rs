use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::debug;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::services::cart_store::CartStore;
use crate::types::SESSION_KEY_PREFIX;

async fn connect(db: &redis::Client) -> Result<MultiplexedConnection, ServiceError> {
    Ok(db.get_multiplexed_async_connection().await?)
}

fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}:{token}")
}

/// Carts kept as plain string values in Redis.
pub struct RedisCartStore(pub redis::Client);

#[async_trait]
impl CartStore for RedisCartStore {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut conn = connect(&self.0).await?;

        Ok(redis::cmd("GET").arg(key).query_async(&mut conn).await?)
    }

    async fn write(&self, key: &str, cart_json: &str) -> Result<(), ServiceError> {
        let mut conn = connect(&self.0).await?;

        redis::cmd("SET").arg(key).arg(cart_json).query_async::<_, ()>(&mut conn).await?;
        debug!("Stored cart '{key}' ({} bytes)", cart_json.len());

        Ok(())
    }
}

pub async fn create_session(db: &redis::Client, login: &str, ttl_secs: u64) -> Result<String, ServiceError> {
    let token = Uuid::new_v4().simple().to_string();
    let mut conn = connect(db).await?;

    redis::cmd("SET")
        .arg(session_key(&token))
        .arg(login)
        .arg("EX")
        .arg(ttl_secs)
        .query_async::<_, ()>(&mut conn)
        .await?;

    Ok(token)
}

pub async fn session_login(db: &redis::Client, token: &str) -> Result<Option<String>, ServiceError> {
    let mut conn = connect(db).await?;

    Ok(redis::cmd("GET").arg(session_key(token)).query_async(&mut conn).await?)
}

pub async fn drop_session(db: &redis::Client, token: &str) -> Result<(), ServiceError> {
    let mut conn = connect(db).await?;

    redis::cmd("DEL").arg(session_key(token)).query_async::<_, ()>(&mut conn).await?;

    Ok(())
}

pub async fn ping(db: &redis::Client) -> bool {
    match connect(db).await {
        Ok(mut conn) => redis::cmd("PING").query_async::<_, String>(&mut conn).await.is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_keys_are_namespaced() {
        assert_eq!(session_key("abc"), "session:abc");
    }
}
