use std::sync::Mutex;
use std::time::Duration;

use actix::{Actor, Addr, SyncArbiter, SyncContext};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::services::cart_store::CartStore;
use crate::services::orders::OrderBook;
use crate::services::redis_handling::RedisCartStore;
use crate::settings::Settings;

pub struct PgActor(pub Pool<ConnectionManager<PgConnection>>);

pub struct AppState {
    pub pg_db: Addr<PgActor>,
    pub redis_db: redis::Client,
    pub cart_store: Box<dyn CartStore>,
    /// Held across a cart's read-modify-write so concurrent edits do not drop lines.
    pub cart_lock: tokio::sync::Mutex<()>,
    pub settings: Settings,
    pub order_book: Mutex<OrderBook>,
}

impl Actor for PgActor {
    type Context = SyncContext<Self>;
}

/// The pool is built without waiting for a first connection, so the service
/// comes up (and serves fallback data) while Postgres is down.
pub fn get_db_pool(db_url: &str, size: u32, timeout: Duration) -> Pool<ConnectionManager<PgConnection>> {
    let manager: ConnectionManager<PgConnection> = ConnectionManager::<PgConnection>::new(db_url);

    Pool::builder()
        .max_size(size)
        .connection_timeout(timeout)
        .build_unchecked(manager)
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, redis::RedisError> {
        let redis_db = redis::Client::open(settings.redis_database_uri.as_str())?;
        let cart_store = Box::new(RedisCartStore(redis_db.clone()));

        Ok(Self::with_cart_store(settings, redis_db, cart_store))
    }

    /// Must be called from inside a running actix system.
    pub fn with_cart_store(settings: Settings, redis_db: redis::Client, cart_store: Box<dyn CartStore>) -> Self {
        let pool = get_db_pool(
            &settings.pg_database_url,
            settings.pg_pool_size,
            Duration::from_millis(settings.pg_connect_timeout_ms),
        );
        let pg_db = SyncArbiter::start(settings.pg_pool_size as usize, move || PgActor(pool.clone()));

        Self {
            pg_db,
            redis_db,
            cart_store,
            cart_lock: tokio::sync::Mutex::new(()),
            settings,
            order_book: Mutex::new(OrderBook::with_samples()),
        }
    }
}
