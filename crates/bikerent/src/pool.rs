//! Connection pool bootstrap

use crate::config::DatabaseConfig;
use crate::error::{DbError, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a connection pool from a [`DatabaseConfig`] without TLS.
///
/// ```ignore
/// let config = bikerent::DatabaseConfig::from_env()?;
/// let pool = bikerent::create_pool(&config)?;
/// let users = Repository::<Users>::new();
/// let rows = users.list(&pool.get().await?).await?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> DbResult<Pool> {
    create_pool_with_tls(config, NoTls)
}

/// Create a connection pool using a custom TLS connector.
pub fn create_pool_with_tls<T>(config: &DatabaseConfig, tls: T) -> DbResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let pg_config = config.to_pg_config()?;
    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, tls, manager_config);
    let pool = Pool::builder(mgr)
        .max_size(config.max_pool_size)
        .build()
        .map_err(|e| DbError::Pool(e.to_string()))?;

    tracing::info!(
        target: "bikerent.pool",
        max_size = config.max_pool_size,
        "database pool created"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_built_lazily() {
        // No connection is opened until the first `get()`.
        let config = DatabaseConfig {
            max_pool_size: 2,
            ..DatabaseConfig::from_url("postgres://user@localhost:1/none")
        };
        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.status().max_size, 2);
    }

    #[test]
    fn invalid_url_is_config_error() {
        let config = DatabaseConfig::from_url("not a url ::");
        assert!(matches!(create_pool(&config), Err(DbError::Config(_))));
    }
}
