pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod value;

pub use db::{connect, connect_in_memory};
pub use error::{StoreError, StoreResult};
pub use sqlx;
pub use value::Loose;

use repositories::{
    ChannelRepository, EpisodeRepository, ResellerRepository, SeriesRepository, UserRepository,
    VodRepository,
};
use sqlx::SqlitePool;

/// One repository per table, sharing a pool.
#[derive(Debug, Clone)]
pub struct Store {
    pub users: UserRepository,
    pub resellers: ResellerRepository,
    pub channels: ChannelRepository,
    pub vod: VodRepository,
    pub series: SeriesRepository,
    pub episodes: EpisodeRepository,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            resellers: ResellerRepository::new(pool.clone()),
            channels: ChannelRepository::new(pool.clone()),
            vod: VodRepository::new(pool.clone()),
            series: SeriesRepository::new(pool.clone()),
            episodes: EpisodeRepository::new(pool),
        }
    }

    pub async fn open(database_url: &str) -> StoreResult<Self> {
        Ok(Self::new(connect(database_url).await?))
    }

    pub async fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(connect_in_memory().await?))
    }
}
