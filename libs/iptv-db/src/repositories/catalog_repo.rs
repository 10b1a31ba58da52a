use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::{Channel, Episode, NewChannel, NewEpisode, NewSeries, NewVod, Series, Vod};
use crate::value::Loose;

/// Create/list access shared by the catalog tables. Identifiers are assigned
/// by the store and never reused.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    type Row: Send;
    type New: Send + Sync;

    async fn insert(&self, new: &Self::New) -> StoreResult<Self::Row>;
    async fn list(&self) -> StoreResult<Vec<Self::Row>>;
}

#[derive(Debug, Clone)]
pub struct ChannelRepository {
    pool: SqlitePool,
}

impl ChannelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for ChannelRepository {
    type Row = Channel;
    type New = NewChannel;

    async fn insert(&self, new: &NewChannel) -> StoreResult<Channel> {
        let channel = sqlx::query_as::<_, Channel>(
            "INSERT INTO channels (name, url) VALUES (?, ?) RETURNING channel_id, name, url",
        )
        .bind(Loose(&new.name))
        .bind(Loose(&new.url))
        .fetch_one(&self.pool)
        .await?;
        Ok(channel)
    }

    async fn list(&self) -> StoreResult<Vec<Channel>> {
        let channels = sqlx::query_as::<_, Channel>(
            "SELECT channel_id, name, url FROM channels ORDER BY channel_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(channels)
    }
}

#[derive(Debug, Clone)]
pub struct VodRepository {
    pool: SqlitePool,
}

impl VodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for VodRepository {
    type Row = Vod;
    type New = NewVod;

    async fn insert(&self, new: &NewVod) -> StoreResult<Vod> {
        let vod = sqlx::query_as::<_, Vod>(
            r#"
            INSERT INTO vod (title, description, file_path) VALUES (?, ?, ?)
            RETURNING vod_id, title, description, file_path
            "#,
        )
        .bind(Loose(&new.title))
        .bind(Loose(&new.description))
        .bind(Loose(&new.file_path))
        .fetch_one(&self.pool)
        .await?;
        Ok(vod)
    }

    async fn list(&self) -> StoreResult<Vec<Vod>> {
        let vod = sqlx::query_as::<_, Vod>(
            "SELECT vod_id, title, description, file_path FROM vod ORDER BY vod_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(vod)
    }
}

#[derive(Debug, Clone)]
pub struct SeriesRepository {
    pool: SqlitePool,
}

impl SeriesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SeriesRepository {
    type Row = Series;
    type New = NewSeries;

    async fn insert(&self, new: &NewSeries) -> StoreResult<Series> {
        let series = sqlx::query_as::<_, Series>(
            "INSERT INTO series (title, description) VALUES (?, ?) RETURNING series_id, title, description",
        )
        .bind(Loose(&new.title))
        .bind(Loose(&new.description))
        .fetch_one(&self.pool)
        .await?;
        Ok(series)
    }

    async fn list(&self) -> StoreResult<Vec<Series>> {
        let series = sqlx::query_as::<_, Series>(
            "SELECT series_id, title, description FROM series ORDER BY series_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(series)
    }
}

#[derive(Debug, Clone)]
pub struct EpisodeRepository {
    pool: SqlitePool,
}

impl EpisodeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for EpisodeRepository {
    type Row = Episode;
    type New = NewEpisode;

    async fn insert(&self, new: &NewEpisode) -> StoreResult<Episode> {
        let episode = sqlx::query_as::<_, Episode>(
            r#"
            INSERT INTO episodes (series_id, title, file_path) VALUES (?, ?, ?)
            RETURNING episode_id, series_id, title, file_path
            "#,
        )
        .bind(Loose(&new.series_id))
        .bind(Loose(&new.title))
        .bind(Loose(&new.file_path))
        .fetch_one(&self.pool)
        .await?;
        Ok(episode)
    }

    async fn list(&self) -> StoreResult<Vec<Episode>> {
        let episodes = sqlx::query_as::<_, Episode>(
            "SELECT episode_id, series_id, title, file_path FROM episodes ORDER BY episode_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::error::StoreError;
    use serde_json::{Value, json};

    fn channel(name: &str, url: &str) -> NewChannel {
        NewChannel { name: json!(name), url: json!(url) }
    }

    #[tokio::test]
    async fn channel_ids_are_monotonic() {
        let repo = ChannelRepository::new(connect_in_memory().await.unwrap());
        let a = repo.insert(&channel("BBC", "http://x")).await.unwrap();
        let b = repo.insert(&channel("CNN", "http://y")).await.unwrap();

        assert!(b.channel_id > a.channel_id);
        assert_eq!(repo.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn deleted_channel_ids_are_not_reused() {
        let pool = connect_in_memory().await.unwrap();
        let repo = ChannelRepository::new(pool.clone());
        let first = repo.insert(&channel("A", "u")).await.unwrap();
        sqlx::query("DELETE FROM channels").execute(&pool).await.unwrap();

        let second = repo.insert(&channel("B", "u")).await.unwrap();
        assert!(second.channel_id > first.channel_id);
    }

    #[tokio::test]
    async fn null_name_hits_not_null_constraint() {
        let repo = ChannelRepository::new(connect_in_memory().await.unwrap());
        let err = repo
            .insert(&NewChannel { name: Value::Null, url: json!("u") })
            .await
            .unwrap_err();
        match err {
            StoreError::Constraint(msg) => assert!(msg.contains("NOT NULL"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn episode_requires_existing_series() {
        let pool = connect_in_memory().await.unwrap();
        let series = SeriesRepository::new(pool.clone());
        let episodes = EpisodeRepository::new(pool);

        let err = episodes
            .insert(&NewEpisode {
                series_id: json!(999),
                title: json!("Pilot"),
                file_path: json!("/e1.mp4"),
            })
            .await
            .unwrap_err();
        match err {
            StoreError::Constraint(msg) => assert!(msg.contains("FOREIGN KEY"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }

        let show = series
            .insert(&NewSeries { title: json!("Show"), description: Value::Null })
            .await
            .unwrap();
        // Integer affinity turns the textual id back into the series key.
        let episode = episodes
            .insert(&NewEpisode {
                series_id: json!(show.series_id.to_string()),
                title: json!("Pilot"),
                file_path: json!("/e1.mp4"),
            })
            .await
            .unwrap();
        assert_eq!(episode.series_id, show.series_id);
        assert_eq!(episodes.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn vod_round_trips_optional_description() {
        let repo = VodRepository::new(connect_in_memory().await.unwrap());
        let vod = repo
            .insert(&NewVod {
                title: json!("Film"),
                description: Value::Null,
                file_path: json!("/f.mkv"),
            })
            .await
            .unwrap();
        assert_eq!(vod.description, None);
        assert_eq!(repo.list().await.unwrap(), vec![vod]);
    }
}
