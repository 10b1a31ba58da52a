//! Create/list handlers for channels, VOD, series and episodes. All of them
//! sit behind the bearer-token gate.

use axum::{Extension, Json, extract::State, http::StatusCode};
use iptv_db::models::{Channel, Episode, NewChannel, NewEpisode, NewSeries, NewVod, Series, Vod};
use iptv_db::repositories::CatalogRepository;
use serde::Serialize;
use tracing::info;

use crate::AppState;
use crate::auth::Claims;
use crate::error::ApiError;
use crate::extract::ApiJson;

type Created<T> = (StatusCode, Json<T>);

async fn create<R>(repo: &R, new: R::New) -> Result<Created<R::Row>, ApiError>
where
    R: CatalogRepository,
    R::Row: Serialize,
{
    let row = repo.insert(&new).await.map_err(ApiError::Rejected)?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn list<R>(repo: &R) -> Result<Json<Vec<R::Row>>, ApiError>
where
    R: CatalogRepository,
    R::Row: Serialize,
{
    repo.list().await.map(Json).map_err(ApiError::Rejected)
}

pub async fn create_channel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(new): ApiJson<NewChannel>,
) -> Result<Created<Channel>, ApiError> {
    let created = create(&state.store.channels, new).await?;
    info!(by = %claims.sub, channel_id = created.1.channel_id, "Channel created");
    Ok(created)
}

pub async fn list_channels(State(state): State<AppState>) -> Result<Json<Vec<Channel>>, ApiError> {
    list(&state.store.channels).await
}

pub async fn create_vod(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(new): ApiJson<NewVod>,
) -> Result<Created<Vod>, ApiError> {
    let created = create(&state.store.vod, new).await?;
    info!(by = %claims.sub, vod_id = created.1.vod_id, "VOD created");
    Ok(created)
}

pub async fn list_vod(State(state): State<AppState>) -> Result<Json<Vec<Vod>>, ApiError> {
    list(&state.store.vod).await
}

pub async fn create_series(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(new): ApiJson<NewSeries>,
) -> Result<Created<Series>, ApiError> {
    let created = create(&state.store.series, new).await?;
    info!(by = %claims.sub, series_id = created.1.series_id, "Series created");
    Ok(created)
}

pub async fn list_series(State(state): State<AppState>) -> Result<Json<Vec<Series>>, ApiError> {
    list(&state.store.series).await
}

pub async fn create_episode(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(new): ApiJson<NewEpisode>,
) -> Result<Created<Episode>, ApiError> {
    let created = create(&state.store.episodes, new).await?;
    info!(
        by = %claims.sub,
        episode_id = created.1.episode_id,
        series_id = created.1.series_id,
        "Episode created"
    );
    Ok(created)
}

pub async fn list_episodes(State(state): State<AppState>) -> Result<Json<Vec<Episode>>, ApiError> {
    list(&state.store.episodes).await
}
