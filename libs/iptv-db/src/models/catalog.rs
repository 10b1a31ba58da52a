use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

// The New* bodies keep each field as sent; only presence is checked.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: i64,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewChannel {
    pub name: Value,
    pub url: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vod {
    pub vod_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVod {
    pub title: Value,
    #[serde(default)]
    pub description: Value,
    pub file_path: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub series_id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSeries {
    pub title: Value,
    #[serde(default)]
    pub description: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub episode_id: i64,
    pub series_id: i64,
    pub title: String,
    pub file_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEpisode {
    pub series_id: Value,
    pub title: Value,
    pub file_path: Value,
}
