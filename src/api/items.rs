use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::AppState;
use crate::domain::{NewItem, Paging, TodoItem};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Missing or null binds as empty and is rejected by validation.
    #[serde(default)]
    pub title: Option<String>,
    /// Accepted but ignored: new items always start as `"Doing"`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    pub data: i64,
}

#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub data: Vec<TodoItem>,
    pub paging: Paging,
}

pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<Json<CreateItemResponse>, AppError> {
    let Json(payload) = payload?;
    let item = NewItem::new(payload.title.as_deref().unwrap_or_default())?;

    let id = state.repo.insert_item(&item).await?;
    tracing::info!(id, "Created item");

    Ok(Json(CreateItemResponse { data: id }))
}

pub async fn list_items(
    State(state): State<AppState>,
    params: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<Json<ListItemsResponse>, AppError> {
    let Query(params) = params?;
    let mut paging = Paging::normalize(params.page, params.limit);

    paging.total = state.repo.count_items().await?;
    let data = state.repo.list_items(paging.offset(), paging.limit).await?;

    Ok(Json(ListItemsResponse { data, paging }))
}

/// Treat `?page=` the same as an absent parameter.
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => T::from_str(s).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn parse(uri: &str) -> Result<ListItemsQuery, QueryRejection> {
        let uri: Uri = uri.parse().unwrap();
        Query::<ListItemsQuery>::try_from_uri(&uri).map(|Query(q)| q)
    }

    #[test]
    fn test_query_absent_params() {
        let q = parse("/v1/items").unwrap();
        assert_eq!((q.page, q.limit), (None, None));
    }

    #[test]
    fn test_query_empty_params_are_absent() {
        let q = parse("/v1/items?page=&limit=").unwrap();
        assert_eq!((q.page, q.limit), (None, None));
    }

    #[test]
    fn test_query_parses_integers() {
        let q = parse("/v1/items?page=-2&limit=25").unwrap();
        assert_eq!((q.page, q.limit), (Some(-2), Some(25)));
    }

    #[test]
    fn test_query_rejects_non_integers() {
        assert!(parse("/v1/items?page=abc").is_err());
        assert!(parse("/v1/items?limit=1.5").is_err());
    }

    #[test]
    fn test_create_request_ignores_status_and_defaults_title() {
        let req: CreateItemRequest =
            serde_json::from_str(r#"{"status": "Done", "id": 99}"#).unwrap();
        assert_eq!(req.title, None);
        assert_eq!(req.status.as_deref(), Some("Done"));
    }

    #[test]
    fn test_create_request_accepts_null_title() {
        let req: CreateItemRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(req.title, None);
    }
}
