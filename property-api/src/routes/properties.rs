use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    adapters::inbound::http::{
        parse_bbox, parse_optional, parse_ordering, parse_required, parse_scope,
        AutocompleteResponse, EnvironmentalInfoResponse, NearbyResponse, PageResponse,
        PropertyDetailResponse, PropertySummaryResponse, SchoolInfoResponse, SearchResponse,
        StatsResponse, TaxInfoResponse,
    },
    app_state::AppState,
    domain::{
        models::{Feature, FeatureCollection},
        query::{GeoJsonFilters, ListFilters},
    },
};

use super::ApiError;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub class_code: Option<String>,
    pub zip_code: Option<String>,
    pub ward: Option<String>,
    pub township: Option<String>,
    pub community_area: Option<String>,
    pub triad: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeoJsonQuery {
    pub north: Option<String>,
    pub south: Option<String>,
    pub east: Option<String>,
    pub west: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "class")]
    pub class_code: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RadiusQuery {
    pub radius: Option<String>,
    pub limit: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[instrument(name = "GET /properties", skip(app_state))]
async fn list_properties(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<PropertySummaryResponse>>, ApiError> {
    let ordering = parse_ordering(query.ordering.as_deref())?;
    let page = parse_optional("page", query.page.as_deref())?;
    let page_size = parse_optional("page_size", query.page_size.as_deref())?;
    let filters = ListFilters {
        class_code: query.class_code,
        zip_code: query.zip_code,
        ward: query.ward,
        township: query.township,
        community_area: query.community_area,
        triad: query.triad,
        search: query.search,
    };

    let page = app_state
        .property_service
        .list_properties(&filters, ordering, page, page_size)
        .await?;
    Ok(Json(page.into()))
}

#[instrument(name = "GET /properties/:pin", skip(app_state))]
async fn get_property(
    State(app_state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<PropertyDetailResponse>, ApiError> {
    let detail = app_state.property_service.get_property(&pin).await?;
    Ok(Json(detail.into()))
}

#[instrument(name = "GET /properties/:pin/schools", skip(app_state))]
async fn get_schools(
    State(app_state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<SchoolInfoResponse>, ApiError> {
    let property = app_state.property_service.find_property(&pin).await?;
    Ok(Json(property.into()))
}

#[instrument(name = "GET /properties/:pin/tax", skip(app_state))]
async fn get_tax(
    State(app_state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<TaxInfoResponse>, ApiError> {
    let property = app_state.property_service.find_property(&pin).await?;
    Ok(Json(property.into()))
}

#[instrument(name = "GET /properties/:pin/environment", skip(app_state))]
async fn get_environment(
    State(app_state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<EnvironmentalInfoResponse>, ApiError> {
    let property = app_state.property_service.find_property(&pin).await?;
    Ok(Json(property.into()))
}

#[instrument(name = "GET /properties/:pin/nearby", skip(app_state))]
async fn get_property_nearby(
    State(app_state): State<AppState>,
    Path(pin): Path<String>,
    Query(query): Query<RadiusQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let radius = parse_optional("radius", query.radius.as_deref())?;
    let limit = parse_optional("limit", query.limit.as_deref())?;

    let outcome = app_state
        .property_service
        .nearby_property(&pin, radius, limit)
        .await?;
    Ok(Json(outcome.into()))
}

#[instrument(name = "GET /properties/:pin/geojson", skip(app_state))]
async fn get_property_geojson(
    State(app_state): State<AppState>,
    Path(pin): Path<String>,
) -> Result<Json<Feature>, ApiError> {
    let property = app_state.property_service.find_property(&pin).await?;
    Ok(Json(Feature::from_property(&property)))
}

#[instrument(name = "GET /properties/search", skip(app_state))]
async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let scope = parse_scope(query.search_type.as_deref())?;
    let limit = parse_optional("limit", query.limit.as_deref())?;

    let outcome = app_state
        .property_service
        .search(query.q.as_deref().unwrap_or_default(), scope, limit)
        .await?;
    Ok(Json(outcome.into()))
}

#[instrument(name = "GET /properties/autocomplete", skip(app_state))]
async fn autocomplete(
    State(app_state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let limit = parse_optional("limit", query.limit.as_deref())?;

    let suggestions = app_state
        .property_service
        .autocomplete(query.q.as_deref().unwrap_or_default(), limit)
        .await?;
    Ok(Json(AutocompleteResponse { suggestions }))
}

#[instrument(name = "GET /properties/nearby", skip(app_state))]
async fn nearby(
    State(app_state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let lat = parse_required("lat", query.lat.as_deref())?;
    let lon = parse_required("lon", query.lon.as_deref())?;
    let radius = parse_optional("radius", query.radius.as_deref())?;
    let limit = parse_optional("limit", query.limit.as_deref())?;

    let outcome = app_state
        .property_service
        .nearby(lat, lon, radius, limit)
        .await?;
    Ok(Json(outcome.into()))
}

#[instrument(name = "GET /properties/geojson", skip(app_state))]
async fn geojson(
    State(app_state): State<AppState>,
    Query(query): Query<GeoJsonQuery>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let limit = parse_optional("limit", query.limit.as_deref())?;
    let filters = GeoJsonFilters {
        bbox: parse_bbox(
            query.north.as_deref(),
            query.south.as_deref(),
            query.east.as_deref(),
            query.west.as_deref(),
        ),
        area: query.area,
        class_code: query.class_code,
    };

    let collection = app_state.property_service.geojson(&filters, limit).await?;
    Ok(Json(collection))
}

#[instrument(name = "GET /properties/stats", skip(app_state))]
async fn stats(State(app_state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = app_state.property_service.stats().await?;
    Ok(Json(stats.into()))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties))
        .route("/search", get(search))
        .route("/autocomplete", get(autocomplete))
        .route("/nearby", get(nearby))
        .route("/geojson", get(geojson))
        .route("/stats", get(stats))
        .route("/:pin", get(get_property))
        .route("/:pin/schools", get(get_schools))
        .route("/:pin/tax", get(get_tax))
        .route("/:pin/environment", get(get_environment))
        .route("/:pin/nearby", get(get_property_nearby))
        .route("/:pin/geojson", get(get_property_geojson))
}
