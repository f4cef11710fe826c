use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::ApplicationSettings, routes};

pub fn create(app_state: AppState, config: &ApplicationSettings) -> Router<()> {
    let cors = CorsLayer::new().allow_methods([Method::GET]);
    let cors = if config.allowed_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let allowed = config.allowed_origins.clone();
        cors.allow_origin(AllowOrigin::predicate(move |origin, _| {
            let origin_str = origin.to_str().unwrap_or_default();
            allowed.iter().any(|allowed| allowed == origin_str)
        }))
    };

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/properties", routes::properties::router())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        adapters::outbound::memory::InMemoryPropertyStore,
        domain::{
            models::Property,
            services::{PropertyQueryServiceImpl, QueryConfig},
        },
    };

    fn app() -> Router {
        let mut loop_a = Property::new("17-10-100-100-0000");
        loop_a.latitude = Some(41.88);
        loop_a.longitude = Some(-87.63);
        loop_a.community_area_name = Some("LOOP".to_string());
        loop_a.zip_code = Some("60601".to_string());

        let mut loop_b = Property::new("17-10-100-101-0000");
        loop_b.latitude = Some(41.881);
        loop_b.longitude = Some(-87.631);
        loop_b.community_area_name = Some("LOOP".to_string());

        let unmapped = Property::new("20-01-000-000-0000");

        let store = InMemoryPropertyStore::new(vec![loop_a, loop_b, unmapped]);
        let service = PropertyQueryServiceImpl::new(Arc::new(store), QueryConfig::default());
        let settings = ApplicationSettings {
            port: 0,
            host: "127.0.0.1".to_string(),
            allowed_origins: vec![],
        };

        create(AppState::new(Arc::new(service)), &settings)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn search_returns_count_and_type() {
        let (status, body) = get_json("/properties/search?q=17-10&type=pin&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["search_type"], "pin");
        assert_eq!(body["query"], "17-10");
    }

    #[tokio::test]
    async fn search_requires_query() {
        let (status, body) = get_json("/properties/search?q=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");

        let (status, _) = get_json("/properties/search?q=loop&type=owner").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn nearby_validates_coordinates() {
        let (status, body) = get_json("/properties/nearby?lat=41.88&lon=-87.63").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["center"], serde_json::json!([-87.63, 41.88]));
        assert_eq!(body["radius_km"], 1.0);
        assert_eq!(body["count"], 2);

        let (status, _) = get_json("/properties/nearby?lat=abc&lon=-87.63").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/properties/nearby?lon=-87.63").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detail_and_sub_views() {
        let (status, body) = get_json("/properties/17-10-100-100-0000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pin10"], "1710100100");
        assert_eq!(body["nearby_properties_count"], 1);

        let (status, body) = get_json("/properties/17-10-100-100-0000/schools").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address_display"], "LOOP, ZIP 60601");

        let (status, body) = get_json("/properties/17-10-100-100-0000/nearby").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["pin"], "17-10-100-101-0000");

        let (status, body) = get_json("/properties/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn single_geojson_feature_can_have_null_geometry() {
        let (status, body) = get_json("/properties/20-01-000-000-0000/geojson").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "Feature");
        assert!(body["geometry"].is_null());
    }

    #[tokio::test]
    async fn geojson_collection_with_partial_bbox() {
        let (status, body) = get_json("/properties/geojson?north=42&south=41").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 2);

        let (_, body) =
            get_json("/properties/geojson?north=41.8805&south=41.87&east=-87.62&west=-87.64")
                .await;
        assert_eq!(body["features"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn autocomplete_and_list() {
        let (status, body) = get_json("/properties/autocomplete?q=lo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["suggestions"],
            serde_json::json!([{ "value": "LOOP", "type": "area" }])
        );

        let (status, body) = get_json("/properties?community_area=LOOP&ordering=-pin").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["total_pages"], 1);
        assert_eq!(body["results"][0]["pin"], "17-10-100-101-0000");

        let (status, _) = get_json("/properties?page=5").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json("/properties?ordering=owner").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_lists_top_areas() {
        let (status, body) = get_json("/properties/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_properties"], 3);
        assert_eq!(
            body["top_community_areas"],
            serde_json::json!([{ "community_area": "LOOP", "count": 2 }])
        );
    }
}
