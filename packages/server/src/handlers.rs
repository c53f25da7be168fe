//! HTTP handler functions for the crime risk API.

use actix_web::{HttpResponse, web};
use crime_risk_analytics::{
    compute_statistics, filter_hotspots, filter_predictions, filter_suggestions, sort_hotspots,
    suggestion_metrics, suggestions_above_confidence,
};
use crime_risk_geography_models::GeoPoint;
use crime_risk_hotspot::{HotspotError, cluster_incidents, hotspots_to_geojson};
use crime_risk_server_models::{
    ApiHealth, DistanceQueryParams, DistanceResponse, HotspotRequest, HotspotResponse,
    StatisticsRequest, SuggestionMetricsRequest,
};
use crime_risk_spatial::distance_meters;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": message.to_string()
    }))
}

/// Clusters the request's incidents, then applies its filter and sort.
fn run_hotspot_query(
    state: &AppState,
    request: HotspotRequest,
) -> Result<HotspotResponse, HotspotError> {
    let config = request
        .config
        .unwrap_or_else(|| state.default_config.clone());
    let outcome = cluster_incidents(&request.incidents, &config)?;

    let mut hotspots = outcome.hotspots;
    if let Some(filter) = request.filter.filter(|f| !f.is_empty()) {
        hotspots = filter_hotspots(&hotspots, &filter);
    }
    if let Some(sort) = request.sort {
        hotspots = sort_hotspots(&hotspots, sort.key, sort.ascending);
    }

    Ok(HotspotResponse {
        hotspots,
        unclustered_ids: outcome.unclustered_ids,
    })
}

/// `POST /api/hotspots`
///
/// Builds hotspots from the posted incidents.
pub async fn hotspots(
    state: web::Data<AppState>,
    body: web::Json<HotspotRequest>,
) -> HttpResponse {
    match run_hotspot_query(&state, body.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("Failed to build hotspots: {e}");
            bad_request(e)
        }
    }
}

/// `POST /api/hotspots/geojson`
///
/// Same as [`hotspots`], rendered as a GeoJSON `FeatureCollection`.
pub async fn hotspots_geojson(
    state: web::Data<AppState>,
    body: web::Json<HotspotRequest>,
) -> HttpResponse {
    match run_hotspot_query(&state, body.into_inner()) {
        Ok(response) => HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(hotspots_to_geojson(&response.hotspots)),
        Err(e) => {
            log::warn!("Failed to build hotspots: {e}");
            bad_request(e)
        }
    }
}

/// `POST /api/predictions/statistics`
///
/// Summarizes the posted predictions after applying the optional filter.
pub async fn prediction_statistics(body: web::Json<StatisticsRequest>) -> HttpResponse {
    let request = body.into_inner();
    let matching = filter_predictions(&request.predictions, &request.filter);
    match compute_statistics(&matching) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => bad_request(e),
    }
}

/// `POST /api/suggestions/metrics`
///
/// Review metrics over the posted patrol suggestions.
pub async fn suggestion_metrics_handler(
    body: web::Json<SuggestionMetricsRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let mut matching = filter_suggestions(&request.suggestions, &request.filter);
    if let Some(threshold) = request.min_confidence {
        matching = suggestions_above_confidence(&matching, threshold);
    }
    match suggestion_metrics(&matching) {
        Ok(metrics) => HttpResponse::Ok().json(metrics),
        Err(e) => bad_request(e),
    }
}

/// `GET /api/distance`
///
/// Great-circle distance between two coordinates.
pub async fn distance(params: web::Query<DistanceQueryParams>) -> HttpResponse {
    let from = GeoPoint {
        latitude: params.from_lat,
        longitude: params.from_lon,
    };
    let to = GeoPoint {
        latitude: params.to_lat,
        longitude: params.to_lon,
    };

    match distance_meters(&from, &to) {
        Ok(meters) => HttpResponse::Ok().json(DistanceResponse { meters }),
        Err(e) => bad_request(e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use crime_risk_analytics_models::{PredictionStatistics, SuggestionMetrics};
    use serde_json::{Value, json};

    use super::*;
    use crate::configure_api;

    fn incidents() -> Value {
        json!([
            {
                "id": "INC-1",
                "location": {"latitude": 19.2000, "longitude": 72.9700},
                "crimeType": "Theft",
                "severity": "high",
                "occurredAt": "2024-03-01T20:15:00Z"
            },
            {
                "id": "INC-2",
                "location": {"latitude": 19.2010, "longitude": 72.9710},
                "crimeType": "Theft",
                "severity": "high",
                "occurredAt": "2024-03-01T21:40:00Z"
            },
            {
                "id": "INC-3",
                "location": {"latitude": 19.2005, "longitude": 72.9695},
                "crimeType": "Assault",
                "severity": "critical",
                "occurredAt": "2024-03-02T08:05:00Z"
            },
            {
                "id": "INC-4",
                "location": {"latitude": 19.3000, "longitude": 73.1000},
                "crimeType": "Vandalism",
                "severity": "low",
                "occurredAt": "2024-03-02T09:00:00Z"
            }
        ])
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::default()))
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: ApiHealth = test::call_and_read_body_json(&app, req).await;
        assert!(body.healthy);
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn builds_hotspots() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/hotspots")
            .set_json(json!({ "incidents": incidents() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: HotspotResponse = test::read_body_json(resp).await;
        assert_eq!(body.hotspots.len(), 1);
        let hotspot = &body.hotspots[0];
        assert_eq!(hotspot.id, "HS-001");
        assert_eq!(hotspot.incident_count, 3);
        assert_eq!(hotspot.dominant_crime_types[0], "Theft");
        assert_eq!(body.unclustered_ids, vec!["INC-4".to_string()]);
    }

    #[actix_web::test]
    async fn filter_can_exclude_every_hotspot() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/hotspots")
            .set_json(json!({
                "incidents": incidents(),
                "filter": {"crimeType": "Vandalism"},
                "sort": {"key": "riskLevel"}
            }))
            .to_request();
        let body: HotspotResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.hotspots.is_empty());
    }

    #[actix_web::test]
    async fn invalid_config_is_bad_request() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/hotspots")
            .set_json(json!({ "incidents": incidents(), "config": {"minPoints": 0} }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("minPoints"));
    }

    #[actix_web::test]
    async fn malformed_body_is_bad_request() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/hotspots")
            .set_json(json!({ "incidents": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn geojson_feature_collection() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/hotspots/geojson")
            .set_json(json!({ "incidents": incidents() }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 1);
        assert_eq!(body["features"][0]["properties"]["id"], "HS-001");
    }

    #[actix_web::test]
    async fn statistics_of_empty_and_filtered_sets() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/predictions/statistics")
            .set_json(json!({ "predictions": [] }))
            .to_request();
        let body: PredictionStatistics = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, PredictionStatistics::empty());

        let req = test::TestRequest::post()
            .uri("/api/predictions/statistics")
            .set_json(json!({
                "predictions": [
                    {
                        "id": "p1",
                        "location": {"latitude": 19.19, "longitude": 72.97, "areaName": "Naupada"},
                        "riskScore": 0.85,
                        "generatedAt": "2024-03-01T06:00:00Z"
                    },
                    {
                        "id": "p2",
                        "location": {"latitude": 19.21, "longitude": 72.98, "areaName": "Kopri"},
                        "riskScore": 0.3,
                        "generatedAt": "2024-03-01T06:00:00Z"
                    }
                ],
                "filter": {"minRiskScore": 0.5}
            }))
            .to_request();
        let body: PredictionStatistics = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total, 1);
        assert_eq!(body.high_risk_count, 1);
        assert_eq!(body.highest_risk_area.as_deref(), Some("Naupada"));
    }

    #[actix_web::test]
    async fn statistics_reject_invalid_score() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/predictions/statistics")
            .set_json(json!({
                "predictions": [{
                    "id": "p1",
                    "location": {"latitude": 19.19, "longitude": 72.97},
                    "riskScore": 1.4,
                    "generatedAt": "2024-03-01T06:00:00Z"
                }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("p1"));
    }

    #[actix_web::test]
    async fn suggestion_metrics_endpoint() {
        let app = app!();
        let suggestion = |id: &str, status: &str, confidence: f64| {
            json!({
                "id": id,
                "generatedAt": "2023-07-16T20:30:00Z",
                "patrolDate": "2023-07-17",
                "shiftPeriod": "Evening",
                "confidenceScore": confidence,
                "status": status
            })
        };
        let req = test::TestRequest::post()
            .uri("/api/suggestions/metrics")
            .set_json(json!({
                "suggestions": [
                    suggestion("s1", "accepted", 0.9),
                    suggestion("s2", "rejected", 0.7),
                    suggestion("s3", "implemented", 0.5)
                ],
                "minConfidence": 0.6
            }))
            .to_request();
        let body: SuggestionMetrics = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.total, 2);
        assert_eq!(body.accepted, 1);
        assert_eq!(body.rejected, 1);
        assert_eq!(body.implemented, 0);
        assert!((body.average_confidence_score - 0.8).abs() < 1e-12);
    }

    #[actix_web::test]
    async fn distance_endpoint() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/distance?fromLat=0&fromLon=0&toLat=0&toLon=1")
            .to_request();
        let body: DistanceResponse = test::call_and_read_body_json(&app, req).await;
        assert!((body.meters - 111_194.9).abs() < 1.0);

        let req = test::TestRequest::get()
            .uri("/api/distance?fromLat=95&fromLon=0&toLat=0&toLon=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
