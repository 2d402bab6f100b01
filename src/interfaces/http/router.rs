//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::ParkingService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{areas, health, sessions, tariffs};
use crate::interfaces::ws::{create_notification_state, ws_notifications_handler};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        sessions::check_in,
        sessions::check_out,
        sessions::list_sessions,
        sessions::get_session,
        areas::list_areas,
        areas::get_slot,
        tariffs::list_tariffs,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            sessions::CheckInRequest,
            sessions::CheckInResponse,
            sessions::CheckOutRequest,
            sessions::CheckOutResponse,
            sessions::SessionDto,
            areas::AreaDto,
            areas::SlotDto,
            areas::OccupantDto,
            tariffs::TariffDto,
            tariffs::TariffTableDto,
        )
    ),
    tags(
        (name = "Health", description = "Service health and occupancy summary"),
        (name = "Sessions", description = "Vehicle check-in, check-out and lookup"),
        (name = "Areas", description = "Occupancy overview and slot inspection"),
        (name = "Tariffs", description = "Hourly rates and area routing per vehicle class"),
        (
            name = "WebSocket Notifications",
            description = "Live parking events at /api/v1/notifications/ws"
        ),
    ),
    info(
        title = "Smart Parking API",
        version = "1.0.0",
        description = "Slot allocation, occupancy and fees for a multi-area parking lot",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running service
pub struct RouterDeps {
    pub service: Arc<ParkingService>,
    pub prometheus: PrometheusHandle,
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let parking_state = sessions::ParkingState {
        service: deps.service.clone(),
    };

    let session_routes = Router::new()
        .route("/", get(sessions::list_sessions))
        .route("/check-in", post(sessions::check_in))
        .route("/check-out", post(sessions::check_out))
        .route("/{plate}", get(sessions::get_session))
        .with_state(parking_state.clone());

    let area_routes = Router::new()
        .route("/", get(areas::list_areas))
        .route("/{code}/slots/{index}", get(areas::get_slot))
        .with_state(parking_state.clone());

    let tariff_routes = Router::new()
        .route("/", get(tariffs::list_tariffs))
        .with_state(parking_state);

    // Notification WebSocket
    let notification_routes = Router::new()
        .route("/ws", get(ws_notifications_handler))
        .with_state(create_notification_state(deps.service.event_bus().clone()));

    let health_state = health::HealthState {
        service: deps.service,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: deps.prometheus,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/sessions", session_routes)
        .nest("/api/v1/areas", area_routes)
        .nest("/api/v1/tariffs", tariff_routes)
        .nest("/api/v1/notifications", notification_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::EventBus;
    use crate::application::parking::{LotLayout, ParkingLot};
    use crate::domain::{AreaCode, AreaSpec, ClassRouting, RoutingTable, TariffTable, VehicleClass};
    use crate::infrastructure::{InMemoryReceiptSink, ManualClock};
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use chrono::{Duration, TimeZone, Utc};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};

    fn code(c: char) -> AreaCode {
        AreaCode::new(c).unwrap()
    }

    fn setup() -> (Router, Arc<ManualClock>) {
        let lot = ParkingLot::new(LotLayout {
            areas: ['A', 'B', 'C', 'D', 'E', 'F']
                .into_iter()
                .map(|c| AreaSpec::new(code(c), 3))
                .collect(),
            routes: RoutingTable {
                motor: ClassRouting::new(code('A'), code('D')),
                car: ClassRouting::new(code('B'), code('E')),
                bus: ClassRouting::new(code('C'), code('F')),
            },
            tariffs: TariffTable::new("Rp")
                .with_rate(VehicleClass::Motor, 2000)
                .with_rate(VehicleClass::Car, 3000)
                .with_rate(VehicleClass::Bus, 5000),
        })
        .unwrap();

        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
        ));
        let service = Arc::new(ParkingService::new(
            lot,
            clock.clone(),
            Arc::new(InMemoryReceiptSink::new()),
            Arc::new(EventBus::new()),
        ));
        let router = create_api_router(RouterDeps {
            service,
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
        });
        (router, clock)
    }

    async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
        use tower::Service;
        let mut svc = router.clone().into_service();
        svc.call(req).await.unwrap()
    }

    async fn get(router: &Router, uri: &str) -> Response<Body> {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(router: &Router, uri: &str, body: Value) -> Response<Body> {
        let req = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(router, req).await
    }

    async fn body_json(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_capacity() {
        let (router, _) = setup();
        let resp = get(&router, "/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["total_slots"], 18);
        assert_eq!(body["occupied_slots"], 0);
    }

    #[tokio::test]
    async fn check_in_lookup_check_out() {
        let (router, clock) = setup();

        let resp = post_json(
            &router,
            "/api/v1/sessions/check-in",
            json!({"plate": "B 1001 XY", "vehicle_class": "car"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        // 1001 % 3 = 2
        assert_eq!(body["data"]["slot"], "B2");

        let resp = get(&router, "/api/v1/sessions/B%201001%20XY").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"]["slot_index"], 2);

        let resp = get(&router, "/api/v1/sessions").await;
        assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);

        clock.advance(Duration::seconds(3601));
        let resp = post_json(
            &router,
            "/api/v1/sessions/check-out",
            json!({"plate": "B 1001 XY"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["billable_hours"], 2);
        assert_eq!(body["data"]["amount"], 6000);
        assert_eq!(body["data"]["amount_display"], "Rp 6,000");
        assert_eq!(body["data"]["receipt"], "memory://receipts/1");

        let resp = get(&router, "/api/v1/sessions/B%201001%20XY").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn check_in_errors_map_to_status() {
        let (router, _) = setup();

        let resp = post_json(
            &router,
            "/api/v1/sessions/check-in",
            json!({"plate": "AB12", "vehicle_class": "Motor"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["success"], false);

        let resp = post_json(
            &router,
            "/api/v1/sessions/check-in",
            json!({"plate": "AB 1234", "vehicle_class": "truck"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let first = json!({"plate": "M 5555", "vehicle_class": "Motor"});
        let resp = post_json(&router, "/api/v1/sessions/check-in", first.clone()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let resp = post_json(&router, "/api/v1/sessions/check-in", first).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn long_plates_are_accepted() {
        let (router, _) = setup();
        let plate = "TEMPORARY EXPORT PLATE SERIES KH 0001 / DIPLOMATIC";
        assert!(plate.len() > 32);

        let resp = post_json(
            &router,
            "/api/v1/sessions/check-in",
            json!({"plate": plate, "vehicle_class": "Car"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_json(resp).await["data"]["slot"], "B1");

        let resp = post_json(&router, "/api/v1/sessions/check-out", json!({"plate": plate})).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_class_is_conflict() {
        let (router, _) = setup();
        for n in 0..6 {
            let resp = post_json(
                &router,
                "/api/v1/sessions/check-in",
                json!({"plate": format!("BUS {}", 2000 + n), "vehicle_class": "Bus"}),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }
        let resp = post_json(
            &router,
            "/api/v1/sessions/check-in",
            json!({"plate": "BUS 2010", "vehicle_class": "Bus"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_plate_check_out_is_404() {
        let (router, _) = setup();
        let resp = post_json(
            &router,
            "/api/v1/sessions/check-out",
            json!({"plate": "Z 0000"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn areas_and_slots() {
        let (router, _) = setup();
        post_json(
            &router,
            "/api/v1/sessions/check-in",
            json!({"plate": "X 1002", "vehicle_class": "Motor"}),
        )
        .await;

        let body = body_json(get(&router, "/api/v1/areas").await).await;
        let areas = body["data"].as_array().unwrap();
        assert_eq!(areas.len(), 6);
        assert_eq!(areas[0]["code"], "A");
        assert_eq!(areas[0]["occupied_slots"], json!([0]));

        let resp = get(&router, "/api/v1/areas/a/slots/0").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["occupied"], true);
        assert_eq!(body["data"]["occupant"]["plate"], "X 1002");

        let resp = get(&router, "/api/v1/areas/A/slots/1").await;
        assert_eq!(body_json(resp).await["data"]["occupied"], false);

        let resp = get(&router, "/api/v1/areas/A/slots/3").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = get(&router, "/api/v1/areas/Z/slots/0").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tariffs_include_routing() {
        let (router, _) = setup();
        let body = body_json(get(&router, "/api/v1/tariffs").await).await;
        assert_eq!(body["data"]["currency_symbol"], "Rp");
        let rates = body["data"]["rates"].as_array().unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0]["vehicle_class"], "Motor");
        assert_eq!(rates[0]["display"], "Rp 2,000");
        assert_eq!(rates[0]["overflow_area"], "D");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let (router, _) = setup();
        let req = Request::get("/health")
            .header("x-request-id", "gate-7")
            .body(Body::empty())
            .unwrap();
        let resp = send(&router, req).await;
        assert_eq!(resp.headers()["x-request-id"], "gate-7");

        let resp = get(&router, "/health").await;
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn metrics_and_openapi_are_served() {
        let (router, _) = setup();
        let resp = get(&router, "/metrics").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = get(&router, "/api-doc/openapi.json").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let doc = body_json(resp).await;
        assert!(doc["paths"]["/api/v1/sessions/check-in"].is_object());
    }
}
