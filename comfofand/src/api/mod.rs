//! API module for the comfofan server
//!
//! Contains the REST API implementation with Axum router and handlers.

pub(crate) mod handlers;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use comfofan_bridge::VentilationFan;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub(crate) struct AppState {
    /// The fan entity
    pub fan: Arc<VentilationFan>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(fan: Arc<VentilationFan>) -> Self {
        Self {
            fan,
            start_time: Instant::now(),
        }
    }
}

/// Create the main API router with all endpoints
pub(crate) fn create_router(state: AppState) -> Router {
    info!("Setting up API router...");

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        // Fan status and control endpoints
        .route("/api/v0/fan/status", get(handlers::fans::get_status))
        .route("/api/v0/fan/on", get(handlers::fans::turn_on))
        .route("/api/v0/fan/off", get(handlers::fans::turn_off))
        .route(
            "/api/v0/fan/percentage",
            get(handlers::fans::set_percentage),
        )
        .route("/api/v0/fan/preset", get(handlers::fans::set_preset_mode))
        // System info endpoint
        .route("/api/v0/info", get(handlers::info::get_info))
        // Root endpoint
        .route("/", get(handlers::info::root))
        .layer(middleware_stack)
        .with_state(state)
}

/// Error handling utilities
pub(crate) mod error {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    use comfofan_core::{api::ApiResponse, ComfoFanError};

    use tracing::error;

    /// Custom error type for API responses
    #[derive(Debug)]
    pub struct ApiError {
        pub status_code: StatusCode,
        pub message: String,
    }

    impl ApiError {
        /// Create a new API error
        pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
            Self {
                status_code,
                message: message.into(),
            }
        }

        /// Create a bad request error
        pub fn bad_request(message: impl Into<String>) -> Self {
            Self::new(StatusCode::BAD_REQUEST, message)
        }

        /// Create an internal server error
        pub fn internal_error(message: impl Into<String>) -> Self {
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }

        /// Create a service unavailable error (for bridge issues)
        pub fn service_unavailable(message: impl Into<String>) -> Self {
            Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            error!("API Error {}: {}", self.status_code, self.message);

            let response: ApiResponse<()> = ApiResponse::error(self.message);

            (self.status_code, Json(response)).into_response()
        }
    }

    /// Convert ComfoFanError to ApiError
    impl From<ComfoFanError> for ApiError {
        fn from(err: ComfoFanError) -> Self {
            match err {
                e if e.is_validation() => Self::bad_request(e.to_string()),
                e @ (ComfoFanError::Bridge(_) | ComfoFanError::BridgeDisconnected) => {
                    Self::service_unavailable(e.to_string())
                }
                e => Self::internal_error(e.to_string()),
            }
        }
    }
}

/// Helper macros for common responses
#[macro_export]
macro_rules! api_ok {
    ($data:expr) => {
        Ok(axum::Json(comfofan_core::api::ApiResponse::success($data)))
    };
}

#[macro_export]
macro_rules! api_fail {
    ($message:expr) => {
        Err($crate::api::error::ApiError::bad_request($message))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use comfofan_bridge::{BridgeCommand, SimulatedBridge, VentilationBridge};
    use comfofan_core::{VentilationMode, VentilationSpeed};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> (Arc<SimulatedBridge>, Arc<VentilationFan>, Router) {
        let bridge = Arc::new(SimulatedBridge::new("api-test-uuid"));
        let shared: Arc<dyn VentilationBridge> = bridge.clone();
        let fan = Arc::new(VentilationFan::new(shared, "ComfoAir"));
        let router = create_router(AppState::new(fan.clone()));
        (bridge, fan, router)
    }

    async fn send_get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root() {
        let (_bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_info() {
        let (_bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["unique_id"], "api-test-uuid");
        assert_eq!(body["data"]["speed_count"], 3);
        assert_eq!(body["data"]["preset_modes"][0], "auto");
        assert_eq!(body["data"]["preset_modes"][1], "manual");
        assert_eq!(body["data"]["supported_features"], 57);
    }

    #[tokio::test]
    async fn test_status_unknown_before_updates() {
        let (_bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/status").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["percentage"].is_null());
        assert!(body["data"]["preset_mode"].is_null());
    }

    #[tokio::test]
    async fn test_turn_on_defaults_to_low() {
        let (bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/on").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["percentage"], 33);
        assert_eq!(body["data"]["speed"], "low");
        assert_eq!(
            bridge.commands(),
            vec![BridgeCommand::SetSpeed(VentilationSpeed::Low)]
        );
    }

    #[tokio::test]
    async fn test_turn_on_with_preset_mode() {
        let (bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/on?preset_mode=auto&percentage=80").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["preset_mode"], "auto");
        assert_eq!(
            bridge.commands(),
            vec![BridgeCommand::SetMode(VentilationMode::Auto)]
        );
    }

    #[tokio::test]
    async fn test_turn_off() {
        let (_bridge, fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/off").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_on"], false);
        assert_eq!(fan.percentage(), Some(0));
    }

    #[tokio::test]
    async fn test_set_percentage() {
        let (_bridge, fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/percentage?value=50").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["percentage"], 67);
        assert_eq!(fan.percentage(), Some(67));
    }

    #[tokio::test]
    async fn test_set_percentage_out_of_range() {
        let (bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/percentage?value=999").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("999"));
        assert!(bridge.commands().is_empty());
    }

    #[tokio::test]
    async fn test_set_percentage_missing_value() {
        let (_bridge, _fan, router) = test_app();
        let (status, _body) = send_get(router, "/api/v0/fan/percentage").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_set_invalid_preset_mode() {
        let (bridge, _fan, router) = test_app();
        let (status, body) = send_get(router, "/api/v0/fan/preset?mode=InvalidPresetMode").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("InvalidPresetMode"));
        assert!(bridge.commands().is_empty());
    }

    #[tokio::test]
    async fn test_set_preset_mode() {
        let (_bridge, fan, router) = test_app();
        let (status, _body) = send_get(router, "/api/v0/fan/preset?mode=manual").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fan.preset_mode(), Some(VentilationMode::Manual));
    }

    #[tokio::test]
    async fn test_bridge_failure_maps_to_503() {
        let (bridge, _fan, router) = test_app();
        bridge.fail_next("unit unreachable");

        let (status, body) = send_get(router, "/api/v0/fan/percentage?value=100").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("unit unreachable"));
    }
}
