use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use hw_infra::InfrastructureError;

use crate::routes::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// State of one backing store
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: &'static str,
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// `GET /health`
///
/// Pings the MySQL pool and Redis when the process uses them. In-memory
/// backends have nothing to check.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let mut components = Vec::new();

    if let Some(database) = &state.database {
        components.push(ComponentHealth {
            name: "database",
            up: is_up("database", database.health_check()).await,
            detail: serde_json::to_value(database.get_statistics()).ok(),
        });
    }

    if let Some(redis) = &state.redis {
        components.push(ComponentHealth {
            name: "redis",
            up: is_up("redis", redis.health_check()).await,
            detail: None,
        });
    }

    health_response(&components)
}

async fn is_up<F>(component: &'static str, check: F) -> bool
where
    F: Future<Output = Result<bool, InfrastructureError>>,
{
    match tokio::time::timeout(CHECK_TIMEOUT, check).await {
        Ok(Ok(up)) => up,
        Ok(Err(e)) => {
            tracing::warn!(component, error = %e, "Health check failed");
            false
        }
        Err(_) => {
            tracing::warn!(component, "Health check timed out");
            false
        }
    }
}

/// 200 when every component is up, 503 otherwise
pub fn health_response(components: &[ComponentHealth]) -> HttpResponse {
    let healthy = components.iter().all(|c| c.up);
    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "hampyworld-otp",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": components,
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn test_no_components_is_healthy() {
        let response = health_response(&[]);
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["components"], serde_json::json!([]));
    }

    #[actix_rt::test]
    async fn test_one_down_component_degrades() {
        let components = [
            ComponentHealth {
                name: "database",
                up: true,
                detail: Some(serde_json::json!({ "connections": 2 })),
            },
            ComponentHealth {
                name: "redis",
                up: false,
                detail: None,
            },
        ];
        let response = health_response(&components);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["components"][0]["detail"]["connections"], 2);
        assert_eq!(json["components"][1]["up"], false);
        assert!(json["components"][1].get("detail").is_none());
    }
}
