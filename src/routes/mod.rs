use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{admin, auth, catalog, customer, driver};
use crate::middleware::auth::{auth_middleware, require_admin, require_customer, require_driver};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Role-specific governor layers
    let driver_governor = create_role_governor(RateLimitedRole::Driver);
    let customer_governor = create_role_governor(RateLimitedRole::Customer);
    // IP-based governor for public routes
    let public_governor = create_public_governor();

    // Public routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Any authenticated user
    let profile_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Bus search and seat layouts
    let public_routes = Router::new()
        .route("/buses", get(catalog::list_buses))
        .route("/buses/{id}", get(catalog::get_bus))
        .route("/buses/{id}/seats", get(catalog::bus_seats))
        .layer(public_governor);

    // Customer routes (requires auth + customer role)
    let customer_routes = Router::new()
        .route("/booking-sessions", post(customer::open_session))
        .route("/booking-sessions/{id}", get(customer::get_session))
        .route("/booking-sessions/{id}", delete(customer::close_session))
        .route("/booking-sessions/{id}/seats/{seat}", post(customer::toggle_seat))
        .route(
            "/booking-sessions/{id}/passengers/{index}",
            put(customer::set_passenger_field),
        )
        .route("/booking-sessions/{id}/advance", post(customer::advance))
        .route("/booking-sessions/{id}/back", post(customer::go_back))
        .route(
            "/booking-sessions/{id}/payment-method",
            put(customer::choose_payment_method),
        )
        .route("/booking-sessions/{id}/submit", post(customer::submit))
        .route("/bookings", get(customer::my_bookings))
        .layer(customer_governor)
        .layer(middleware::from_fn(require_customer))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Driver routes (requires auth + driver role)
    let driver_routes = Router::new()
        .route("/buses", get(driver::my_buses))
        .route("/buses", post(driver::register_bus))
        .route("/buses/{id}", delete(driver::delete_bus))
        .route("/routes", get(driver::list_routes))
        .route("/trips", get(driver::my_trips))
        .route("/trips", post(driver::schedule_trip))
        .route("/trips/{id}", delete(driver::cancel_trip))
        .layer(driver_governor)
        .layer(middleware::from_fn(require_driver))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/stats", get(admin::backend_stats))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/users/{id}/status", patch(admin::update_user_status))
        .route("/routes", get(admin::list_routes))
        .route("/routes", post(admin::add_route))
        .route("/routes/{id}", delete(admin::delete_route))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes.merge(profile_routes))
        .nest("/api", public_routes.merge(customer_routes))
        .nest("/api/driver", driver_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        extract::ConnectInfo,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::catalog::BusCatalog;
    use crate::config::Config;
    use crate::models::user::UserRole;
    use crate::services::ApiClient;
    use crate::sessions::SessionStore;
    use crate::utils::jwt::create_token;

    const SECRET: &str = "test-secret";

    fn state_for(api_base_url: &str) -> AppState {
        let config = Config {
            api_base_url: api_base_url.to_string(),
            jwt_secret: SECRET.to_string(),
            api_timeout_secs: 5,
            session_idle_secs: 1800,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
        };
        AppState {
            api: ApiClient::new(&config.api_base_url, Duration::from_secs(5)).unwrap(),
            config,
            catalog: Arc::new(BusCatalog::demo()),
            sessions: SessionStore::new(),
        }
    }

    fn token(user_id: &str, role: UserRole) -> String {
        create_token(user_id, &format!("{user_id}@example.in"), role, SECRET, 1).unwrap()
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let mut request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_public_bus_listing_sorted_by_price() {
        let app = create_router(state_for("http://127.0.0.1:9"));
        let (status, body) = call(&app, Method::GET, "/api/buses?sort=price", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_seat_layout_boundary() {
        let app = create_router(state_for("http://127.0.0.1:9"));
        let (status, body) = call(&app, Method::GET, "/api/buses/1/seats", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[14]["available"], true);
        assert_eq!(body[15]["available"], false);
    }

    #[tokio::test]
    async fn test_booking_wizard_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings"))
            .and(body_partial_json(json!({
                "tripId": 1,
                "seatNumbers": [1, 2],
                "totalPrice": 2832,
                "paymentMethod": "upi"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "BK-9001" })))
            .expect(1)
            .mount(&server)
            .await;

        let app = create_router(state_for(&server.uri()));
        let customer = token("cust-1", UserRole::Customer);
        let auth = Some(customer.as_str());

        let (status, opened) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            auth,
            Some(json!({ "busId": 1, "passengers": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = opened["sessionId"].as_str().unwrap().to_string();
        let base = format!("/api/booking-sessions/{id}");

        let (_, rejected) = call(&app, Method::POST, &format!("{base}/seats/16"), auth, None).await;
        assert_eq!(rejected["changed"], false);
        call(&app, Method::POST, &format!("{base}/seats/1"), auth, None).await;
        call(&app, Method::POST, &format!("{base}/seats/2"), auth, None).await;
        let (_, third) = call(&app, Method::POST, &format!("{base}/seats/3"), auth, None).await;
        assert_eq!(third["changed"], false);
        assert_eq!(third["selectedSeats"], json!([1, 2]));

        let (_, details) = call(&app, Method::POST, &format!("{base}/advance"), auth, None).await;
        assert_eq!(details["step"], "passengerDetails");

        for index in 0..2 {
            for (field, value) in [("name", "Kiran"), ("age", "41"), ("gender", "other"), ("idProof", "P-77")] {
                call(
                    &app,
                    Method::PUT,
                    &format!("{base}/passengers/{index}"),
                    auth,
                    Some(json!({ "field": field, "value": value })),
                )
                .await;
            }
        }

        let (_, payment) = call(&app, Method::POST, &format!("{base}/advance"), auth, None).await;
        assert_eq!(payment["step"], "payment");
        assert_eq!(payment["price"]["total"], 2832);

        let (_, early) = call(&app, Method::POST, &format!("{base}/submit"), auth, None).await;
        assert_eq!(early["changed"], false);
        assert_eq!(early["step"], "payment");

        call(
            &app,
            Method::PUT,
            &format!("{base}/payment-method"),
            auth,
            Some(json!({ "method": "upi" })),
        )
        .await;
        let (status, confirmed) = call(&app, Method::POST, &format!("{base}/submit"), auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["step"], "confirmation");
        assert_eq!(confirmed["confirmationCode"], "BK-9001");

        let (status, _) = call(&app, Method::GET, &base, auth, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_created_body_confirms_with_provisional_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let state = state_for(&server.uri());
        let app = create_router(state.clone());
        let customer = token("cust-1", UserRole::Customer);
        let auth = Some(customer.as_str());

        let (_, opened) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            auth,
            Some(json!({ "busId": 2, "passengers": 1 })),
        )
        .await;
        let id = opened["sessionId"].as_str().unwrap().to_string();
        let base = format!("/api/booking-sessions/{id}");

        call(&app, Method::POST, &format!("{base}/seats/5"), auth, None).await;
        call(&app, Method::POST, &format!("{base}/advance"), auth, None).await;
        for (field, value) in [("name", "Ravi"), ("age", "29"), ("gender", "male"), ("idProof", "DL-4")] {
            call(
                &app,
                Method::PUT,
                &format!("{base}/passengers/0"),
                auth,
                Some(json!({ "field": field, "value": value })),
            )
            .await;
        }
        call(&app, Method::POST, &format!("{base}/advance"), auth, None).await;
        call(
            &app,
            Method::PUT,
            &format!("{base}/payment-method"),
            auth,
            Some(json!({ "method": "wallet" })),
        )
        .await;

        let (status, confirmed) = call(&app, Method::POST, &format!("{base}/submit"), auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["step"], "confirmation");
        assert!(confirmed["confirmationCode"].as_str().unwrap().starts_with("SWIFT"));
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_payment_step() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bookings"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Gateway timeout" })))
            .mount(&server)
            .await;

        let state = state_for(&server.uri());
        let app = create_router(state.clone());
        let customer = token("cust-1", UserRole::Customer);
        let auth = Some(customer.as_str());

        let (_, opened) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            auth,
            Some(json!({ "busId": 3, "passengers": 1 })),
        )
        .await;
        let id = opened["sessionId"].as_str().unwrap().to_string();
        let base = format!("/api/booking-sessions/{id}");

        call(&app, Method::POST, &format!("{base}/seats/8"), auth, None).await;
        call(&app, Method::POST, &format!("{base}/advance"), auth, None).await;
        for (field, value) in [("name", "Lata"), ("age", "67"), ("gender", "female"), ("idProof", "A-1")] {
            call(
                &app,
                Method::PUT,
                &format!("{base}/passengers/0"),
                auth,
                Some(json!({ "field": field, "value": value })),
            )
            .await;
        }
        call(&app, Method::POST, &format!("{base}/advance"), auth, None).await;
        call(
            &app,
            Method::PUT,
            &format!("{base}/payment-method"),
            auth,
            Some(json!({ "method": "wallet" })),
        )
        .await;

        let (status, failed) = call(&app, Method::POST, &format!("{base}/submit"), auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(failed["step"], "payment");
        assert_eq!(failed["submission"]["state"], "failed");
        assert_eq!(failed["submission"]["error"], "Gateway timeout");
        assert_eq!(failed["passengers"][0]["name"], "Lata");
    }

    #[tokio::test]
    async fn test_sessions_are_private() {
        let app = create_router(state_for("http://127.0.0.1:9"));
        let owner = token("cust-1", UserRole::Customer);
        let other = token("cust-2", UserRole::Customer);

        let (_, opened) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            Some(owner.as_str()),
            Some(json!({ "busId": 2, "passengers": 1 })),
        )
        .await;
        let id = opened["sessionId"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/api/booking-sessions/{id}/seats/1"),
            Some(other.as_str()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_open_session_validates_passenger_count() {
        let app = create_router(state_for("http://127.0.0.1:9"));
        let customer = token("cust-1", UserRole::Customer);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            Some(customer.as_str()),
            Some(json!({ "busId": 3, "passengers": 9 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            Some(customer.as_str()),
            Some(json!({ "busId": 42, "passengers": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_role_gates() {
        let app = create_router(state_for("http://127.0.0.1:9"));
        let driver = token("drv-1", UserRole::Driver);
        let customer = token("cust-1", UserRole::Customer);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/booking-sessions",
            Some(driver.as_str()),
            Some(json!({ "busId": 1, "passengers": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&app, Method::GET, "/api/admin/dashboard", Some(customer.as_str()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&app, Method::GET, "/api/driver/buses", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_driver_cannot_schedule_on_foreign_bus() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/buses/driver/drv-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/buses/routes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "_id": "r1", "from": "Mumbai", "to": "Pune", "price": 600 }
            ])))
            .mount(&server)
            .await;

        let app = create_router(state_for(&server.uri()));
        let driver = token("drv-1", UserRole::Driver);
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/driver/trips",
            Some(driver.as_str()),
            Some(json!({
                "bus": "someone-elses-bus",
                "route": "r1",
                "departureTime": "2030-01-01T08:00:00Z",
                "arrivalTime": "2030-01-01T12:00:00Z"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
