//! App Router
//!
//! Every route is listed once with its [`Access`]. Protected routes are
//! mounted beneath the auth gateway; public ones are not. The API docs are
//! generated from the API routes and are themselves public.

use salvo::{
    Router,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
};

use crate::{auth, carts, healthcheck, observability::metrics_handler, products};

/// Whether a route requires a verified bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Public,
    Protected,
}

const OPENAPI_PATH: &str = "/api/docs/openapi.json";

fn routes() -> Vec<(Access, Router)> {
    vec![
        (
            Access::Public,
            Router::with_path("health").get(healthcheck::handler),
        ),
        (
            Access::Public,
            Router::with_path("metrics").get(metrics_handler),
        ),
        (
            Access::Protected,
            Router::with_path("api/cart").get(carts::get::handler),
        ),
        (
            Access::Protected,
            Router::with_path("api/cart/add").post(carts::add::handler),
        ),
        (
            Access::Protected,
            Router::with_path("api/cart/item/{id}")
                .put(carts::update::handler)
                .delete(carts::remove::handler),
        ),
        (
            Access::Protected,
            Router::with_path("api/cart/clear").delete(carts::clear::handler),
        ),
        (
            Access::Protected,
            Router::with_path("api/products")
                .get(products::index::handler)
                .post(products::create::handler),
        ),
        (
            Access::Protected,
            Router::with_path("api/products/{id}")
                .get(products::get::handler)
                .put(products::update::handler)
                .delete(products::delete::handler),
        ),
    ]
}

fn doc_routes(api: &Router) -> Vec<(Access, Router)> {
    let doc = OpenApi::new("Storefront API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(api);

    vec![
        (Access::Public, doc.into_router(OPENAPI_PATH)),
        (
            Access::Public,
            SwaggerUi::new(OPENAPI_PATH).into_router("api/docs"),
        ),
    ]
}

/// The API routes followed by the docs describing them.
fn all_routes() -> Vec<(Access, Router)> {
    let docs = doc_routes(&mount(routes()));

    routes().into_iter().chain(docs).collect()
}

fn mount(routes: Vec<(Access, Router)>) -> Router {
    let mut public = Router::new();
    let mut protected = Router::new().hoop(auth::gateway::handler);

    for (access, route) in routes {
        match access {
            Access::Public => public = public.push(route),
            Access::Protected => protected = protected.push(route),
        }
    }

    public.push(protected)
}

/// Routes grouped by access. State injection and request middleware are the
/// caller's concern.
pub(crate) fn app_router() -> Router {
    mount(all_routes())
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use jiff::Timestamp;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{RequestBuilder, ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use storefront_app::{
        auth::{Claims, JwtSettings, JwtVerifier},
        context::AppContext,
        domain::{
            carts::{MockCartsService, records::Cart},
            users::records::UserUuid,
        },
    };

    use crate::{
        carts::get::CartResponse,
        errors::{ErrorBody, ErrorCode},
        state::State,
        test_helpers::MockApp,
    };

    use super::*;

    const SECRET: &str = "router-test-secret";

    fn service_for(app: MockApp) -> Service {
        Service::new(Router::new().hoop(inject(app.into_state())).push(app_router()))
    }

    fn protected_requests() -> Vec<RequestBuilder> {
        let id = Uuid::now_v7();

        vec![
            TestClient::get("http://example.com/api/cart"),
            TestClient::post("http://example.com/api/cart/add"),
            TestClient::put(format!("http://example.com/api/cart/item/{id}")),
            TestClient::delete(format!("http://example.com/api/cart/item/{id}")),
            TestClient::delete("http://example.com/api/cart/clear"),
            TestClient::get("http://example.com/api/products"),
            TestClient::post("http://example.com/api/products"),
            TestClient::get(format!("http://example.com/api/products/{id}")),
            TestClient::put(format!("http://example.com/api/products/{id}")),
            TestClient::delete(format!("http://example.com/api/products/{id}")),
        ]
    }

    #[test]
    fn only_health_metrics_and_docs_are_public() {
        let public = all_routes()
            .into_iter()
            .filter(|(access, _)| *access == Access::Public)
            .count();

        assert_eq!(public, 4);
    }

    #[tokio::test]
    async fn openapi_document_is_public_and_lists_cart_routes() -> TestResult {
        let mut app = MockApp::default();

        app.verifier.expect_verify().never();

        let mut res = TestClient::get("http://example.com/api/docs/openapi.json")
            .send(&service_for(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let doc = res.take_string().await?;

        assert!(doc.contains("/api/cart/item/{id}"), "missing cart routes in {doc}");
        assert!(doc.contains("bearer_auth"));

        Ok(())
    }

    #[tokio::test]
    async fn public_routes_bypass_the_gateway() -> TestResult {
        let mut app = MockApp::default();

        app.verifier.expect_verify().never();

        let service = service_for(app);

        let mut res = TestClient::get("http://example.com/health")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, r#"{"status":"ok"}"#);

        let res = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_credentials() -> TestResult {
        let mut app = MockApp::default();

        app.verifier.expect_verify().never();

        let service = service_for(app);

        for request in protected_requests() {
            let mut res = request.send(&service).await;

            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

            let body: ErrorBody = res.take_json().await?;

            assert_eq!(body.error, ErrorCode::Unauthorized);
        }

        Ok(())
    }

    fn signed_token(user: UserUuid, exp: i64) -> TestResult<String> {
        let claims = Claims {
            sub: user.to_string(),
            exp,
            iat: None,
            iss: None,
            aud: None,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )?)
    }

    fn service_with_jwt(carts: MockCartsService) -> Service {
        let MockApp {
            users,
            products,
            inventory,
            ..
        } = MockApp::default();

        let state = State::from_app_context(AppContext {
            users: Arc::new(users),
            products: Arc::new(products),
            inventory: Arc::new(inventory),
            carts: Arc::new(carts),
            verifier: Arc::new(JwtVerifier::new(&JwtSettings {
                secret: SECRET.to_string(),
                issuer: None,
                audience: None,
                leeway: Duration::from_secs(30),
            })),
        });

        Service::new(Router::new().hoop(inject(state)).push(app_router()))
    }

    #[tokio::test]
    async fn signed_token_reaches_empty_cart() -> TestResult {
        let user = UserUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(move |u| *u == user)
            .return_once(|_| Ok(Cart::default()));

        let token = signed_token(user, Timestamp::now().as_second() + 300)?;

        let mut res = TestClient::get("http://example.com/api/cart")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&service_with_jwt(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty());
        assert_eq!(body.total_items, 0);
        assert_eq!(body.total_price, 0);

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().never();

        let token = signed_token(UserUuid::new(), Timestamp::now().as_second() - 3_600)?;

        let mut res = TestClient::get("http://example.com/api/cart")
            .add_header(AUTHORIZATION, format!("Bearer {token}"), true)
            .send(&service_with_jwt(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.message, "credential has expired");

        Ok(())
    }
}
