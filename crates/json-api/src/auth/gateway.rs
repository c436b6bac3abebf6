//! Auth gateway.
//!
//! Mounted as a hoop above every protected route. Public routes are never
//! nested beneath it, so they reach their handlers without a credential.

use std::sync::Arc;

use salvo::{
    http::{Method, header::AUTHORIZATION},
    prelude::*,
};
use tracing::debug;

use storefront_app::auth::VerifyError;

use crate::{errors::ApiError, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    // CORS preflight carries no credentials.
    if req.method() == Method::OPTIONS {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();
            return;
        }
    };

    let verified =
        bearer_credential(req).and_then(|credential| state.app.verifier.verify(credential));

    match verified {
        Ok(identity) => {
            depot.insert_identity(identity);
            ctrl.call_next(req, depot, res).await;
        }
        Err(error) => {
            debug!(path = %req.uri().path(), %error, "request rejected");

            res.render(ApiError::unauthorized(error.to_string()));
            ctrl.skip_rest();
        }
    }
}

fn bearer_credential(req: &Request) -> Result<&str, VerifyError> {
    let value = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(VerifyError::Missing)?
        .to_str()
        .map_err(|_not_ascii| VerifyError::Malformed)?;

    let (scheme, credential) = value.split_once(' ').ok_or(VerifyError::Malformed)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(VerifyError::Malformed);
    }

    match credential.trim() {
        "" => Err(VerifyError::Missing),
        credential => Ok(credential),
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use storefront_app::{
        auth::{Identity, MockIdentityVerifier},
        domain::users::records::UserUuid,
    };

    use crate::{
        errors::{ErrorBody, ErrorCode},
        test_helpers::MockApp,
    };

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot
            .identity()
            .map_or_else(|| "anonymous".to_string(), |identity| identity.user.to_string());

        res.render(user);
    }

    fn make_service(verifier: MockIdentityVerifier) -> Service {
        let state = MockApp {
            verifier,
            ..MockApp::default()
        }
        .into_state();

        let router = Router::new()
            .hoop(inject(state))
            .hoop(handler)
            .push(Router::new().get(echo_user).options(echo_user));

        Service::new(router)
    }

    fn never_called() -> MockIdentityVerifier {
        let mut verifier = MockIdentityVerifier::new();

        verifier.expect_verify().never();

        verifier
    }

    #[tokio::test]
    async fn missing_authorization_header_returns_401() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .send(&make_service(never_called()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.error, ErrorCode::Unauthorized);
        assert_eq!(body.message, VerifyError::Missing.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn non_bearer_scheme_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(never_called()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn empty_bearer_credential_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer   ", true)
            .send(&make_service(never_called()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_credential_returns_401_with_reason() -> TestResult {
        let mut verifier = MockIdentityVerifier::new();

        verifier
            .expect_verify()
            .once()
            .withf(|credential| credential == "abc123")
            .return_once(|_| Err(VerifyError::Expired));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(verifier))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        let body: ErrorBody = res.take_json().await?;

        assert_eq!(body.error, ErrorCode::Unauthorized);
        assert_eq!(body.message, "credential has expired");

        Ok(())
    }

    #[tokio::test]
    async fn verified_credential_injects_identity() -> TestResult {
        let user = UserUuid::new();
        let mut verifier = MockIdentityVerifier::new();

        verifier
            .expect_verify()
            .once()
            .withf(|credential| credential == "abc123")
            .return_once(move |_| {
                Ok(Identity {
                    user,
                    expires_at: Timestamp::MAX,
                })
            });

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer abc123", true)
            .send(&make_service(verifier))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, user.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn preflight_passes_without_identity() -> TestResult {
        let mut res = TestClient::options("http://example.com")
            .send(&make_service(never_called()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "anonymous");

        Ok(())
    }
}
