// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Request identification middleware.
//!
//! Resolves the session cookie on every application request and stashes the
//! [`Session`] in the request extensions. The CAS endpoints themselves are
//! exempt, they manage the session lifecycle.
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use regex::Regex;

use crate::api::{common, error::CasApiError};
use crate::auth::{IdentifyOutcome, identify, login::login_url};
use crate::service::ServiceState;
use crate::session::types::Session;

/// Identify the caller before the inner handler runs.
pub async fn session_middleware(
    State(state): State<ServiceState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, CasApiError> {
    if request.uri().path().starts_with("/cas/") {
        return Ok(next.run(request).await);
    }

    let cas = &state.config.cas;
    let session_id = jar
        .get(&cas.cookie_name)
        .map(|cookie| cookie.value().to_string());

    match identify(&state, session_id.as_deref()).await? {
        IdentifyOutcome::Authenticated(session) => {
            request.extensions_mut().insert::<Session>(session);
            Ok(next.run(request).await)
        }
        IdentifyOutcome::SignedOut => {
            // The ticket behind this session was invalidated upstream. Drop
            // the stale cookie and send the browser to the logged-out page.
            let target = common::application_home(cas);
            Ok((
                jar.add(common::clear_session_cookie(cas)),
                Redirect::to(&target),
            )
                .into_response())
        }
        IdentifyOutcome::Anonymous => {
            // A gateway checkup asks the CAS server whether the browser
            // already holds a single-sign-on session. API and resource
            // download routes are served anonymously, and the checkup
            // cookie throttles the round trips for everything else.
            if cas.gateway_login
                && !is_unauthenticated_path(request.uri().path())
                && jar.get(&cas.login_checkup_cookie).is_none()
            {
                let next_url = request
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or_else(|| request.uri().path());
                let target = login_url(cas, cas.protocol_variant()?, true, Some(next_url))?;
                return Ok(Redirect::to(target.as_str()).into_response());
            }
            Ok(next.run(request).await)
        }
    }
}

/// Routes that machine clients hit without a browser session.
fn is_unauthenticated_path(path: &str) -> bool {
    [
        r".*/api(/\d+)?/action/.*",
        r".*/dataset/.+/resource/.+/download/.+",
    ]
    .iter()
    .any(|pattern| {
        Regex::new(pattern)
            .map(|re| re.is_match(path))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use super::*;
    use crate::api::tests::{get_mocked_state, get_mocked_state_with_config};
    use crate::config::{Config, tests::valid_cas_section};
    use crate::provider::Provider;
    use crate::session::MockSessionProvider;
    use crate::ticket::MockTicketProvider;

    async fn whoami(request: Request<Body>) -> String {
        match request.extensions().get::<Session>() {
            Some(session) => session.username.clone(),
            None => "anonymous".to_string(),
        }
    }

    fn app(state: ServiceState) -> Router {
        Router::new()
            .route("/page", get(whoami))
            .route("/api/{version}/action/{name}", get(whoami))
            .layer(from_fn_with_state(state.clone(), session_middleware))
            .with_state(state)
    }

    fn identified_provider() -> crate::provider::ProviderBuilder {
        let mut session_mock = MockSessionProvider::default();
        session_mock.expect_get_session().returning(|_, _| {
            Ok(Some(Session {
                id: "sid".into(),
                username: "alice".into(),
                ..Default::default()
            }))
        });
        let mut ticket_mock = MockTicketProvider::default();
        ticket_mock.expect_is_valid().returning(|_, _| Ok(true));
        Provider::mocked_builder()
            .session(session_mock)
            .ticket(ticket_mock)
    }

    #[tokio::test]
    #[traced_test]
    async fn test_session_is_attached_to_the_request() {
        let state = get_mocked_state(identified_provider());

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/page")
                    .header(header::COOKIE, "sessionid=sid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upstream_logout_redirects_to_the_logged_out_page() {
        let mut session_mock = MockSessionProvider::default();
        session_mock.expect_get_session().returning(|_, _| {
            Ok(Some(Session {
                id: "sid".into(),
                username: "alice".into(),
                ..Default::default()
            }))
        });
        session_mock
            .expect_clear_session()
            .times(1)
            .returning(|_, _| Ok(()));
        let mut ticket_mock = MockTicketProvider::default();
        ticket_mock.expect_is_valid().returning(|_, _| Ok(false));
        let state = get_mocked_state(
            Provider::mocked_builder()
                .session(session_mock)
                .ticket(ticket_mock),
        );

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/page")
                    .header(header::COOKIE, "sessionid=sid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://data.example.org"
        );
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("sessionid="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_anonymous_request_passes_through() {
        let state = get_mocked_state(Provider::mocked_builder());

        let response = app(state)
            .oneshot(Request::builder().uri("/page").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"anonymous");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_gateway_login_redirects_anonymous_browsers() {
        let mut cas = valid_cas_section();
        cas.gateway_login = true;
        let state = get_mocked_state_with_config(
            Config {
                cas,
                ..Default::default()
            },
            Provider::mocked_builder(),
        );

        let response = app(state)
            .oneshot(Request::builder().uri("/page").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("https://sso.example.org/cas/login?gateway=true"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_gateway_redirect_preserves_the_query_string() {
        let mut cas = valid_cas_section();
        cas.gateway_login = true;
        let state = get_mocked_state_with_config(
            Config {
                cas,
                ..Default::default()
            },
            Provider::mocked_builder(),
        );

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/page?tags=budget")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        // The return target rides inside the service URL, encoded twice.
        assert!(location.contains("next%3D%252Fpage%253Ftags%253Dbudget"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_gateway_login_skips_unauthenticated_routes() {
        let mut cas = valid_cas_section();
        cas.gateway_login = true;
        let state = get_mocked_state_with_config(
            Config {
                cas,
                ..Default::default()
            },
            Provider::mocked_builder(),
        );

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/3/action/package_list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_unauthenticated_path_patterns() {
        assert!(is_unauthenticated_path("/api/3/action/package_list"));
        assert!(is_unauthenticated_path("/api/action/package_list"));
        assert!(is_unauthenticated_path(
            "/dataset/budget/resource/r1/download/data.csv"
        ));
        assert!(!is_unauthenticated_path("/dataset/budget"));
        assert!(!is_unauthenticated_path("/page"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_checkup_cookie_suppresses_the_gateway_redirect() {
        let mut cas = valid_cas_section();
        cas.gateway_login = true;
        let state = get_mocked_state_with_config(
            Config {
                cas,
                ..Default::default()
            },
            Provider::mocked_builder(),
        );

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/page")
                    .header(header::COOKIE, "cas_login_check=1756500000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
