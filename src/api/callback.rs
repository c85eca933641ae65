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

//! CAS callbacks: the CAS server hands the browser back here with a ticket.
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use std::collections::HashMap;

use crate::api::{common, error::CasApiError};
use crate::auth::{self, error::AuthenticationError};
use crate::protocol::types::ProtocolVariant;
use crate::service::ServiceState;

/// Shared callback core. Both variants differ only in the validation
/// endpoint the ticket is presented to.
async fn ticket_callback(
    state: ServiceState,
    variant: ProtocolVariant,
    params: HashMap<String, String>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CasApiError> {
    let cas = &state.config.cas;

    // The CAS server answers a gateway checkup without a ticket when the
    // browser has no single-sign-on session. Remember the checkup and move
    // on anonymously.
    let Some(ticket) = params.get(&cas.ticket_key) else {
        tracing::debug!("callback without a ticket, recording the login checkup");
        return Ok((
            jar.add(common::checkup_cookie(cas)),
            Redirect::to(&cas.application_url),
        ));
    };

    let next = params.get("next").map(String::as_str);
    match auth::authenticate_ticket(&state, variant, ticket, next).await {
        Ok(login) => Ok((
            jar.add(common::session_cookie(cas, &login.session.id)),
            Redirect::to(&login.redirect_to),
        )),
        Err(
            err @ (AuthenticationError::Rejected { .. } | AuthenticationError::Mapping { .. }),
        ) => match &cas.unsuccessful_login_redirect_url {
            Some(url) => {
                tracing::warn!("login rejected, redirecting: {err}");
                Ok((jar, Redirect::to(url)))
            }
            None => Err(err.into()),
        },
        Err(err) => Err(err.into()),
    }
}

/// CAS protocol v2 callback.
#[utoipa::path(
    get,
    path = "/cas/callback",
    operation_id = "cas:callback",
    params(
        ("ticket" = Option<String>, Query, description = "Service ticket issued by the CAS server"),
        ("next" = Option<String>, Query, description = "Where to return after the login")
    ),
    responses(
        (status = 303, description = "Redirect into the application"),
        (status = 401, description = "The CAS server rejected the ticket"),
        (status = 403, description = "The user does not belong to an allowed team"),
    ),
    tag = "cas"
)]
#[tracing::instrument(name = "api::cas_callback", level = "debug", skip_all)]
pub(super) async fn callback(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<ServiceState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CasApiError> {
    ticket_callback(state, ProtocolVariant::ServiceValidation, params, jar).await
}

/// SAML 1.1 callback.
#[utoipa::path(
    get,
    path = "/cas/saml_callback",
    operation_id = "cas:saml_callback",
    params(
        ("ticket" = Option<String>, Query, description = "Service ticket issued by the CAS server"),
        ("next" = Option<String>, Query, description = "Where to return after the login")
    ),
    responses(
        (status = 303, description = "Redirect into the application"),
        (status = 401, description = "The CAS server rejected the ticket"),
        (status = 403, description = "The user does not belong to an allowed team"),
    ),
    tag = "cas"
)]
#[tracing::instrument(name = "api::cas_saml_callback", level = "debug", skip_all)]
pub(super) async fn saml_callback(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<ServiceState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CasApiError> {
    ticket_callback(state, ProtocolVariant::SamlValidation, params, jar).await
}
