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

//! CAS logout: drop the local session and optionally propagate to the
//! CAS server.
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;

use crate::api::{common, error::CasApiError};
use crate::auth::{self, login::single_sign_out_url};
use crate::service::ServiceState;

/// Log the user out.
#[utoipa::path(
    get,
    path = "/cas/logout",
    operation_id = "cas:logout",
    responses(
        (status = 303, description = "Redirect to the application or the CAS logout page"),
    ),
    tag = "cas"
)]
#[tracing::instrument(name = "api::cas_logout", level = "debug", skip_all)]
pub(super) async fn logout(
    State(state): State<ServiceState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CasApiError> {
    let cas = &state.config.cas;
    let session_id = jar
        .get(&cas.cookie_name)
        .map(|cookie| cookie.value().to_string());
    auth::logout(&state, session_id.as_deref()).await?;

    let target = if cas.single_sign_out {
        single_sign_out_url(cas)
            .map_err(CasApiError::from)?
            .to_string()
    } else {
        common::application_home(cas)
    };
    Ok((
        jar.add(common::clear_session_cookie(cas)),
        Redirect::to(&target),
    ))
}
