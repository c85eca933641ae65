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

//! CAS login: redirect towards the CAS server.
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use std::collections::HashMap;

use crate::api::error::CasApiError;
use crate::auth::login::login_url;
use crate::service::ServiceState;

/// Send the browser to the CAS login page.
#[utoipa::path(
    get,
    path = "/cas/login",
    operation_id = "cas:login",
    params(
        ("next" = Option<String>, Query, description = "Where to return after the login")
    ),
    responses(
        (status = 303, description = "Redirect to the CAS login page"),
    ),
    tag = "cas"
)]
#[tracing::instrument(name = "api::cas_login", level = "debug", skip(state))]
pub(super) async fn login(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, CasApiError> {
    let variant = state.config.cas.protocol_variant()?;
    let url = login_url(
        &state.config.cas,
        variant,
        false,
        params.get("next").map(String::as_str),
    )
    .map_err(CasApiError::from)?;
    Ok(Redirect::to(url.as_str()))
}
