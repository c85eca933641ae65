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

//! Registration redirect. Accounts live on the CAS side, the gateway only
//! points the browser at the remote signup page.
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};

use crate::api::error::CasApiError;
use crate::service::ServiceState;

/// Send the browser to the remote registration page.
#[utoipa::path(
    get,
    path = "/user/register",
    operation_id = "user:register",
    responses(
        (status = 303, description = "Redirect to the registration page"),
        (status = 404, description = "No registration page is configured"),
    ),
    tag = "user"
)]
#[tracing::instrument(name = "api::user_register", level = "debug", skip_all)]
pub(super) async fn register(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, CasApiError> {
    match &state.config.cas.register_url {
        Some(url) => Ok(Redirect::to(url)),
        None => Err(CasApiError::NotFound {
            resource: "registration page".into(),
            identifier: "cas.register_url".into(),
        }),
    }
}
