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
//! CAS gateway API
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::service::ServiceState;

mod callback;
pub(crate) mod common;
pub mod error;
pub mod identify;
mod login;
mod logout;
mod register;

#[derive(OpenApi)]
#[openapi(
    info(version = "1.0.0"),
    tags(
        (name="cas", description="CAS single-sign-on endpoints"),
        (name="user", description="User account endpoints"),
    )
)]
pub struct ApiDoc;

pub fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(login::login))
        .routes(routes!(callback::callback))
        .routes(routes!(callback::saml_callback))
        .routes(routes!(logout::logout))
        .routes(routes!(register::register))
}
