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
//! # CAS gateway API error.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::error::AuthenticationError;
use crate::config::ConfigError;
use crate::session::error::SessionProviderError;
use crate::ticket::error::TicketProviderError;

/// CAS gateway API operation errors
#[derive(Debug, Error)]
pub enum CasApiError {
    #[error("could not find {resource}: {identifier}")]
    NotFound {
        resource: String,
        identifier: String,
    },

    #[error("{0}.")]
    BadRequest(String),

    #[error(transparent)]
    Authentication {
        #[from]
        source: AuthenticationError,
    },

    #[error(transparent)]
    Configuration {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    Session {
        #[from]
        source: SessionProviderError,
    },

    #[error(transparent)]
    Ticket {
        #[from]
        source: TicketProviderError,
    },
}

impl IntoResponse for CasApiError {
    fn into_response(self) -> Response {
        error!("Error happened during request processing: {:#?}", self);

        let status_code = match self {
            CasApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            CasApiError::BadRequest(..) => StatusCode::BAD_REQUEST,
            CasApiError::Authentication { ref source } => match source {
                // Denied tickets and unmappable attribute bags are the
                // remote server refusing to vouch for the user.
                AuthenticationError::Rejected { .. } | AuthenticationError::Mapping { .. } => {
                    StatusCode::UNAUTHORIZED
                }
                AuthenticationError::RoleNotAllowed => StatusCode::FORBIDDEN,
                // The CAS server was unreachable or misbehaved; no retry,
                // tickets are single-use.
                AuthenticationError::Protocol { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            CasApiError::Configuration { .. }
            | CasApiError::Session { .. }
            | CasApiError::Ticket { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status_code,
            Json(json!({"error": {"code": status_code.as_u16(), "message": self.to_string()}})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: CasApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(
                AuthenticationError::Rejected {
                    ticket: "ST-1".into(),
                    reason: "denied".into(),
                }
                .into()
            ),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthenticationError::RoleNotAllowed.into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(
                AuthenticationError::Mapping {
                    source: crate::mapping::MappingError::MissingAttribute("email"),
                }
                .into()
            ),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(
                AuthenticationError::Provisioning {
                    source: crate::identity::error::IdentityProviderError::UnsupportedDriver(
                        "x".into()
                    ),
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
