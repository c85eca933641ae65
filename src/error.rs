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
//! # Error
//!
//! Diverse errors that can occur during the gateway processing (not the API).
use thiserror::Error;

use crate::config::ConfigError;
use crate::identity::error::IdentityProviderError;
use crate::protocol::error::ProtocolError;
use crate::session::error::SessionProviderError;
use crate::ticket::error::TicketProviderError;

/// Gateway error.
#[derive(Debug, Error)]
pub enum CasError {
    /// Configuration error.
    #[error(transparent)]
    Configuration {
        #[from]
        source: ConfigError,
    },

    /// Database error outside of any provider (schema bootstrap).
    #[error(transparent)]
    Database {
        #[from]
        source: sea_orm::DbErr,
    },

    #[error(transparent)]
    IdentityError {
        #[from]
        source: IdentityProviderError,
    },

    #[error(transparent)]
    IO {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    ProtocolError {
        #[from]
        source: ProtocolError,
    },

    #[error(transparent)]
    SessionError {
        #[from]
        source: SessionProviderError,
    },

    #[error(transparent)]
    TicketError {
        #[from]
        source: TicketProviderError,
    },

    /// Url parsing error
    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}
