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

use thiserror::Error;

use crate::config::ConfigError;
use crate::identity::error::IdentityProviderError;
use crate::mapping::MappingError;
use crate::protocol::error::ProtocolError;
use crate::session::error::SessionProviderError;
use crate::ticket::error::TicketProviderError;

#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The CAS server denied the ticket, or its response was malformed.
    #[error("validation of ticket {ticket} failed: {reason}")]
    Rejected { ticket: String, reason: String },

    /// The role marker was absent or matched neither configured property.
    /// Membership in one of the configured groups is a hard requirement.
    #[error("only users belonging to the configured teams may authenticate")]
    RoleNotAllowed,

    // The configuration is validated at startup, hitting this during a
    // callback means the file changed under a running service.
    #[error(transparent)]
    Configuration {
        #[from]
        source: ConfigError,
    },

    /// Provisioning the local account failed; the login is aborted.
    #[error("creating the local user failed: {source}")]
    Provisioning { source: IdentityProviderError },

    #[error(transparent)]
    Identity {
        #[from]
        source: IdentityProviderError,
    },

    /// A required attribute could not be mapped. Treated as a rejection.
    #[error(transparent)]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error(transparent)]
    Protocol {
        #[from]
        source: ProtocolError,
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

    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}
