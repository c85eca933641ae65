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
//! # Provider manager
//!
//! Provider manager provides access to the individual service providers. This
//! gives an easy interface for passing the overall manager down to the
//! individual providers while also allowing an easy injection of mocked
//! providers.
use derive_builder::Builder;
use mockall_double::double;

use crate::config::Config;
use crate::error::CasError;
use crate::identity::IdentityApi;
#[double]
use crate::identity::IdentityProvider;
use crate::protocol::ProtocolApi;
#[double]
use crate::protocol::ProtocolClient;
use crate::session::SessionApi;
#[double]
use crate::session::SessionProvider;
use crate::ticket::TicketApi;
#[double]
use crate::ticket::TicketProvider;

/// Global provider manager.
#[derive(Builder, Clone)]
// It is necessary to use the owned pattern since otherwise builder invokes clone which immediately
// confuses mockall used in tests
#[builder(pattern = "owned")]
pub struct Provider {
    /// Configuration.
    pub config: Config,
    /// Identity (local user directory) provider.
    identity: IdentityProvider,
    /// CAS protocol client.
    protocol: ProtocolClient,
    /// Session provider.
    session: SessionProvider,
    /// Ticket ledger provider.
    ticket: TicketProvider,
}

impl Provider {
    pub fn new(cfg: Config) -> Result<Self, CasError> {
        let identity_provider = IdentityProvider::new(&cfg)?;
        let protocol_client = ProtocolClient::new(&cfg)?;
        let session_provider = SessionProvider::new(&cfg)?;
        let ticket_provider = TicketProvider::new(&cfg)?;

        Ok(Self {
            config: cfg,
            identity: identity_provider,
            protocol: protocol_client,
            session: session_provider,
            ticket: ticket_provider,
        })
    }

    /// Get the identity provider.
    pub fn get_identity_provider(&self) -> &impl IdentityApi {
        &self.identity
    }

    /// Get the protocol client.
    pub fn get_protocol_client(&self) -> &impl ProtocolApi {
        &self.protocol
    }

    /// Get the session provider.
    pub fn get_session_provider(&self) -> &impl SessionApi {
        &self.session
    }

    /// Get the ticket ledger provider.
    pub fn get_ticket_provider(&self) -> &impl TicketApi {
        &self.ticket
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        let config = Config::default();
        let identity_mock = crate::identity::MockIdentityProvider::default();
        let protocol_mock = crate::protocol::MockProtocolClient::default();
        let session_mock = crate::session::MockSessionProvider::default();
        let ticket_mock = crate::ticket::MockTicketProvider::default();

        ProviderBuilder::default()
            .config(config)
            .identity(identity_mock)
            .protocol(protocol_mock)
            .session(session_mock)
            .ticket(ticket_mock)
    }
}
