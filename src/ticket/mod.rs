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
//! # Ticket ledger provider
//!
//! Persistent mapping of the last validated CAS ticket to the local
//! username. The ledger is advisory: it is only consulted to detect that the
//! CAS server stopped vouching for a user (single sign-out), it is not a
//! security boundary. At most one row exists per username; registering a new
//! ticket replaces the previous one.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;

pub mod backends;
pub mod error;
pub mod types;

use crate::config::Config;
use crate::service::ServiceState;
use crate::ticket::backends::TicketBackend;
use crate::ticket::backends::sql::SqlBackend;
use crate::ticket::error::TicketProviderError;
use crate::ticket::types::TicketEntry;

#[derive(Clone, Debug)]
pub struct TicketProvider {
    backend_driver: Box<dyn TicketBackend>,
}

#[async_trait]
pub trait TicketApi: Send + Sync + Clone {
    /// Record a validated ticket for the user, replacing any prior row for
    /// the same username.
    async fn register(
        &self,
        state: &ServiceState,
        entry: TicketEntry,
    ) -> Result<TicketEntry, TicketProviderError>;

    /// Is there a ledger row vouching for this username?
    async fn is_valid<'a>(
        &self,
        state: &ServiceState,
        username: &'a str,
    ) -> Result<bool, TicketProviderError>;

    /// Remove the ledger row(s) of a username.
    async fn delete_for_user<'a>(
        &self,
        state: &ServiceState,
        username: &'a str,
    ) -> Result<(), TicketProviderError>;
}

impl TicketProvider {
    pub fn new(config: &Config) -> Result<Self, TicketProviderError> {
        let backend_driver = match config.ticket.driver.as_str() {
            "sql" => Box::new(SqlBackend::default()),
            other => {
                return Err(TicketProviderError::UnsupportedDriver(other.into()));
            }
        };
        Ok(Self { backend_driver })
    }
}

#[async_trait]
impl TicketApi for TicketProvider {
    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn register(
        &self,
        state: &ServiceState,
        entry: TicketEntry,
    ) -> Result<TicketEntry, TicketProviderError> {
        self.backend_driver.register(&state.db, entry).await
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn is_valid<'a>(
        &self,
        state: &ServiceState,
        username: &'a str,
    ) -> Result<bool, TicketProviderError> {
        Ok(self
            .backend_driver
            .find_for_user(&state.db, username)
            .await?
            .is_some())
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn delete_for_user<'a>(
        &self,
        state: &ServiceState,
        username: &'a str,
    ) -> Result<(), TicketProviderError> {
        self.backend_driver.delete_for_user(&state.db, username).await
    }
}

#[cfg(test)]
mock! {
    pub TicketProvider {
        pub fn new(cfg: &Config) -> Result<Self, TicketProviderError>;
    }

    #[async_trait]
    impl TicketApi for TicketProvider {
        async fn register(
            &self,
            state: &ServiceState,
            entry: TicketEntry,
        ) -> Result<TicketEntry, TicketProviderError>;

        async fn is_valid<'a>(
            &self,
            state: &ServiceState,
            username: &'a str,
        ) -> Result<bool, TicketProviderError>;

        async fn delete_for_user<'a>(
            &self,
            state: &ServiceState,
            username: &'a str,
        ) -> Result<(), TicketProviderError>;
    }

    impl Clone for TicketProvider {
        fn clone(&self) -> Self;
    }
}
