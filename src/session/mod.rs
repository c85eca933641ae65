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
//! # Session provider
//!
//! Binds a browser to a local username. The session id is an opaque random
//! value carried in the session cookie; the binding itself lives in the
//! database so any instance of the gateway can resolve it.
use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use mockall::mock;
use uuid::Uuid;

pub mod backends;
pub mod error;
pub mod types;

use crate::config::Config;
use crate::service::ServiceState;
use crate::session::backends::SessionBackend;
use crate::session::backends::sql::SqlBackend;
use crate::session::error::SessionProviderError;
use crate::session::types::Session;

#[derive(Clone, Debug)]
pub struct SessionProvider {
    backend_driver: Box<dyn SessionBackend>,
}

#[async_trait]
pub trait SessionApi: Send + Sync + Clone {
    /// Establish a fresh session identity for the username.
    async fn start_session<'a>(
        &self,
        state: &ServiceState,
        username: &'a str,
    ) -> Result<Session, SessionProviderError>;

    /// Resolve a session id from the cookie.
    async fn get_session<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<Option<Session>, SessionProviderError>;

    /// Drop a session binding.
    async fn clear_session<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<(), SessionProviderError>;
}

impl SessionProvider {
    pub fn new(config: &Config) -> Result<Self, SessionProviderError> {
        let backend_driver = match config.session.driver.as_str() {
            "sql" => Box::new(SqlBackend::default()),
            other => {
                return Err(SessionProviderError::UnsupportedDriver(other.into()));
            }
        };
        Ok(Self { backend_driver })
    }
}

#[async_trait]
impl SessionApi for SessionProvider {
    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn start_session<'a>(
        &self,
        state: &ServiceState,
        username: &'a str,
    ) -> Result<Session, SessionProviderError> {
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            username: username.into(),
            started_at: Utc::now(),
        };
        self.backend_driver.create(&state.db, session).await
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get_session<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<Option<Session>, SessionProviderError> {
        self.backend_driver.get(&state.db, id).await
    }

    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn clear_session<'a>(
        &self,
        state: &ServiceState,
        id: &'a str,
    ) -> Result<(), SessionProviderError> {
        self.backend_driver.delete(&state.db, id).await
    }
}

#[cfg(test)]
mock! {
    pub SessionProvider {
        pub fn new(cfg: &Config) -> Result<Self, SessionProviderError>;
    }

    #[async_trait]
    impl SessionApi for SessionProvider {
        async fn start_session<'a>(
            &self,
            state: &ServiceState,
            username: &'a str,
        ) -> Result<Session, SessionProviderError>;

        async fn get_session<'a>(
            &self,
            state: &ServiceState,
            id: &'a str,
        ) -> Result<Option<Session>, SessionProviderError>;

        async fn clear_session<'a>(
            &self,
            state: &ServiceState,
            id: &'a str,
        ) -> Result<(), SessionProviderError>;
    }

    impl Clone for SessionProvider {
        fn clone(&self) -> Self;
    }
}
