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
//! # Identity provider
//!
//! The local user directory. Accounts are provisioned from the profile the
//! CAS server vouches for and refreshed on every subsequent login, so the
//! directory trails the upstream identity provider rather than being managed
//! by hand.
use async_trait::async_trait;
#[cfg(test)]
use mockall::mock;
use uuid::Uuid;
use validator::Validate;

pub mod backends;
pub mod error;
pub mod types;

use crate::config::Config;
use crate::identity::backends::IdentityBackend;
use crate::identity::backends::sql::SqlBackend;
use crate::identity::error::IdentityProviderError;
use crate::identity::types::{LocalUser, UserCreate, UserUpdate};
use crate::service::ServiceState;

#[derive(Clone, Debug)]
pub struct IdentityProvider {
    backend_driver: Box<dyn IdentityBackend>,
}

#[async_trait]
pub trait IdentityApi: Send + Sync + Clone {
    /// Look a user up by name.
    async fn get_user<'a>(
        &self,
        state: &ServiceState,
        name: &'a str,
    ) -> Result<Option<LocalUser>, IdentityProviderError>;

    /// Provision a new user.
    async fn create_user(
        &self,
        state: &ServiceState,
        user: UserCreate,
    ) -> Result<LocalUser, IdentityProviderError>;

    /// Refresh the drifted attributes of an existing user.
    async fn update_user<'a>(
        &self,
        state: &ServiceState,
        name: &'a str,
        update: UserUpdate,
    ) -> Result<LocalUser, IdentityProviderError>;
}

impl IdentityProvider {
    pub fn new(config: &Config) -> Result<Self, IdentityProviderError> {
        let backend_driver = match config.identity.driver.as_str() {
            "sql" => Box::new(SqlBackend::default()),
            other => {
                return Err(IdentityProviderError::UnsupportedDriver(other.into()));
            }
        };
        Ok(Self { backend_driver })
    }
}

#[async_trait]
impl IdentityApi for IdentityProvider {
    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn get_user<'a>(
        &self,
        state: &ServiceState,
        name: &'a str,
    ) -> Result<Option<LocalUser>, IdentityProviderError> {
        self.backend_driver.find_by_name(&state.db, name).await
    }

    #[tracing::instrument(level = "info", skip(self, state))]
    async fn create_user(
        &self,
        state: &ServiceState,
        user: UserCreate,
    ) -> Result<LocalUser, IdentityProviderError> {
        let mut mod_user = user;
        if mod_user.id.is_none() {
            mod_user.id = Some(Uuid::new_v4().simple().to_string());
        }
        if mod_user.password.is_none() {
            mod_user.password = Some(Uuid::new_v4().simple().to_string());
        }
        mod_user.validate()?;
        self.backend_driver.create(&state.db, mod_user).await
    }

    #[tracing::instrument(level = "info", skip(self, state))]
    async fn update_user<'a>(
        &self,
        state: &ServiceState,
        name: &'a str,
        update: UserUpdate,
    ) -> Result<LocalUser, IdentityProviderError> {
        update.validate()?;
        self.backend_driver.update(&state.db, name, update).await
    }
}

#[cfg(test)]
mock! {
    pub IdentityProvider {
        pub fn new(cfg: &Config) -> Result<Self, IdentityProviderError>;
    }

    #[async_trait]
    impl IdentityApi for IdentityProvider {
        async fn get_user<'a>(
            &self,
            state: &ServiceState,
            name: &'a str,
        ) -> Result<Option<LocalUser>, IdentityProviderError>;

        async fn create_user(
            &self,
            state: &ServiceState,
            user: UserCreate,
        ) -> Result<LocalUser, IdentityProviderError>;

        async fn update_user<'a>(
            &self,
            state: &ServiceState,
            name: &'a str,
            update: UserUpdate,
        ) -> Result<LocalUser, IdentityProviderError>;
    }

    impl Clone for IdentityProvider {
        fn clone(&self) -> Self;
    }
}
