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

use async_trait::async_trait;
use dyn_clone::DynClone;
use sea_orm::DatabaseConnection;

pub mod error;
pub mod sql;

use crate::identity::error::IdentityProviderError;
use crate::identity::types::{LocalUser, UserCreate, UserUpdate};

#[async_trait]
pub trait IdentityBackend: DynClone + Send + Sync + std::fmt::Debug {
    async fn find_by_name(
        &self,
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<Option<LocalUser>, IdentityProviderError>;

    async fn create(
        &self,
        db: &DatabaseConnection,
        user: UserCreate,
    ) -> Result<LocalUser, IdentityProviderError>;

    async fn update(
        &self,
        db: &DatabaseConnection,
        name: &str,
        update: UserUpdate,
    ) -> Result<LocalUser, IdentityProviderError>;
}

dyn_clone::clone_trait_object!(IdentityBackend);
