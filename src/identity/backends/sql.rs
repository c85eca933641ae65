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
use sea_orm::DatabaseConnection;

use crate::db::entity::local_user as db_local_user;
use crate::identity::backends::IdentityBackend;
use crate::identity::error::IdentityProviderError;
use crate::identity::types::{LocalUser, UserCreate, UserUpdate};

mod create;
mod get;
mod update;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {}

#[async_trait]
impl IdentityBackend for SqlBackend {
    async fn find_by_name(
        &self,
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<Option<LocalUser>, IdentityProviderError> {
        Ok(get::find_by_name(db, name).await?)
    }

    async fn create(
        &self,
        db: &DatabaseConnection,
        user: UserCreate,
    ) -> Result<LocalUser, IdentityProviderError> {
        Ok(create::create(db, user).await?)
    }

    async fn update(
        &self,
        db: &DatabaseConnection,
        name: &str,
        update: UserUpdate,
    ) -> Result<LocalUser, IdentityProviderError> {
        Ok(update::update(db, name, update).await?)
    }
}

impl From<db_local_user::Model> for LocalUser {
    fn from(value: db_local_user::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            fullname: value.fullname,
            sysadmin: value.sysadmin,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::db::entity::local_user as db_local_user;

    pub(super) fn get_user_mock<S: AsRef<str>>(name: S) -> db_local_user::Model {
        db_local_user::Model {
            id: "uid".into(),
            name: name.as_ref().into(),
            email: "alice@example.com".into(),
            fullname: Some("Alice Doe".into()),
            password: "pw".into(),
            sysadmin: false,
        }
    }
}
