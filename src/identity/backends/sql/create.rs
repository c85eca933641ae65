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

use sea_orm::DatabaseConnection;
use sea_orm::entity::*;
use uuid::Uuid;

use crate::db::entity::local_user as db_local_user;
use crate::identity::backends::error::{IdentityDatabaseError, db_err};
use crate::identity::types::{LocalUser, UserCreate};

pub async fn create(
    db: &DatabaseConnection,
    user: UserCreate,
) -> Result<LocalUser, IdentityDatabaseError> {
    let entry = db_local_user::ActiveModel {
        id: Set(user
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string())),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        fullname: Set(user.fullname.clone()),
        // Accounts provisioned by the gateway get a throwaway password so the
        // password login path can never match.
        password: Set(user
            .password
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string())),
        sysadmin: Set(user.sysadmin),
    };

    let db_entry: db_local_user::Model = entry
        .insert(db)
        .await
        .map_err(|err| db_err(err, "persisting the user entry"))?;

    Ok(db_entry.into())
}
