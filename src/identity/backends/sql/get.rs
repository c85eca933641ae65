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
use sea_orm::query::*;

use crate::db::entity::{local_user as db_local_user, prelude::LocalUser as DbLocalUser};
use crate::identity::backends::error::{IdentityDatabaseError, db_err};
use crate::identity::types::LocalUser;

pub async fn find_by_name<N: AsRef<str>>(
    db: &DatabaseConnection,
    name: N,
) -> Result<Option<LocalUser>, IdentityDatabaseError> {
    let entry: Option<db_local_user::Model> = DbLocalUser::find()
        .filter(db_local_user::Column::Name.eq(name.as_ref()))
        .one(db)
        .await
        .map_err(|err| db_err(err, "fetching the user entry by name"))?;
    Ok(entry.map(Into::into))
}
