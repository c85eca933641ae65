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
use crate::identity::types::{LocalUser, UserUpdate};

pub async fn update<N: AsRef<str>>(
    db: &DatabaseConnection,
    name: N,
    user: UserUpdate,
) -> Result<LocalUser, IdentityDatabaseError> {
    if let Some(current) = DbLocalUser::find()
        .filter(db_local_user::Column::Name.eq(name.as_ref()))
        .one(db)
        .await
        .map_err(|err| db_err(err, "fetching current user data for update"))?
    {
        let mut entry: db_local_user::ActiveModel = current.into();
        if let Some(val) = user.email {
            entry.email = Set(val.to_owned());
        }
        if let Some(val) = user.fullname {
            entry.fullname = Set(val.to_owned());
        }
        if let Some(val) = user.sysadmin {
            entry.sysadmin = Set(val);
        }

        let db_entry: db_local_user::Model = entry
            .update(db)
            .await
            .map_err(|err| db_err(err, "updating the user entry"))?;
        Ok(db_entry.into())
    } else {
        Err(IdentityDatabaseError::UserNotFound(
            name.as_ref().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    use super::super::tests::get_user_mock;
    use super::*;

    #[tokio::test]
    async fn test_update() {
        let mut updated = get_user_mock("alice");
        updated.email = "new@example.com".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_user_mock("alice")], vec![updated.clone()]])
            .append_exec_results([MockExecResult {
                rows_affected: 1,
                ..Default::default()
            }])
            .into_connection();

        let req = UserUpdate {
            email: Some("new@example.com".into()),
            fullname: None,
            sysadmin: None,
        };

        assert_eq!(update(&db, "alice", req).await.unwrap(), updated.into());
        assert_eq!(
            db.into_transaction_log(),
            [
                Transaction::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    r#"SELECT "local_user"."id", "local_user"."name", "local_user"."email", "local_user"."fullname", "local_user"."password", "local_user"."sysadmin" FROM "local_user" WHERE "local_user"."name" = $1 LIMIT $2"#,
                    ["alice".into(), 1u64.into()]
                ),
                Transaction::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    r#"UPDATE "local_user" SET "email" = $1 WHERE "local_user"."id" = $2 RETURNING "id", "name", "email", "fullname", "password", "sysadmin""#,
                    ["new@example.com".into(), "uid".into()]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<db_local_user::Model>::new()])
            .into_connection();

        match update(&db, "ghost", UserUpdate::default()).await {
            Err(IdentityDatabaseError::UserNotFound(name)) => {
                assert_eq!(name, "ghost");
            }
            other => panic!("expected UserNotFound, got {other:?}"),
        }
    }
}
