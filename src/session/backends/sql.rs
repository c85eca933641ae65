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
use sea_orm::entity::*;

use crate::db::entity::{session as db_session, prelude::Session as DbSession};
use crate::session::backends::SessionBackend;
use crate::session::backends::error::db_err;
use crate::session::error::SessionProviderError;
use crate::session::types::Session;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {}

#[async_trait]
impl SessionBackend for SqlBackend {
    async fn create(
        &self,
        db: &DatabaseConnection,
        session: Session,
    ) -> Result<Session, SessionProviderError> {
        let entry = db_session::ActiveModel {
            id: Set(session.id.clone()),
            username: Set(session.username.clone()),
            started_at: Set(session.started_at.naive_utc()),
        };

        let db_entry: db_session::Model = entry
            .insert(db)
            .await
            .map_err(|err| db_err(err, "persisting the session binding"))?;
        Ok(db_entry.into())
    }

    async fn get(
        &self,
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<Session>, SessionProviderError> {
        let entry: Option<db_session::Model> = DbSession::find_by_id(id)
            .one(db)
            .await
            .map_err(|err| db_err(err, "fetching the session binding by id"))?;
        Ok(entry.map(Into::into))
    }

    async fn delete(
        &self,
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<(), SessionProviderError> {
        // A session already gone is fine, logout must stay idempotent.
        DbSession::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| db_err(err, "deleting the session binding"))?;
        Ok(())
    }
}

impl From<db_session::Model> for Session {
    fn from(value: db_session::Model) -> Self {
        Self {
            id: value.id,
            username: value.username,
            started_at: value.started_at.and_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    use super::*;

    fn get_session_mock<S: AsRef<str>>(id: S) -> db_session::Model {
        db_session::Model {
            id: id.as_ref().into(),
            username: "alice".into(),
            started_at: NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_create() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_session_mock("sid")]])
            .into_connection();

        let req = Session {
            id: "sid".into(),
            username: "alice".into(),
            started_at: DateTime::<Utc>::default(),
        };

        assert_eq!(
            SqlBackend::default().create(&db, req).await.unwrap(),
            get_session_mock("sid").into()
        );
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"INSERT INTO "session" ("id", "username", "started_at") VALUES ($1, $2, $3) RETURNING "id", "username", "started_at""#,
                [
                    "sid".into(),
                    "alice".into(),
                    NaiveDateTime::default().into(),
                ]
            ),]
        );
    }

    #[tokio::test]
    async fn test_get() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_session_mock("sid")]])
            .into_connection();
        assert_eq!(
            SqlBackend::default()
                .get(&db, "sid")
                .await
                .unwrap()
                .unwrap(),
            Session {
                id: "sid".into(),
                username: "alice".into(),
                started_at: DateTime::<Utc>::default(),
            }
        );
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "session"."id", "session"."username", "session"."started_at" FROM "session" WHERE "session"."id" = $1 LIMIT $2"#,
                ["sid".into(), 1u64.into()]
            ),]
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                rows_affected: 1,
                ..Default::default()
            }])
            .into_connection();

        SqlBackend::default().delete(&db, "sid").await.unwrap();
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "session" WHERE "session"."id" = $1"#,
                ["sid".into()]
            ),]
        );
    }
}
