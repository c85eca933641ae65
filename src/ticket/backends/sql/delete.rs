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

use crate::db::entity::{cas_ticket as db_cas_ticket, prelude::CasTicket as DbCasTicket};
use crate::ticket::backends::error::{TicketDatabaseError, db_err};

/// Remove the ledger row(s) of a username. Deleting a user without a row is
/// not an error; logouts and re-logins race benignly here.
pub async fn delete_for_user<U: AsRef<str>>(
    db: &DatabaseConnection,
    username: U,
) -> Result<(), TicketDatabaseError> {
    DbCasTicket::delete_many()
        .filter(db_cas_ticket::Column::Username.eq(username.as_ref()))
        .exec(db)
        .await
        .map_err(|err| db_err(err, "deleting the ticket ledger entry of a user"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    use super::*;

    #[tokio::test]
    async fn test_delete_for_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                rows_affected: 1,
                ..Default::default()
            }])
            .into_connection();

        delete_for_user(&db, "alice").await.unwrap();
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "cas_ticket" WHERE "cas_ticket"."username" = $1"#,
                ["alice".into()]
            ),]
        );
    }

    #[tokio::test]
    async fn test_delete_for_user_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                rows_affected: 0,
                ..Default::default()
            }])
            .into_connection();

        delete_for_user(&db, "nobody").await.unwrap();
    }
}
