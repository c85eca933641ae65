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
use crate::ticket::types::TicketEntry;

pub async fn find_for_user<U: AsRef<str>>(
    db: &DatabaseConnection,
    username: U,
) -> Result<Option<TicketEntry>, TicketDatabaseError> {
    let entry: Option<db_cas_ticket::Model> = DbCasTicket::find()
        .filter(db_cas_ticket::Column::Username.eq(username.as_ref()))
        .one(db)
        .await
        .map_err(|err| db_err(err, "fetching the ticket ledger entry by username"))?;
    Ok(entry.map(Into::into))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    use super::super::tests::get_ticket_mock;
    use super::*;

    #[tokio::test]
    async fn test_find_for_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_ticket_mock("ST-1")]])
            .into_connection();
        assert_eq!(
            find_for_user(&db, "alice").await.unwrap().unwrap(),
            TicketEntry {
                ticket: "ST-1".into(),
                username: "alice".into(),
                created_at: DateTime::<Utc>::default(),
            }
        );

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "cas_ticket"."ticket", "cas_ticket"."username", "cas_ticket"."created_at" FROM "cas_ticket" WHERE "cas_ticket"."username" = $1 LIMIT $2"#,
                ["alice".into(), 1u64.into()]
            ),]
        );
    }

    #[tokio::test]
    async fn test_find_for_user_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::db::entity::cas_ticket::Model>::new()])
            .into_connection();
        assert!(find_for_user(&db, "bob").await.unwrap().is_none());
    }
}
