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

use crate::db::entity::cas_ticket as db_cas_ticket;
use crate::ticket::backends::error::{TicketDatabaseError, db_err};
use crate::ticket::types::TicketEntry;

pub async fn create(
    db: &DatabaseConnection,
    rec: TicketEntry,
) -> Result<TicketEntry, TicketDatabaseError> {
    let entry = db_cas_ticket::ActiveModel {
        ticket: Set(rec.ticket.clone()),
        username: Set(rec.username.clone()),
        created_at: Set(rec.created_at.naive_utc()),
    };

    let db_entry: db_cas_ticket::Model = entry
        .insert(db)
        .await
        .map_err(|err| db_err(err, "persisting the ticket ledger entry"))?;

    Ok(db_entry.into())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    use super::super::tests::get_ticket_mock;
    use super::*;

    #[tokio::test]
    async fn test_create() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![get_ticket_mock("ST-1")]])
            .into_connection();

        let req = TicketEntry {
            ticket: "ST-1".into(),
            username: "alice".into(),
            created_at: DateTime::<Utc>::default(),
        };

        assert_eq!(
            create(&db, req).await.unwrap(),
            get_ticket_mock("ST-1").into()
        );
        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"INSERT INTO "cas_ticket" ("ticket", "username", "created_at") VALUES ($1, $2, $3) RETURNING "ticket", "username", "created_at""#,
                [
                    "ST-1".into(),
                    "alice".into(),
                    NaiveDateTime::default().into(),
                ]
            ),]
        );
    }
}
