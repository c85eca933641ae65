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

use crate::db::entity::cas_ticket as db_cas_ticket;
use crate::ticket::backends::TicketBackend;
use crate::ticket::error::TicketProviderError;
use crate::ticket::types::TicketEntry;

mod create;
mod delete;
mod get;

#[derive(Clone, Debug, Default)]
pub struct SqlBackend {}

#[async_trait]
impl TicketBackend for SqlBackend {
    async fn register(
        &self,
        db: &DatabaseConnection,
        entry: TicketEntry,
    ) -> Result<TicketEntry, TicketProviderError> {
        // At most one active ticket per user; a new login replaces the row.
        delete::delete_for_user(db, &entry.username).await?;
        Ok(create::create(db, entry).await?)
    }

    async fn find_for_user(
        &self,
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<TicketEntry>, TicketProviderError> {
        Ok(get::find_for_user(db, username).await?)
    }

    async fn delete_for_user(
        &self,
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<(), TicketProviderError> {
        Ok(delete::delete_for_user(db, username).await?)
    }
}

impl From<db_cas_ticket::Model> for TicketEntry {
    fn from(value: db_cas_ticket::Model) -> Self {
        Self {
            ticket: value.ticket,
            username: value.username,
            created_at: value.created_at.and_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use crate::db::entity::cas_ticket as db_cas_ticket;

    pub(super) fn get_ticket_mock<S: AsRef<str>>(ticket: S) -> db_cas_ticket::Model {
        db_cas_ticket::Model {
            ticket: ticket.as_ref().into(),
            username: "alice".into(),
            created_at: NaiveDateTime::default(),
        }
    }
}
