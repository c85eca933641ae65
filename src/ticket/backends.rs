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

use crate::ticket::error::TicketProviderError;
use crate::ticket::types::TicketEntry;

#[async_trait]
pub trait TicketBackend: DynClone + Send + Sync + std::fmt::Debug {
    /// Insert a ledger row, replacing any prior row for the username.
    async fn register(
        &self,
        db: &DatabaseConnection,
        entry: TicketEntry,
    ) -> Result<TicketEntry, TicketProviderError>;

    /// Fetch the ledger row of a username.
    async fn find_for_user(
        &self,
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<TicketEntry>, TicketProviderError>;

    /// Delete the ledger row(s) of a username.
    async fn delete_for_user(
        &self,
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<(), TicketProviderError>;
}

dyn_clone::clone_trait_object!(TicketBackend);
