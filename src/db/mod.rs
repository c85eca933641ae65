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
//! # Database entities and schema bootstrap.
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

pub mod entity;

use crate::error::CasError;

/// Create the gateway tables when they do not exist yet.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), CasError> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut stmt = schema.create_table_from_entity(entity::prelude::CasTicket);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;

    let mut stmt = schema.create_table_from_entity(entity::prelude::LocalUser);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;

    let mut stmt = schema.create_table_from_entity(entity::prelude::Session);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;

    Ok(())
}
