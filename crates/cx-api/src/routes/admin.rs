/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! One-time setup endpoint: applies `migrations/*.sql` against a fresh
//! database. Gated by a shared secret rather than real auth, matching
//! the "initial setup only" scope this was given.

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use diesel::Connection;
use serde_json::json;
use tracing::{error, info};

const INIT_MIGRATION: &str = include_str!("../../../../migrations/init.sql");
const ENTITY_RESOLUTION_MIGRATION: &str = include_str!("../../../../migrations/add_master_coins.sql");

fn run_migration(conn: &mut diesel::PgConnection, sql: &str) -> Result<(), diesel::result::Error> {
  conn.batch_execute(sql)
}

pub async fn migrate(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let provided = req
    .headers()
    .get("x-migration-secret")
    .and_then(|v| v.to_str().ok())
    .unwrap_or("");

  if provided != state.config.migration_secret {
    return Err(ApiError::Forbidden("invalid migration secret".to_string()));
  }

  let sync_pool = state.sync_pool.clone();
  let results = web::block(move || -> Result<serde_json::Value, ApiError> {
    let mut conn = sync_pool.get().map_err(|e| ApiError::Internal(format!("failed to get db connection: {e}")))?;

    let init_result = match run_migration(&mut conn, INIT_MIGRATION) {
      Ok(()) => {
        info!("init migration completed successfully");
        json!({ "status": "success", "error": serde_json::Value::Null })
      }
      Err(e) => {
        error!(error = %e, "init migration failed");
        json!({ "status": "failed", "error": e.to_string() })
      }
    };

    let entity_result = match run_migration(&mut conn, ENTITY_RESOLUTION_MIGRATION) {
      Ok(()) => {
        info!("entity resolution migration completed successfully");
        json!({ "status": "success", "error": serde_json::Value::Null })
      }
      Err(e) => {
        error!(error = %e, "entity resolution migration failed");
        json!({ "status": "failed", "error": e.to_string() })
      }
    };

    Ok(json!({
      "init_migration": init_result,
      "entity_resolution_migration": entity_result,
    }))
  })
  .await
  .map_err(|e| ApiError::Internal(e.to_string()))??;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Migrations completed",
    "results": results,
  })))
}
