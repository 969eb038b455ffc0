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

//! Read-only HTTP API: paginated data, stats, run history, anomaly
//! reports, Prometheus exposition, and the admin migration endpoint.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod schemas;
pub mod state;

/// Re-exported so `cx-ingest`'s orchestrator can report ETL run metrics
/// into the same process-wide registry this crate exposes at `/metrics`,
/// without `cx-ingest` depending on `cx-api`.
pub use cx_core::metrics;
pub use state::AppState;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{web, App, HttpServer};
use cx_core::Config;
use cx_db::{AsyncPool, SyncPool};
use tracing::info;

fn configure_cors() -> Cors {
  // actix-cors panics if supports_credentials() is combined with
  // allow_any_origin() (the two are mutually exclusive per the CORS spec),
  // so this permits everything short of credentialed wildcard requests.
  Cors::default().allow_any_origin().allow_any_method().allow_any_header()
}

/// Build and run the actix-web server. Blocks until the server shuts down;
/// callers (`cx-cli`) run this alongside the scheduler in the same process.
pub async fn run(config: Config, sync_pool: SyncPool, async_pool: AsyncPool) -> std::io::Result<()> {
  let host = config.api_host.clone();
  let port = config.api_port;
  let workers = config.api_workers as usize;

  let app_state = web::Data::new(AppState::new(sync_pool, async_pool, config));

  info!(%host, port, "starting cx-api");

  HttpServer::new(move || {
    App::new()
      .app_data(app_state.clone())
      .wrap(configure_cors())
      .wrap(Logger::default())
      .wrap(middleware::RequestContext)
      .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, error::render_500))
      .configure(routes::configure)
  })
  .bind((host, port))?
  .workers(workers)
  .run()
  .await
}
