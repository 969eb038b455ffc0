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

//! Realizes the 404/422/500/403 status mapping from the error handling
//! design: each route returns `Result<T, ApiError>` and actix converts
//! it via [`actix_web::ResponseError`]. The 500 JSON envelope's
//! `request_id` field is filled in by the error-handling middleware,
//! not here, since `ResponseError::error_response` has no request
//! context.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::middleware::RequestId;

#[derive(Error, Debug)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("{0}")]
  Validation(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error(transparent)]
  Database(#[from] diesel::result::Error),

  #[error(transparent)]
  Pool(#[from] cx_db::ConnectionError),

  #[error("{0}")]
  Internal(String),
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
  }
}

/// Registered on the app as `ErrorHandlers::new().handler(500, render_500)`;
/// rewrites any 500 response body into the `{"error", "request_id"}`
/// envelope, echoing back the id the request-context middleware minted.
pub fn render_500(res: ServiceResponse<BoxBody>) -> actix_web::Result<ErrorHandlerResponse<BoxBody>> {
  let request_id = res.request().extensions().get::<RequestId>().map(RequestId::as_string);
  let (req, _) = res.into_parts();
  let body = json!({ "error": "Internal server error", "request_id": request_id }).to_string();
  let response = HttpResponse::InternalServerError()
    .content_type("application/json")
    .body(body);
  Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, response)))
}
