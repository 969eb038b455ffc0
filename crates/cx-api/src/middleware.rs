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

//! Every response carries `X-Request-ID` and `X-Latency-MS`; every
//! request feeds `api_requests_total`/`api_latency_seconds`. A UUID v4
//! is minted per request and stashed in the request extensions so the
//! 500 error handler can echo it back in the JSON envelope.

use actix_web::body::MessageBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

/// Request-scoped id, inserted into extensions by [`RequestContext`] and
/// read back by the 500 error handler.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

impl RequestId {
  pub fn as_string(&self) -> String {
    self.0.to_string()
  }
}

pub struct RequestContext;

impl<S, B> Transform<S, ServiceRequest> for RequestContext
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RequestContextMiddleware<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RequestContextMiddleware { service: Rc::new(service) }))
  }
}

pub struct RequestContextMiddleware<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestContextMiddleware<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, mut req: ServiceRequest) -> Self::Future {
    let request_id = RequestId(Uuid::new_v4());
    req.extensions_mut().insert(request_id);

    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.match_pattern().unwrap_or_else(|| req.path().to_string());

    let service = Rc::clone(&self.service);
    Box::pin(async move {
      let mut response = service.call(req).await?;
      let elapsed = start.elapsed();

      let headers = response.headers_mut();
      headers.insert(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_str(&request_id.as_string()).expect("uuid is valid header value"),
      );
      headers.insert(
        HeaderName::from_static("x-latency-ms"),
        HeaderValue::from_str(&format!("{:.2}", elapsed.as_secs_f64() * 1000.0))
          .expect("formatted latency is valid header value"),
      );

      cx_core::metrics::track_api_request(
        &path,
        &method,
        response.status().as_u16(),
        elapsed.as_secs_f64(),
      );

      Ok(response)
    })
  }
}
