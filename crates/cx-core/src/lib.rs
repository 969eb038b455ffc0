/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
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

//! # cx-core
//!
//! Core types, configuration, and error handling shared across the
//! crypto ETL workspace:
//!
//! - [`Config`] - environment-driven service configuration
//! - [`Error`] and [`Result`] - unified error handling
//! - [`DataSource`] - the three ingestion sources

pub mod config;
pub mod error;
pub mod metrics;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};
pub use source::DataSource;

/// Default periodic ETL interval, in minutes.
pub const DEFAULT_SCHEDULE_MINUTES: u64 = 30;

/// Top-N ordering requested from each HTTP market-data provider.
pub const PROVIDER_PAGE_SIZE: u32 = 100;

/// Per-provider HTTP request timeout, in seconds.
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;
