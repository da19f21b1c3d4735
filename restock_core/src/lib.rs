#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Remaining-stock monitoring (hardware-agnostic).
//!
//! A product is registered with its weight on the scale; later status queries
//! compare the current weight against a percentage of that initial weight. All
//! sensor access goes through `restock_traits::LineSource`.
//!
//! ## Architecture
//!
//! - **Filtering**: line parsing, noise band and averaging (`filter`)
//! - **Sampling**: quick and stable acquisition loops (`sampler`)
//! - **Caching**: rate-limited stable sampling (`cache`)
//! - **Records**: the registered product and its store (`record`)
//! - **Alerting**: threshold comparison (`alert`)
//! - **Service**: `Monitor`, which owns all of the above (`monitor`)

pub mod alert;
pub mod atomic;
pub mod cache;
pub mod config;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod hw_error;
pub mod mocks;
pub mod monitor;
pub mod record;
pub mod sampler;
pub mod status;
pub mod types;
pub mod util;

pub use alert::{Evaluation, evaluate};
pub use cache::{CachedSample, SampleCache};
pub use config::{CacheCfg, MonitorCfg, QuickCfg, StableCfg};
pub use error::{BuildError, MonitorError, SampleError};
pub use filter::NoiseBand;
pub use monitor::{Monitor, MonitorBuilder};
pub use record::{JsonFileStore, ProductRecord, RecordStore};
pub use sampler::{quick_weight, stable_weight};
pub use status::Status;
pub use types::{Reading, ReadingKind};
