//! Coverage enrichment.
//!
//! Turns a list of account names into coverage records by asking a
//! search-capable chat model for each company's IR analyst coverage page.
//! Every lookup yields its own `Result`; [`enrich_all`] skips failures and
//! reports them alongside the records it did collect.

mod batch;
mod client;
mod error;
mod reply;

pub use batch::{enrich_all, CoverageSource, EnrichReport};
pub use client::{ClientConfig, SearchClient};
pub use error::FetchError;
pub use reply::{build_prompt, parse_reply};
