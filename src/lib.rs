#![doc(test(attr(deny(warnings))))]

//! Forecast Core projects a user's monthly income, expenses and savings from their
//! transaction history, blending several forecasting methods and reporting how far
//! the projection can be trusted.

pub mod analysis;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod domain;
pub mod errors;
pub mod forecast;
pub mod history;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(build = %build.banner(), "Forecast Core tracing initialized.");
    });
}
