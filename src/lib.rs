//! Test-automation helpers: soft assertions that report every failure at
//! once, and test-run bookkeeping against a Zephyr test-management service.

pub mod assertions;
pub mod config;
pub mod trace;
pub mod zephyr;

pub use assertions::{
    failure::{AggregateFailure, FailureRecord},
    soft_assert::{Operand, SoftAssert},
};
pub use config::settings::{Settings, ZephyrConfig, load_settings};
pub use zephyr::{
    catalog::Catalog,
    client::ZephyrClient,
    lifecycle::{LifecycleState, TestRunLifecycle},
    model::{TestResultDetails, TestStatus},
};
