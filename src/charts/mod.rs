//! Chart catalog: declarative chart types, the series builder and the
//! registered chart definitions.

mod builder;
mod national;
mod province;
mod registry;
pub mod types;

use std::ops::RangeInclusive;

pub use registry::{ChartEntry, ChartRegistry};
pub use types::Chart;

/// Years covered by the per-year timelines
const SURVEY_YEARS: RangeInclusive<i32> = 2014..=2021;

/// Subtitle crediting the data source
const SOURCE_NOTE: &str = "数据来自相关统计局";
