//! Charts over the national tables: growth rates, Gini and income composition.

use super::builder::SeriesBuilder;
use super::types::{
    Bar3dChart, Chart, GaugeChart, PieChart, SeriesKind, Timeline, TimelineFrame, Title, ValueAxis,
};
use super::{SOURCE_NOTE, SURVEY_YEARS};
use crate::data::{GrowthSeries, IncomeBreakdown, Query, Record, Storage};
use crate::error::{DashError, DashResult};
use crate::reshape::{group_by_period, stack_components, COMPONENT_LABELS};

/// Gauge scale used for the Gini coefficient
const GINI_RANGE: (f64, f64) = (0.46, 0.47);

fn empty<R: Record>() -> DashError {
    DashError::EmptyResult(R::ENTITY)
}

/// Growth of the four income components as bars, with overall disposable
/// income growth as a line on a right-hand percent axis.
pub fn growth_overlay(storage: &Storage) -> DashResult<Chart> {
    let rows: Vec<GrowthSeries> = storage.query(&Query::all())?;

    SeriesBuilder::new(Title::new("Disposable income national").subtitle(SOURCE_NOTE).centered())
        .bar("居民人均可支配工资性收入_累计增长", |g: &GrowthSeries| g.wage_growth)
        .bar("居民人均可支配经营净收入_累计增长", |g: &GrowthSeries| g.business_growth)
        .bar("居民人均可支配财产净收入_累计增长", |g: &GrowthSeries| g.property_growth)
        .bar("居民人均可支配转移净收入_累计增长", |g: &GrowthSeries| g.transfer_growth)
        .series(
            "居民人均可支配收入_累计增长",
            |g: &GrowthSeries| g.disposable_growth,
            SeriesKind::Line,
            1,
        )
        .extend_axis(
            ValueAxis::new("增长率")
                .range(-10.0, 20.0)
                .interval(1.0)
                .right()
                .label_format("{value}%"),
        )
        .legend_bottom("-1%")
        .interactive()
        .build(&rows, |g| g.period.clone())
        .ok_or_else(empty::<GrowthSeries>)
}

/// One Gini gauge per survey year, showing the first quarter on record
pub fn gini_timeline(storage: &Storage) -> DashResult<Chart> {
    let mut frames = Vec::new();
    for year in SURVEY_YEARS {
        let rows: Vec<GrowthSeries> = storage.query(&Query::period_prefix(year.to_string()))?;
        let Some(first) = rows.first() else {
            continue;
        };
        frames.push(TimelineFrame {
            time_point: year.to_string(),
            chart: Chart::Gauge(GaugeChart {
                title: Title::new(format!("{year}年居民人均可支配收入基尼系数")),
                name: "基尼系数".to_string(),
                value: first.gini,
                min: GINI_RANGE.0,
                max: GINI_RANGE.1,
                precision: 3,
            }),
        });
    }
    if frames.is_empty() {
        return Err(empty::<GrowthSeries>());
    }

    Ok(Chart::Timeline(Timeline {
        frames,
        play_interval_ms: 1000,
        auto_play: false,
    }))
}

/// Income composition pie per period, periods in sorted order
pub fn income_pie_timeline(storage: &Storage) -> DashResult<Chart> {
    let rows: Vec<IncomeBreakdown> = storage.query(&Query::all())?;
    let grouped = group_by_period(&rows);
    if grouped.is_empty() {
        return Err(empty::<IncomeBreakdown>());
    }

    let frames = grouped
        .into_iter()
        .map(|(period, slices)| TimelineFrame {
            time_point: period,
            chart: Chart::Pie(PieChart {
                title: Title::new("Total residents' pension disposable income")
                    .subtitle(SOURCE_NOTE)
                    .centered(),
                data: slices,
                radius: ["20%".to_string(), "40%".to_string()],
                label_format: "{b}: {c}".to_string(),
            }),
        })
        .collect();

    Ok(Chart::Timeline(Timeline {
        frames,
        play_interval_ms: 1000,
        auto_play: true,
    }))
}

/// Cumulative income components as bars with the total on a yuan axis,
/// in storage order.
pub fn income_overlay(storage: &Storage) -> DashResult<Chart> {
    let rows: Vec<IncomeBreakdown> = storage.query(&Query::all())?;

    SeriesBuilder::new(Title::new("Disposable income national").subtitle(SOURCE_NOTE).centered())
        .bar("居民人均可支配工资性收入_累计值", |r: &IncomeBreakdown| r.wage as f64)
        .bar("居民人均可支配经营净收入_累计值", |r: &IncomeBreakdown| r.business as f64)
        .bar("居民人均可支配财产净收入_累计值", |r: &IncomeBreakdown| r.property as f64)
        .bar("居民人均可支配转移净收入_累计值", |r: &IncomeBreakdown| r.transfer as f64)
        .series(
            "居民人均可支配收入_累计值",
            |r: &IncomeBreakdown| r.total as f64,
            SeriesKind::Line,
            1,
        )
        .extend_axis(
            ValueAxis::new("元")
                .range(0.0, 40000.0)
                .interval(5000.0)
                .label_format("{value}￥"),
        )
        .legend_bottom("-1%")
        .interactive()
        .build(&rows, |r| r.period.clone())
        .ok_or_else(empty::<IncomeBreakdown>)
}

/// Stacked component grid ordered by period
pub fn income_stacked(storage: &Storage) -> DashResult<Chart> {
    let rows: Vec<IncomeBreakdown> = storage.query(&Query::all().ordered_by_key())?;
    if rows.is_empty() {
        return Err(empty::<IncomeBreakdown>());
    }

    Ok(Chart::Bar3d(Bar3dChart {
        title: Title::new("居民人均可支配收入3D柱状图").centered(),
        x_categories: rows.iter().map(|r| r.period.clone()).collect(),
        y_categories: COMPONENT_LABELS.iter().map(|l| l.to_string()).collect(),
        cells: stack_components(&rows)?,
    }))
}

/// Components as bars with the total as a line, ordered by period
pub fn income_by_quarter(storage: &Storage) -> DashResult<Chart> {
    let rows: Vec<IncomeBreakdown> = storage.query(&Query::all().ordered_by_key())?;

    SeriesBuilder::new(
        Title::new("Disposable Income National")
            .subtitle("Data sourced from relevant statistical bureau"),
    )
    .bar("Wage Income", |r: &IncomeBreakdown| r.wage as f64)
    .bar("Business Income", |r: &IncomeBreakdown| r.business as f64)
    .bar("Property Income", |r: &IncomeBreakdown| r.property as f64)
    .bar("Transfer Income", |r: &IncomeBreakdown| r.transfer as f64)
    .line("Total Income", |r: &IncomeBreakdown| r.total as f64)
    .legend_bottom("0%")
    .interactive()
    .build(&rows, |r| r.period.clone())
    .ok_or_else(empty::<IncomeBreakdown>)
}
