//! Region name normalization and roll-up into the seven macro-areas.
//!
//! Matching is done on the short name left after stripping administrative
//! suffixes, so `广西壮族自治区` and `广西` land in the same area.

use serde::Serialize;
use tracing::warn;

use super::NamedValue;
use crate::error::{DashError, DashResult};

/// Administrative suffixes removed from region names, applied in this order.
/// Each is removed wherever it occurs, not only at the end.
pub const REGION_SUFFIXES: [&str; 6] = ["省", "市", "自治区", "壮族", "维吾尔", "回族"];

/// The fixed partition of provinces into macro-areas, in display order
pub const AREAS: [(&str, &[&str]); 7] = [
    ("华东", &["江苏", "浙江", "山东", "安徽", "江西", "福建", "上海"]),
    ("华南", &["广东", "广西", "海南"]),
    ("华中", &["湖北", "湖南", "河南"]),
    ("华北", &["山西", "河北", "内蒙古", "北京", "天津"]),
    ("东北", &["吉林", "辽宁", "黑龙江"]),
    ("西北", &["新疆", "陕西", "甘肃", "宁夏", "青海"]),
    ("西南", &["四川", "西藏", "贵州", "云南", "重庆"]),
];

/// Label of the tree root
const ROOT_LABEL: &str = "全国";

pub fn normalize_region_name(name: &str) -> String {
    REGION_SUFFIXES
        .iter()
        .fold(name.to_string(), |acc, suffix| acc.replace(*suffix, ""))
}

/// Position in `AREAS` of the area containing `region`
fn area_index(region: &str) -> Option<usize> {
    let short = normalize_region_name(region);
    AREAS
        .iter()
        .position(|(_, members)| members.contains(&short.as_str()))
}

/// Area containing `region`, matched on its normalized name
#[allow(dead_code)] // Used in tests
pub fn area_of(region: &str) -> Option<&'static str> {
    area_index(region).map(|idx| AREAS[idx].0)
}

/// Sum of one area's region values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaTotal {
    pub area: &'static str,
    pub total: i64,
}

/// Sum region values per area, returning all seven areas in display order.
///
/// Regions that belong to no area are left out of every total and logged.
/// A total outside the `i64` range is an error.
pub fn aggregate_by_area(values: &[NamedValue]) -> DashResult<Vec<AreaTotal>> {
    let mut totals: Vec<AreaTotal> = AREAS
        .iter()
        .map(|(area, _)| AreaTotal {
            area: *area,
            total: 0,
        })
        .collect();

    for item in values {
        match area_index(&item.name) {
            Some(idx) => {
                let total = &mut totals[idx].total;
                *total = total
                    .checked_add(item.value)
                    .ok_or(DashError::Overflow("area totals"))?;
            }
            None => warn!(region = %item.name, value = item.value, "region matches no area, dropped"),
        }
    }

    Ok(totals)
}

/// A node of a name-only hierarchy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        TreeNode {
            name: name.into(),
            children: Vec::new(),
        }
    }
}

/// Build `全国 -> area -> region` with leaves labelled `"{region} ({value})"`.
///
/// Every area appears even when it has no regions; unmatched regions are
/// left out and logged.
pub fn build_area_tree(values: &[NamedValue]) -> TreeNode {
    let mut areas: Vec<TreeNode> = AREAS
        .iter()
        .map(|(area, _)| TreeNode {
            name: area.to_string(),
            children: Vec::new(),
        })
        .collect();

    for item in values {
        let label = format!("{} ({})", item.name, item.value);
        match area_index(&item.name) {
            Some(idx) => areas[idx].children.push(TreeNode::leaf(label)),
            None => warn!(region = %item.name, "region matches no area, left out of tree"),
        }
    }

    TreeNode {
        name: ROOT_LABEL.to_string(),
        children: areas,
    }
}
