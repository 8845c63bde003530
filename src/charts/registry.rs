//! Explicit chart catalog: stable names mapped to builders plus metadata.

use tracing::{debug, warn};

use super::national;
use super::province;
use super::types::Chart;
use crate::data::Storage;
use crate::error::{DashError, DashResult};

/// Builds one chart from the current contents of storage
pub type ChartBuilder = fn(&Storage) -> DashResult<Chart>;

/// A registered chart and how the catalog presents it
#[derive(Debug, Clone)]
pub struct ChartEntry {
    /// Stable identifier used on the command line
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Catalog group the chart is listed under
    pub catalog: &'static str,
    /// Position within the catalog, lower first
    pub priority: i32,
    pub build: ChartBuilder,
}

impl ChartEntry {
    /// Row of the `charts` listing: catalog, priority, name and title, with
    /// the description indented underneath
    pub fn listing(&self) -> String {
        format!(
            "{:<3} {:<3} {:<28} {}\n{:8}{}",
            self.catalog, self.priority, self.name, self.title, "", self.description
        )
    }
}

#[derive(Debug, Default)]
pub struct ChartRegistry {
    entries: Vec<ChartEntry>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry`, replacing any chart already registered under its name
    pub fn register(&mut self, entry: ChartEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            warn!(name = entry.name, "chart registered twice, replacing");
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Registry with every chart of the income dashboard
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ChartEntry {
            name: "deposit_income_per_person",
            title: "居民人均可支配收入",
            description: "Quarterly growth of wage, business, property and transfer income, with overall disposable income growth on a percent axis.",
            catalog: "1",
            priority: 0,
            build: national::growth_overlay,
        });
        registry.register(ChartEntry {
            name: "gini",
            title: "居民人均可支配收入基尼系数",
            description: "Gini coefficient of per-capita disposable income for each survey year.",
            catalog: "1",
            priority: 1,
            build: national::gini_timeline,
        });
        registry.register(ChartEntry {
            name: "Income_classify_pie",
            title: "居民人均可支配收入的分类收入情况（饼图）",
            description: "Share of each income component per quarter.",
            catalog: "2",
            priority: 2,
            build: national::income_pie_timeline,
        });
        registry.register(ChartEntry {
            name: "Income_classify",
            title: "居民人均可支配收入的分类收入情况（柱状图，折线图）",
            description: "Cumulative income components as bars with total disposable income as a line.",
            catalog: "3",
            priority: 3,
            build: national::income_overlay,
        });
        registry.register(ChartEntry {
            name: "Income_classify_3D",
            title: "居民人均可支配收入的分类收入情况（3D柱状图）",
            description: "Income components stacked per quarter.",
            catalog: "2",
            priority: 2,
            build: national::income_stacked,
        });
        registry.register(ChartEntry {
            name: "Income_quarter",
            title: "居民人均可支配收入（按季节）",
            description: "Income components and total by quarter, in period order.",
            catalog: "2",
            priority: 0,
            build: national::income_by_quarter,
        });
        registry.register(ChartEntry {
            name: "Income_province",
            title: "居民人均可支配收入（按省份）",
            description: "Per-capita disposable income of each province by year.",
            catalog: "2",
            priority: 0,
            build: province::province_map_timeline,
        });
        registry.register(ChartEntry {
            name: "Income_province_tree",
            title: "居民人均可支配收入（按省份，树形图）",
            description: "Provinces grouped into the seven macro-areas by year.",
            catalog: "2",
            priority: 1,
            build: province::province_tree_timeline,
        });
        registry.register(ChartEntry {
            name: "Income_area",
            title: "居民人均可支配收入（按大区）",
            description: "Provincial income summed per macro-area by year.",
            catalog: "2",
            priority: 1,
            build: province::area_totals_timeline,
        });
        registry
    }

    /// Entries ordered by catalog, then priority, then registration order
    pub fn entries(&self) -> Vec<&ChartEntry> {
        let mut entries: Vec<&ChartEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.catalog.cmp(b.catalog).then(a.priority.cmp(&b.priority)));
        entries
    }

    pub fn get(&self, name: &str) -> Option<&ChartEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Build the chart called `name`, substituting a no-data placeholder
    /// when its query finds no rows.
    pub fn render(&self, name: &str, storage: &Storage) -> DashResult<Chart> {
        let entry = self
            .get(name)
            .ok_or_else(|| DashError::UnknownChart(name.to_string()))?;

        match (entry.build)(storage) {
            Ok(chart) => Ok(chart),
            Err(DashError::EmptyResult(entity)) => {
                debug!(name, entity, "no rows, rendering placeholder");
                Ok(Chart::NoData {
                    message: format!("没有查询到数据: no {entity} rows imported"),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GrowthSeries;

    #[test]
    fn test_standard_registry_names_are_unique() {
        let registry = ChartRegistry::standard();
        let mut names: Vec<&str> = registry.entries().iter().map(|e| e.name).collect();
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn test_entries_sorted_by_catalog_then_priority() {
        let registry = ChartRegistry::standard();
        let order: Vec<&str> = registry.entries().iter().map(|e| e.name).collect();
        assert_eq!(order[0], "deposit_income_per_person");
        assert_eq!(order[1], "gini");
        // Equal catalog and priority keep registration order
        assert_eq!(order[2], "Income_quarter");
        assert_eq!(order[3], "Income_province");
        assert_eq!(order.last(), Some(&"Income_classify"));
    }

    #[test]
    fn test_listing_includes_description() {
        let registry = ChartRegistry::standard();
        for entry in registry.entries() {
            assert!(!entry.description.is_empty(), "{} has no description", entry.name);
        }
        let gini = registry.get("gini").unwrap();
        let listing = gini.listing();
        let mut lines = listing.lines();
        let header: Vec<&str> = lines.next().unwrap().split_whitespace().collect();
        assert_eq!(header, ["1", "1", "gini", "居民人均可支配收入基尼系数"]);
        assert_eq!(lines.next(), Some(format!("        {}", gini.description).as_str()));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_render_unknown_chart() {
        let storage = Storage::in_memory().unwrap();
        let err = ChartRegistry::standard()
            .render("nope", &storage)
            .unwrap_err();
        assert!(matches!(err, DashError::UnknownChart(name) if name == "nope"));
    }

    #[test]
    fn test_render_empty_storage_gives_placeholder() {
        let storage = Storage::in_memory().unwrap();
        let registry = ChartRegistry::standard();
        for entry in registry.entries() {
            let chart = registry.render(entry.name, &storage).unwrap();
            assert!(matches!(chart, Chart::NoData { .. }), "{} should be a placeholder", entry.name);
        }
    }

    #[test]
    fn test_render_with_data() {
        let storage = Storage::in_memory().unwrap();
        storage
            .insert(&GrowthSeries {
                period: "2014_Q1".to_string(),
                gini: 0.469,
                disposable_growth: 12.3,
                median_disposable_growth: 11.8,
                wage_growth: 10.2,
                business_growth: 7.9,
                property_growth: 12.1,
                transfer_growth: 13.4,
            })
            .unwrap();
        let chart = ChartRegistry::standard().render("gini", &storage).unwrap();
        assert!(matches!(chart, Chart::Timeline(_)));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ChartRegistry::new();
        let entry = ChartEntry {
            name: "gini",
            title: "first",
            description: "",
            catalog: "1",
            priority: 0,
            build: national::gini_timeline,
        };
        registry.register(entry.clone());
        registry.register(ChartEntry {
            title: "second",
            ..entry
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("gini").unwrap().title, "second");
    }
}
