// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::ids::*;

/// Presentational bucket for a criticality score. The thresholds are
/// fixed across every view that shows a badge: >=9 critical, >=7 high,
/// >=4 medium, everything else (including a missing score) low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const fn from_score(score: i64) -> Self {
        if score >= 9 {
            Self::Critical
        } else if score >= 7 {
            Self::High
        } else if score >= 4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Missing scores are treated as 0.
    pub const fn from_optional_score(score: Option<i64>) -> Self {
        match score {
            Some(value) => Self::from_score(value),
            None => Self::from_score(0),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// The four fixed score bands the statistics endpoint reports over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityBand {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Distribution-map key as the backend emits it.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Low => "1-3",
            Self::Medium => "4-6",
            Self::High => "7-8",
            Self::Critical => "9-10",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low 1-3",
            Self::Medium => "med 4-6",
            Self::High => "high 7-8",
            Self::Critical => "crit 9-10",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_criticality: i64,
    #[serde(default)]
    pub color: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub criticality_score: i64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub collected_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ContentItem {
    pub const fn severity(&self) -> Severity {
        Severity::from_score(self.criticality_score)
    }

    /// Display title; the feed occasionally carries untitled records.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    pub fn display_source(&self) -> &str {
        if self.source_name.is_empty() {
            "-"
        } else {
            &self.source_name
        }
    }
}

/// One page of the content collection plus the pagination metadata the
/// server reports alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPage {
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default = "default_total_pages")]
    pub total_pages: i64,
}

const fn default_total_pages() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub category_distribution: BTreeMap<String, i64>,
    #[serde(default)]
    pub criticality_distribution: BTreeMap<String, i64>,
}

impl Stats {
    pub fn band_counts(&self) -> [i64; 4] {
        band_counts(&self.criticality_distribution)
    }

    pub fn category_slices(&self) -> Vec<CategorySlice> {
        category_slices(&self.category_distribution)
    }

    /// Count of items in the top band, shown on the stat cards.
    pub fn critical_count(&self) -> i64 {
        self.criticality_distribution
            .get(SeverityBand::Critical.key())
            .copied()
            .unwrap_or(0)
    }
}

/// Counts for the four fixed bands; absent keys read as zero.
pub fn band_counts(distribution: &BTreeMap<String, i64>) -> [i64; 4] {
    let mut counts = [0; 4];
    for (slot, band) in counts.iter_mut().zip(SeverityBand::ALL) {
        *slot = distribution.get(band.key()).copied().unwrap_or(0);
    }
    counts
}

/// One slice of the category distribution, with its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub name: String,
    pub count: i64,
    pub percent: f64,
}

impl CategorySlice {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

pub fn category_slices(distribution: &BTreeMap<String, i64>) -> Vec<CategorySlice> {
    let total: i64 = distribution.values().sum();
    if total <= 0 {
        return Vec::new();
    }

    distribution
        .iter()
        .map(|(name, count)| CategorySlice {
            name: name.clone(),
            count: *count,
            percent: (*count as f64 / total as f64) * 100.0,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Role with the leading letter capitalized for the header line.
    pub fn role_label(&self) -> String {
        let mut chars = self.role.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CategorySlice, ContentItem, Session, Severity, SeverityBand, Stats, band_counts};
    use std::collections::BTreeMap;

    #[test]
    fn severity_bucket_boundaries() {
        assert_eq!(Severity::from_score(10), Severity::Critical);
        assert_eq!(Severity::from_score(9), Severity::Critical);
        assert_eq!(Severity::from_score(8), Severity::High);
        assert_eq!(Severity::from_score(7), Severity::High);
        assert_eq!(Severity::from_score(6), Severity::Medium);
        assert_eq!(Severity::from_score(4), Severity::Medium);
        assert_eq!(Severity::from_score(3), Severity::Low);
        assert_eq!(Severity::from_score(0), Severity::Low);
    }

    #[test]
    fn missing_score_buckets_low() {
        assert_eq!(Severity::from_optional_score(None), Severity::Low);
        assert_eq!(Severity::from_optional_score(Some(9)), Severity::Critical);
    }

    #[test]
    fn band_counts_default_absent_keys_to_zero() {
        let mut distribution = BTreeMap::new();
        distribution.insert("9-10".to_owned(), 2);
        assert_eq!(band_counts(&distribution), [0, 0, 0, 2]);
    }

    #[test]
    fn band_counts_read_every_bucket() {
        let mut distribution = BTreeMap::new();
        distribution.insert("1-3".to_owned(), 4);
        distribution.insert("4-6".to_owned(), 3);
        distribution.insert("7-8".to_owned(), 2);
        distribution.insert("9-10".to_owned(), 1);
        assert_eq!(band_counts(&distribution), [4, 3, 2, 1]);
    }

    #[test]
    fn equal_categories_split_fifty_fifty() {
        let mut distribution = BTreeMap::new();
        distribution.insert("Malware".to_owned(), 5);
        distribution.insert("Phishing".to_owned(), 5);

        let slices = super::category_slices(&distribution);
        assert_eq!(slices.len(), 2);
        for slice in &slices {
            assert_eq!(slice.percent_label(), "50.0%");
        }
    }

    #[test]
    fn category_slices_empty_for_zero_total() {
        assert!(super::category_slices(&BTreeMap::new()).is_empty());
        let mut zeroes = BTreeMap::new();
        zeroes.insert("Malware".to_owned(), 0);
        assert!(super::category_slices(&zeroes).is_empty());
    }

    #[test]
    fn slice_percent_rounds_to_one_decimal() {
        let mut distribution = BTreeMap::new();
        distribution.insert("Exploit".to_owned(), 1);
        distribution.insert("Malware".to_owned(), 2);

        let slices = super::category_slices(&distribution);
        let exploit = slices
            .iter()
            .find(|slice| slice.name == "Exploit")
            .expect("exploit slice");
        assert_eq!(exploit.percent_label(), "33.3%");
    }

    #[test]
    fn stats_critical_count_reads_top_band() {
        let mut stats = Stats::default();
        stats
            .criticality_distribution
            .insert(SeverityBand::Critical.key().to_owned(), 7);
        assert_eq!(stats.critical_count(), 7);
        assert_eq!(Stats::default().critical_count(), 0);
    }

    #[test]
    fn item_decodes_with_absent_fields() {
        let item: ContentItem =
            serde_json::from_str(r#"{"id":"c-1"}"#).expect("decode sparse item");
        assert_eq!(item.display_title(), "Untitled");
        assert_eq!(item.display_source(), "-");
        assert_eq!(item.criticality_score, 0);
        assert_eq!(item.severity(), Severity::Low);
        assert!(item.published_at.is_none());
        assert!(item.categories.is_empty());
    }

    #[test]
    fn item_decodes_rfc3339_timestamps() {
        let item: ContentItem = serde_json::from_str(
            r#"{"id":"c-2","title":"X","published_at":"2024-01-01T00:00:00Z","criticality_score":9}"#,
        )
        .expect("decode item");
        assert_eq!(item.severity(), Severity::Critical);
        let published = item.published_at.expect("published timestamp");
        assert_eq!(published.year(), 2024);
    }

    #[test]
    fn session_admin_check_and_role_label() {
        let admin = Session {
            username: "ops".to_owned(),
            role: "admin".to_owned(),
        };
        assert!(admin.is_admin());
        assert_eq!(admin.role_label(), "Admin");

        let viewer = Session {
            username: "ana".to_owned(),
            role: "analyst".to_owned(),
        };
        assert!(!viewer.is_admin());
        assert_eq!(viewer.role_label(), "Analyst");
    }

    #[test]
    fn slice_label_formats_whole_percentages() {
        let slice = CategorySlice {
            name: "Malware".to_owned(),
            count: 5,
            percent: 100.0,
        };
        assert_eq!(slice.percent_label(), "100.0%");
    }
}
