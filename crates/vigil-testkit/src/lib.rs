// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic sample data for the demo runtime and tests. The same
//! seed always produces the same records, so assertions stay stable.

use std::collections::BTreeMap;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime, Time};

use vigil_app::{
    Category, CategoryId, ContentId, ContentItem, ContentPage, ListQuery, Session, SortDirection,
    SortField, Stats,
};

const CATEGORY_SEED: [(&str, &str, i64, &str); 6] = [
    ("Malware", "Families, loaders, and droppers", 7, "#e74c3c"),
    ("Phishing", "Credential lures and kit chatter", 5, "#f39c12"),
    ("Ransomware", "Affiliate programs and victim posts", 9, "#9b59b6"),
    ("Data Leak", "Dumped databases and combo lists", 8, "#3498db"),
    ("Exploit", "PoCs and vulnerability trading", 8, "#1abc9c"),
    ("Botnet", "Loader rentals and C2 listings", 6, "#34495e"),
];

const TITLE_POOL: [&str; 14] = [
    "Fresh combo list advertised on market",
    "New stealer build shared in forum thread",
    "Access broker selling VPN credentials",
    "Ransomware affiliate recruitment post",
    "Database dump claimed for retail chain",
    "Exploit PoC posted for recent CVE",
    "Phishing kit bundle with admin panel",
    "Botnet loader rental price update",
    "Credential stuffing config pack shared",
    "Leaked source code archive reposted",
    "Initial access auction for logistics firm",
    "Carding tutorial thread gains traction",
    "Zero-day claim posted without proof",
    "Malware crypter service relaunched",
];

const SOURCE_POOL: [&str; 8] = [
    "nightforum",
    "shadowmarket",
    "leakbase",
    "darkbay",
    "cryptchat",
    "undernet",
    "silkroom",
    "blackhall",
];

const CONTENT_SNIPPETS: [&str; 6] = [
    "Seller claims the batch is fresh and previously unshared. Escrow accepted.",
    "Thread includes samples and a price list. Several replies vouch for the seller.",
    "Post links to an onion mirror. Moderators pinned the thread.",
    "Actor references earlier campaigns and offers private deals over DM.",
    "Listing updated twice within a day. Comments dispute the data's origin.",
    "Advertisement repeats across three boards with minor wording changes.",
];

const REFERENCE_YEAR: i32 = 2026;

pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_ROLE: &str = "admin";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

pub fn demo_session() -> Session {
    Session {
        username: DEMO_USERNAME.to_owned(),
        role: DEMO_ROLE.to_owned(),
    }
}

pub fn sample_categories() -> Vec<Category> {
    CATEGORY_SEED
        .iter()
        .enumerate()
        .map(|(index, (name, description, criticality, color))| Category {
            id: CategoryId::new(format!("cat-{}", index + 1)),
            name: (*name).to_owned(),
            description: (*description).to_owned(),
            default_criticality: *criticality,
            color: (*color).to_owned(),
            created_at: Some(reference_time(0)),
            updated_at: Some(reference_time(0)),
        })
        .collect()
}

/// Builds `count` content items spread over the weeks before the
/// reference date, each tagged with one or two categories.
pub fn sample_items(count: usize) -> Vec<ContentItem> {
    let categories = sample_categories();
    let mut rng = DeterministicRng::new(count as u64 + 11);

    (0..count)
        .map(|index| {
            let primary = &categories[rng.int_n(categories.len())];
            let mut tagged = vec![primary.clone()];
            if rng.int_n(3) == 0 {
                let secondary = &categories[rng.int_n(categories.len())];
                if secondary.id != primary.id {
                    tagged.push(secondary.clone());
                }
            }

            // Scores cluster around the primary category's default.
            let jitter = rng.int_n(5) as i64 - 2;
            let score = (primary.default_criticality + jitter).clamp(1, 10);

            let published_hours = (index as i64) * 7 + rng.int_n(6) as i64;
            let collected_hours = published_hours.saturating_sub(1).max(0);

            ContentItem {
                id: ContentId::new(format!("content-{}", index + 1)),
                title: TITLE_POOL[rng.int_n(TITLE_POOL.len())].to_owned(),
                source_name: SOURCE_POOL[rng.int_n(SOURCE_POOL.len())].to_owned(),
                source_url: format!("http://{}.example.onion/thread/{}", SOURCE_POOL[rng.int_n(SOURCE_POOL.len())], index + 1),
                content: CONTENT_SNIPPETS[rng.int_n(CONTENT_SNIPPETS.len())].to_owned(),
                published_at: Some(reference_time(published_hours)),
                criticality_score: score,
                collected_at: Some(reference_time(collected_hours)),
                created_at: Some(reference_time(collected_hours)),
                categories: tagged,
            }
        })
        .collect()
}

/// Applies the collection endpoint's contract to an in-memory dataset:
/// optional category filter, whitelist sort, then a page slice.
pub fn page_of(items: &[ContentItem], query: &ListQuery) -> ContentPage {
    let mut matched: Vec<ContentItem> = items
        .iter()
        .filter(|item| {
            query.category.is_empty()
                || item
                    .categories
                    .iter()
                    .any(|category| category.name == query.category)
        })
        .cloned()
        .collect();

    matched.sort_by(|left, right| {
        let ordering = match query.sort_by {
            SortField::PublishedAt => left.published_at.cmp(&right.published_at),
            SortField::CriticalityScore => left.criticality_score.cmp(&right.criticality_score),
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        };
        match query.order {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total = matched.len() as i64;
    let page_size = query.page_size.max(1);
    let total_pages = (total + page_size - 1) / page_size;
    let start = ((query.page.max(1) - 1) * page_size) as usize;
    let page_items: Vec<ContentItem> = matched
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    ContentPage {
        items: page_items,
        total,
        page: query.page,
        page_size,
        total_pages,
    }
}

/// Aggregates a dataset the way the statistics endpoint does: category
/// counts by name and score counts over the four fixed bands. Scores
/// outside 1..=10 are not counted, matching the backend query.
pub fn stats_for(items: &[ContentItem]) -> Stats {
    let mut category_distribution: BTreeMap<String, i64> = BTreeMap::new();
    let mut criticality_distribution: BTreeMap<String, i64> = BTreeMap::new();
    let mut last_collected: Option<OffsetDateTime> = None;

    for item in items {
        for category in &item.categories {
            *category_distribution
                .entry(category.name.clone())
                .or_insert(0) += 1;
        }

        let band = match item.criticality_score {
            1..=3 => Some("1-3"),
            4..=6 => Some("4-6"),
            7..=8 => Some("7-8"),
            9..=10 => Some("9-10"),
            _ => None,
        };
        if let Some(band) = band {
            *criticality_distribution.entry(band.to_owned()).or_insert(0) += 1;
        }

        if let Some(collected) = item.collected_at
            && last_collected.is_none_or(|current| collected > current)
        {
            last_collected = Some(collected);
        }
    }

    let last_updated = last_collected
        .and_then(|stamp| stamp.format(&Rfc3339).ok())
        .unwrap_or_default();

    Stats {
        total_items: items.len() as i64,
        last_updated,
        category_distribution,
        criticality_distribution,
    }
}

fn reference_time(hours_back: i64) -> OffsetDateTime {
    let base = Date::from_calendar_date(REFERENCE_YEAR, Month::June, 1)
        .expect("valid reference date")
        .with_time(Time::from_hms(12, 0, 0).expect("valid reference time"))
        .assume_utc();
    base - Duration::hours(hours_back)
}
