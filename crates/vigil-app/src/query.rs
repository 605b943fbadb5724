// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Sort columns the collection endpoint accepts. Anything else is coerced
/// to `published_at` server-side, so the client never emits other names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    PublishedAt,
    CriticalityScore,
    CreatedAt,
}

impl SortField {
    pub const ALL: [Self; 3] = [Self::PublishedAt, Self::CriticalityScore, Self::CreatedAt];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublishedAt => "published_at",
            Self::CriticalityScore => "criticality_score",
            Self::CreatedAt => "created_at",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "published_at" => Some(Self::PublishedAt),
            "criticality_score" => Some(Self::CriticalityScore),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PublishedAt => "published",
            Self::CriticalityScore => "criticality",
            Self::CreatedAt => "created",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// The list view's query state: what the next refetch will ask the
/// collection endpoint for, plus the server-reported page count that
/// bounds forward paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: SortField,
    pub order: SortDirection,
    pub category: String,
    pub total_pages: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::PublishedAt,
            order: SortDirection::Desc,
            category: String::new(),
            total_pages: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCommand {
    SetSort(SortField),
    SetOrder(SortDirection),
    SetFilter(String),
    NextPage,
    PrevPage,
    PageLoaded { total_pages: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    SortChanged(SortField, SortDirection),
    OrderChanged(SortDirection),
    FilterChanged(String),
    PageChanged(i64),
    TotalPagesChanged(i64),
    /// The state changed in a way that requires a fresh page from the
    /// collection endpoint.
    Refetch,
}

impl ListQuery {
    pub fn dispatch(&mut self, command: QueryCommand) -> Vec<QueryEvent> {
        match command {
            QueryCommand::SetSort(field) => {
                if field == self.sort_by {
                    self.order = self.order.toggled();
                } else {
                    self.sort_by = field;
                    self.order = SortDirection::Desc;
                }
                self.page = 1;
                vec![
                    QueryEvent::SortChanged(self.sort_by, self.order),
                    QueryEvent::Refetch,
                ]
            }
            QueryCommand::SetOrder(order) => {
                self.order = order;
                self.page = 1;
                vec![QueryEvent::OrderChanged(order), QueryEvent::Refetch]
            }
            QueryCommand::SetFilter(category) => {
                self.category = category.clone();
                self.page = 1;
                vec![QueryEvent::FilterChanged(category), QueryEvent::Refetch]
            }
            QueryCommand::NextPage => {
                if self.page >= self.total_pages {
                    return Vec::new();
                }
                self.page += 1;
                vec![QueryEvent::PageChanged(self.page), QueryEvent::Refetch]
            }
            QueryCommand::PrevPage => {
                if self.page <= 1 {
                    return Vec::new();
                }
                self.page -= 1;
                vec![QueryEvent::PageChanged(self.page), QueryEvent::Refetch]
            }
            QueryCommand::PageLoaded { total_pages } => {
                self.total_pages = total_pages.max(1);
                vec![QueryEvent::TotalPagesChanged(self.total_pages)]
            }
        }
    }

    pub const fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub const fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Query parameters in the order the collection endpoint documents
    /// them; the category filter is only sent when set.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort_by", self.sort_by.as_str().to_owned()),
            ("order", self.order.as_str().to_owned()),
        ];
        if !self.category.is_empty() {
            params.push(("category", self.category.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::{ListQuery, QueryCommand, QueryEvent, SortDirection, SortField};

    fn refetch_count(events: &[QueryEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, QueryEvent::Refetch))
            .count()
    }

    #[test]
    fn defaults_match_initial_view() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 50);
        assert_eq!(query.sort_by, SortField::PublishedAt);
        assert_eq!(query.order, SortDirection::Desc);
        assert!(query.category.is_empty());
    }

    #[test]
    fn sorting_same_field_toggles_order_and_resets_page() {
        let mut query = ListQuery {
            page: 3,
            total_pages: 5,
            ..ListQuery::default()
        };

        let events = query.dispatch(QueryCommand::SetSort(SortField::PublishedAt));
        assert_eq!(query.order, SortDirection::Asc);
        assert_eq!(query.page, 1);
        assert_eq!(
            events,
            vec![
                QueryEvent::SortChanged(SortField::PublishedAt, SortDirection::Asc),
                QueryEvent::Refetch,
            ],
        );

        query.dispatch(QueryCommand::SetSort(SortField::PublishedAt));
        assert_eq!(query.order, SortDirection::Desc);
    }

    #[test]
    fn sorting_new_field_resets_to_desc() {
        let mut query = ListQuery {
            order: SortDirection::Asc,
            page: 2,
            total_pages: 4,
            ..ListQuery::default()
        };

        query.dispatch(QueryCommand::SetSort(SortField::CriticalityScore));
        assert_eq!(query.sort_by, SortField::CriticalityScore);
        assert_eq!(query.order, SortDirection::Desc);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn order_and_filter_changes_reset_page() {
        let mut query = ListQuery {
            page: 4,
            total_pages: 9,
            ..ListQuery::default()
        };

        let events = query.dispatch(QueryCommand::SetOrder(SortDirection::Asc));
        assert_eq!(query.page, 1);
        assert_eq!(refetch_count(&events), 1);

        query.page = 4;
        let events = query.dispatch(QueryCommand::SetFilter("Malware".to_owned()));
        assert_eq!(query.page, 1);
        assert_eq!(query.category, "Malware");
        assert_eq!(refetch_count(&events), 1);
    }

    #[test]
    fn prev_page_is_noop_on_first_page() {
        let mut query = ListQuery {
            total_pages: 3,
            ..ListQuery::default()
        };

        assert!(query.dispatch(QueryCommand::PrevPage).is_empty());
        assert_eq!(query.page, 1);
    }

    #[test]
    fn next_page_is_noop_on_last_page() {
        let mut query = ListQuery {
            page: 3,
            total_pages: 3,
            ..ListQuery::default()
        };

        assert!(query.dispatch(QueryCommand::NextPage).is_empty());
        assert_eq!(query.page, 3);
    }

    #[test]
    fn page_moves_by_one_with_exactly_one_refetch() {
        let mut query = ListQuery {
            page: 2,
            total_pages: 3,
            ..ListQuery::default()
        };

        let forward = query.dispatch(QueryCommand::NextPage);
        assert_eq!(query.page, 3);
        assert_eq!(refetch_count(&forward), 1);

        let back = query.dispatch(QueryCommand::PrevPage);
        assert_eq!(query.page, 2);
        assert_eq!(refetch_count(&back), 1);
    }

    #[test]
    fn page_loaded_updates_total_and_floors_at_one() {
        let mut query = ListQuery::default();

        query.dispatch(QueryCommand::PageLoaded { total_pages: 7 });
        assert_eq!(query.total_pages, 7);

        query.dispatch(QueryCommand::PageLoaded { total_pages: 0 });
        assert_eq!(query.total_pages, 1);
    }

    #[test]
    fn pager_enablement_tracks_boundaries() {
        let query = ListQuery {
            total_pages: 3,
            ..ListQuery::default()
        };
        assert!(!query.can_prev());
        assert!(query.can_next());

        let last = ListQuery {
            page: 3,
            total_pages: 3,
            ..ListQuery::default()
        };
        assert!(last.can_prev());
        assert!(!last.can_next());
    }

    #[test]
    fn params_serialize_in_endpoint_order() {
        let query = ListQuery::default();
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "1".to_owned()),
                ("page_size", "50".to_owned()),
                ("sort_by", "published_at".to_owned()),
                ("order", "desc".to_owned()),
            ],
        );
    }

    #[test]
    fn params_include_category_only_when_set() {
        let mut query = ListQuery::default();
        query.dispatch(QueryCommand::SetFilter("Phishing".to_owned()));
        let params = query.to_params();
        assert_eq!(params.last(), Some(&("category", "Phishing".to_owned())));
    }

    #[test]
    fn sort_field_parse_rejects_unknown_names() {
        assert_eq!(SortField::parse("published_at"), Some(SortField::PublishedAt));
        assert_eq!(SortField::parse("title"), None);
    }
}
