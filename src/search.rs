//! Order history search and print-queue selection.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::instrument;

use crate::{client::ServiceClient, errors::ConsoleError, models::PersistedOrder};

static TRACKING_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("valid tracking delimiter pattern"));

/// Splits a raw tracking-id input on commas and whitespace.
pub fn parse_tracking_ids(input: &str) -> Vec<String> {
    TRACKING_DELIMITERS
        .split(input)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub shipper_id: Option<String>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    /// Raw tracking-id input; one id searches exact, several batch-match.
    pub tracking_input: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.shipper_id.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.customer_name.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.phone.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.tracking_input.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Query parameters in the shape `/order/search` expects. A single
    /// tracking id becomes an exact-match `trackingId`; several become
    /// repeated `trackingIds` entries for one batch-match query.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push_trimmed = |key: &str, value: &Option<String>| {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key.to_string(), value.to_string()));
            }
        };
        push_trimmed("shipperId", &self.shipper_id);
        push_trimmed("name", &self.customer_name);
        push_trimmed("phone", &self.phone);

        if let Some(date) = self.start_date {
            params.push(("startDate".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            params.push(("endDate".to_string(), date.format("%Y-%m-%d").to_string()));
        }

        if let Some(input) = &self.tracking_input {
            let mut ids = parse_tracking_ids(input);
            match ids.len() {
                0 => {}
                1 => params.push(("trackingId".to_string(), ids.remove(0))),
                _ => params.extend(
                    ids.into_iter()
                        .map(|id| ("trackingIds".to_string(), id)),
                ),
            }
        }
        params
    }
}

#[derive(Clone)]
pub struct OrderSearch {
    client: ServiceClient,
}

impl OrderSearch {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Runs a filtered history query. An empty filter set returns the
    /// server-bounded recent order list.
    #[instrument(skip(self, filters))]
    pub async fn search(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<PersistedOrder>, ConsoleError> {
        if filters.is_empty() {
            return self.client.recent_orders().await;
        }
        self.client.search_orders(&filters.to_query_params()).await
    }
}

/// Local selection of search results queued for batch label printing.
///
/// Pure client-side state; toggling never mutates the fetched orders.
#[derive(Debug, Clone, Default)]
pub struct LabelQueue {
    selected: Vec<String>,
}

impl LabelQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, tracking_id: &str) {
        match self.selected.iter().position(|id| id == tracking_id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(tracking_id.to_string()),
        }
    }

    pub fn is_selected(&self, tracking_id: &str) -> bool {
        self.selected.iter().any(|id| id == tracking_id)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_delimiters_parse_to_three_ids() {
        assert_eq!(parse_tracking_ids("A1, A2 A3"), vec!["A1", "A2", "A3"]);
    }

    #[test]
    fn three_ids_issue_one_batch_query() {
        let filters = SearchFilters {
            tracking_input: Some("A1, A2 A3".to_string()),
            ..SearchFilters::default()
        };
        let params = filters.to_query_params();
        let tracking: Vec<_> = params
            .iter()
            .filter(|(k, _)| k == "trackingIds")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(tracking, vec!["A1", "A2", "A3"]);
        assert!(!params.iter().any(|(k, _)| k == "trackingId"));
    }

    #[test]
    fn single_id_uses_exact_match() {
        let filters = SearchFilters {
            tracking_input: Some("  A1  ".to_string()),
            ..SearchFilters::default()
        };
        let params = filters.to_query_params();
        assert_eq!(
            params,
            vec![("trackingId".to_string(), "A1".to_string())]
        );
    }

    #[test]
    fn blank_filters_count_as_empty() {
        let filters = SearchFilters {
            shipper_id: Some("   ".to_string()),
            tracking_input: Some("".to_string()),
            ..SearchFilters::default()
        };
        assert!(filters.is_empty());
    }

    #[test]
    fn date_range_formats_as_plain_dates() {
        let filters = SearchFilters {
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31),
            ..SearchFilters::default()
        };
        let params = filters.to_query_params();
        assert!(params.contains(&("startDate".to_string(), "2025-08-01".to_string())));
        assert!(params.contains(&("endDate".to_string(), "2025-08-31".to_string())));
    }

    #[test]
    fn label_queue_selection_is_local_and_reversible() {
        let mut queue = LabelQueue::new();
        queue.toggle("A1");
        queue.toggle("A2");
        assert!(queue.is_selected("A1"));

        queue.toggle("A1");
        assert!(!queue.is_selected("A1"));
        assert_eq!(queue.selected(), ["A2".to_string()]);
    }
}
