//! Search and category filtering over budget rows.

use crate::constants::ALL_CATEGORIES;

use super::budget_model::{BudgetFilter, CostCodeBudgetSummary};

impl BudgetFilter {
    pub fn new(search: Option<String>, category: Option<String>) -> Self {
        Self { search, category }
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn category_selector(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    /// True when the row's name or number contains the search term (case-insensitive)
    /// and its category equals the selected one.
    pub fn matches(&self, summary: &CostCodeBudgetSummary) -> bool {
        let matches_search = match self.search_term() {
            Some(term) => {
                summary.cost_code_name.to_lowercase().contains(&term)
                    || summary.cost_code_number.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_category = match self.category_selector() {
            Some(category) => summary.category == category,
            None => true,
        };
        matches_search && matches_category
    }
}

/// Returns the rows matching `filter`, in their original order.
pub fn filter_summaries(
    summaries: &[CostCodeBudgetSummary],
    filter: &BudgetFilter,
) -> Vec<CostCodeBudgetSummary> {
    summaries
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}
