use super::dto::{CategoryTotal, StatisticsQuery, Summary};
use crate::{categories::CategoryRegistry, expenses::repo_types::Expense};

/// Inclusive `[start, end]` window over `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Both bounds or nothing: a lone bound disables filtering.
    pub fn from_query(query: StatisticsQuery) -> Option<Self> {
        match (query.start_date, query.end_date) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some(Self { start, end })
            }
            _ => None,
        }
    }

    // Zero-padded ISO dates order the same as strings and as days.
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

/// Totals over `expenses` (already owner-filtered), summed in encounter order.
pub fn summarize(
    expenses: &[Expense],
    range: Option<&DateRange>,
    categories: &CategoryRegistry,
) -> Summary {
    let mut total = 0.0;
    let mut by_category: Vec<CategoryTotal> = Vec::new();

    for e in expenses
        .iter()
        .filter(|e| range.map_or(true, |r| r.contains(&e.date)))
    {
        total += e.amount;
        match by_category.iter_mut().find(|c| c.category == e.category) {
            Some(entry) => entry.total += e.amount,
            None => by_category.push(CategoryTotal {
                category: e.category.clone(),
                total: e.amount,
                color: categories.color_for(&e.category).to_string(),
                name: e.category.clone(),
            }),
        }
    }

    // Stable: equal totals keep first-encountered order.
    by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

    Summary { total, by_category }
}
