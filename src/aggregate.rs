// 🧮 Aggregator - Income statement subtotals
// Computes only; negative gross profit / net income are valid results

use serde::{Deserialize, Serialize};

use crate::classifier::Category;
use crate::statement::{ClassifiedEntry, LineItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub total_revenue: f64,
    pub cost_of_revenue: f64,
    pub gross_profit: f64,
    pub total_expenses: f64,
    pub net_income: f64,
}

impl Aggregates {
    /// Derive gross profit and net income from the three category totals
    pub fn from_totals(total_revenue: f64, cost_of_revenue: f64, total_expenses: f64) -> Self {
        let gross_profit = total_revenue - cost_of_revenue;
        Aggregates {
            total_revenue,
            cost_of_revenue,
            gross_profit,
            total_expenses,
            net_income: gross_profit - total_expenses,
        }
    }

    /// Positive gross profit: the branch past Total Revenue is drawn
    pub fn has_gross_profit(&self) -> bool {
        self.gross_profit > 0.0
    }

    pub fn is_gross_loss(&self) -> bool {
        !self.has_gross_profit()
    }

    pub fn is_net_loss(&self) -> bool {
        self.net_income < 0.0
    }
}

/// Sum classified entries per category. Unknown entries are ignored.
pub fn aggregate<'a, I>(entries: I) -> Aggregates
where
    I: IntoIterator<Item = &'a ClassifiedEntry>,
{
    let mut revenue = 0.0;
    let mut cost = 0.0;
    let mut expenses = 0.0;

    for entry in entries {
        match entry.category {
            Category::Revenue => revenue += entry.item.value,
            Category::CostOfRevenue => cost += entry.item.value,
            Category::Expense => expenses += entry.item.value,
            Category::Unknown => {}
        }
    }

    Aggregates::from_totals(revenue, cost, expenses)
}

/// Plain sum of item values, negatives included
pub fn sum_values<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().map(|item| item.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, value: f64, category: Category) -> ClassifiedEntry {
        ClassifiedEntry {
            item: LineItem::new(name, value, category.as_str()),
            category,
        }
    }

    #[test]
    fn test_aggregate_profitable_statement() {
        let entries = vec![
            entry("A", 100.0, Category::Revenue),
            entry("B", 50.0, Category::Revenue),
            entry("COGS", 60.0, Category::CostOfRevenue),
            entry("R&D", 20.0, Category::Expense),
        ];

        let totals = aggregate(&entries);
        assert_eq!(totals.total_revenue, 150.0);
        assert_eq!(totals.cost_of_revenue, 60.0);
        assert_eq!(totals.gross_profit, 90.0);
        assert_eq!(totals.total_expenses, 20.0);
        assert_eq!(totals.net_income, 70.0);
        assert!(!totals.is_net_loss());
    }

    #[test]
    fn test_aggregate_negative_results_not_clamped() {
        let entries = vec![
            entry("A", 30.0, Category::Revenue),
            entry("COGS", 50.0, Category::CostOfRevenue),
            entry("Rent", 10.0, Category::Expense),
        ];

        let totals = aggregate(&entries);
        assert_eq!(totals.gross_profit, -20.0);
        assert_eq!(totals.net_income, -30.0);
        assert!(totals.is_gross_loss());
        assert!(totals.is_net_loss());
    }

    #[test]
    fn test_break_even_gross_profit_is_gross_loss() {
        let totals = Aggregates::from_totals(50.0, 50.0, 10.0);
        assert_eq!(totals.gross_profit, 0.0);
        assert!(totals.is_gross_loss());
        assert!(!Aggregates::from_totals(50.0, 49.0, 0.0).is_gross_loss());
    }

    #[test]
    fn test_aggregate_ignores_unknown_and_sums_negatives() {
        let entries = vec![
            entry("A", 40.0, Category::Revenue),
            entry("Refund", -5.0, Category::Revenue),
            entry("Mystery", 1000.0, Category::Unknown),
        ];

        let totals = aggregate(&entries);
        assert_eq!(totals.total_revenue, 35.0);
        assert_eq!(totals.net_income, 35.0);
    }

    #[test]
    fn test_empty_input() {
        let totals = aggregate(&Vec::<ClassifiedEntry>::new());
        assert_eq!(totals, Aggregates::default());
    }

    #[test]
    fn test_sum_values() {
        let items = vec![LineItem::new("a", 1.5, "rev"), LineItem::new("b", -0.5, "rev")];
        assert_eq!(sum_values(&items), 1.0);
    }
}
