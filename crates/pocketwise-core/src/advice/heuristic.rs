//! Rule-based advice derived from a category summary
//!
//! Used whenever no model is configured or the model call fails. Output depends
//! only on the summary, so the same input always yields the same advice.

use serde::Serialize;

use crate::models::CategorySummary;

/// Categories counted as discretionary, compared case-insensitively
const DISCRETIONARY_CATEGORIES: &[&str] = &["dining", "entertainment", "shopping", "subscriptions"];

/// Recommended share of income saved, in percent
const TARGET_SAVINGS_RATE: f64 = 20.0;

/// Discretionary share of expenses above which a cut is recommended
const DISCRETIONARY_THRESHOLD: f64 = 0.2;

const CLOSING_LINE: &str =
    "You're tracking your finances, which is a great first step toward financial wellness!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicAdvice {
    pub advice: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Build insights, recommendations and the composed advice text
pub fn generate(summary: &CategorySummary) -> HeuristicAdvice {
    let insights = insights(summary);
    let recommendations = recommendations(summary);
    let advice = compose(&insights, &recommendations);

    HeuristicAdvice {
        advice,
        insights,
        recommendations,
    }
}

pub fn insights(summary: &CategorySummary) -> Vec<String> {
    let mut insights = Vec::new();
    let figures = &summary.summary;
    let rate = figures.savings_rate;

    let band = if rate < 0.0 || figures.net_savings < 0.0 {
        format!(
            "You're currently spending more than you earn (savings rate {:.1}%) - immediate action needed to avoid debt",
            rate
        )
    } else if rate > TARGET_SAVINGS_RATE {
        format!(
            "Excellent savings rate of {:.1}% - you're saving more than the recommended 20%",
            rate
        )
    } else if rate >= 10.0 {
        format!(
            "Your savings rate of {:.1}% is on track - aim for 20% for optimal financial health",
            rate
        )
    } else {
        format!(
            "Your savings rate of {:.1}% has room for improvement - consider cutting discretionary spending",
            rate
        )
    };
    insights.push(band);

    // BTreeMap iteration is name-ordered, so strict `>` keeps the first name on ties
    let mut largest: Option<(&str, f64)> = None;
    for (category, detail) in &summary.expenses {
        if largest.map_or(true, |(_, total)| detail.total > total) {
            largest = Some((category.as_str(), detail.total));
        }
    }
    if let Some((category, total)) = largest {
        if figures.total_expenses > 0.0 {
            insights.push(format!(
                "Your largest expense is {} at ${:.2} ({:.1}% of spending)",
                category,
                total,
                total / figures.total_expenses * 100.0
            ));
        }
    }

    let months = summary.period.months.max(1);
    insights.push(format!(
        "Average monthly expenses: ${:.2} over {} {}",
        figures.total_expenses / months as f64,
        months,
        if months == 1 { "month" } else { "months" }
    ));

    insights
}

pub fn recommendations(summary: &CategorySummary) -> Vec<String> {
    let mut recommendations = Vec::new();
    let figures = &summary.summary;

    if figures.savings_rate < TARGET_SAVINGS_RATE {
        recommendations.push(
            "Set up automatic transfers to savings account to reach a 20% savings rate".to_string(),
        );
    }

    let discretionary: f64 = summary
        .expenses
        .iter()
        .filter(|(category, _)| {
            let category = category.to_lowercase();
            DISCRETIONARY_CATEGORIES.contains(&category.as_str())
        })
        .map(|(_, detail)| detail.total)
        .sum();

    if discretionary > figures.total_expenses * DISCRETIONARY_THRESHOLD {
        recommendations.push(format!(
            "Consider reducing discretionary spending (dining, entertainment, shopping, subscriptions) - currently ${:.2}",
            discretionary
        ));
    }

    recommendations
        .push("Track your spending weekly to identify patterns and opportunities to save".to_string());
    recommendations.push("Build an emergency fund covering 3-6 months of expenses".to_string());

    recommendations
}

fn compose(insights: &[String], recommendations: &[String]) -> String {
    let mut advice = String::from("Based on your financial data analysis:\n\nINSIGHTS:\n");
    for insight in insights {
        advice.push_str("- ");
        advice.push_str(insight);
        advice.push('\n');
    }
    advice.push_str("\nRECOMMENDATIONS:\n");
    for recommendation in recommendations {
        advice.push_str("- ");
        advice.push_str(recommendation);
        advice.push('\n');
    }
    advice.push_str("\nPOSITIVE:\n");
    advice.push_str(CLOSING_LINE);
    advice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::parsing::parse_sections;
    use crate::models::{parse_date, CategoryDetail, FinancialSummary, Period};
    use std::collections::BTreeMap;

    fn summary(income: f64, expenses: &[(&str, f64)]) -> CategorySummary {
        let total_expenses: f64 = expenses.iter().map(|(_, t)| t).sum();
        let expense_map: BTreeMap<String, CategoryDetail> = expenses
            .iter()
            .map(|(name, total)| {
                (
                    name.to_string(),
                    CategoryDetail {
                        total: *total,
                        count: 1,
                        percentage: if total_expenses > 0.0 {
                            total / total_expenses * 100.0
                        } else {
                            0.0
                        },
                    },
                )
            })
            .collect();

        CategorySummary {
            income: BTreeMap::new(),
            expenses: expense_map,
            summary: FinancialSummary::from_totals(income, total_expenses),
            period: Period::new(
                parse_date("2024-01-01").unwrap(),
                parse_date("2024-02-28").unwrap(),
            ),
        }
    }

    #[test]
    fn test_excellent_band() {
        let advice = generate(&summary(8400.0, &[("rent", 2400.0), ("groceries", 240.0)]));
        assert_eq!(
            advice.insights[0],
            "Excellent savings rate of 68.6% - you're saving more than the recommended 20%"
        );
        assert!(!advice
            .recommendations
            .iter()
            .any(|r| r.starts_with("Set up automatic transfers")));
    }

    #[test]
    fn test_rate_bands() {
        let on_track = generate(&summary(1000.0, &[("rent", 850.0)]));
        assert!(on_track.insights[0].contains("15.0% is on track"));

        let exactly_twenty = generate(&summary(1000.0, &[("rent", 800.0)]));
        assert!(exactly_twenty.insights[0].contains("20.0% is on track"));

        let room = generate(&summary(1000.0, &[("rent", 950.0)]));
        assert!(room.insights[0].contains("5.0% has room for improvement"));

        let over = generate(&summary(1000.0, &[("rent", 1250.0)]));
        assert!(over.insights[0].starts_with("You're currently spending more than you earn"));
        assert!(over.insights[0].contains("-25.0%"));
    }

    #[test]
    fn test_no_income_with_expenses_is_overspending() {
        let advice = generate(&summary(0.0, &[("rent", 100.0)]));
        assert!(advice.insights[0].starts_with("You're currently spending more than you earn"));
    }

    #[test]
    fn test_largest_category_ties_by_name() {
        let advice = generate(&summary(
            5000.0,
            &[("utilities", 300.0), ("groceries", 300.0), ("misc", 10.0)],
        ));
        assert_eq!(
            advice.insights[1],
            "Your largest expense is groceries at $300.00 (49.2% of spending)"
        );
    }

    #[test]
    fn test_no_expenses_skips_largest_category() {
        let advice = generate(&summary(5000.0, &[]));
        assert_eq!(advice.insights.len(), 2);
        assert_eq!(advice.insights[1], "Average monthly expenses: $0.00 over 2 months");
    }

    #[test]
    fn test_average_monthly_expenses() {
        let advice = generate(&summary(8400.0, &[("rent", 2400.0), ("groceries", 240.0)]));
        assert_eq!(
            advice.insights[2],
            "Average monthly expenses: $1320.00 over 2 months"
        );
    }

    #[test]
    fn test_discretionary_recommendation() {
        let advice = generate(&summary(
            5000.0,
            &[("rent", 1000.0), ("Dining", 300.0), ("shopping", 100.0)],
        ));
        assert!(advice.recommendations.contains(
            &"Consider reducing discretionary spending (dining, entertainment, shopping, subscriptions) - currently $400.00"
                .to_string()
        ));

        let modest = generate(&summary(5000.0, &[("rent", 1000.0), ("dining", 100.0)]));
        assert!(!modest
            .recommendations
            .iter()
            .any(|r| r.starts_with("Consider reducing")));
    }

    #[test]
    fn test_always_present_recommendations() {
        let advice = generate(&summary(8400.0, &[("rent", 2400.0)]));
        assert_eq!(
            advice.recommendations,
            vec![
                "Track your spending weekly to identify patterns and opportunities to save",
                "Build an emergency fund covering 3-6 months of expenses",
            ]
        );
    }

    #[test]
    fn test_generation_is_idempotent() {
        let input = summary(3000.0, &[("rent", 1200.0), ("dining", 700.0)]);
        let first = serde_json::to_string(&generate(&input)).unwrap();
        let second = serde_json::to_string(&generate(&input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_advice_text_parses_back_to_lists() {
        let advice = generate(&summary(3000.0, &[("rent", 1200.0), ("dining", 700.0)]));
        assert!(advice.advice.starts_with("Based on your financial data analysis:"));
        assert!(advice.advice.ends_with(CLOSING_LINE));

        let parsed = parse_sections(&advice.advice);
        assert_eq!(parsed.insights, advice.insights);
        assert_eq!(parsed.recommendations, advice.recommendations);
    }
}
