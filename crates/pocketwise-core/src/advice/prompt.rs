//! Prompt construction for model-generated advice

use std::fmt::Write;

use crate::models::{AdviceRequest, CategorySummary};

const RESPONSE_FORMAT: &str = "Please provide a structured response with:

1. INSIGHTS (2-3 key observations about spending patterns)
2. RECOMMENDATIONS (3-4 specific, actionable steps to improve financial health)
3. POSITIVE REINFORCEMENT (1 encouraging statement)

Format your response as:
INSIGHTS:
- [insight 1]
- [insight 2]

RECOMMENDATIONS:
- [recommendation 1]
- [recommendation 2]

POSITIVE:
[encouraging message]

Keep advice practical, specific to the data, and encouraging. Use exact dollar amounts when relevant.";

/// Render the advice prompt for a summary and request
pub fn build_prompt(summary: &CategorySummary, request: &AdviceRequest) -> String {
    let figures = &summary.summary;
    let period = &summary.period;
    let months = period.months.max(1);

    let mut prompt = String::from(
        "You are a helpful and encouraging financial advisor. Analyze this user's financial data and provide personalized advice.\n\n",
    );

    // Writing to a String cannot fail
    let _ = writeln!(prompt, "Financial Overview:");
    let _ = writeln!(
        prompt,
        "Period: {} to {} ({} months)\n",
        period.start, period.end, period.months
    );

    let _ = writeln!(prompt, "Income:");
    let _ = writeln!(prompt, "- Total: ${:.2}", figures.total_income);
    let _ = writeln!(
        prompt,
        "- Average monthly: ${:.2}\n",
        figures.total_income / months as f64
    );

    let _ = writeln!(prompt, "Expenses by Category:");
    for (category, detail) in &summary.expenses {
        let _ = writeln!(
            prompt,
            "- {}: ${:.2} ({:.1}%, {} transactions)",
            category, detail.total, detail.percentage, detail.count
        );
    }

    let _ = writeln!(prompt, "\nTotal Expenses: ${:.2}", figures.total_expenses);
    let _ = writeln!(prompt, "Net Savings: ${:.2}", figures.net_savings);
    let _ = writeln!(prompt, "Savings Rate: {:.1}%\n", figures.savings_rate);

    if let Some(category) = request.focus_category() {
        let _ = writeln!(prompt, "Focus specifically on the '{}' category.\n", category);
    }

    let context = request.context.trim();
    if !context.is_empty() && !context.eq_ignore_ascii_case("general") {
        let _ = writeln!(
            prompt,
            "The user is mainly interested in advice about {}.\n",
            context
        );
    }

    prompt.push_str(RESPONSE_FORMAT);
    prompt
}
