//! Best-effort extraction of budget figures from itinerary text.
//!
//! The assistant's reply is free text, so there is no guaranteed schema.
//! Extraction looks for per-category amounts in the reply and for a stated
//! total in the user's message, and degrades to `None` when neither is
//! found. It never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Spending categories a travel budget is broken into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Accommodation,
    Transport,
    Food,
    Activities,
    Miscellaneous,
}

/// Currencies recognized in chat text, by symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Inr,
    Usd,
}

impl Currency {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "₹" => Some(Currency::Inr),
            "$" => Some(Currency::Usd),
            _ => None,
        }
    }

    /// Amounts below this are treated as noise (per-day rates, counts)
    /// rather than category totals.
    fn noise_floor(self) -> u64 {
        match self {
            Currency::Inr => 500,
            Currency::Usd => 10,
        }
    }
}

/// How a breakdown was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Amounts taken from the reply as written.
    Specific,
    /// Reply amounts rescaled to the user's stated total.
    Scaled,
    /// Synthesized from the user's stated total alone.
    Estimated,
    /// Entered by the user directly.
    Manual,
}

/// One (category, amount) pair.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetFigure {
    pub category: Category,
    pub amount: u64,
}

/// A charted budget breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetBreakdown {
    pub currency: Currency,
    pub categories: Vec<BudgetFigure>,
    pub total: u64,
    pub source: Source,
}

// ============================================================================
// Patterns
// ============================================================================

const AMOUNT: &str = r"(\d+(?:,\d+)*)";

static STATED_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(₹|\$)\s*{AMOUNT}")).expect("stated total pattern"));

static CURRENCY_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[₹$]").expect("currency symbol pattern"));

/// Per-category patterns, matched against the lowercased reply. Either the
/// category name followed by an amount, or an amount followed by a word
/// strongly associated with the category.
static CATEGORY_PATTERNS: LazyLock<Vec<(Category, Vec<Regex>)>> = LazyLock::new(|| {
    let compile = |patterns: &[String]| -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("category pattern"))
            .collect()
    };

    vec![
        (
            Category::Accommodation,
            compile(&[
                format!(r"accommodation[:\s-]*(?:₹|\$)?\s*{AMOUNT}"),
                format!(r"(?:₹|\$)\s*{AMOUNT}\s*(?:for|per|/)\s*accommodation"),
            ]),
        ),
        (
            Category::Transport,
            compile(&[
                format!(r"transport(?:ation)?[:\s-]*(?:₹|\$)?\s*{AMOUNT}"),
                format!(r"(?:₹|\$)\s*{AMOUNT}\s*\(?(?:bike|car|train|bus|flight)"),
            ]),
        ),
        (
            Category::Food,
            compile(&[
                format!(r"food[:\s-]*(?:₹|\$)?\s*{AMOUNT}"),
                format!(r"(?:₹|\$)\s*{AMOUNT}\s*(?:for|per|/)\s*food"),
            ]),
        ),
        (
            Category::Activities,
            compile(&[
                format!(r"(?:sightseeing and )?activities[:\s-]*(?:₹|\$)?\s*{AMOUNT}"),
                format!(r"(?:₹|\$)\s*{AMOUNT}\s*\(?(?:entrance|water sports|sightseeing)"),
            ]),
        ),
        (
            Category::Miscellaneous,
            compile(&[
                format!(r"(?:miscellaneous|misc|other)[:\s-]*(?:₹|\$)?\s*{AMOUNT}"),
                format!(r"(?:₹|\$)\s*{AMOUNT}\s*(?:for|per|/)\s*(?:misc|other)"),
            ]),
        ),
    ]
});

/// Share of the stated total per category when the reply has no breakdown
/// of its own.
const ESTIMATED_SPLIT: [(Category, u64); 5] = [
    (Category::Accommodation, 35),
    (Category::Transport, 25),
    (Category::Food, 20),
    (Category::Activities, 15),
    (Category::Miscellaneous, 5),
];

// ============================================================================
// Extraction
// ============================================================================

/// Extract a budget breakdown from the assistant's reply and the user's
/// message that prompted it.
///
/// The total the user stated ("for ₹25,000", "under $800") is the most
/// reliable signal and takes priority: a reply breakdown whose sum strays
/// more than 10% from it is rescaled, and when the reply has no usable
/// figures at all, a fixed split of the stated total stands in.
pub fn extract(reply: &str, user_input: &str) -> Option<BudgetBreakdown> {
    let stated = stated_total(user_input);
    let currency = stated.map(|(c, _)| c).or_else(|| detect_currency(reply))?;

    let figures = reply_figures(&reply.to_lowercase(), currency);

    match (stated, figures.is_empty()) {
        (Some((currency, total)), false) => {
            let sum: u64 = figures.iter().map(|f| f.amount).sum();
            if sum.abs_diff(total).saturating_mul(10) <= total {
                Some(BudgetBreakdown {
                    currency,
                    categories: figures,
                    total: sum,
                    source: Source::Specific,
                })
            } else {
                let categories: Vec<BudgetFigure> = figures
                    .into_iter()
                    .map(|f| BudgetFigure {
                        category: f.category,
                        amount: (f.amount as u128 * total as u128 / sum as u128) as u64,
                    })
                    .collect();
                Some(BudgetBreakdown {
                    currency,
                    categories,
                    total,
                    source: Source::Scaled,
                })
            }
        }
        (Some((currency, total)), true) => {
            let categories = ESTIMATED_SPLIT
                .iter()
                .map(|(category, percent)| BudgetFigure {
                    category: *category,
                    amount: total * percent / 100,
                })
                .collect();
            Some(BudgetBreakdown {
                currency,
                categories,
                total,
                source: Source::Estimated,
            })
        }
        (None, false) => {
            let total = figures.iter().map(|f| f.amount).sum();
            Some(BudgetBreakdown {
                currency,
                categories: figures,
                total,
                source: Source::Specific,
            })
        }
        (None, true) => None,
    }
}

/// Build a breakdown from explicitly entered amounts. Zero entries are
/// dropped; all-zero input yields `None`.
pub fn manual(currency: Currency, amounts: &[(Category, u64)]) -> Option<BudgetBreakdown> {
    let categories: Vec<BudgetFigure> = amounts
        .iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(category, amount)| BudgetFigure {
            category: *category,
            amount: *amount,
        })
        .collect();

    if categories.is_empty() {
        return None;
    }

    let total = categories.iter().map(|f| f.amount).sum();
    Some(BudgetBreakdown {
        currency,
        categories,
        total,
        source: Source::Manual,
    })
}

/// First currency-tagged amount in the user's message.
fn stated_total(text: &str) -> Option<(Currency, u64)> {
    let captures = STATED_TOTAL.captures(text)?;
    let currency = Currency::from_symbol(&captures[1])?;
    let total = parse_amount(&captures[2])?;
    (total > 0).then_some((currency, total))
}

/// First currency symbol appearing in the reply.
fn detect_currency(reply: &str) -> Option<Currency> {
    CURRENCY_SYMBOL
        .find(reply)
        .and_then(|m| Currency::from_symbol(m.as_str()))
}

/// Largest match per category above the noise floor, in category order.
fn reply_figures(reply_lower: &str, currency: Currency) -> Vec<BudgetFigure> {
    let floor = currency.noise_floor();
    let mut figures = Vec::new();

    for (category, patterns) in CATEGORY_PATTERNS.iter() {
        let best = patterns
            .iter()
            .flat_map(|pattern| pattern.captures_iter(reply_lower))
            .filter_map(|captures| parse_amount(&captures[1]))
            .filter(|amount| *amount >= floor)
            .max();
        if let Some(amount) = best {
            figures.push(BudgetFigure {
                category: *category,
                amount,
            });
        }
    }

    figures
}

fn parse_amount(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(breakdown: &BudgetBreakdown) -> Vec<(Category, u64)> {
        breakdown
            .categories
            .iter()
            .map(|f| (f.category, f.amount))
            .collect()
    }

    #[test]
    fn specific_breakdown_from_reply() {
        let reply = "Here is your plan.\n\
            Accommodation: ₹9,000 (3 nights)\n\
            Transport: ₹6,000 (train both ways)\n\
            Food: ₹5,000\n\
            Activities: ₹3,500 (water sports)\n\
            Miscellaneous: ₹1,500";
        let breakdown = extract(reply, "Plan a 5-day trip to Goa for ₹25,000").unwrap();

        assert_eq!(breakdown.source, Source::Specific);
        assert_eq!(breakdown.currency, Currency::Inr);
        assert_eq!(breakdown.total, 25_000);
        assert_eq!(
            amounts(&breakdown),
            vec![
                (Category::Accommodation, 9_000),
                (Category::Transport, 6_000),
                (Category::Food, 5_000),
                (Category::Activities, 3_500),
                (Category::Miscellaneous, 1_500),
            ]
        );
    }

    #[test]
    fn breakdown_rescaled_to_stated_total() {
        // Reply sums to 30,000 against a stated 20,000; more than 10% off.
        let reply = "Accommodation: ₹15,000. Transport: ₹9,000. Food: ₹6,000.";
        let breakdown = extract(reply, "Weekend in Manali for ₹20,000").unwrap();

        assert_eq!(breakdown.source, Source::Scaled);
        assert_eq!(breakdown.total, 20_000);
        assert_eq!(
            amounts(&breakdown),
            vec![
                (Category::Accommodation, 10_000),
                (Category::Transport, 6_000),
                (Category::Food, 4_000),
            ]
        );
    }

    #[test]
    fn estimated_split_when_reply_has_no_figures() {
        let reply = "Paris is lovely in spring. Day 1: the Louvre. Day 2: Montmartre.";
        let breakdown = extract(reply, "Plan a 3-day trip to Paris under $800").unwrap();

        assert_eq!(breakdown.source, Source::Estimated);
        assert_eq!(breakdown.currency, Currency::Usd);
        assert_eq!(breakdown.total, 800);
        assert_eq!(
            amounts(&breakdown),
            vec![
                (Category::Accommodation, 280),
                (Category::Transport, 200),
                (Category::Food, 160),
                (Category::Activities, 120),
                (Category::Miscellaneous, 40),
            ]
        );
    }

    #[test]
    fn reply_only_breakdown_without_stated_total() {
        let reply = "Budget: $120 for accommodation, food: $60, and $45 (train) to get around.";
        let breakdown = extract(reply, "What would a night in Porto cost?").unwrap();

        assert_eq!(breakdown.source, Source::Specific);
        assert_eq!(breakdown.currency, Currency::Usd);
        assert_eq!(breakdown.total, 225);
        assert_eq!(
            amounts(&breakdown),
            vec![
                (Category::Accommodation, 120),
                (Category::Transport, 45),
                (Category::Food, 60),
            ]
        );
    }

    #[test]
    fn amounts_below_noise_floor_are_ignored() {
        let reply = "Food: ₹200 per meal. A great street-food scene.";
        assert!(extract(reply, "Tell me about Indore").is_none());
    }

    #[test]
    fn largest_match_per_category_wins() {
        let reply = "Accommodation: ₹2,000 per night, so accommodation: ₹6,000 total.";
        let breakdown = extract(reply, "Three nights in Jaipur").unwrap();
        assert_eq!(amounts(&breakdown), vec![(Category::Accommodation, 6_000)]);
    }

    #[test]
    fn no_figures_anywhere_yields_none() {
        assert!(extract("Have a wonderful trip!", "Thanks for the tips").is_none());
    }

    #[test]
    fn zero_stated_total_is_ignored() {
        assert!(extract("Enjoy!", "I have $0 to spend").is_none());
    }

    #[test]
    fn manual_breakdown_drops_zero_entries() {
        let breakdown = manual(
            Currency::Inr,
            &[
                (Category::Accommodation, 8_000),
                (Category::Transport, 0),
                (Category::Food, 4_000),
            ],
        )
        .unwrap();

        assert_eq!(breakdown.source, Source::Manual);
        assert_eq!(breakdown.total, 12_000);
        assert_eq!(
            amounts(&breakdown),
            vec![(Category::Accommodation, 8_000), (Category::Food, 4_000)]
        );
    }

    #[test]
    fn manual_breakdown_with_all_zeros_is_none() {
        assert!(manual(Currency::Usd, &[(Category::Food, 0)]).is_none());
    }

    #[test]
    fn breakdown_serializes_for_the_chart() {
        let breakdown = extract("Enjoy!", "A week in Kerala for ₹30,000").unwrap();
        let json = serde_json::to_string(&breakdown).unwrap();
        assert!(json.contains("\"currency\":\"inr\""));
        assert!(json.contains("\"source\":\"estimated\""));
        assert!(json.contains("\"category\":\"accommodation\""));
        assert!(json.contains("\"total\":30000"));
    }
}
