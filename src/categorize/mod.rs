use regex::Regex;

use crate::models::PaymentCategory;

/// One row of the keyword table.
///
/// `senders` only ever match the sender id. `merchants` match the sender id
/// as a substring and the body as a whole word. `terms` match the body as a
/// substring.
struct CategoryKeywords {
    category: PaymentCategory,
    senders: &'static [&'static str],
    merchants: &'static [&'static str],
    terms: &'static [&'static str],
}

/// Checked top to bottom; first hit wins.
const CATEGORY_KEYWORDS: &[CategoryKeywords] = &[
    CategoryKeywords {
        category: PaymentCategory::Food,
        senders: &[],
        merchants: &["zomato", "swiggy", "uber", "ola"],
        terms: &["restaurant", "food", "meal"],
    },
    CategoryKeywords {
        category: PaymentCategory::Travel,
        senders: &[],
        merchants: &["irctc", "makemytrip", "cleartrip", "redbus", "goibibo"],
        terms: &["flight", "train", "bus", "hotel", "travel"],
    },
    CategoryKeywords {
        category: PaymentCategory::Clothes,
        senders: &[],
        merchants: &["amazon", "flipkart", "myntra", "nykaa", "ajio"],
        terms: &["shopping", "clothes", "fashion"],
    },
    CategoryKeywords {
        category: PaymentCategory::Bills,
        senders: &["electricity", "water", "gas", "internet", "mobile", "phone"],
        merchants: &[],
        terms: &["bill", "recharge", "utility"],
    },
    CategoryKeywords {
        category: PaymentCategory::Entertainment,
        senders: &["prime"],
        merchants: &["netflix", "spotify", "hotstar", "bookmyshow"],
        terms: &["movie", "music", "entertainment"],
    },
    CategoryKeywords {
        category: PaymentCategory::Healthcare,
        senders: &["pharmacy", "hospital", "medical"],
        merchants: &[],
        terms: &["medicine", "doctor", "health"],
    },
];

pub(crate) struct CategoryClassifier {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    category: PaymentCategory,
    sender_keywords: Vec<&'static str>,
    merchant_regex: Option<Regex>,
    terms: &'static [&'static str],
}

impl CategoryClassifier {
    pub(crate) fn new() -> Self {
        let rules = CATEGORY_KEYWORDS
            .iter()
            .map(|row| {
                let merchant_regex = if row.merchants.is_empty() {
                    None
                } else {
                    let alternation = row
                        .merchants
                        .iter()
                        .map(|m| regex::escape(m))
                        .collect::<Vec<_>>()
                        .join("|");
                    Regex::new(&format!(r"\b(?:{alternation})\b")).ok()
                };
                CompiledRule {
                    category: row.category,
                    sender_keywords: row.senders.iter().chain(row.merchants).copied().collect(),
                    merchant_regex,
                    terms: row.terms,
                }
            })
            .collect();

        Self { rules }
    }

    /// Total: every input lands in exactly one category, `Others` if nothing matches.
    pub(crate) fn classify(&self, body: &str, sender: &str) -> PaymentCategory {
        let body = body.to_lowercase();
        let sender = sender.to_lowercase();

        for rule in &self.rules {
            let matched = rule.sender_keywords.iter().any(|k| sender.contains(k))
                || rule
                    .merchant_regex
                    .as_ref()
                    .is_some_and(|re| re.is_match(&body))
                || rule.terms.iter().any(|t| body.contains(t));

            if matched {
                return rule.category;
            }
        }

        PaymentCategory::Others
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}
