/// Spending categories a payment can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentCategory {
    Food,
    Travel,
    Clothes,
    Entertainment,
    Bills,
    Healthcare,
    Others,
}

impl PaymentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Clothes => "Clothes",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills",
            Self::Healthcare => "Healthcare",
            Self::Others => "Others",
        }
    }

    /// Lenient parse; anything unrecognized files under `Others`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "food" => Self::Food,
            "travel" => Self::Travel,
            "clothes" | "shopping" => Self::Clothes,
            "entertainment" => Self::Entertainment,
            "bills" | "bill" => Self::Bills,
            "healthcare" | "health" => Self::Healthcare,
            _ => Self::Others,
        }
    }

    pub fn all() -> &'static [PaymentCategory] {
        &[
            Self::Food,
            Self::Travel,
            Self::Clothes,
            Self::Entertainment,
            Self::Bills,
            Self::Healthcare,
            Self::Others,
        ]
    }
}

impl std::fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
