use serde::{Deserialize, Serialize};

/// Category key used when a transaction carries none
pub const DEFAULT_CATEGORY: &str = "outros";

/// Known transaction categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Alimentacao,
    Transporte,
    Moradia,
    Saude,
    Educacao,
    Lazer,
    Compras,
    Servicos,
    Investimentos,
    Salario,
    Freelance,
    Outros,
}

impl Category {
    /// Get all categories for iteration
    pub fn all() -> &'static [Category] {
        &[
            Category::Alimentacao,
            Category::Transporte,
            Category::Moradia,
            Category::Saude,
            Category::Educacao,
            Category::Lazer,
            Category::Compras,
            Category::Servicos,
            Category::Investimentos,
            Category::Salario,
            Category::Freelance,
            Category::Outros,
        ]
    }

    /// Look up a category by its wire key
    pub fn from_key(key: &str) -> Option<Category> {
        Self::all().iter().copied().find(|c| c.key() == key)
    }

    /// Wire key as sent by the backend
    pub fn key(&self) -> &'static str {
        match self {
            Category::Alimentacao => "alimentacao",
            Category::Transporte => "transporte",
            Category::Moradia => "moradia",
            Category::Saude => "saude",
            Category::Educacao => "educacao",
            Category::Lazer => "lazer",
            Category::Compras => "compras",
            Category::Servicos => "servicos",
            Category::Investimentos => "investimentos",
            Category::Salario => "salario",
            Category::Freelance => "freelance",
            Category::Outros => "outros",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Alimentacao => "Alimentação",
            Category::Transporte => "Transporte",
            Category::Moradia => "Moradia",
            Category::Saude => "Saúde",
            Category::Educacao => "Educação",
            Category::Lazer => "Lazer",
            Category::Compras => "Compras",
            Category::Servicos => "Serviços",
            Category::Investimentos => "Investimentos",
            Category::Salario => "Salário",
            Category::Freelance => "Freelance",
            Category::Outros => "Outros",
        }
    }

    /// Emoji shown next to the label
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Alimentacao => "🍽️",
            Category::Transporte => "🚗",
            Category::Moradia => "🏠",
            Category::Saude => "💊",
            Category::Educacao => "📚",
            Category::Lazer => "🎮",
            Category::Compras => "🛒",
            Category::Servicos => "🔧",
            Category::Investimentos => "📈",
            Category::Salario => "💰",
            Category::Freelance => "💼",
            Category::Outros => "📌",
        }
    }

    /// Display label for an arbitrary category key, falling back to the key itself
    pub fn label_for(key: &str) -> &str {
        Self::from_key(key).map(|c| c.label()).unwrap_or(key)
    }

    /// Icon for an arbitrary category key; unknown keys get the `outros` icon
    pub fn icon_for(key: &str) -> &'static str {
        Self::from_key(key).unwrap_or(Category::Outros).icon()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
