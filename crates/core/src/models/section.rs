use serde::{Deserialize, Serialize};

/// Top-level navigation target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Products,
    Trends,
    Forecast,
}

/// The panel actually rendered for a section.
///
/// `Forecast` has no view of its own and shows the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    AddProduct,
    MarketTrends,
}

impl Section {
    /// Sections in navigation-bar order.
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Products,
        Section::Trends,
        Section::Forecast,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Products => "products",
            Section::Trends => "trends",
            Section::Forecast => "forecast",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Products => "Add Products",
            Section::Trends => "Market Trends",
            Section::Forecast => "Forecasting",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Section::Dashboard => "📊",
            Section::Products => "➕",
            Section::Trends => "📈",
            Section::Forecast => "🔮",
        }
    }

    pub fn view(self) -> View {
        match self {
            Section::Dashboard | Section::Forecast => View::Dashboard,
            Section::Products => View::AddProduct,
            Section::Trends => View::MarketTrends,
        }
    }

    /// Parse a section id; unknown ids fall back to the dashboard.
    pub fn from_id(id: &str) -> Self {
        Section::ALL
            .into_iter()
            .find(|s| s.id() == id)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
