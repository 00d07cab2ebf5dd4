use std::fmt;

/// Food-security category assigned to a SOM cluster, FSVA style.
///
/// Variants are declared from most to least food-secure, so `Ord` follows rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    SangatTahan,
    Tahan,
    AgakTahan,
    AgakRentan,
    Rentan,
    SangatRentan,
}

/// Fill colour for records without a known cluster.
pub const NEUTRAL_COLOR: &str = "#cccccc";

impl Category {
    /// All categories in rank order.
    pub const ALL: [Category; 6] = [
        Category::SangatTahan,
        Category::Tahan,
        Category::AgakTahan,
        Category::AgakRentan,
        Category::Rentan,
        Category::SangatRentan,
    ];

    /// Look up the category for a SOM cluster id.
    /// SOM indices are not rank-ordered, hence the fixed table.
    pub fn from_cluster(cluster: i64) -> Option<Self> {
        match cluster {
            0 => Some(Category::SangatTahan),
            1 => Some(Category::AgakTahan),
            2 => Some(Category::AgakRentan),
            3 => Some(Category::Rentan),
            4 => Some(Category::Tahan),
            5 => Some(Category::SangatRentan),
            _ => None,
        }
    }

    /// Inverse of `from_cluster`.
    pub fn cluster(self) -> i64 {
        match self {
            Category::SangatTahan => 0,
            Category::AgakTahan => 1,
            Category::AgakRentan => 2,
            Category::Rentan => 3,
            Category::Tahan => 4,
            Category::SangatRentan => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::SangatTahan => "Sangat Tahan",
            Category::Tahan => "Tahan",
            Category::AgakTahan => "Agak Tahan",
            Category::AgakRentan => "Agak Rentan",
            Category::Rentan => "Rentan",
            Category::SangatRentan => "Sangat Rentan",
        }
    }

    /// Map fill colour, keyed by the underlying cluster id.
    pub fn color(self) -> &'static str {
        match self.cluster() {
            0 => "#1B4332",
            1 => "#52B69A",
            2 => "#F4A261",
            3 => "#E63946",
            4 => "#FFD166",
            _ => "#8B0000",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fill colour for an optional cluster id, neutral when unset or unknown.
pub fn cluster_color(cluster: Option<i64>) -> &'static str {
    cluster.and_then(Category::from_cluster)
        .map_or(NEUTRAL_COLOR, Category::color)
}
