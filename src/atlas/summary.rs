use std::{collections::BTreeMap, fmt};

use geo::{Centroid, MultiPoint, Point};

use super::{Atlas, Category, EnrichedRecord};

/// Headline metrics for one province (or the whole atlas).
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceSummary {
    /// `None` for the whole atlas.
    pub province: Option<String>,
    pub districts: usize,
    pub matched: usize,
    pub mean_ikp: Option<f64>,
    /// ku/ha
    pub mean_rice_productivity: Option<f64>,
    /// ton
    pub total_rice_production: f64,
    pub total_pdrb: f64,
    pub categories: BTreeMap<Category, usize>,
    /// Centroid of the district centroids (lon, lat).
    pub center: Option<Point<f64>>,
}

impl Atlas {
    /// Summarize one province, or every record when `province` is `None`.
    pub fn summary(&self, province: Option<&str>) -> ProvinceSummary {
        ProvinceSummary::from_records(province, &self.select(province))
    }
}

impl ProvinceSummary {
    pub fn from_records(province: Option<&str>, records: &[&EnrichedRecord]) -> Self {
        let indicators = records.iter().filter_map(|r| r.indicators()).collect::<Vec<_>>();

        let mut categories = BTreeMap::new();
        for category in records.iter().filter_map(|r| r.category) {
            *categories.entry(category).or_insert(0) += 1;
        }

        let centroids = records.iter()
            .filter_map(|r| r.boundary.geometry.centroid())
            .collect::<Vec<_>>();

        Self {
            province: province.map(str::to_string),
            districts: records.len(),
            matched: indicators.len(),
            mean_ikp: mean(indicators.iter().filter_map(|i| i.ikp)),
            mean_rice_productivity: mean(indicators.iter().filter_map(|i| i.rice_productivity)),
            total_rice_production: indicators.iter().filter_map(|i| i.rice_production).sum(),
            total_pdrb: indicators.iter().filter_map(|i| i.pdrb).sum(),
            categories,
            center: MultiPoint(centroids).centroid(),
        }
    }
}

/// Mean of the present values, `None` when there are none.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Format with thousands separators and no decimals, e.g. `1,234,568`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() { return value.to_string() }

    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3 + 1);
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 { out.push(',') }
        out.push(digit);
    }

    if value < 0.0 && rounded != "0" { format!("-{out}") } else { out }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for ProvinceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ringkasan Cluster – {}", self.province.as_deref().unwrap_or("Semua Provinsi"))?;
        writeln!(f, "  Kabupaten/Kota      {} ({} cocok)", self.districts, self.matched)?;
        writeln!(f, "  IKP Rata-rata       {}", format_optional(self.mean_ikp))?;
        writeln!(f, "  Produktivitas Padi  {} ku/ha", format_optional(self.mean_rice_productivity))?;
        writeln!(f, "  Produksi Padi       {} ton", format_thousands(self.total_rice_production))?;
        writeln!(f, "  PDRB                {}", format_thousands(self.total_pdrb))?;
        if let Some(center) = self.center {
            writeln!(f, "  Pusat peta          {:.4}, {:.4}", center.y(), center.x())?;
        }
        writeln!(f, "  Kategori (SOM):")?;
        for category in Category::ALL {
            let count = self.categories.get(&category).copied().unwrap_or(0);
            writeln!(f, "    {:<14} {count}", category.label())?;
        }
        Ok(())
    }
}
