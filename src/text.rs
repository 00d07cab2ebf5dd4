//! Fixed explanatory texts shown alongside the data.

/// Main indicators and the method behind the clusters.
pub const INDICATORS: &str = "\
Keterangan Indikator

Analisis ketahanan pangan mengikuti pendekatan FSVA (Food Security and
Vulnerability Atlas). Klasterisasi dilakukan dengan Self-Organizing Map (SOM).

Indikator Utama
  IKP   Indeks Ketahanan Pangan
  Produktivitas Padi (ku/ha) dan Produksi Padi (ton)
  PDRB  Produk Domestik Regional Bruto
  RLS   Rata-rata Lama Sekolah
  UHH   Umur Harapan Hidup
  TPAK  Tingkat Partisipasi Angkatan Kerja
  P0    Persentase Penduduk Miskin
  PPK   Pengeluaran per Kapita
";

/// Short usage guide.
pub const GUIDE: &str = "\
Panduan Penggunaan
  1. Pilih provinsi
  2. Amati ringkasan indikator
  3. Gunakan peta untuk eksplorasi
";

/// Category legend, one line per cluster id in rank order.
pub fn category_legend() -> String {
    crate::atlas::Category::ALL.iter()
        .map(|c| format!("  {}  {:<14} {}\n", c.cluster(), c.label(), c.color()))
        .collect()
}
