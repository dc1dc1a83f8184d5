use crate::i18n::Translator;
use crate::types::{DetailedSectorAnalysis, ProductAnalysis, TrendReport};

/// Standard CSV escaping: cells containing comma, quote or newline are
/// quoted and internal quotes doubled.
fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// List-valued cells are joined with "; " before escaping.
fn escape_list(items: &[String]) -> String {
    escape_cell(&items.join("; "))
}

fn row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| escape_cell(c))
        .collect::<Vec<_>>()
        .join(",")
}

/// Localized CSV for the top-level report: header, one row per product per
/// sector, then a blank row, the global-analysis title and its text.
pub fn report_to_csv(report: &TrendReport, tr: &Translator) -> String {
    let mut rows = vec![row(&[
        tr.translate("csv.report.sector", &[]),
        tr.translate("csv.report.product", &[]),
        tr.translate("csv.report.demandRate", &[]),
        tr.translate("csv.report.profitabilityScore", &[]),
        tr.translate("csv.report.keyRegions", &[]),
        tr.translate("csv.report.reasons", &[]),
        tr.translate("csv.report.suppliers", &[]),
    ])];

    for sector in &report.sectors {
        for product in &sector.products {
            let score = product
                .profitability_score
                .map(|s| s.to_string())
                .unwrap_or_default();
            rows.push(
                [
                    escape_cell(&sector.sector_name),
                    escape_cell(&product.name),
                    escape_cell(&product.demand_rate.to_string()),
                    escape_cell(&score),
                    escape_cell(&product.regions),
                    escape_cell(&product.reasons),
                    escape_list(&product.suppliers),
                ]
                .join(","),
            );
        }
    }

    rows.push(String::new());
    rows.push(escape_cell(&tr.translate("csv.report.globalAnalysis", &[])));
    rows.push(escape_cell(&report.global_analysis));
    rows.join("\n")
}

pub fn report_csv_filename(period_in_months: u32, tr: &Translator) -> String {
    tr.translate(
        "csv.report.filename",
        &[("period", &period_in_months.to_string())],
    )
}

/// Localized CSV for one sector's in-depth analysis.
pub fn sector_analysis_to_csv(analysis: &DetailedSectorAnalysis, tr: &Translator) -> String {
    let mut rows = vec![
        escape_cell(&tr.translate("csv.detailed.inDepthAnalysis", &[])),
        escape_cell(&analysis.in_depth_analysis),
        String::new(),
        row(&[
            tr.translate("csv.detailed.productSuggestions", &[]),
            tr.translate("csv.detailed.description", &[]),
            tr.translate("csv.detailed.targetAudience", &[]),
            tr.translate("csv.detailed.sellingPoints", &[]),
            tr.translate("csv.detailed.priceRange", &[]),
            tr.translate("csv.detailed.potentialSuppliers", &[]),
            tr.translate("csv.detailed.profitabilityScore", &[]),
            tr.translate("csv.detailed.marketEntryDifficulty", &[]),
        ]),
    ];

    for product in &analysis.product_suggestions {
        rows.push(
            [
                escape_cell(&product.name),
                escape_cell(&product.description),
                escape_cell(&product.target_audience),
                escape_list(&product.selling_points),
                escape_cell(&product.price_range),
                escape_list(&product.suppliers),
                escape_cell(&product.profitability_score.to_string()),
                escape_cell(&product.market_entry_difficulty),
            ]
            .join(","),
        );
    }
    rows.join("\n")
}

pub fn sector_csv_filename(analysis: &DetailedSectorAnalysis, tr: &Translator) -> String {
    tr.translate(
        "csv.detailed.filename",
        &[("sectorName", &analysis.sector_name)],
    )
}

/// Localized CSV for one product analysis: a header row and a values row.
pub fn product_analysis_to_csv(analysis: &ProductAnalysis, tr: &Translator) -> String {
    let headers = row(&[
        tr.translate("csv.product.product", &[]),
        tr.translate("csv.product.marketAnalysis", &[]),
        tr.translate("csv.product.keyRegions", &[]),
        tr.translate("csv.product.targetAudience", &[]),
        tr.translate("csv.product.sellingPoints", &[]),
        tr.translate("csv.product.priceRange", &[]),
        tr.translate("csv.product.suppliers", &[]),
        tr.translate("csv.product.risks", &[]),
    ]);
    let values = [
        escape_cell(&analysis.product_name),
        escape_cell(&analysis.market_analysis),
        escape_list(&analysis.key_regions),
        escape_cell(&analysis.target_audience),
        escape_list(&analysis.selling_points),
        escape_cell(&analysis.price_range),
        escape_list(&analysis.suppliers),
        escape_list(&analysis.risks),
    ]
    .join(",");
    format!("{headers}\n{values}")
}

pub fn product_csv_filename(analysis: &ProductAnalysis, tr: &Translator) -> String {
    tr.translate(
        "csv.product.filename",
        &[("productName", &analysis.product_name)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, ProductTrend, Sector};

    fn sample_report() -> TrendReport {
        TrendReport {
            sectors: vec![
                Sector {
                    sector_name: "Technology".into(),
                    products: vec![
                        ProductTrend {
                            name: "Solar charger, foldable".into(),
                            demand_rate: 18.5,
                            regions: "Europe, North America".into(),
                            reasons: "Energy costs".into(),
                            profitability_score: Some(8),
                            suppliers: vec!["SunCo".into(), "Voltix".into()],
                        },
                        ProductTrend {
                            name: "Smart ring".into(),
                            demand_rate: 12.0,
                            regions: "Japan".into(),
                            reasons: "Health tracking \"boom\"".into(),
                            profitability_score: None,
                            suppliers: vec![],
                        },
                    ],
                },
                Sector {
                    sector_name: "Home & Decor".into(),
                    products: vec![ProductTrend {
                        name: "Modular shelving".into(),
                        demand_rate: 9.0,
                        regions: "Worldwide".into(),
                        reasons: "Small apartments\nand remote work".into(),
                        profitability_score: Some(6),
                        suppliers: vec!["ShelfWorks".into()],
                    }],
                },
            ],
            global_analysis: "Demand concentrates in tech, with home goods close behind.".into(),
        }
    }

    /// Split CSV text into rows, honoring quoted cells that span newlines.
    fn split_rows(csv: &str) -> Vec<String> {
        let mut rows = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        for ch in csv.chars() {
            match ch {
                '"' => {
                    in_quotes = !in_quotes;
                    current.push(ch);
                }
                '\n' if !in_quotes => {
                    rows.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            }
        }
        rows.push(current);
        rows
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_list_cells_joined_with_semicolons() {
        let items = vec!["SunCo".to_string(), "Voltix".to_string()];
        assert_eq!(escape_list(&items), "SunCo; Voltix");
    }

    #[test]
    fn test_report_round_trip_row_count() {
        let tr = Translator::new(Language::En).unwrap();
        let report = sample_report();
        let csv = report_to_csv(&report, &tr);

        let rows = split_rows(&csv);
        let product_count: usize = report.sectors.iter().map(|s| s.products.len()).sum();
        // header + products + blank + analysis title + analysis text
        assert_eq!(rows.len(), 1 + product_count + 3);
        assert_eq!(rows[0].split(',').count(), 7);
        assert!(rows[1].starts_with("Technology,"));
    }

    #[test]
    fn test_report_headers_localized() {
        let mut tr = Translator::new(Language::Fr).unwrap();
        let csv = report_to_csv(&sample_report(), &tr);
        assert!(csv.starts_with("Secteur,Produit"));

        tr.set_language(Language::En);
        let csv = report_to_csv(&sample_report(), &tr);
        assert!(csv.starts_with("Sector,Product"));
    }

    #[test]
    fn test_sector_analysis_layout() {
        let tr = Translator::new(Language::En).unwrap();
        let analysis = DetailedSectorAnalysis {
            sector_name: "Technology".into(),
            in_depth_analysis: "Fast-moving, hardware-led growth.".into(),
            product_suggestions: vec![],
        };
        let csv = sector_analysis_to_csv(&analysis, &tr);
        let rows = split_rows(&csv);
        assert_eq!(rows[0], "In-depth analysis");
        assert_eq!(rows[2], "");
        assert!(rows[3].starts_with("Product suggestions,Description"));
    }

    #[test]
    fn test_product_analysis_two_rows() {
        let tr = Translator::new(Language::En).unwrap();
        let analysis = ProductAnalysis {
            product_name: "Smart ring".into(),
            market_analysis: "Niche, growing".into(),
            key_regions: vec!["Japan".into(), "USA".into()],
            target_audience: "Athletes".into(),
            selling_points: vec!["Discreet".into()],
            price_range: "$150-$300".into(),
            suppliers: vec![],
            risks: vec!["Chip supply".into()],
        };
        let csv = product_analysis_to_csv(&analysis, &tr);
        let rows = split_rows(&csv);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].contains("Japan; USA"));
    }

    #[test]
    fn test_filenames_interpolated() {
        let tr = Translator::new(Language::En).unwrap();
        assert_eq!(report_csv_filename(3, &tr), "trend-report-3-months.csv");
    }
}
