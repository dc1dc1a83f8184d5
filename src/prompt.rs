use chrono::{Datelike, Months, NaiveDate};

use crate::error::{Error, Result};
use crate::llm::GenerationRequest;
use crate::schema;
use crate::types::{GenerationMode, Language, ReportFilters, SubscriptionTier};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const RELIABLE_TEMPERATURE: f32 = 0.3;
const CREATIVE_TEMPERATURE: f32 = 0.9;

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];
const MONTHS_FR: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin",
    "Juillet", "Août", "Septembre", "Octobre", "Novembre", "Décembre",
];

/// Per-tier product counts. The source material never settled on a single
/// cap, so both counts are configurable with conservative defaults.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub free_products_per_sector: u32,
    pub premium_products_per_sector: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            free_products_per_sector: 3,
            premium_products_per_sector: 10,
        }
    }
}

impl ReportConfig {
    /// Requested product count for a tier. Pure function of the tier;
    /// premium is always >= free.
    pub fn products_per_sector(&self, tier: SubscriptionTier) -> u32 {
        match tier {
            SubscriptionTier::Free => self.free_products_per_sector,
            SubscriptionTier::Premium => self
                .premium_products_per_sector
                .max(self.free_products_per_sector),
        }
    }
}

/// Everything the top-level report request depends on.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Forecast horizon in months: 1, 3 or 6.
    pub period_in_months: u32,
    pub tier: SubscriptionTier,
    pub language: Language,
    pub mode: GenerationMode,
    pub filters: ReportFilters,
}

fn temperature(mode: GenerationMode) -> f32 {
    match mode {
        GenerationMode::Reliable => RELIABLE_TEMPERATURE,
        GenerationMode::Creative => CREATIVE_TEMPERATURE,
    }
}

fn month_label(lang: Language, date: NaiveDate) -> String {
    let names = match lang {
        Language::En => &MONTHS_EN,
        Language::Fr => &MONTHS_FR,
    };
    format!("{} {}", names[date.month0() as usize], date.year())
}

/// Human-readable label for the forecast window starting the month after
/// `reference_date` and spanning `period_in_months` months.
fn horizon_label(lang: Language, reference_date: NaiveDate, period_in_months: u32) -> String {
    let start = reference_date
        .with_day(1)
        .unwrap_or(reference_date)
        .checked_add_months(Months::new(1))
        .unwrap_or(reference_date);
    if period_in_months <= 1 {
        return month_label(lang, start);
    }
    let end = start
        .checked_add_months(Months::new(period_in_months - 1))
        .unwrap_or(start);
    match lang {
        Language::En => format!("{} to {}", month_label(lang, start), month_label(lang, end)),
        Language::Fr => format!("{} à {}", month_label(lang, start), month_label(lang, end)),
    }
}

fn filter_lines(lang: Language, filters: &ReportFilters) -> String {
    let mut lines = Vec::new();
    let mut push = |en: &str, fr: &str, value: &Option<String>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                match lang {
                    Language::En => lines.push(format!("- {en}: {v}")),
                    Language::Fr => lines.push(format!("- {fr} : {v}")),
                }
            }
        }
    };
    push("Focus regions", "Régions ciblées", &filters.regions);
    push("Focus keywords", "Mots-clés ciblés", &filters.keywords);
    push(
        "Exclude anything related to",
        "Exclure tout ce qui concerne",
        &filters.excluded_keywords,
    );
    push("Focus industries", "Industries ciblées", &filters.industries);
    if lines.is_empty() {
        String::new()
    } else {
        match lang {
            Language::En => format!("\nUser constraints:\n{}\n", lines.join("\n")),
            Language::Fr => format!("\nContraintes de l'utilisateur :\n{}\n", lines.join("\n")),
        }
    }
}

/// Build the top-level report request. Pure: the date is injected so the
/// output is fully determined by its inputs.
pub fn report_request(
    req: &ReportRequest,
    config: &ReportConfig,
    reference_date: NaiveDate,
) -> Result<GenerationRequest> {
    if !matches!(req.period_in_months, 1 | 3 | 6) {
        return Err(Error::Config(format!(
            "unsupported forecast period: {} months (expected 1, 3 or 6)",
            req.period_in_months
        )));
    }
    let count = config.products_per_sector(req.tier);
    let with_profitability = req.tier == SubscriptionTier::Premium;
    let horizon = horizon_label(req.language, reference_date, req.period_in_months);
    let filters = filter_lines(req.language, &req.filters);

    let prompt = match req.language {
        Language::En => format!(
            r#"As an international consumer-trend analyst, identify the products that will be most in demand worldwide for {horizon}.

Task:
- Classify products by consumer sector (technology, home & decor, beauty, fashion, sports, food, health, entertainment).
- For each sector, give the {count} products most likely to be purchased, their estimated demand rate (in %), the world regions with the strongest demand, the key reasons, and example suppliers.
- Finish with a global analysis (150 words max) of overall market dynamics and the most promising sectors.
{filters}
Constraints:
- Professional, clear and concise tone.
- Use credible percentages based on observable trends.
- Highlight emerging signals (new habits, innovations, social media influence).
- Answer exclusively as JSON matching the provided schema."#
        ),
        Language::Fr => format!(
            r#"En tant qu'expert international en analyse de tendances de consommation, identifie les produits qui seront les plus demandés dans le monde pour {horizon}.

Tâche :
- Classe les produits par secteur de consommation (technologie, maison & déco, beauté, mode, sport, alimentation, santé, divertissement).
- Pour chaque secteur, donne les {count} produits les plus susceptibles d'être achetés, leur taux de demande estimé (en %), les régions du monde à plus forte demande, les raisons clés et des exemples de fournisseurs.
- Termine par une analyse globale (150 mots max) sur les dynamiques générales du marché et les secteurs les plus porteurs.
{filters}
Contraintes :
- Ton professionnel, clair et synthétique.
- Utilise des pourcentages crédibles basés sur des tendances observables.
- Mets en évidence les signaux émergents (nouvelles habitudes, innovations, influence des réseaux sociaux).
- Fournis la réponse exclusivement au format JSON en respectant le schéma fourni."#
        ),
    };

    Ok(GenerationRequest {
        model: DEFAULT_MODEL.to_string(),
        prompt,
        response_schema: schema::trend_report_schema(req.language, count, with_profitability),
        temperature: Some(temperature(req.mode)),
    })
}

/// Build the in-depth single-sector request.
pub fn sector_request(
    sector_name: &str,
    lang: Language,
    config: &ReportConfig,
    mode: GenerationMode,
) -> GenerationRequest {
    // Sector analysis is premium-gated, so the premium count applies.
    let count = config.products_per_sector(SubscriptionTier::Premium);

    let prompt = match lang {
        Language::En => format!(
            r#"As an international consumer-trend analyst, produce an in-depth analysis of the "{sector_name}" sector.

Task:
- Analyze the sector's current dynamics, growth drivers and outlook in detail.
- Suggest {count} concrete products to launch in this sector. For each: description, target audience, key selling points, recommended price range, potential suppliers, a profitability score from 0 to 10, and the market entry difficulty (low, medium or high).
- Answer exclusively as JSON matching the provided schema."#
        ),
        Language::Fr => format!(
            r#"En tant qu'expert international en analyse de tendances de consommation, réalise une analyse approfondie du secteur « {sector_name} ».

Tâche :
- Analyse en détail les dynamiques actuelles du secteur, ses moteurs de croissance et ses perspectives.
- Propose {count} produits concrets à lancer dans ce secteur. Pour chacun : description, public cible, arguments de vente clés, fourchette de prix conseillée, fournisseurs potentiels, un score de rentabilité de 0 à 10 et la difficulté d'entrée sur le marché (faible, moyenne ou élevée).
- Fournis la réponse exclusivement au format JSON en respectant le schéma fourni."#
        ),
    };

    GenerationRequest {
        model: DEFAULT_MODEL.to_string(),
        prompt,
        response_schema: schema::sector_analysis_schema(lang, count),
        temperature: Some(temperature(mode)),
    }
}

/// Build the deepest drill-down request: one product.
pub fn product_request(product_name: &str, lang: Language, mode: GenerationMode) -> GenerationRequest {
    let prompt = match lang {
        Language::En => format!(
            r#"As an international consumer-trend analyst, produce a complete market analysis of the product "{product_name}".

Task:
- Analyze the market for this product: demand, competition, positioning.
- List the key demand regions, the target audience, the key selling points, a recommended price range, potential suppliers, and the main risks to account for.
- Answer exclusively as JSON matching the provided schema."#
        ),
        Language::Fr => format!(
            r#"En tant qu'expert international en analyse de tendances de consommation, réalise une analyse de marché complète du produit « {product_name} ».

Tâche :
- Analyse le marché de ce produit : demande, concurrence, positionnement.
- Liste les régions clés de la demande, le public cible, les arguments de vente clés, une fourchette de prix conseillée, des fournisseurs potentiels et les principaux risques à anticiper.
- Fournis la réponse exclusivement au format JSON en respectant le schéma fourni."#
        ),
    };

    GenerationRequest {
        model: DEFAULT_MODEL.to_string(),
        prompt,
        response_schema: schema::product_analysis_schema(lang),
        temperature: Some(temperature(mode)),
    }
}
