use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::Language;

/// Wire-level type tag for the structured-output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Object,
    Array,
}

/// Nested response-type descriptor sent to the backend as `responseSchema`.
/// Serializes to the Gemini REST wire form.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    fn leaf(kind: SchemaType, description: String) -> Self {
        Schema {
            kind,
            description: Some(description),
            properties: None,
            items: None,
            required: Vec::new(),
        }
    }

    pub fn string(description: String) -> Self {
        Self::leaf(SchemaType::String, description)
    }

    pub fn number(description: String) -> Self {
        Self::leaf(SchemaType::Number, description)
    }

    pub fn integer(description: String) -> Self {
        Self::leaf(SchemaType::Integer, description)
    }

    pub fn array(description: String, items: Schema) -> Self {
        Schema {
            kind: SchemaType::Array,
            description: Some(description),
            properties: None,
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    /// Object with every listed property required.
    pub fn object(properties: Vec<(&str, Schema)>) -> Self {
        let required = properties.iter().map(|(k, _)| k.to_string()).collect();
        let properties = properties
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Schema {
            kind: SchemaType::Object,
            description: None,
            properties: Some(properties),
            items: None,
            required,
        }
    }
}

/// Pick the field description for the requested language.
fn text(lang: Language, en: &str, fr: &str) -> String {
    match lang {
        Language::En => en.to_string(),
        Language::Fr => fr.to_string(),
    }
}

/// Schema for the top-level trend report. `products_per_sector` is the
/// tier-derived count; `with_profitability` adds the premium-only score field.
pub fn trend_report_schema(
    lang: Language,
    products_per_sector: u32,
    with_profitability: bool,
) -> Schema {
    let mut product_fields = vec![
        (
            "name",
            Schema::string(text(lang, "Product name.", "Nom du produit.")),
        ),
        (
            "demandRate",
            Schema::number(text(
                lang,
                "Estimated demand rate as a percentage (e.g. 15 for 15%).",
                "Taux de demande estimé en pourcentage (ex: 15 pour 15%).",
            )),
        ),
        (
            "regions",
            Schema::string(text(
                lang,
                "World regions where demand will be strongest.",
                "Régions du monde où la demande sera la plus forte.",
            )),
        ),
        (
            "reasons",
            Schema::string(text(
                lang,
                "Key demand drivers (economic, seasonal, cultural, media).",
                "Raisons clés de la demande (facteurs économiques, saisonniers, culturels, médiatiques).",
            )),
        ),
        (
            "suppliers",
            Schema::array(
                text(
                    lang,
                    "Example suppliers or manufacturers for this product.",
                    "Exemples de fournisseurs ou fabricants pour ce produit.",
                ),
                Schema::string(text(lang, "Supplier name.", "Nom du fournisseur.")),
            ),
        ),
    ];
    if with_profitability {
        product_fields.push((
            "profitabilityScore",
            Schema::integer(text(
                lang,
                "Profitability score from 0 to 10.",
                "Score de rentabilité de 0 à 10.",
            )),
        ));
    }

    Schema::object(vec![
        (
            "sectors",
            Schema::array(
                text(
                    lang,
                    "List of consumer sectors.",
                    "Liste des secteurs de consommation.",
                ),
                Schema::object(vec![
                    (
                        "sectorName",
                        Schema::string(text(
                            lang,
                            "Sector name (e.g. technology, fashion).",
                            "Nom du secteur (ex: technologie, mode).",
                        )),
                    ),
                    (
                        "products",
                        Schema::array(
                            text(
                                lang,
                                &format!("The {products_per_sector} most in-demand products in this sector."),
                                &format!("Les {products_per_sector} produits les plus demandés dans ce secteur."),
                            ),
                            Schema::object(product_fields),
                        ),
                    ),
                ]),
            ),
        ),
        (
            "globalAnalysis",
            Schema::string(text(
                lang,
                "Global analysis of at most 150 words summarizing market dynamics and promising sectors.",
                "Analyse globale de 150 mots maximum résumant les dynamiques du marché et les secteurs porteurs.",
            )),
        ),
    ])
}

/// Schema for the in-depth analysis of a single sector.
pub fn sector_analysis_schema(lang: Language, suggestion_count: u32) -> Schema {
    Schema::object(vec![
        (
            "sectorName",
            Schema::string(text(lang, "Name of the analyzed sector.", "Nom du secteur analysé.")),
        ),
        (
            "inDepthAnalysis",
            Schema::string(text(
                lang,
                "Detailed analysis of the sector's dynamics, opportunities and outlook.",
                "Analyse détaillée des dynamiques, opportunités et perspectives du secteur.",
            )),
        ),
        (
            "productSuggestions",
            Schema::array(
                text(
                    lang,
                    &format!("{suggestion_count} concrete product suggestions to launch in this sector."),
                    &format!("{suggestion_count} suggestions concrètes de produits à lancer dans ce secteur."),
                ),
                Schema::object(vec![
                    (
                        "name",
                        Schema::string(text(lang, "Product name.", "Nom du produit.")),
                    ),
                    (
                        "description",
                        Schema::string(text(
                            lang,
                            "Short description of the product.",
                            "Brève description du produit.",
                        )),
                    ),
                    (
                        "targetAudience",
                        Schema::string(text(lang, "Target audience.", "Public cible.")),
                    ),
                    (
                        "sellingPoints",
                        Schema::array(
                            text(lang, "Key selling points.", "Arguments de vente clés."),
                            Schema::string(text(lang, "One selling point.", "Un argument de vente.")),
                        ),
                    ),
                    (
                        "priceRange",
                        Schema::string(text(
                            lang,
                            "Recommended retail price range.",
                            "Fourchette de prix de vente conseillée.",
                        )),
                    ),
                    (
                        "suppliers",
                        Schema::array(
                            text(lang, "Potential suppliers.", "Fournisseurs potentiels."),
                            Schema::string(text(lang, "Supplier name.", "Nom du fournisseur.")),
                        ),
                    ),
                    (
                        "profitabilityScore",
                        Schema::integer(text(
                            lang,
                            "Profitability score from 0 to 10.",
                            "Score de rentabilité de 0 à 10.",
                        )),
                    ),
                    (
                        "marketEntryDifficulty",
                        Schema::string(text(
                            lang,
                            "Market entry difficulty: low, medium or high.",
                            "Difficulté d'entrée sur le marché : faible, moyenne ou élevée.",
                        )),
                    ),
                ]),
            ),
        ),
    ])
}

/// Schema for the deepest drill-down: one product.
pub fn product_analysis_schema(lang: Language) -> Schema {
    Schema::object(vec![
        (
            "productName",
            Schema::string(text(lang, "Name of the analyzed product.", "Nom du produit analysé.")),
        ),
        (
            "marketAnalysis",
            Schema::string(text(
                lang,
                "Detailed market analysis for this product.",
                "Analyse de marché détaillée pour ce produit.",
            )),
        ),
        (
            "keyRegions",
            Schema::array(
                text(lang, "Key demand regions.", "Régions clés de la demande."),
                Schema::string(text(lang, "Region name.", "Nom de la région.")),
            ),
        ),
        (
            "targetAudience",
            Schema::string(text(lang, "Target audience.", "Public cible.")),
        ),
        (
            "sellingPoints",
            Schema::array(
                text(lang, "Key selling points.", "Arguments de vente clés."),
                Schema::string(text(lang, "One selling point.", "Un argument de vente.")),
            ),
        ),
        (
            "priceRange",
            Schema::string(text(
                lang,
                "Recommended retail price range.",
                "Fourchette de prix de vente conseillée.",
            )),
        ),
        (
            "suppliers",
            Schema::array(
                text(lang, "Potential suppliers.", "Fournisseurs potentiels."),
                Schema::string(text(lang, "Supplier name.", "Nom du fournisseur.")),
            ),
        ),
        (
            "risks",
            Schema::array(
                text(lang, "Main risks to account for.", "Principaux risques à anticiper."),
                Schema::string(text(lang, "One risk.", "Un risque.")),
            ),
        ),
    ])
}
