use clap::{Parser, Subcommand};

use trendscope::{
    export, AppContext, AuthService, FileStore, GeminiBackend, GenerationMode, Language, Phase,
    ReportFilters, SectorGate, Session, SubscriptionTier, Translator,
};

#[derive(Parser)]
#[command(name = "trendscope", about = "AI market trend analysis CLI")]
struct Cli {
    /// Profile store directory (default: ~/.trendscope)
    #[arg(long)]
    store_dir: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Interface language: en or fr
    #[arg(long, default_value = "en")]
    lang: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the global trend report
    Report {
        /// Forecast period in months: 1, 3 or 6
        #[arg(long, default_value = "1")]
        period: u32,
        /// Generation mode: reliable or creative
        #[arg(long, default_value = "reliable")]
        mode: String,
        /// Focus regions (free text)
        #[arg(long)]
        regions: Option<String>,
        /// Focus keywords (free text)
        #[arg(long)]
        keywords: Option<String>,
        /// Keywords to exclude (free text)
        #[arg(long)]
        exclude: Option<String>,
        /// Focus industries (free text)
        #[arg(long)]
        industries: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Write a CSV export to this path
        #[arg(long, value_name = "FILE")]
        csv: Option<String>,
    },
    /// In-depth analysis of one sector (premium)
    Sector {
        /// Sector name, e.g. "Technology"
        name: String,
        #[arg(long)]
        json: bool,
        #[arg(long, value_name = "FILE")]
        csv: Option<String>,
    },
    /// Market analysis of one product
    Product {
        /// Product name
        name: String,
        #[arg(long)]
        json: bool,
        #[arg(long, value_name = "FILE")]
        csv: Option<String>,
    },
    /// Manage the local account
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Create an account and sign in
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Sign in with an existing account
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Move the current account to the premium tier
    Upgrade,
    /// Show the signed-in account
    Status,
}

fn parse_language(s: &str) -> anyhow::Result<Language> {
    match s {
        "en" => Ok(Language::En),
        "fr" => Ok(Language::Fr),
        other => anyhow::bail!("unsupported language: {other} (expected en or fr)"),
    }
}

fn parse_mode(s: &str) -> anyhow::Result<GenerationMode> {
    match s {
        "reliable" => Ok(GenerationMode::Reliable),
        "creative" => Ok(GenerationMode::Creative),
        other => anyhow::bail!("unsupported mode: {other} (expected reliable or creative)"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let language = parse_language(&cli.lang)?;
    let store = match &cli.store_dir {
        Some(dir) => FileStore::open(dir)?,
        None => FileStore::open_default()?,
    };
    let auth = AuthService::new(Box::new(store));
    let context = AppContext {
        language,
        ..AppContext::default()
    };
    let mut session = Session::new(auth, context)?;
    let translator = Translator::new(language)?;

    match cli.command {
        Commands::Report {
            period,
            mode,
            regions,
            keywords,
            exclude,
            industries,
            json,
            csv,
        } => {
            let backend = GeminiBackend::from_env()?;
            {
                let ctx = session.context_mut();
                ctx.selected_period = period;
                ctx.mode = parse_mode(&mode)?;
                ctx.filters = ReportFilters {
                    regions,
                    keywords,
                    excluded_keywords: exclude,
                    industries,
                };
            }
            session.generate_report(&backend).await;
            match session.report() {
                Phase::Ready(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(report)?);
                    } else {
                        for sector in &report.sectors {
                            println!("{}", sector.sector_name);
                            for product in &sector.products {
                                println!(
                                    "  {} — {}% — {}",
                                    product.name, product.demand_rate, product.regions
                                );
                            }
                        }
                        println!();
                        println!(
                            "{}: {}",
                            translator.translate("report.globalAnalysis", &[]),
                            report.global_analysis
                        );
                    }
                    if let Some(path) = csv {
                        std::fs::write(&path, export::report_to_csv(report, &translator))?;
                        eprintln!("CSV written to {path}");
                    }
                }
                Phase::Failed(message) => anyhow::bail!("{message}"),
                _ => anyhow::bail!("report generation did not complete"),
            }
        }
        Commands::Sector { name, json, csv } => {
            let backend = GeminiBackend::from_env()?;
            match session.analyze_sector(&backend, &name).await {
                SectorGate::AuthRequired => {
                    println!("{}", translator.translate("auth.signInRequired", &[]));
                }
                SectorGate::UpgradeRequired => {
                    println!("{}", translator.translate("auth.upgradeRequired", &[]));
                }
                SectorGate::Completed => match session.sector_analysis() {
                    Phase::Ready(analysis) => {
                        if json {
                            println!("{}", serde_json::to_string_pretty(analysis)?);
                        } else {
                            println!("{}", analysis.in_depth_analysis);
                            println!();
                            for suggestion in &analysis.product_suggestions {
                                println!(
                                    "  {} ({}/10) — {}",
                                    suggestion.name,
                                    suggestion.profitability_score,
                                    suggestion.price_range
                                );
                            }
                        }
                        if let Some(path) = csv {
                            std::fs::write(
                                &path,
                                export::sector_analysis_to_csv(analysis, &translator),
                            )?;
                            eprintln!("CSV written to {path}");
                        }
                    }
                    _ => {
                        let message = session
                            .take_error()
                            .unwrap_or_else(|| "sector analysis did not complete".to_string());
                        anyhow::bail!("{message}");
                    }
                },
            }
        }
        Commands::Product { name, json, csv } => {
            let backend = GeminiBackend::from_env()?;
            session.analyze_product(&backend, &name).await;
            match session.product_analysis() {
                Phase::Ready(analysis) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(analysis)?);
                    } else {
                        println!("{}", analysis.market_analysis);
                        println!();
                        println!("  Price range: {}", analysis.price_range);
                        println!("  Audience:    {}", analysis.target_audience);
                        for risk in &analysis.risks {
                            println!("  Risk: {risk}");
                        }
                    }
                    if let Some(path) = csv {
                        std::fs::write(
                            &path,
                            export::product_analysis_to_csv(analysis, &translator),
                        )?;
                        eprintln!("CSV written to {path}");
                    }
                }
                _ => {
                    let message = session
                        .take_error()
                        .unwrap_or_else(|| "product analysis did not complete".to_string());
                    anyhow::bail!("{message}");
                }
            }
        }
        Commands::Auth { action } => match action {
            AuthAction::Signup {
                name,
                email,
                password,
            } => {
                session.sign_up(&name, &email, &password)?;
                println!("Signed up and logged in as {email}");
            }
            AuthAction::Login { email, password } => {
                session.login(&email, &password)?;
                println!("Logged in as {email}");
            }
            AuthAction::Logout => {
                session.logout()?;
                println!("Logged out");
            }
            AuthAction::Upgrade => {
                // A fresh CLI process never carries a pending action, so the
                // backend is only needed when a key is actually configured.
                let backend =
                    GeminiBackend::from_env().unwrap_or_else(|_| GeminiBackend::new(""));
                session.complete_upgrade(&backend).await?;
                println!("{}", translator.translate("auth.upgraded", &[]));
            }
            AuthAction::Status => match &session.context().user {
                Some(user) => {
                    let tier = match user.subscription_tier {
                        SubscriptionTier::Free => "free",
                        SubscriptionTier::Premium => "premium",
                    };
                    println!("{} <{}> ({tier})", user.name, user.email.as_deref().unwrap_or("-"));
                }
                None => println!("Not logged in"),
            },
        },
    }

    Ok(())
}
