use analysis_core::FinancialRecord;
use analysis_orchestrator::{AnalyticsConfig, MarketAnalytics};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fundamental_analysis::{discounted_cash_flow, free_cash_flow, upside_to_price, DcfInputs};
use market_data_client::NewsQuery;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "market-pulse")]
#[command(about = "Sector signals, news sentiment and financial ratios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Market breadth, rotation, momentum and concentration signals
    Signals,

    /// Sector records derived from the exchange listing
    Sectors,

    /// Best and worst three stocks of a sector
    Movers {
        /// Sector name, e.g. Banking or Others
        sector: String,
    },

    /// Ranked news with per-article sentiment
    News {
        /// Company symbol
        #[arg(long, conflicts_with_all = ["sector", "query"])]
        company: Option<String>,

        /// Sector name
        #[arg(long, conflicts_with = "query")]
        sector: Option<String>,

        /// Free-form search terms
        #[arg(long)]
        query: Option<String>,

        /// Include article sentiment and the overall market mood
        #[arg(long)]
        impact: bool,
    },

    /// Sentiment score and company names of a text
    Sentiment {
        text: String,
    },

    /// Ratio report and insights for a JSON financial record
    Ratios {
        /// JSON file with camelCase fields (currentAssets, netIncome, ...)
        file: PathBuf,
    },

    /// Discounted cash flow valuation
    Dcf {
        /// Current free cash flow
        #[arg(long, allow_negative_numbers = true)]
        fcf: f64,

        /// Annual growth in percent
        #[arg(long, allow_negative_numbers = true)]
        growth: f64,

        /// Discount rate in percent
        #[arg(long, allow_negative_numbers = true)]
        discount: f64,

        /// Terminal growth in percent
        #[arg(long, allow_negative_numbers = true)]
        terminal: f64,

        /// Projection years
        #[arg(long, default_value = "5")]
        years: u32,

        #[arg(long)]
        shares: Option<f64>,

        /// Market price to compare the intrinsic value against
        #[arg(long)]
        price: Option<f64>,
    },

    /// Free cash flow from its components
    Fcf {
        #[arg(long, allow_negative_numbers = true)]
        net_income: f64,

        #[arg(long, allow_negative_numbers = true)]
        depreciation: f64,

        #[arg(long, allow_negative_numbers = true)]
        capex: f64,

        #[arg(long, allow_negative_numbers = true)]
        working_capital: f64,
    },
}

fn news_query(company: Option<String>, sector: Option<String>, query: Option<String>) -> NewsQuery {
    match (company, sector, query) {
        (Some(symbol), _, _) => NewsQuery::Company(symbol),
        (_, Some(name), _) => NewsQuery::Sector(name),
        (_, _, Some(q)) => NewsQuery::Custom(q),
        _ => NewsQuery::Market,
    }
}

fn dcf_inputs(
    fcf: f64,
    growth_pct: f64,
    discount_pct: f64,
    terminal_pct: f64,
    years: u32,
    shares: Option<f64>,
) -> DcfInputs {
    DcfInputs {
        free_cash_flow: fcf,
        growth_rate: growth_pct / 100.0,
        discount_rate: discount_pct / 100.0,
        terminal_growth: terminal_pct / 100.0,
        years,
        shares_outstanding: shares,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    // Logs go to stderr so stdout stays valid JSON
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AnalyticsConfig::from_env()?;
    tracing::debug!("Configuration loaded: {:?}", config);
    let analytics = MarketAnalytics::from_config(&config);

    match cli.command {
        Commands::Signals => print_json(&analytics.signals().await),
        Commands::Sectors => print_json(&analytics.fetch_sector_list().await),
        Commands::Movers { sector } => print_json(&analytics.top_movers(&sector).await),
        Commands::News {
            company,
            sector,
            query,
            impact,
        } => {
            let query = news_query(company, sector, query);
            if impact {
                print_json(&analytics.news_impact(&query).await)
            } else {
                print_json(&analytics.news(&query).await)
            }
        }
        Commands::Sentiment { text } => print_json(&analytics.analyze_text(&text)),
        Commands::Ratios { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let record: FinancialRecord = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid financial record in {}", file.display()))?;
            print_json(&analytics.compute_ratios(&record))
        }
        Commands::Dcf {
            fcf,
            growth,
            discount,
            terminal,
            years,
            shares,
            price,
        } => {
            let valuation =
                discounted_cash_flow(&dcf_inputs(fcf, growth, discount, terminal, years, shares))?;
            let comparison = price.and_then(|p| {
                let value = valuation
                    .intrinsic_value_per_share
                    .unwrap_or(valuation.intrinsic_value)
                    .value()?;
                upside_to_price(value, p)
            });
            print_json(&serde_json::json!({
                "valuation": valuation,
                "priceComparison": comparison,
            }))
        }
        Commands::Fcf {
            net_income,
            depreciation,
            capex,
            working_capital,
        } => print_json(&free_cash_flow(net_income, depreciation, capex, working_capital)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_query_selection() {
        assert_eq!(
            news_query(Some("OGDC".into()), None, None),
            NewsQuery::Company("OGDC".into())
        );
        assert_eq!(
            news_query(None, Some("Banking".into()), None),
            NewsQuery::Sector("Banking".into())
        );
        assert_eq!(news_query(None, None, None), NewsQuery::Market);
    }

    #[test]
    fn test_dcf_percent_flags_become_fractions() {
        let inputs = dcf_inputs(100.0, 5.0, 10.0, 2.5, 5, Some(10.0));
        assert!((inputs.growth_rate - 0.05).abs() < 1e-12);
        assert!((inputs.discount_rate - 0.10).abs() < 1e-12);
        assert!((inputs.terminal_growth - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "market-pulse", "dcf", "--fcf", "100", "--growth", "5", "--discount", "10",
            "--terminal", "2",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Dcf { years: 5, .. }));

        assert!(Cli::try_parse_from([
            "market-pulse", "news", "--company", "OGDC", "--sector", "Banking"
        ])
        .is_err());
    }

    #[test]
    fn test_negative_numbers_are_values() {
        let cli = Cli::try_parse_from([
            "market-pulse", "dcf", "--fcf", "-50", "--growth", "-5", "--discount", "10",
            "--terminal", "-1",
        ])
        .unwrap();
        match cli.command {
            Commands::Dcf {
                fcf,
                growth,
                terminal,
                ..
            } => {
                assert_eq!(fcf, -50.0);
                assert_eq!(growth, -5.0);
                assert_eq!(terminal, -1.0);
            }
            _ => panic!("expected dcf"),
        }

        let cli = Cli::try_parse_from([
            "market-pulse", "fcf", "--net-income", "-10", "--depreciation", "-2", "--capex",
            "-3", "--working-capital", "-4",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Fcf { net_income, capex, .. } if net_income == -10.0 && capex == -3.0
        ));
    }
}
