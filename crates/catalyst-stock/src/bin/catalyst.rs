//! Catalyst analysis CLI
//!
//! # Usage
//!
//! ```bash
//! export POLYGON_API_KEY="..."
//! export OPENAI_API_BASE="http://localhost:1234/v1"
//! export OPENAI_MODEL="your-model-name"
//!
//! catalyst chart AAPL --timeframe 3mo --kind snakey --indicators MA,RSI
//! catalyst compare AAPL MSFT TSLA --timeframe 1y
//! catalyst analyze AAPL --timeframe 1y
//! catalyst fund 119132 --persona buffett
//! ```

use std::env;
use std::sync::Arc;

use catalyst_series::{ChartKind, Indicator};
use catalyst_stock::{
    AnalysisEngine, CatalystConfig, FundApiClient, OpenAiGenerator, Persona, PolygonClient,
    Timeframe,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalyst", about = "Stock and mutual-fund analysis reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chart data for a symbol
    Chart {
        symbol: String,
        #[arg(long, default_value = "3mo")]
        timeframe: String,
        #[arg(long, default_value = "line")]
        kind: String,
        /// Comma-separated indicator flags (MA, RSI)
        #[arg(long, value_delimiter = ',')]
        indicators: Vec<String>,
    },
    /// Compare multiple symbols
    Compare {
        #[arg(required = true, num_args = 2..)]
        symbols: Vec<String>,
        #[arg(long, default_value = "1y")]
        timeframe: String,
    },
    /// Full persona analysis of a stock
    Analyze {
        symbol: String,
        #[arg(long, default_value = "1y")]
        timeframe: String,
    },
    /// Mutual-fund analysis for a scheme code
    Fund {
        scheme_code: u32,
        #[arg(long, default_value = "buffett")]
        persona: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,catalyst_stock=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let config = CatalystConfig::builder().with_env().build()?;
    let polygon = PolygonClient::new(
        config.polygon_api_key.clone().unwrap_or_default(),
        config.request_timeout,
    )
    .with_base_url(config.polygon_base_url.clone());
    let fund_api =
        FundApiClient::new(config.request_timeout).with_base_url(config.fund_api_base_url.clone());
    let generator = OpenAiGenerator::from_config(&config);

    let engine = AnalysisEngine::new(
        Arc::new(polygon),
        Arc::new(fund_api),
        Arc::new(generator),
        config,
    );

    let report = match cli.command {
        Commands::Chart {
            symbol,
            timeframe,
            kind,
            indicators,
        } => {
            let timeframe: Timeframe = timeframe.parse()?;
            let kind: ChartKind = kind.parse()?;
            let indicators = indicators
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Indicator>())
                .collect::<Result<Vec<_>, _>>()?;
            engine
                .chart_report(&symbol, timeframe, kind, &indicators)
                .await?
        }
        Commands::Compare { symbols, timeframe } => {
            let timeframe: Timeframe = timeframe.parse()?;
            engine.compare(&symbols, timeframe).await?
        }
        Commands::Analyze { symbol, timeframe } => {
            let timeframe: Timeframe = timeframe.parse()?;
            engine.analyze_stock(&symbol, timeframe).await?
        }
        Commands::Fund {
            scheme_code,
            persona,
        } => {
            let persona: Persona = persona.parse()?;
            engine.analyze_fund(scheme_code, persona).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
