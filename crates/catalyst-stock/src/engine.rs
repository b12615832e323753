//! Report assembly engine
//!
//! Ties the data clients, the analytics core, and the persona agents
//! together. Every operation returns a JSON bundle with a stable shape:
//! upstream failures degrade to empty series or fallback verdicts, never to
//! a missing field.

use std::sync::Arc;

use catalyst_series::indicators::{DEFAULT_RSI_PERIOD, MA_PERIODS};
use catalyst_series::{
    ChartKind, Indicator, PricePoint, aggregate, chart, indicators, report, stats,
};
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::{AgentReport, Persona, TRUTH_INSTRUCTIONS};
use crate::api::polygon::NewsArticle;
use crate::cache::{CacheKey, ReportCache};
use crate::config::CatalystConfig;
use crate::error::Result;
use crate::extract::{AgentVerdict, verdict_from_text};
use crate::llm::TextGenerator;
use crate::retry::RetryPolicy;
use crate::source::{FundSource, SeriesSource};
use crate::timeframe::Timeframe;

/// Summary used when the synthesis pass itself fails
const TRUTH_FALLBACK: &str = "Synthesis unavailable: the summarizer produced no output.";

/// Headlines fetched per symbol for agent context
const NEWS_LIMIT: u32 = 5;

/// The analysis engine and its collaborators
///
/// All collaborators are injected at construction; the engine holds no
/// global state and two engines never share anything but what their caller
/// passed in.
pub struct AnalysisEngine {
    source: Arc<dyn SeriesSource>,
    fund_api: Arc<dyn FundSource>,
    generator: Arc<dyn TextGenerator>,
    config: CatalystConfig,
    cache: ReportCache,
    retry: RetryPolicy,
}

impl AnalysisEngine {
    /// Create an engine from explicit collaborators
    pub fn new(
        source: Arc<dyn SeriesSource>,
        fund_api: Arc<dyn FundSource>,
        generator: Arc<dyn TextGenerator>,
        config: CatalystConfig,
    ) -> Self {
        let cache = ReportCache::new(config.report_cache_ttl);
        let retry = RetryPolicy::new(
            config.max_retries,
            config.retry_backoff_base,
            config.retry_backoff_base * 20,
            2.0,
        );
        Self {
            source,
            fund_api,
            generator,
            config,
            cache,
            retry,
        }
    }

    /// Chart data for one symbol: price range, renderer config, indicators
    ///
    /// Indicator arrays keep their leading `null` entries so the renderer can
    /// align them with the price series. Snakey charts additionally carry the
    /// snake-path coordinates.
    pub async fn chart_report(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        kind: ChartKind,
        requested: &[Indicator],
    ) -> Result<Value> {
        let key = CacheKey::new(
            symbol,
            "chart",
            json!({
                "timeframe": timeframe.to_string(),
                "kind": kind.to_string(),
                "indicators": requested,
            }),
        );
        self.cache
            .get_or_fetch(key, || self.build_chart_report(symbol, timeframe, kind, requested))
            .await
    }

    async fn build_chart_report(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        kind: ChartKind,
        requested: &[Indicator],
    ) -> Result<Value> {
        let series = self.fetch_window(symbol, timeframe).await;
        let closes = closes_of(&series);

        let mut indicator_data = serde_json::Map::new();
        for indicator in requested {
            match indicator {
                Indicator::MovingAverage => {
                    for period in MA_PERIODS {
                        indicator_data.insert(
                            format!("ma{period}"),
                            json!(indicators::moving_average(&closes, period)),
                        );
                    }
                }
                Indicator::Rsi => {
                    indicator_data.insert(
                        format!("rsi{DEFAULT_RSI_PERIOD}"),
                        json!(indicators::rsi(&closes, DEFAULT_RSI_PERIOD)),
                    );
                }
            }
        }

        let snake = (kind == ChartKind::Snakey).then(|| indicators::snake_coordinates(&series));

        Ok(json!({
            "report_id": Uuid::new_v4().to_string(),
            "symbol": symbol,
            "timeframe": timeframe.to_string(),
            "chart_kind": kind.to_string(),
            "price_range": chart::price_range(&series),
            "config": chart::chart_config(symbol, &series, kind),
            "indicators": indicator_data,
            "snake": snake,
            "data_points": series.len(),
        }))
    }

    /// Multi-symbol comparison: correlations, per-symbol metrics, overlay
    ///
    /// Fetches run concurrently but results are always keyed by symbol, so
    /// completion order cannot reorder the report.
    pub async fn compare(&self, symbols: &[String], timeframe: Timeframe) -> Result<Value> {
        let key = CacheKey::new(
            symbols.join(","),
            "compare",
            json!({"timeframe": timeframe.to_string()}),
        );
        self.cache
            .get_or_fetch(key, || self.build_compare(symbols, timeframe))
            .await
    }

    async fn build_compare(&self, symbols: &[String], timeframe: Timeframe) -> Result<Value> {
        let fetches = symbols.iter().map(|s| self.fetch_window(s, timeframe));
        let all_series: Vec<Vec<PricePoint>> = join_all(fetches).await;

        let by_symbol: Vec<(String, Vec<f64>)> = symbols
            .iter()
            .cloned()
            .zip(all_series.iter().map(|s| closes_of(s)))
            .collect();

        let mut performance = serde_json::Map::new();
        let mut overlay = serde_json::Map::new();
        for (symbol, series) in symbols.iter().zip(&all_series) {
            let closes = closes_of(series);
            performance.insert(symbol.clone(), json!(report::performance_metrics(&closes)));
            overlay.insert(symbol.clone(), json!(stats::normalize(series)));
        }

        let correlations = report::correlation_map(&by_symbol);
        let insights = report::comparison_insights(&correlations);

        Ok(json!({
            "report_id": Uuid::new_v4().to_string(),
            "timeframe": timeframe.to_string(),
            "symbols": symbols,
            "performance": performance,
            "correlations": correlations,
            "insights": insights,
            "overlay": overlay,
        }))
    }

    /// Full persona analysis of one stock
    ///
    /// Fans the symbol out to every agent concurrently, synthesizes a truth
    /// summary over their verdicts, and attaches the graph data a frontend
    /// needs. Agents that fail contribute a fallback verdict; the report
    /// shape is always complete.
    pub async fn analyze_stock(&self, symbol: &str, timeframe: Timeframe) -> Result<Value> {
        let key = CacheKey::new(
            symbol,
            "analyze",
            json!({"timeframe": timeframe.to_string()}),
        );
        self.cache
            .get_or_fetch(key, || self.build_stock_analysis(symbol, timeframe))
            .await
    }

    async fn build_stock_analysis(&self, symbol: &str, timeframe: Timeframe) -> Result<Value> {
        let series = self.fetch_window(symbol, timeframe).await;
        let summary = market_summary(&series);
        let news = self.fetch_news(symbol).await;
        let context = agent_context(&summary, &news);

        info!("Fanning out {} agents for {}", Persona::ALL.len(), symbol);
        let timeframe_label = timeframe.to_string();
        let runs = Persona::ALL
            .iter()
            .map(|persona| self.run_agent(*persona, symbol, &timeframe_label, &context));
        let reports: Vec<AgentReport> = join_all(runs).await;

        let truth = self.run_truth(symbol, &timeframe_label, &reports).await;

        let closes = closes_of(&series);
        let graph = json!({
            "snake": indicators::snake_coordinates(&series),
            "treemap": aggregate::monthly_returns_treemap(&series),
            "normalized": stats::normalize(&series),
            "performance": report::performance_metrics(&closes),
        });

        let mut verdicts = serde_json::Map::new();
        for r in &reports {
            verdicts.insert(r.agent.clone(), json!(r.verdict));
        }

        Ok(json!({
            "report_id": Uuid::new_v4().to_string(),
            "symbol": symbol,
            "timeframe": timeframe_label,
            "market_summary": summary,
            "news": news,
            "agents": reports,
            "verdicts": verdicts,
            "truth_summary": truth,
            "graph": graph,
        }))
    }

    /// Mutual-fund analysis for one scheme through one persona
    pub async fn analyze_fund(&self, scheme_code: u32, persona: Persona) -> Result<Value> {
        let key = CacheKey::new(
            scheme_code.to_string(),
            "fund",
            json!({"persona": persona.name()}),
        );
        self.cache
            .get_or_fetch(key, || self.build_fund_analysis(scheme_code, persona))
            .await
    }

    async fn build_fund_analysis(&self, scheme_code: u32, persona: Persona) -> Result<Value> {
        let (profile, history) = self
            .retry
            .execute("fund_nav_history", || self.fund_api.nav_history(scheme_code))
            .await?;

        let filtered = aggregate::filter_from(&history, self.config.fund_history_floor);
        let metrics = report::fund_metrics(&filtered, today());
        let insights = report::fund_chart_insights(&metrics);

        let prompt = format!(
            "Analyze the mutual fund \"{}\" ({}, {}).\n\nMetrics:\n{}\n\nChart summary:\n{}",
            profile.scheme_name,
            profile.fund_house,
            profile.category,
            serde_json::to_string_pretty(&metrics).unwrap_or_default(),
            insights.join("\n"),
        );
        let narrative = match self
            .retry
            .execute("fund_narrative", || {
                self.generator.generate(persona.instructions(), &prompt)
            })
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Fund narrative generation failed: {}", e);
                format!("{} analysis unavailable.", persona.name())
            }
        };

        let markdown = report::fund_markdown(&profile, &metrics, &narrative);

        Ok(json!({
            "report_id": Uuid::new_v4().to_string(),
            "scheme_code": scheme_code,
            "persona": persona.name(),
            "profile": profile,
            "metrics": metrics,
            "insights": insights,
            "markdown": markdown,
        }))
    }

    /// Fetch a symbol's window, degrading to an empty series on failure
    ///
    /// The core's insufficient-data paths turn an empty series into zeroed
    /// metrics, which keeps the report shape stable.
    async fn fetch_window(&self, symbol: &str, timeframe: Timeframe) -> Vec<PricePoint> {
        let to = today();
        let from = timeframe.start_date(to);
        match self
            .retry
            .execute("daily_series", || self.source.daily_series(symbol, from, to))
            .await
        {
            Ok(mut series) => {
                series.sort_by_key(|p| p.date);
                series
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    /// Fetch recent headlines, degrading to none on failure
    async fn fetch_news(&self, symbol: &str) -> Vec<NewsArticle> {
        match self
            .retry
            .execute("ticker_news", || self.source.recent_news(symbol, NEWS_LIMIT))
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                warn!("News fetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    async fn run_agent(
        &self,
        persona: Persona,
        symbol: &str,
        timeframe: &str,
        market_summary: &str,
    ) -> AgentReport {
        let user_prompt = persona.user_prompt(symbol, timeframe, market_summary);
        let result = self
            .retry
            .execute(persona.name(), || {
                self.generator.generate(persona.instructions(), &user_prompt)
            })
            .await;

        match result {
            Ok(raw) => {
                let verdict = verdict_from_text(persona.name(), &raw);
                AgentReport {
                    agent: persona.name().to_string(),
                    raw,
                    verdict,
                }
            }
            Err(e) => {
                warn!("Agent {} failed: {}", persona.name(), e);
                AgentReport {
                    agent: persona.name().to_string(),
                    raw: String::new(),
                    verdict: AgentVerdict::fallback(persona.name()),
                }
            }
        }
    }

    async fn run_truth(&self, symbol: &str, timeframe: &str, reports: &[AgentReport]) -> String {
        let mut prompt = format!("Create a truthful summary for {symbol} over {timeframe}.\n\nVerdicts:\n");
        for r in reports {
            prompt.push_str(&format!(
                "- {} (confidence {:.2}): {}\n",
                r.agent, r.verdict.confidence, r.verdict.summary
            ));
        }

        match self
            .retry
            .execute("truth", || self.generator.generate(TRUTH_INSTRUCTIONS, &prompt))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Truth synthesis failed: {}", e);
                TRUTH_FALLBACK.to_string()
            }
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn closes_of(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}

/// Market summary plus recent headlines, as handed to each agent
fn agent_context(summary: &str, news: &[NewsArticle]) -> String {
    if news.is_empty() {
        return summary.to_string();
    }
    let mut context = format!("{summary}\n\nRecent headlines:");
    for article in news {
        context.push_str("\n- ");
        context.push_str(&article.title);
    }
    context
}

/// One-paragraph numeric summary fed into persona prompts
fn market_summary(series: &[PricePoint]) -> String {
    if series.len() < 2 {
        return "Price data unavailable for this window.".to_string();
    }

    let closes = closes_of(series);
    let perf = report::performance_metrics(&closes);
    let rsi = indicators::rsi(&closes, DEFAULT_RSI_PERIOD);
    let latest_rsi = rsi
        .last()
        .copied()
        .flatten()
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"));

    format!(
        "Total return {:.2}%, annualized volatility {:.2}%, max drawdown {:.2}%, \
         Sharpe {:.2}, latest RSI {} over {} observations.",
        perf.total_return_pct,
        perf.volatility_pct,
        perf.max_drawdown_pct,
        perf.sharpe_ratio,
        latest_rsi,
        series.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalystError;
    use crate::llm::MockTextGenerator;
    use crate::source::{MockFundSource, MockSeriesSource};
    use catalyst_series::FundProfile;
    use chrono::Duration;

    fn series_from_today(days: i64, start: f64, step: f64) -> Vec<PricePoint> {
        let end = today();
        (0..days)
            .map(|i| {
                PricePoint::close_only(
                    end - Duration::days(days - 1 - i),
                    start + i as f64 * step,
                )
            })
            .collect()
    }

    fn engine_with_fund(
        source: MockSeriesSource,
        fund: MockFundSource,
        generator: MockTextGenerator,
    ) -> AnalysisEngine {
        AnalysisEngine::new(
            Arc::new(source),
            Arc::new(fund),
            Arc::new(generator),
            CatalystConfig::default(),
        )
    }

    fn engine_with(source: MockSeriesSource, generator: MockTextGenerator) -> AnalysisEngine {
        engine_with_fund(source, MockFundSource::new(), generator)
    }

    fn bluechip_profile() -> FundProfile {
        FundProfile {
            scheme_name: "Test Bluechip Fund - Growth".into(),
            fund_house: "Test Mutual Fund".into(),
            category: "Equity Scheme - Large Cap".into(),
            scheme_type: "Open Ended".into(),
        }
    }

    #[tokio::test]
    async fn test_chart_report_carries_indicators_and_snake() {
        let mut source = MockSeriesSource::new();
        source
            .expect_daily_series()
            .returning(|_, _, _| Ok(series_from_today(60, 100.0, 0.5)));

        let engine = engine_with(source, MockTextGenerator::new());
        let bundle = engine
            .chart_report(
                "AAPL",
                Timeframe::ThreeMonths,
                ChartKind::Snakey,
                &[Indicator::MovingAverage, Indicator::Rsi],
            )
            .await
            .unwrap();

        assert_eq!(bundle["symbol"], "AAPL");
        assert_eq!(bundle["chart_kind"], "snakey");
        assert!(bundle["indicators"]["ma20"].is_array());
        assert!(bundle["indicators"]["ma50"].is_array());
        assert!(bundle["indicators"]["rsi14"].is_array());
        // Leading MA entries stay null for alignment
        assert!(bundle["indicators"]["ma20"][0].is_null());
        assert_eq!(bundle["snake"].as_array().unwrap().len(), 60);
    }

    #[tokio::test]
    async fn test_chart_report_line_has_no_snake() {
        let mut source = MockSeriesSource::new();
        source
            .expect_daily_series()
            .returning(|_, _, _| Ok(series_from_today(30, 100.0, 0.5)));

        let engine = engine_with(source, MockTextGenerator::new());
        let bundle = engine
            .chart_report("MSFT", Timeframe::OneMonth, ChartKind::Line, &[])
            .await
            .unwrap();

        assert!(bundle["snake"].is_null());
        assert_eq!(bundle["indicators"], json!({}));
    }

    #[tokio::test]
    async fn test_chart_report_cached_after_first_call() {
        let mut source = MockSeriesSource::new();
        source
            .expect_daily_series()
            .times(1)
            .returning(|_, _, _| Ok(series_from_today(30, 100.0, 0.5)));

        let engine = engine_with(source, MockTextGenerator::new());
        let first = engine
            .chart_report("AAPL", Timeframe::OneMonth, ChartKind::Line, &[])
            .await
            .unwrap();
        let second = engine
            .chart_report("AAPL", Timeframe::OneMonth, ChartKind::Line, &[])
            .await
            .unwrap();

        // Identical report id proves the second call was served from cache
        assert_eq!(first["report_id"], second["report_id"]);
    }

    #[tokio::test]
    async fn test_compare_indexes_results_by_symbol() {
        let mut source = MockSeriesSource::new();
        source.expect_daily_series().returning(|symbol, _, _| {
            // Rising series for AAPL, falling for TSLA
            Ok(match symbol {
                "AAPL" => series_from_today(30, 100.0, 1.0),
                _ => series_from_today(30, 100.0, -1.0),
            })
        });

        let engine = engine_with(source, MockTextGenerator::new());
        let symbols = vec!["AAPL".to_string(), "TSLA".to_string()];
        let bundle = engine.compare(&symbols, Timeframe::OneMonth).await.unwrap();

        let aapl = bundle["performance"]["AAPL"]["total_return_pct"]
            .as_f64()
            .unwrap();
        let tsla = bundle["performance"]["TSLA"]["total_return_pct"]
            .as_f64()
            .unwrap();
        assert!(aapl > 0.0);
        assert!(tsla < 0.0);

        assert_eq!(bundle["correlations"][0]["symbol_a"], "AAPL");
        assert_eq!(bundle["correlations"][0]["symbol_b"], "TSLA");
        assert!(!bundle["insights"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compare_degrades_failed_fetch_to_empty_metrics() {
        let mut source = MockSeriesSource::new();
        source.expect_daily_series().returning(|symbol, _, _| {
            if symbol == "BAD" {
                Err(crate::error::CatalystError::InvalidSymbol("BAD".into()))
            } else {
                Ok(series_from_today(30, 100.0, 1.0))
            }
        });

        let engine = engine_with(source, MockTextGenerator::new());
        let symbols = vec!["AAPL".to_string(), "BAD".to_string()];
        let bundle = engine.compare(&symbols, Timeframe::OneMonth).await.unwrap();

        // Shape is stable: the failed symbol still has an entry, zeroed out
        assert_eq!(bundle["performance"]["BAD"]["total_return_pct"], 0.0);
        assert_eq!(bundle["overlay"]["BAD"], json!([]));
    }

    #[tokio::test]
    async fn test_analyze_stock_fans_out_all_agents() {
        let mut source = MockSeriesSource::new();
        source
            .expect_daily_series()
            .returning(|_, _, _| Ok(series_from_today(60, 100.0, 0.5)));
        source.expect_recent_news().returning(|_, _| {
            Ok(vec![NewsArticle {
                title: "Apple ships something".into(),
                description: None,
                published_utc: None,
                article_url: None,
            }])
        });

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|system, user| {
            if system == TRUTH_INSTRUCTIONS {
                Ok("Agents broadly agree.".to_string())
            } else {
                // Every persona sees the headlines in its context
                assert!(user.contains("Apple ships something"));
                Ok("{\"thesis\": \"ok\", \"confidence\": 0.6}".to_string())
            }
        });

        let engine = engine_with(source, generator);
        let bundle = engine
            .analyze_stock("AAPL", Timeframe::OneYear)
            .await
            .unwrap();

        let agents = bundle["agents"].as_array().unwrap();
        assert_eq!(agents.len(), Persona::ALL.len());
        assert_eq!(bundle["truth_summary"], "Agents broadly agree.");
        assert_eq!(bundle["verdicts"]["Buffett"]["confidence"], 0.6);
        assert_eq!(bundle["news"][0]["title"], "Apple ships something");
        assert!(bundle["graph"]["snake"].is_array());
        assert!(bundle["graph"]["treemap"].is_array());
    }

    #[tokio::test]
    async fn test_analyze_stock_degrades_failed_news_fetch() {
        let mut source = MockSeriesSource::new();
        source
            .expect_daily_series()
            .returning(|_, _, _| Ok(series_from_today(60, 100.0, 0.5)));
        source
            .expect_recent_news()
            .returning(|_, _| Err(CatalystError::InvalidSymbol("AAPL".into())));

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_, user| {
            assert!(!user.contains("Recent headlines"));
            Ok("fine".to_string())
        });

        let engine = engine_with(source, generator);
        let bundle = engine
            .analyze_stock("AAPL", Timeframe::OneYear)
            .await
            .unwrap();

        assert_eq!(bundle["news"], json!([]));
    }

    #[tokio::test]
    async fn test_analyze_stock_failed_agent_gets_fallback_verdict() {
        let mut source = MockSeriesSource::new();
        source
            .expect_daily_series()
            .returning(|_, _, _| Ok(series_from_today(60, 100.0, 0.5)));

        source.expect_recent_news().returning(|_, _| Ok(Vec::new()));

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|system, _| {
            if system == Persona::Risk.instructions() {
                Err(CatalystError::ConfigError("down".into()))
            } else {
                Ok("fine".to_string())
            }
        });

        let engine = engine_with(source, generator);
        let bundle = engine
            .analyze_stock("AAPL", Timeframe::OneYear)
            .await
            .unwrap();

        let risk = &bundle["verdicts"]["Risk"];
        assert!(risk["summary"]
            .as_str()
            .unwrap()
            .contains("no usable output"));
        // Other agents are unaffected
        assert_eq!(bundle["verdicts"]["Buffett"]["summary"], "fine");
    }

    #[tokio::test]
    async fn test_analyze_fund_filters_history_and_renders_report() {
        let mut fund = MockFundSource::new();
        fund.expect_nav_history().times(1).returning(|_| {
            let mut history = series_from_today(550, 100.0, 0.05);
            // Observations before the history floor must not count
            history.push(PricePoint::close_only(
                NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
                50.0,
            ));
            Ok((bluechip_profile(), history))
        });

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(1).returning(|_, user| {
            assert!(user.contains("Test Bluechip Fund - Growth"));
            Ok("Steady compounder.".to_string())
        });

        let engine = engine_with_fund(MockSeriesSource::new(), fund, generator);
        let bundle = engine.analyze_fund(119_132, Persona::Buffett).await.unwrap();

        assert_eq!(bundle["scheme_code"], 119_132);
        assert_eq!(bundle["persona"], "Buffett");
        assert_eq!(bundle["profile"]["scheme_name"], "Test Bluechip Fund - Growth");
        assert_eq!(bundle["metrics"]["data_points"], 550);
        assert!(bundle["metrics"]["returns_1y"]["cagr_pct"].is_number());
        assert!(!bundle["insights"].as_array().unwrap().is_empty());

        let markdown = bundle["markdown"].as_str().unwrap();
        assert!(markdown.contains("Steady compounder."));
        assert!(markdown.contains("Test Mutual Fund"));

        // Second call is served from cache: same report id, no refetch
        let second = engine.analyze_fund(119_132, Persona::Buffett).await.unwrap();
        assert_eq!(bundle["report_id"], second["report_id"]);
    }

    #[tokio::test]
    async fn test_analyze_fund_propagates_missing_history() {
        let mut fund = MockFundSource::new();
        fund.expect_nav_history().times(1).returning(|_| {
            Err(CatalystError::DataUnavailable {
                symbol: "0".into(),
                reason: "No NAV history returned".into(),
            })
        });

        let engine = engine_with_fund(MockSeriesSource::new(), fund, MockTextGenerator::new());
        let result = engine.analyze_fund(0, Persona::Risk).await;
        assert!(matches!(
            result,
            Err(CatalystError::DataUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_analyze_fund_narrative_failure_falls_back() {
        let mut fund = MockFundSource::new();
        fund.expect_nav_history()
            .returning(|_| Ok((bluechip_profile(), series_from_today(550, 100.0, 0.05))));

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(CatalystError::ConfigError("down".into())));

        let engine = engine_with_fund(MockSeriesSource::new(), fund, generator);
        let bundle = engine.analyze_fund(119_132, Persona::Buffett).await.unwrap();

        let markdown = bundle["markdown"].as_str().unwrap();
        assert!(markdown.contains("Buffett analysis unavailable."));
    }

    #[test]
    fn test_market_summary_short_series() {
        assert!(market_summary(&[]).contains("unavailable"));
    }

    #[test]
    fn test_market_summary_reports_metrics() {
        let series = series_from_today(60, 100.0, 0.5);
        let summary = market_summary(&series);
        assert!(summary.contains("Total return"));
        assert!(summary.contains("60 observations"));
    }
}
