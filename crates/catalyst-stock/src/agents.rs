//! Persona agent registry
//!
//! Each agent is a static system prompt; the engine fans a symbol out to all
//! of them through the [`TextGenerator`](crate::llm::TextGenerator) boundary
//! and collects one report per agent. Personas are configuration, not
//! behavior: adding one is a new enum variant and prompt, nothing else.

use crate::error::CatalystError;
use crate::extract::AgentVerdict;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BUFFETT_INSTRUCTIONS: &str = "\
You are Warren Buffett. Judge the business, not the ticker: durable \
competitive moat, honest and rational management, understandable economics, \
and a sensible price with a margin of safety. Favor consistent return on \
equity and free cash flow over growth stories. Be blunt about what is \
outside your circle of competence. \
Return JSON: {\"thesis\": string, \"confidence\": number 0-1}.";

const ACKMAN_INSTRUCTIONS: &str = "\
You are Bill Ackman, an activist investor. Look for high-quality, simple, \
predictable, free-cash-flow-generative businesses trading below intrinsic \
value, and name the catalyst that closes the gap: management change, \
spin-off, capital-allocation fix. Concentrated conviction over \
diversification. \
Return JSON: {\"thesis\": string, \"confidence\": number 0-1}.";

const DALIO_INSTRUCTIONS: &str = "\
You are Ray Dalio. Analyze through the machine: where are we in the \
short-term and long-term debt cycles, what do rates, inflation, and growth \
imply for this asset, and how does it behave across environments? Stress \
diversification and what would have to be true for this position to lose. \
Return JSON: {\"thesis\": string, \"confidence\": number 0-1}.";

const COHEN_INSTRUCTIONS: &str = "\
You are Steve Cohen, a trader. Focus on near-term catalysts, momentum, \
positioning, and flow: earnings setups, sector rotation, unusual volume, \
and where the crowd is offside. Size the trade, define the stop, and say \
what invalidates the setup. \
Return JSON: {\"thesis\": string, \"confidence\": number 0-1}.";

const THIEL_INSTRUCTIONS: &str = "\
You are Peter Thiel, a contrarian. Ask what important truth about this \
company few people agree with you on. Is this a monopoly-in-the-making with \
network effects and proprietary advantage, or competition dressed up as \
differentiation? Zero-to-one beats incremental. \
Return JSON: {\"thesis\": string, \"confidence\": number 0-1}.";

const FUNDAMENTAL_INSTRUCTIONS: &str = "\
You are a senior equity research analyst specializing in fundamental \
valuation. Assess valuation versus sector (P/E, PEG, simplified DCF), \
profitability, balance-sheet quality, and notable red flags. Do not \
fabricate numbers; say \"data unavailable\" when data is missing. Be \
concise. \
Return JSON: {\"valuationSummary\": string, \"strengths\": string[], \
\"weaknesses\": string[], \"fairValueRating\": \"Undervalued\" | \
\"Fairly Valued\" | \"Overvalued\", \"confidence\": number 0-1}.";

const TECHNICAL_INSTRUCTIONS: &str = "\
You are a technical analyst. Read the provided price and indicator data: \
trend direction from the moving averages, momentum from RSI, notable \
support and resistance from the recent range. State the setup and the level \
that invalidates it. \
Return JSON: {\"summary\": string, \"signal\": \"bullish\" | \"bearish\" | \
\"neutral\", \"confidence\": number 0-1}.";

const RISK_INSTRUCTIONS: &str = "\
You are a risk manager. Quantify what can go wrong: drawdown history, \
volatility regime, concentration, liquidity, and event risk over the given \
timeframe. State a maximum position size and the condition for cutting it. \
Return JSON: {\"summary\": string, \"riskLevel\": \"low\" | \"medium\" | \
\"high\", \"confidence\": number 0-1}.";

/// System prompt for the synthesis pass over all agent verdicts
pub const TRUTH_INSTRUCTIONS: &str = "\
You are a synthesizer of conflicting investment opinions. Given verdicts \
from several analysts and investor personas, produce a concise, truthful \
summary: where they agree, where they disagree and why, and what the data \
actually supports. Do not average opinions into mush; attribute claims. \
Flag any verdict unsupported by the provided data.";

/// The closed set of analysis agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    Buffett,
    Ackman,
    Dalio,
    Cohen,
    Thiel,
    Fundamental,
    Technical,
    Risk,
}

impl Persona {
    /// Every agent, in fan-out order
    pub const ALL: [Persona; 8] = [
        Persona::Fundamental,
        Persona::Technical,
        Persona::Risk,
        Persona::Buffett,
        Persona::Cohen,
        Persona::Dalio,
        Persona::Ackman,
        Persona::Thiel,
    ];

    /// Display name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Persona::Buffett => "Buffett",
            Persona::Ackman => "Ackman",
            Persona::Dalio => "Dalio",
            Persona::Cohen => "Cohen",
            Persona::Thiel => "Thiel",
            Persona::Fundamental => "Fundamental",
            Persona::Technical => "Technical",
            Persona::Risk => "Risk",
        }
    }

    /// System prompt for this agent
    pub fn instructions(self) -> &'static str {
        match self {
            Persona::Buffett => BUFFETT_INSTRUCTIONS,
            Persona::Ackman => ACKMAN_INSTRUCTIONS,
            Persona::Dalio => DALIO_INSTRUCTIONS,
            Persona::Cohen => COHEN_INSTRUCTIONS,
            Persona::Thiel => THIEL_INSTRUCTIONS,
            Persona::Fundamental => FUNDAMENTAL_INSTRUCTIONS,
            Persona::Technical => TECHNICAL_INSTRUCTIONS,
            Persona::Risk => RISK_INSTRUCTIONS,
        }
    }

    /// User prompt sent alongside the instructions
    pub fn user_prompt(self, symbol: &str, timeframe: &str, market_summary: &str) -> String {
        format!(
            "Analyze {symbol} over the {timeframe} timeframe.\n\nMarket data:\n{market_summary}"
        )
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Persona {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buffett" => Ok(Persona::Buffett),
            "ackman" => Ok(Persona::Ackman),
            "dalio" => Ok(Persona::Dalio),
            "cohen" => Ok(Persona::Cohen),
            "thiel" => Ok(Persona::Thiel),
            "fundamental" => Ok(Persona::Fundamental),
            "technical" => Ok(Persona::Technical),
            "risk" => Ok(Persona::Risk),
            other => Err(CatalystError::UnknownAgent(other.to_string())),
        }
    }
}

/// One agent's contribution to a combined report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReport {
    pub agent: String,
    /// Raw model output before extraction
    pub raw: String,
    pub verdict: AgentVerdict,
}
