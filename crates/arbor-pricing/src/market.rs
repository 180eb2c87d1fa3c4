//! Market data inputs.
//!
//! The engine only ever sees plain numbers. [`MarketDataSource`] is the
//! seam where spots, volatilities, rates and FX come from; retrieval,
//! retries and caching belong to the implementor.

use std::collections::HashMap;

use statrs::statistics::Statistics;

use arbor_core::{ArborError, ArborResult};

/// Trading days per year used to annualize daily volatility.
pub const TRADING_DAYS: f64 = 252.0;

/// Source of market inputs for building contracts and models.
pub trait MarketDataSource {
    /// Latest price of `ticker`.
    fn spot(&self, ticker: &str) -> ArborResult<f64>;

    /// Annualized volatility of `ticker`.
    fn annualized_volatility(&self, ticker: &str) -> ArborResult<f64>;

    /// Annualized risk-free rate.
    fn risk_free_rate(&self) -> ArborResult<f64>;

    /// Units of `to` per unit of `from`.
    fn fx_rate(&self, from: &str, to: &str) -> ArborResult<f64>;
}

/// Annualized volatility from a series of closing prices.
///
/// Sample standard deviation of simple daily returns, scaled by
/// `√`[`TRADING_DAYS`]. Needs at least three positive closes.
///
/// ```rust
/// use arbor_pricing::annualized_volatility;
///
/// let vol = annualized_volatility(&[100.0, 101.0, 99.0, 100.5]).unwrap();
/// assert!(vol > 0.0);
/// assert!(annualized_volatility(&[100.0, 101.0]).is_err());
/// ```
pub fn annualized_volatility(closes: &[f64]) -> ArborResult<f64> {
    if closes.len() < 3 {
        return Err(ArborError::configuration(format!(
            "need at least 3 closing prices to estimate volatility, got {}",
            closes.len()
        )));
    }
    if let Some(bad) = closes.iter().find(|c| !(c.is_finite() && **c > 0.0)) {
        return Err(ArborError::configuration(format!(
            "closing prices must be positive, got {bad}"
        )));
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    Ok(returns.std_dev() * TRADING_DAYS.sqrt())
}

/// In-memory market data.
///
/// ```rust
/// use arbor_pricing::{MarketDataSource, StaticMarketData};
///
/// let market = StaticMarketData::new(0.04)
///     .with_spot("SAP", 180.0)
///     .with_volatility("SAP", 0.22)
///     .with_fx_rate("EUR", "USD", 1.08);
///
/// assert_eq!(market.spot("SAP").unwrap(), 180.0);
/// assert_eq!(market.fx_rate("USD", "USD").unwrap(), 1.0);
/// assert!((market.fx_rate("USD", "EUR").unwrap() - 1.0 / 1.08).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    spots: HashMap<String, f64>,
    vols: HashMap<String, f64>,
    fx: HashMap<(String, String), f64>,
    rate: f64,
}

impl StaticMarketData {
    /// Creates an empty source with the given risk-free rate.
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    /// Adds a spot price.
    #[must_use]
    pub fn with_spot(mut self, ticker: impl Into<String>, spot: f64) -> Self {
        self.spots.insert(ticker.into(), spot);
        self
    }

    /// Adds an annualized volatility.
    #[must_use]
    pub fn with_volatility(mut self, ticker: impl Into<String>, vol: f64) -> Self {
        self.vols.insert(ticker.into(), vol);
        self
    }

    /// Adds a ticker's closing prices, recording its last close as the spot
    /// and its estimated volatility.
    pub fn with_closes(self, ticker: impl Into<String>, closes: &[f64]) -> ArborResult<Self> {
        let ticker = ticker.into();
        let vol = annualized_volatility(closes)?;
        let spot = closes.last().copied().unwrap_or_default();
        Ok(self.with_spot(ticker.clone(), spot).with_volatility(ticker, vol))
    }

    /// Adds an FX rate quoted as units of `to` per unit of `from`.
    #[must_use]
    pub fn with_fx_rate(mut self, from: impl Into<String>, to: impl Into<String>, rate: f64) -> Self {
        self.fx.insert((from.into(), to.into()), rate);
        self
    }
}

impl MarketDataSource for StaticMarketData {
    fn spot(&self, ticker: &str) -> ArborResult<f64> {
        self.spots
            .get(ticker)
            .copied()
            .ok_or_else(|| ArborError::configuration(format!("no spot price for '{ticker}'")))
    }

    fn annualized_volatility(&self, ticker: &str) -> ArborResult<f64> {
        self.vols
            .get(ticker)
            .copied()
            .ok_or_else(|| ArborError::configuration(format!("no volatility for '{ticker}'")))
    }

    fn risk_free_rate(&self) -> ArborResult<f64> {
        Ok(self.rate)
    }

    fn fx_rate(&self, from: &str, to: &str) -> ArborResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        if let Some(rate) = self.fx.get(&(from.to_string(), to.to_string())) {
            return Ok(*rate);
        }
        self.fx
            .get(&(to.to_string(), from.to_string()))
            .map(|rate| 1.0 / rate)
            .ok_or_else(|| ArborError::configuration(format!("no fx rate for {from}/{to}")))
    }
}
