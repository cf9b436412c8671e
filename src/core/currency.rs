use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// Supports the G10 currencies (USD, EUR, GBP, JPY, etc.) as well as
/// the liquid emerging-market currencies the platform tracks.
///
/// # Examples
///
/// ```
/// use fx_risk_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let brl = CurrencyCode::new("BRL");
/// assert_ne!(usd, brl);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from currency pair parsing.
#[derive(Debug, Error)]
pub enum PairParseError {
    #[error("currency pair '{0}' is not in BASE/QUOTE form")]
    MissingSeparator(String),
    #[error("'{0}' is not a three-letter currency code")]
    InvalidCode(String),
    #[error("currency pair '{0}' has identical legs")]
    IdenticalLegs(String),
}

/// A currency pair in market convention: base/quote, e.g. EUR/USD.
///
/// The exposure's amount is denominated in the base currency; the
/// current rate expresses one unit of base in quote terms.
///
/// # Examples
///
/// ```
/// use fx_risk_engine::core::currency::CurrencyPair;
///
/// let pair: CurrencyPair = "EUR/USD".parse().unwrap();
/// assert_eq!(pair.base.as_str(), "EUR");
/// assert_eq!(pair.quote.as_str(), "USD");
/// assert_eq!(pair.to_string(), "EUR/USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Classify the pair for default volatility estimation.
    ///
    /// Mirrors the platform's bucketing: tight-spread majors, high-beta
    /// emerging-market crosses, commodity-linked currencies, and a
    /// catch-all for everything else.
    pub fn volatility_class(&self) -> PairClass {
        const MAJORS: [&str; 6] = ["EURUSD", "GBPUSD", "USDJPY", "USDCHF", "AUDUSD", "USDCAD"];
        const EMERGING: [&str; 5] = ["BRL", "MXN", "ZAR", "INR", "TRY"];
        const COMMODITY: [&str; 4] = ["AUD", "NZD", "CAD", "NOK"];

        let compact = format!("{}{}", self.base, self.quote);
        if MAJORS.contains(&compact.as_str()) {
            return PairClass::Major;
        }
        if EMERGING.iter().any(|c| compact.contains(c)) {
            return PairClass::Emerging;
        }
        if COMMODITY.iter().any(|c| compact.contains(c)) {
            return PairClass::CommodityLinked;
        }
        PairClass::Other
    }
}

impl FromStr for CurrencyPair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| PairParseError::MissingSeparator(s.to_string()))?;
        for leg in [base, quote] {
            if leg.len() != 3 || !leg.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(PairParseError::InvalidCode(leg.to_string()));
            }
        }
        if base.eq_ignore_ascii_case(quote) {
            return Err(PairParseError::IdenticalLegs(s.to_string()));
        }
        Ok(Self::new(CurrencyCode::new(base), CurrencyCode::new(quote)))
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = PairParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Volatility bucket for a currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairClass {
    Major,
    Emerging,
    CommodityLinked,
    Other,
}

impl PairClass {
    /// Default annualized volatility when no measured figure is supplied.
    pub fn default_volatility(&self) -> f64 {
        match self {
            PairClass::Major => 0.08,
            PairClass::Emerging => 0.15,
            PairClass::CommodityLinked => 0.10,
            PairClass::Other => 0.12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_equality() {
        let a = CurrencyCode::new("USD");
        let b = CurrencyCode::new("usd");
        assert_eq!(a, b);
    }

    #[test]
    fn test_pair_parse_valid() {
        let pair: CurrencyPair = "EUR/USD".parse().unwrap();
        assert_eq!(pair.base.as_str(), "EUR");
        assert_eq!(pair.quote.as_str(), "USD");
    }

    #[test]
    fn test_pair_parse_lowercase() {
        let pair: CurrencyPair = "gbp/usd".parse().unwrap();
        assert_eq!(pair.to_string(), "GBP/USD");
    }

    #[test]
    fn test_pair_parse_missing_separator() {
        let err = "EURUSD".parse::<CurrencyPair>().unwrap_err();
        assert!(matches!(err, PairParseError::MissingSeparator(_)));
    }

    #[test]
    fn test_pair_parse_bad_code() {
        let err = "EU/USD".parse::<CurrencyPair>().unwrap_err();
        assert!(matches!(err, PairParseError::InvalidCode(_)));

        let err = "E1R/USD".parse::<CurrencyPair>().unwrap_err();
        assert!(matches!(err, PairParseError::InvalidCode(_)));
    }

    #[test]
    fn test_pair_parse_identical_legs() {
        let err = "USD/USD".parse::<CurrencyPair>().unwrap_err();
        assert!(matches!(err, PairParseError::IdenticalLegs(_)));
    }

    #[test]
    fn test_volatility_classes() {
        let eurusd: CurrencyPair = "EUR/USD".parse().unwrap();
        assert_eq!(eurusd.volatility_class(), PairClass::Major);

        let usdbrl: CurrencyPair = "USD/BRL".parse().unwrap();
        assert_eq!(usdbrl.volatility_class(), PairClass::Emerging);

        let nzdusd: CurrencyPair = "NZD/USD".parse().unwrap();
        assert_eq!(nzdusd.volatility_class(), PairClass::CommodityLinked);

        let eurgbp: CurrencyPair = "EUR/GBP".parse().unwrap();
        assert_eq!(eurgbp.volatility_class(), PairClass::Other);
    }

    #[test]
    fn test_default_volatility_ordering() {
        // Emerging pairs carry the highest default volatility.
        assert!(
            PairClass::Emerging.default_volatility() > PairClass::Major.default_volatility()
        );
    }

    #[test]
    fn test_pair_serde_round_trip() {
        let pair: CurrencyPair = "USD/MXN".parse().unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, "\"USD/MXN\"");
        let back: CurrencyPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }
}
