use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Cut-offs for the verdict cascade.
///
/// The dashboard variants disagree on several of these (asset-play cash% has
/// been 20, 30 and 40; the P/E ceiling 12, 15 and 20). Defaults are the
/// reconciled values; deployments pin their own through `from_env`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictThresholds {
    /// Net debt / EBITDA ceiling (3.5x).
    pub kill_max_leverage: f64,
    /// Debt / cash ceiling when leverage is not meaningful (3.5x).
    pub kill_max_debt_to_cash: f64,
    pub kill_min_revenue_growth_pct: f64,
    pub scrap_max_peg: f64,
    pub scrap_min_revenue_growth_pct: f64,
    pub quality_min_roe_pct: f64,
    pub quality_min_revenue_growth_pct: f64,
    pub asset_min_cash_pct: f64,
    pub asset_max_forward_pe: f64,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            kill_max_leverage: 3.5,
            kill_max_debt_to_cash: 3.5,
            kill_min_revenue_growth_pct: -5.0,
            scrap_max_peg: 1.2,
            scrap_min_revenue_growth_pct: 15.0,
            quality_min_roe_pct: 15.0,
            quality_min_revenue_growth_pct: 10.0,
            asset_min_cash_pct: 30.0,
            asset_max_forward_pe: 15.0,
        }
    }
}

impl VerdictThresholds {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            kill_max_leverage: env_f64("FORENSIC_KILL_MAX_LEVERAGE", defaults.kill_max_leverage)?,
            kill_max_debt_to_cash: env_f64(
                "FORENSIC_KILL_MAX_DEBT_TO_CASH",
                defaults.kill_max_debt_to_cash,
            )?,
            kill_min_revenue_growth_pct: env_f64(
                "FORENSIC_KILL_MIN_GROWTH_PCT",
                defaults.kill_min_revenue_growth_pct,
            )?,
            scrap_max_peg: env_f64("FORENSIC_SCRAP_MAX_PEG", defaults.scrap_max_peg)?,
            scrap_min_revenue_growth_pct: env_f64(
                "FORENSIC_SCRAP_MIN_GROWTH_PCT",
                defaults.scrap_min_revenue_growth_pct,
            )?,
            quality_min_roe_pct: env_f64(
                "FORENSIC_QUALITY_MIN_ROE_PCT",
                defaults.quality_min_roe_pct,
            )?,
            quality_min_revenue_growth_pct: env_f64(
                "FORENSIC_QUALITY_MIN_GROWTH_PCT",
                defaults.quality_min_revenue_growth_pct,
            )?,
            asset_min_cash_pct: env_f64("FORENSIC_ASSET_CASH_PCT", defaults.asset_min_cash_pct)?,
            asset_max_forward_pe: env_f64("FORENSIC_ASSET_MAX_PE", defaults.asset_max_forward_pe)?,
        };

        tracing::debug!("Verdict thresholds: {:?}", config);
        Ok(config)
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, value)),
        Err(_) => Ok(default),
    }
}
