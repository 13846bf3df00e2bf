//! Equal-Weight Portfolio Allocation.
//!
//! Splits a cash amount evenly across N instruments, buys whole shares at
//! each instrument's cost-basis price, and marks the resulting positions
//! to market:
//! 1. **Share counts** -- floor(target / share price) per instrument
//! 2. **Cost / value** -- cost basis and mark-to-market value per position
//! 3. **P&L %** -- per-row return ratio (see [`PnlConvention`])
//! 4. **Rebalancing delta** -- current value minus the equal-weight target
//! 5. **Portfolio reduction** -- leftover cash and total mark-to-market return
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64` beyond the raw
//! input boundary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RebalanceError;
use crate::types::*;
use crate::RebalanceResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// The two parallel price sequences, keyed the way the sheet names them.
/// Instrument i is the i-th element of both sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSheet {
    /// Cost basis per unit at time of purchase.
    #[serde(rename = "Share Price")]
    pub share_prices: Vec<RawNumber>,
    /// Present market price per unit.
    #[serde(rename = "Current Price")]
    pub current_prices: Vec<RawNumber>,
}

/// Which ratio the per-row P&L percentage uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PnlConvention {
    /// `current_price / initial_cost`, the sheet's historical formula.
    /// Divides a per-unit price by an aggregate cost basis; kept as the
    /// default for compatibility with existing outputs.
    #[default]
    UnitPrice,
    /// `current_value / initial_cost`, the dimensionally consistent ratio.
    PositionValue,
}

/// Input for equal-weight allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqualWeightInput {
    /// Cash to allocate, as a number or numeric string.
    pub initial_cash: RawNumber,
    pub prices: PriceSheet,
    #[serde(default)]
    pub pnl_convention: PnlConvention,
}

/// One instrument's allocation and performance. Field order is the
/// serialization order of the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Whole shares bought: floor(target / share_price).
    pub shares: u64,
    pub share_price: Money,
    /// shares * share_price.
    pub initial_cost: Money,
    pub current_price: Money,
    /// shares * current_price.
    pub current_value: Money,
    /// Percentage return per [`PnlConvention`]; `None` when no shares were
    /// bought (zero cost basis leaves the ratio undefined).
    pub pnl_percent: Option<Money>,
    /// current_value - target: over/under-weight versus the equal split.
    pub rebalancing_delta: Money,
    /// Equal-weight cash target, initial_cash / N. Same across rows.
    pub target: Money,
}

/// Output of the equal-weight allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualWeightOutput {
    pub rows: Vec<AllocationRow>,
    /// initial_cash - sum(initial_cost).
    pub cash_after_initial_allocation: Money,
    /// sum(current_value) - sum(initial_cost).
    pub current_portfolio_return: Money,
}

impl EqualWeightOutput {
    /// The `(table, leftover_cash, total_return)` triple consumed by
    /// presentation layers: the rows as a JSON array plus the two scalars.
    pub fn into_parts(self) -> RebalanceResult<(serde_json::Value, Money, Money)> {
        let table = serde_json::to_value(&self.rows)?;
        Ok((
            table,
            self.cash_after_initial_allocation,
            self.current_portfolio_return,
        ))
    }
}

// ---------------------------------------------------------------------------
// Coercion / validation
// ---------------------------------------------------------------------------

fn coerce_share_prices(raw: &[RawNumber]) -> RebalanceResult<Vec<Decimal>> {
    raw.iter()
        .enumerate()
        .map(|(i, v)| {
            let price = v
                .to_decimal()
                .ok_or_else(|| RebalanceError::InvalidSharePrice {
                    position: i,
                    value: v.literal(),
                    reason: "must be a number or a numeric string".into(),
                })?;
            if price <= Decimal::ZERO {
                return Err(RebalanceError::InvalidSharePrice {
                    position: i,
                    value: v.literal(),
                    reason: "must be positive".into(),
                });
            }
            Ok(price)
        })
        .collect()
}

fn coerce_current_prices(raw: &[RawNumber]) -> RebalanceResult<Vec<Decimal>> {
    raw.iter()
        .enumerate()
        .map(|(i, v)| {
            v.to_decimal()
                .ok_or_else(|| RebalanceError::InvalidCurrentPrice {
                    position: i,
                    value: v.literal(),
                    reason: "must be a number or a numeric string".into(),
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Allocate cash equally across all instruments and mark the resulting
/// positions to market.
///
/// Validation failures abort the whole batch; no partial results.
pub fn allocate_equal_weight(
    input: &EqualWeightInput,
) -> RebalanceResult<ComputationOutput<EqualWeightOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let initial_cash =
        input
            .initial_cash
            .to_decimal()
            .ok_or_else(|| RebalanceError::InvalidCash {
                value: input.initial_cash.literal(),
                reason: "must be a number or a numeric string".into(),
            })?;

    let share_prices = coerce_share_prices(&input.prices.share_prices)?;
    let current_prices = coerce_current_prices(&input.prices.current_prices)?;

    if share_prices.len() != current_prices.len() {
        return Err(RebalanceError::LengthMismatch {
            share_prices: share_prices.len(),
            current_prices: current_prices.len(),
        });
    }
    if share_prices.is_empty() {
        return Err(RebalanceError::InsufficientData(
            "At least one instrument is required".into(),
        ));
    }

    let n = share_prices.len();
    let target = initial_cash / Decimal::from(n as u64);

    let mut rows: Vec<AllocationRow> = Vec::with_capacity(n);
    let mut total_cost = Decimal::ZERO;
    let mut total_return = Decimal::ZERO;

    for (i, (&share_price, &current_price)) in
        share_prices.iter().zip(current_prices.iter()).enumerate()
    {
        let shares = (target / share_price)
            .floor()
            .max(Decimal::ZERO)
            .to_u64()
            .ok_or_else(|| RebalanceError::InvalidSharePrice {
                position: i,
                value: share_price.to_string(),
                reason: "produces a share count out of range".into(),
            })?;

        if shares == 0 {
            warnings.push(format!(
                "Instrument {i}: share price {share_price} exceeds the equal-weight \
                 target {}; no shares purchased",
                target.round_dp(2)
            ));
        }

        let value_out_of_range = || RebalanceError::InvalidCurrentPrice {
            position: i,
            value: current_price.to_string(),
            reason: "produces a value out of range".into(),
        };

        let shares_dec = Decimal::from(shares);
        // Bounded by target, cannot overflow.
        let initial_cost = shares_dec * share_price;
        let current_value = shares_dec
            .checked_mul(current_price)
            .ok_or_else(value_out_of_range)?;

        let pnl_percent = if initial_cost.is_zero() {
            None
        } else {
            let numerator = match input.pnl_convention {
                PnlConvention::UnitPrice => current_price,
                PnlConvention::PositionValue => current_value,
            };
            let pnl = numerator
                .checked_div(initial_cost)
                .and_then(|r| r.checked_sub(Decimal::ONE))
                .and_then(|r| r.checked_mul(dec!(100)))
                .ok_or_else(value_out_of_range)?;
            Some(pnl.round_dp(2))
        };

        total_cost += initial_cost;
        // Sum(value) - sum(cost) accumulated row by row; exact decimal
        // arithmetic makes this equal to subtracting the two totals.
        total_return = current_value
            .checked_sub(initial_cost)
            .and_then(|net| total_return.checked_add(net))
            .ok_or_else(value_out_of_range)?;

        rows.push(AllocationRow {
            shares,
            share_price: share_price.round_dp(2),
            initial_cost: initial_cost.round_dp(2),
            current_price: current_price.round_dp(2),
            current_value: current_value.round_dp(2),
            pnl_percent,
            rebalancing_delta: current_value
                .checked_sub(target)
                .ok_or_else(value_out_of_range)?
                .round_dp(2),
            target: target.round_dp(2),
        });
    }

    let output = EqualWeightOutput {
        rows,
        cash_after_initial_allocation: (initial_cash - total_cost).round_dp(2),
        current_portfolio_return: total_return.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equal-Weight Allocation (whole-share flooring, mark-to-market)",
        &serde_json::json!({
            "initial_cash": initial_cash.to_string(),
            "instruments": n,
            "pnl_convention": input.pnl_convention,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
