//! Property-based tests for the position recompute rule.
//!
//! These tests verify that the weighted-average and undo properties hold
//! across random trade sequences, using the `proptest` crate.

use proptest::prelude::*;
use rust_decimal::Decimal;
use xportfoy_core::errors::PositionError;
use xportfoy_core::holdings::{apply_trade, undo_trade, Position, Trade};
use xportfoy_core::transactions::TransactionSide;
use xportfoy_core::Error;

// =============================================================================
// Generators
// =============================================================================

/// Positive decimal with up to four fractional digits.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000, 0u32..5).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn arb_buy() -> impl Strategy<Value = Trade> {
    (arb_amount(), arb_amount()).prop_map(|(quantity, price)| Trade::buy("SYM", quantity, price))
}

fn arb_position() -> impl Strategy<Value = Position> {
    (arb_amount(), arb_amount()).prop_map(|(quantity, avg)| Position::new(quantity, avg).unwrap())
}

/// One step of a mixed history: record a trade or undo an earlier one.
#[derive(Debug, Clone)]
enum Step {
    Buy(Decimal, Decimal),
    /// Sell this percentage of the tracked quantity (above 100 oversells).
    Sell(u32, Decimal),
    /// Undo the recorded trade at this index (modulo the number recorded).
    Undo(usize),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (arb_amount(), arb_amount()).prop_map(|(q, p)| Step::Buy(q, p)),
        2 => (1u32..=150, arb_amount()).prop_map(|(pct, p)| Step::Sell(pct, p)),
        2 => any::<usize>().prop_map(Step::Undo),
    ]
}

fn apply(existing: Option<Position>, trade: &Trade) -> Option<Position> {
    apply_trade(existing.as_ref(), trade)
        .expect("buy is always accepted")
        .resulting(existing)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After only BUYs, quantity is the sum and cost basis the sum of
    /// quantity * price.
    #[test]
    fn prop_buys_accumulate_weighted_cost(buys in prop::collection::vec(arb_buy(), 1..12)) {
        let mut position = None;
        for trade in &buys {
            position = apply(position, trade);
        }
        let position = position.expect("buys leave a position");

        let quantity: Decimal = buys.iter().map(|t| t.quantity).sum();
        let cost: Decimal = buys.iter().map(|t| t.quantity * t.price).sum();
        prop_assert_eq!(position.quantity, quantity);
        prop_assert_eq!(position.cost_basis, cost);

        let min = buys.iter().map(|t| t.price).min().unwrap_or_default();
        let max = buys.iter().map(|t| t.price).max().unwrap_or_default();
        prop_assert!(position.avg_price >= min && position.avg_price <= max);
    }

    /// A SELL never changes the average and never drives quantity negative.
    #[test]
    fn prop_sell_keeps_average(start in arb_position(), quantity in arb_amount(), price in arb_amount()) {
        let trade = Trade::sell("SYM", quantity, price);
        match apply_trade(Some(&start), &trade) {
            Ok(transition) => {
                prop_assert!(quantity <= start.quantity);
                match transition.resulting(Some(start)) {
                    Some(after) => {
                        prop_assert_eq!(after.avg_price, start.avg_price);
                        prop_assert_eq!(after.quantity, start.quantity - quantity);
                        prop_assert!(after.quantity > Decimal::ZERO);
                    }
                    None => {
                        prop_assert_eq!(quantity, start.quantity);
                    }
                }
            }
            Err(Error::InsufficientPosition(PositionError::ExceedsPosition { held, requested, .. })) => {
                prop_assert!(quantity > start.quantity);
                prop_assert_eq!(held, start.quantity);
                prop_assert_eq!(requested, quantity);
            }
            Err(other) => {
                prop_assert!(false, "unexpected error {:?}", other);
            }
        }
    }

    /// Recording a BUY and undoing it returns the prior position exactly.
    #[test]
    fn prop_buy_then_undo_is_identity(start in proptest::option::of(arb_position()), buy in arb_buy()) {
        let after = apply(start, &buy);
        let outcome = undo_trade(after.as_ref(), &buy).expect("undo of a recorded buy");
        prop_assert!(!outcome.approximate);
        prop_assert_eq!(outcome.transition.resulting(after), start);
    }

    /// Undoing a SELL that left a position adds the quantity back at the
    /// unchanged average.
    #[test]
    fn prop_sell_then_undo_is_identity(start in arb_position(), fraction in 1u32..100) {
        let quantity = start.quantity * Decimal::new(fraction as i64, 2);
        let sell = Trade::sell("SYM", quantity, Decimal::ONE);
        let after = apply_trade(Some(&start), &sell).expect("covered sell").resulting(Some(start));
        let restored = undo_trade(after.as_ref(), &sell).expect("undo").transition.resulting(after);
        prop_assert_eq!(restored.map(|p| p.quantity), Some(start.quantity));
        prop_assert_eq!(restored.map(|p| p.avg_price), Some(start.avg_price));
    }

    /// Across any mix of applies and undos a holding exists exactly when
    /// its quantity is positive, and rejected SELLs change nothing.
    #[test]
    fn prop_deletion_invariant(steps in prop::collection::vec(arb_step(), 1..30)) {
        let mut position: Option<Position> = None;
        let mut tracked = Decimal::ZERO;
        let mut recorded: Vec<Trade> = Vec::new();

        for step in steps {
            match step {
                Step::Buy(quantity, price) => {
                    let trade = Trade::buy("SYM", quantity, price);
                    position = apply(position, &trade);
                    tracked += quantity;
                    recorded.push(trade);
                }
                Step::Sell(pct, price) => {
                    let quantity = if tracked.is_zero() {
                        price
                    } else {
                        tracked * Decimal::new(pct as i64, 2)
                    };
                    let trade = Trade::sell("SYM", quantity, price);
                    match apply_trade(position.as_ref(), &trade) {
                        Ok(transition) => {
                            prop_assert!(quantity <= tracked);
                            position = transition.resulting(position);
                            tracked -= quantity;
                            recorded.push(trade);
                        }
                        Err(Error::InsufficientPosition(_)) => {
                            prop_assert!(quantity > tracked);
                        }
                        Err(other) => {
                            prop_assert!(false, "unexpected error {:?}", other);
                        }
                    }
                }
                Step::Undo(index) => {
                    if recorded.is_empty() {
                        continue;
                    }
                    let trade = recorded.remove(index % recorded.len());
                    let outcome = undo_trade(position.as_ref(), &trade).expect("undo");
                    position = outcome.transition.resulting(position);
                    tracked = match trade.side {
                        TransactionSide::Buy if tracked > trade.quantity => tracked - trade.quantity,
                        TransactionSide::Buy => Decimal::ZERO,
                        TransactionSide::Sell => tracked + trade.quantity,
                    };
                }
            }

            prop_assert_eq!(position.is_some(), tracked > Decimal::ZERO);
            if let Some(held) = position {
                prop_assert!(held.quantity > Decimal::ZERO);
                prop_assert_eq!(held.quantity, tracked);
                prop_assert!(held.cost_basis >= Decimal::ZERO);
            }
        }
    }
}
