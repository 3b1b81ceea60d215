//! Property tests for the cost engine
//!
//! Checks the consistency rules of every derived figure under arbitrary
//! non-negative inputs:
//! - item totals after quantity/price edits
//! - breakdown subtotal, overhead, profit and total
//! - effective hourly rate monotonicity
//! - client markup scaling
//! - dashboard category totals

use boq_estimator::boq::{BoqSheet, ItemField};
use boq_estimator::breakdown::{
    BreakdownDraft, EquipmentLine, LaborLine, MaterialLine, PercentageInput, RateBreakdown,
    Section, ToolLine,
};
use boq_estimator::core::config::RoundingPolicy;
use boq_estimator::dashboard::{cost_by_category, total_cost};
use boq_estimator::rates::{
    apply_markup, effective_hourly_rate, ManpowerCosts, ManpowerField, RateCatalog,
};
use proptest::prelude::*;

fn arb_amount() -> impl Strategy<Value = f64> {
    0.0..10_000.0f64
}

fn arb_small() -> impl Strategy<Value = f64> {
    0.0..100.0f64
}

fn arb_percentage() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.0..50.0f64]
}

fn arb_material() -> impl Strategy<Value = MaterialLine> {
    (arb_small(), arb_amount()).prop_map(|(qty, price)| MaterialLine::new("m", "u", qty, price))
}

fn arb_labor() -> impl Strategy<Value = LaborLine> {
    (arb_small(), arb_small()).prop_map(|(hours, rate)| LaborLine::new("r", hours, rate))
}

fn arb_equipment() -> impl Strategy<Value = EquipmentLine> {
    (arb_small(), arb_amount()).prop_map(|(hours, rate)| EquipmentLine::new("e", hours, rate))
}

fn arb_tool() -> impl Strategy<Value = ToolLine> {
    arb_amount().prop_map(|cost| ToolLine::new("t", cost))
}

/// Generates a breakdown draft with up to five rows per section
fn arb_draft() -> impl Strategy<Value = BreakdownDraft> {
    (
        prop::collection::vec(arb_material(), 0..6),
        prop::collection::vec(arb_labor(), 0..6),
        prop::collection::vec(arb_equipment(), 0..6),
        prop::collection::vec(arb_tool(), 0..6),
        arb_percentage(),
        arb_percentage(),
    )
        .prop_map(|(materials, labor, equipment, tools, overhead, profit)| BreakdownDraft {
            materials,
            labor,
            equipment,
            tools,
            overhead: PercentageInput { percentage: overhead },
            profit: PercentageInput { percentage: profit },
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

fn mason() -> ManpowerCosts {
    ManpowerCosts {
        monthly_salary: 2500.0,
        accommodation: 300.0,
        transport: 200.0,
        visa_cost_per_year: 500.0,
        annual_flight_ticket_cost: 1200.0,
        leave_settlement_days_per_year: 21.0,
    }
}

// ============================================================================
// Item totals
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_item_total_after_update(qty in arb_amount(), price in arb_amount(), qty2 in arb_amount()) {
        let mut sheet = BoqSheet::new();
        let id = sheet.add_item();
        sheet.update_field(id, ItemField::Quantity(qty)).unwrap();
        sheet.update_field(id, ItemField::UnitPrice(price)).unwrap();
        let item = sheet.get(id).unwrap();
        prop_assert_eq!(item.total(), qty * price);

        sheet.update_field(id, ItemField::Quantity(qty2)).unwrap();
        let item = sheet.get(id).unwrap();
        prop_assert_eq!(item.total(), qty2 * price);
    }
}

// ============================================================================
// Breakdown totals
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_subtotal_is_sum_of_sections(d in arb_draft()) {
        let bsr = RateBreakdown::from_draft(d, RoundingPolicy::HalfUp).unwrap();
        let sections: f64 = Section::ALL.iter().map(|s| bsr.section_cost(*s)).sum();
        prop_assert!(close(bsr.subtotal(), sections));
    }

    #[test]
    fn prop_subtotal_independent_of_row_order(d in arb_draft()) {
        let forward = RateBreakdown::from_draft(d.clone(), RoundingPolicy::HalfUp).unwrap();
        let mut reversed = d;
        reversed.materials.reverse();
        reversed.labor.reverse();
        reversed.equipment.reverse();
        reversed.tools.reverse();
        let backward = RateBreakdown::from_draft(reversed, RoundingPolicy::HalfUp).unwrap();
        prop_assert!(close(forward.subtotal(), backward.subtotal()));
    }

    #[test]
    fn prop_overhead_then_profit(d in arb_draft()) {
        let bsr = RateBreakdown::from_draft(d, RoundingPolicy::HalfUp).unwrap();
        let oh = bsr.overhead();
        let pr = bsr.profit();
        prop_assert_eq!(oh.amount, bsr.subtotal() * oh.percentage / 100.0);
        prop_assert_eq!(pr.amount, (bsr.subtotal() + oh.amount) * pr.percentage / 100.0);
        prop_assert_eq!(bsr.total(), bsr.subtotal() + oh.amount + pr.amount);
    }

    #[test]
    fn prop_recompute_idempotent(d in arb_draft()) {
        let mut bsr = RateBreakdown::from_draft(d, RoundingPolicy::HalfUp).unwrap();
        let once = bsr.clone();
        bsr.recompute();
        bsr.recompute();
        prop_assert_eq!(bsr, once);
    }

    #[test]
    fn prop_quoted_price_seeded_from_total(d in arb_draft()) {
        let bsr = RateBreakdown::from_draft(d, RoundingPolicy::HalfUp).unwrap();
        prop_assert_eq!(bsr.quoted_unit_price(), (bsr.total() + 0.5).floor());
        prop_assert!((bsr.quoted_unit_price() - bsr.total()).abs() <= 0.5);
    }

    #[test]
    fn prop_accepted_item_total(d in arb_draft(), qty in arb_small()) {
        let mut sheet = BoqSheet::new();
        let id = sheet.add_item();
        sheet.update_field(id, ItemField::Quantity(qty)).unwrap();
        let bsr = RateBreakdown::from_draft(d, RoundingPolicy::HalfUp).unwrap();
        let quoted = bsr.quoted_unit_price();
        sheet.accept_breakdown(id, bsr).unwrap();
        let item = sheet.get(id).unwrap();
        prop_assert_eq!(item.unit_price(), quoted);
        prop_assert_eq!(item.total(), qty * quoted);
    }
}

// ============================================================================
// Effective hourly rate
// ============================================================================

const FIELDS: [ManpowerField; 6] = [
    ManpowerField::MonthlySalary,
    ManpowerField::Accommodation,
    ManpowerField::Transport,
    ManpowerField::VisaCostPerYear,
    ManpowerField::AnnualFlightTicketCost,
    ManpowerField::LeaveSettlementDaysPerYear,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rate_monotonic(field in 0usize..6, base in arb_amount(), bump in arb_amount()) {
        let mut catalog = RateCatalog::new();
        let id = catalog.add_manpower("Mason", mason()).unwrap();

        catalog.update_manpower(id, FIELDS[field], base).unwrap();
        let lower = catalog.manpower_rate(id).unwrap().effective_hourly_rate();
        catalog.update_manpower(id, FIELDS[field], base + bump).unwrap();
        let higher = catalog.manpower_rate(id).unwrap().effective_hourly_rate();

        prop_assert!(higher >= lower);
    }

    #[test]
    fn prop_rate_is_pure_function_of_components(salary in arb_amount(), days in 0.0..60.0f64) {
        let mut costs = mason();
        costs.monthly_salary = salary;
        costs.leave_settlement_days_per_year = days;

        let mut catalog = RateCatalog::new();
        let id = catalog.add_manpower("Helper", mason()).unwrap();
        catalog.update_manpower(id, ManpowerField::MonthlySalary, salary).unwrap();
        catalog
            .update_manpower(id, ManpowerField::LeaveSettlementDaysPerYear, days)
            .unwrap();

        let rate = catalog.manpower_rate(id).unwrap().effective_hourly_rate();
        prop_assert_eq!(rate, effective_hourly_rate(&costs));
    }
}

#[test]
fn test_worked_manpower_example() {
    let rate = effective_hourly_rate(&mason());
    assert!((rate - 39450.0 / 2496.0).abs() < 1e-9);
    assert_eq!(format!("{:.2}", rate), "15.81");
}

// ============================================================================
// Client markup
// ============================================================================

#[test]
fn test_markup_scaling() {
    for pct in [0.0, 10.0, 100.0] {
        let mut catalog = RateCatalog::with_defaults();
        let client = catalog.add_client("Test", pct).unwrap();
        let profile = catalog.client(client).cloned();
        let rates = apply_markup(&catalog, profile.as_ref());
        let factor = 1.0 + pct / 100.0;

        for (marked, base) in rates.manpower.iter().zip(catalog.manpower()) {
            assert_eq!(marked.hourly_rate, base.effective_hourly_rate() * factor);
        }
        for (marked, base) in rates.equipment.iter().zip(catalog.equipment()) {
            assert_eq!(marked.hourly_rate, base.hourly_rate * factor);
        }
        assert_eq!(rates.materials, catalog.materials());
    }
}

// ============================================================================
// Dashboard
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_categories_sum_to_total(
        entries in prop::collection::vec((arb_draft(), arb_small(), 0usize..3), 1..8)
    ) {
        let categories = ["Earthworks", "Concrete Works", "Finishing"];
        let mut sheet = BoqSheet::new();
        for (d, qty, cat) in entries {
            let id = sheet.add_item();
            sheet.update_field(id, ItemField::Quantity(qty)).unwrap();
            sheet
                .update_field(id, ItemField::Category(Some(categories[cat].to_string())))
                .unwrap();
            let bsr = RateBreakdown::from_draft(d, RoundingPolicy::HalfUp).unwrap();
            sheet.accept_breakdown(id, bsr).unwrap();
        }

        let by_category: f64 = cost_by_category(sheet.items(), "Uncategorized").values().sum();
        let total = total_cost(sheet.items());
        prop_assert!((by_category - total).abs() <= 1e-6 * (1.0 + total));
    }
}
