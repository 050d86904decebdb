use crate::workflow::config::SimulationConfig;
use crate::workflow::runner::{AnalysisResult, TARGET_FRACTION};
use tumorcore::model::milestones::{CapacityTarget, InflectionPoint};

const RULE: &str = "======================================================================";

/// Print the full console report for one analysis run.
pub fn print_report(config: &SimulationConfig, result: &AnalysisResult) {
    println!("\n{RULE}");
    println!("TUMOR GROWTH MODEL - LOGISTIC EQUATION RESULTS");
    println!("{RULE}");

    println!("\nPARAMETERS:");
    println!("  initial size (P0):     {} mm^3", config.initial_size);
    println!("  growth rate (r):       {} 1/day", config.growth_rate);
    println!("  carrying capacity (K): {} mm^3", config.capacity);

    println!("\nANALYTIC RESULTS:");
    for row in &result.growth_table {
        println!(
            "  day {:4.0}: {:7.2} mm^3 | growth rate {:6.3} mm^3/day | {:5.1}% of K",
            row.day,
            row.size,
            row.rate,
            row.capacity_fraction * 100.0
        );
    }

    println!("\nKEY MILESTONES:");
    match result.inflection {
        InflectionPoint::Ahead { day } => {
            println!(
                "  fastest growth (P = K/2) on day {:.2}, size {:.2} mm^3",
                day,
                config.capacity / 2.0
            );
            println!("  peak growth rate: {:.3} mm^3/day", result.peak_rate);
        }
        InflectionPoint::AtStart => {
            println!("  fastest growth at day zero (P0 = K/2)");
            println!("  peak growth rate: {:.3} mm^3/day", result.peak_rate);
        }
        InflectionPoint::BehindStart => {
            println!("  started above half capacity; the growth rate only decreases");
        }
    }
    match result.capacity_target {
        CapacityTarget::ReachedOn { day } => println!(
            "  {:.0}% of capacity reached on day {:.2}",
            TARGET_FRACTION * 100.0,
            day
        ),
        CapacityTarget::AlreadyAt { fraction } => {
            println!("  already at {:.1}% of capacity", fraction * 100.0)
        }
    }

    println!(
        "\nTREATMENT SCENARIO (rate {} -> {} on day {:.0}):",
        config.treatment.rate_before, config.treatment.rate_after, result.treatment.switch_day
    );
    println!(
        "  size at treatment start: {:.2} mm^3",
        result.treatment.size_at_switch
    );
    println!(
        "  untreated day {:.0}: {:.1} mm^3",
        config.days, result.treatment.untreated_final
    );
    println!(
        "  treated day {:.0}:   {:.1} mm^3",
        config.days, result.treatment.treated_final
    );
    println!(
        "  size reduction:    {:.1}%",
        result.treatment.reduction_percent
    );

    println!("\nMODEL VALIDATION (day {:.0}):", result.validation.day);
    println!("  tumor size:     {:.4} mm^3", result.validation.size);
    println!("  analytic dP/dt: {:.6}", result.validation.analytic_rate);
    println!("  numeric dP/dt:  {:.6}", result.validation.numeric_rate);
    println!("  error:          {:.2e}", result.validation.error);

    println!(
        "\nNumeric vs analytic max divergence: {:.2e} ({} accepted / {} rejected steps)",
        result.max_divergence,
        result.integration.accepted_steps,
        result.integration.rejected_steps
    );
    println!("{RULE}");
}
