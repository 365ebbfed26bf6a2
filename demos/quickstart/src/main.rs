use plotly::common::Mode;
use plotly::layout::{Axis, AxisType, Layout};
use plotly::{Bar, Plot, Scatter};
use std::fs;

use pbhdm::postprocess::Trajectory;
use pbhdm::{simulation, ModelConfig, SolverStatus};

fn main() {
    let config = ModelConfig::default();

    println!("{}", "=".repeat(80));
    println!("PBH-UNIFIED DARK MATTER MODEL");
    println!("Quick Start Solver");
    println!("{}", "=".repeat(80));
    println!("\nConfiguration:");
    println!("{}", config.to_json_pretty().expect("serializable config"));

    println!("\nIntegrating Boltzmann equations...");
    let result = simulation::run(&config).expect("valid default configuration");

    match &result.status {
        SolverStatus::Completed => println!("Integration complete."),
        SolverStatus::StoppedEarly { t, reason } => {
            println!("Integration stopped early at t = {t:.4}: {reason}");
            println!(
                "Keeping the {} evaluation points reached so far.",
                result.trajectory.len()
            );
        }
    }
    println!(
        "Steps: {}, error test failures: {}, rhs evaluations: {}",
        result.statistics.number_of_steps,
        result.statistics.number_of_error_test_failures,
        result.statistics.number_of_rhs_evals
    );

    println!("\n{}", "=".repeat(80));
    println!("PBH-UNIFIED DARK MATTER MODEL: RESULTS SUMMARY");
    println!("{}", "=".repeat(80));
    match &result.composition {
        Some(composition) => {
            println!("\n{composition}");
            if composition.matches_target(0.05) {
                println!("\nHypothesis confirmed: fractions match the 62-33-5 split.");
            } else {
                println!("\nFractions don't match the target (within +/-5%).");
                println!("Either beta or M_initial is off, or the hypothesis needs refinement.");
            }
        }
        None => println!("\nNo evaluation points reached, nothing to summarise."),
    }

    write_plots(&config, &result.trajectory, "pbhdm-results.html");

    println!("\n{}", "=".repeat(80));
    println!("Calculation complete!");
    println!("{}", "=".repeat(80));
}

fn write_plots(config: &ModelConfig, traj: &Trajectory, filename: &str) {
    if traj.is_empty() {
        println!("\nNo trajectory to plot.");
        return;
    }

    let mut html = String::from("<html><head><meta charset=\"utf-8\"></head><body>\n");
    html.push_str(&composition_plot(traj).to_inline_html(Some("composition")));
    html.push_str(&pbh_mass_plot(config, traj).to_inline_html(Some("pbh-mass")));
    html.push_str(&hawking_temperature_plot(config, traj).to_inline_html(Some("hawking-temp")));
    html.push_str(&final_composition_plot(traj).to_inline_html(Some("final-composition")));
    html.push_str("</body></html>\n");

    fs::write(filename, html).expect("Unable to write file");
    println!("\nPlots saved to: {filename}");
}

fn composition_plot(traj: &Trajectory) -> Plot {
    let percent = |f: &[f64]| f.iter().map(|x| 100.0 * x).collect::<Vec<_>>();
    let wimp = Scatter::new(traj.a.clone(), percent(&traj.f_wimp))
        .mode(Mode::Lines)
        .name("WIMPs");
    let axion = Scatter::new(traj.a.clone(), percent(&traj.f_axion))
        .mode(Mode::Lines)
        .name("Axions");
    let remnant = Scatter::new(traj.a.clone(), percent(&traj.f_pbh_rem))
        .mode(Mode::Lines)
        .name("PBH Remnants");
    let target_wimp = Scatter::new(traj.a.clone(), vec![62.0; traj.len()])
        .mode(Mode::Lines)
        .name("Target WIMPs (62%)");
    let target_axion = Scatter::new(traj.a.clone(), vec![33.0; traj.len()])
        .mode(Mode::Lines)
        .name("Target Axions (33%)");

    let mut plot = Plot::new();
    plot.add_trace(wimp);
    plot.add_trace(axion);
    plot.add_trace(remnant);
    plot.add_trace(target_wimp);
    plot.add_trace(target_axion);
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title("scale factor a").type_(AxisType::Log))
            .y_axis(Axis::new().title("dark matter fraction (%)")),
    );
    plot
}

fn pbh_mass_plot(config: &ModelConfig, traj: &Trajectory) -> Plot {
    let mass = Scatter::new(traj.a.clone(), traj.m_pbh.clone())
        .mode(Mode::Lines)
        .name("M_pbh");
    let m0 = config.pbh.m_initial_grams;
    let threshold = Scatter::new(traj.a.clone(), vec![0.5 * m0; traj.len()])
        .mode(Mode::Lines)
        .name("memory burden threshold (M0/2)");

    let mut plot = Plot::new();
    plot.add_trace(mass);
    plot.add_trace(threshold);
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title("scale factor a").type_(AxisType::Log))
            .y_axis(Axis::new().title("PBH mass (g)").type_(AxisType::Log)),
    );
    plot
}

fn hawking_temperature_plot(config: &ModelConfig, traj: &Trajectory) -> Plot {
    let temp = Scatter::new(traj.a.clone(), traj.t_hawking.clone())
        .mode(Mode::Lines)
        .name("T_hawking");
    let wimp_mass = Scatter::new(traj.a.clone(), vec![config.dm.wimp.mass_gev; traj.len()])
        .mode(Mode::Lines)
        .name("WIMP mass");
    let axion_mass = Scatter::new(traj.a.clone(), vec![config.dm.axion.mass_gev; traj.len()])
        .mode(Mode::Lines)
        .name("Axion mass");

    let mut plot = Plot::new();
    plot.add_trace(temp);
    plot.add_trace(wimp_mass);
    plot.add_trace(axion_mass);
    plot.set_layout(
        Layout::new()
            .x_axis(Axis::new().title("scale factor a").type_(AxisType::Log))
            .y_axis(Axis::new().title("temperature (GeV)").type_(AxisType::Log)),
    );
    plot
}

fn final_composition_plot(traj: &Trajectory) -> Plot {
    let last = traj.len() - 1;
    let labels = vec!["WIMPs", "Axions", "PBH Remnants"];
    let values = vec![
        100.0 * traj.f_wimp[last],
        100.0 * traj.f_axion[last],
        100.0 * traj.f_pbh_rem[last],
    ];
    let bars = Bar::new(labels, values).name("final composition");

    let mut plot = Plot::new();
    plot.add_trace(bars);
    plot.set_layout(Layout::new().y_axis(Axis::new().title("dark matter fraction (%)")));
    plot
}
