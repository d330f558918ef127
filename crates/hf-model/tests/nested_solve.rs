//! Integration tests for the nested compliance/flow solve.

use hf_model::{
    CircuitParams, ComplianceProblem, FlowProblem, PipelineOptions, run_pipeline, verify,
};

fn nominal_params() -> CircuitParams {
    CircuitParams::new(60.0, 40.0, 10.0, 150.0)
}

#[test]
fn nominal_scenario_hits_target_pressure() {
    let report = run_pipeline(nominal_params(), 75.0, &PipelineOptions::default()).unwrap();

    assert!(report.solution.converged, "compliance solve must converge");
    assert!(
        report.verification.flow.converged,
        "verification solve must converge"
    );

    // Physiologically sensible compliances
    let c = &report.solution.compliances;
    assert!(c.is_physical(), "compliances must be positive: {c:?}");
    assert!(c.c_d > 0.01 && c.c_d < 0.03, "c_d out of range: {}", c.c_d);
    assert!(
        c.c_sa > 0.002 && c.c_sa < 0.03,
        "c_sa should be on the order of 1/135, got {}",
        c.c_sa
    );

    // Verification pressure within 1 unit of the target
    assert!(
        (report.verification.p_sa - 75.0).abs() < 1.0,
        "verified P_sa {} too far from 75",
        report.verification.p_sa
    );
    assert!(report.verification.within_tolerance);
}

#[test]
fn outer_residuals_vanish_at_solution() {
    let params = nominal_params();
    let problem = ComplianceProblem::new(params, 75.0);
    let solution = problem.solve(None, &PipelineOptions::default().outer_config).unwrap();
    assert!(solution.converged);

    let r = problem.residuals(&solution.compliances).unwrap();
    for i in 0..r.len() {
        assert!(
            r[i].abs() < 1e-6,
            "outer equation {} residual {} at solution",
            i + 1,
            r[i]
        );
    }
}

#[test]
fn inner_residuals_vanish_at_solution() {
    let params = nominal_params();
    let report = run_pipeline(params, 75.0, &PipelineOptions::default()).unwrap();

    let flow_problem = FlowProblem::new(params, report.solution.compliances);
    let r = flow_problem.residuals(&report.verification.flow.state);
    for i in 0..r.len() {
        assert!(
            r[i].abs() < 1e-6,
            "flow equation {} residual {} at verified state",
            i + 1,
            r[i]
        );
    }
}

#[test]
fn doubling_the_target_moves_the_compliances() {
    let opts = PipelineOptions::default();
    let base = run_pipeline(nominal_params(), 75.0, &opts).unwrap();
    let doubled = run_pipeline(nominal_params(), 150.0, &opts).unwrap();

    assert!(base.solution.converged);
    assert!(doubled.solution.converged);

    // Non-degenerate sensitivity: the compliance vector must actually change
    let a = base.solution.compliances;
    let b = doubled.solution.compliances;
    let max_shift = [
        (a.c_d - b.c_d).abs(),
        (a.c_s - b.c_s).abs(),
        (a.c_sa - b.c_sa).abs(),
        (a.c_pv - b.c_pv).abs(),
        (a.c_pa - b.c_pa).abs(),
    ]
    .into_iter()
    .fold(0.0f64, f64::max);
    assert!(max_shift > 1e-6, "compliances did not respond to the target");

    // And the new compliances must verify against the new target
    let recheck = verify(nominal_params(), &b, 150.0, 0.01).unwrap();
    assert!(recheck.within_tolerance, "re-verification failed: P_sa = {}", recheck.p_sa);
}

#[test]
fn identical_runs_are_deterministic() {
    let opts = PipelineOptions::default();
    let first = run_pipeline(nominal_params(), 75.0, &opts).unwrap();
    let second = run_pipeline(nominal_params(), 75.0, &opts).unwrap();

    let a = first.solution.compliances;
    let b = second.solution.compliances;
    assert!((a.c_d - b.c_d).abs() < 1e-12);
    assert!((a.c_s - b.c_s).abs() < 1e-12);
    assert!((a.c_sa - b.c_sa).abs() < 1e-12);
    assert!((a.c_pv - b.c_pv).abs() < 1e-12);
    assert!((a.c_pa - b.c_pa).abs() < 1e-12);
    assert!(
        (first.verification.p_sa - second.verification.p_sa).abs() < 1e-12
    );
}

#[test]
fn zero_target_is_not_presented_as_a_clean_solution() {
    // No physically valid compliance set can produce P_sa = 0 in this
    // circuit; the run must come back flagged, either unconverged or with a
    // non-physical point.
    let report = run_pipeline(nominal_params(), 0.0, &PipelineOptions::default()).unwrap();

    let clean = report.solution.converged
        && report.solution.compliances.is_physical()
        && report.verification.flow.state.is_physical();
    assert!(
        !clean,
        "pathological target accepted as success: {:?}",
        report.solution
    );
}

#[test]
fn negative_resistance_is_not_presented_as_a_clean_solution() {
    let params = CircuitParams::new(-60.0, 40.0, 10.0, 150.0);
    let report = run_pipeline(params, 75.0, &PipelineOptions::default()).unwrap();

    let clean = report.solution.converged
        && report.solution.compliances.is_physical()
        && report.verification.flow.state.is_physical();
    assert!(
        !clean,
        "negative resistance accepted as success: {:?}",
        report.solution
    );
}
