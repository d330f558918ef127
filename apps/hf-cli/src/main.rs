use clap::{Args, Parser, Subcommand};
use hf_model::{
    CircuitParams, Compliances, ModelError, PipelineOptions, PipelineReport, run_pipeline, verify,
};
use hf_solver::NewtonConfig;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "HemoFlow CLI - Cardiovascular compliance solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParamArgs {
    /// Upper-body vascular resistance
    #[arg(long, default_value_t = 60.0)]
    uvr: f64,
    /// Lower-body vascular resistance
    #[arg(long, default_value_t = 40.0)]
    lvr: f64,
    /// Pulmonary vascular resistance
    #[arg(long, default_value_t = 10.0)]
    pvr: f64,
    /// Heart rate
    #[arg(long, default_value_t = 150.0)]
    hr: f64,
    /// Target systemic arterial pressure
    #[arg(long, default_value_t = 75.0)]
    target_psa: f64,
}

impl ParamArgs {
    fn circuit(&self) -> CircuitParams {
        CircuitParams::new(self.uvr, self.lvr, self.pvr, self.hr)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for the compliances that hit the target arterial pressure,
    /// then verify by re-solving the forward flow equations
    Solve {
        #[command(flatten)]
        params: ParamArgs,
        /// Maximum Newton iterations for the outer compliance solve
        #[arg(long, default_value_t = 50)]
        max_iterations: usize,
        /// Absolute residual tolerance for the outer compliance solve
        #[arg(long, default_value_t = 1e-9)]
        abs_tol: f64,
        /// Emit the full report as JSON instead of a human summary
        #[arg(long)]
        json: bool,
    },
    /// Re-run the forward flow solve for explicitly given compliances
    Verify {
        #[command(flatten)]
        params: ParamArgs,
        #[arg(long)]
        c_d: f64,
        #[arg(long)]
        c_s: f64,
        #[arg(long)]
        c_sa: f64,
        #[arg(long)]
        c_pv: f64,
        #[arg(long)]
        c_pa: f64,
        /// Emit the report as JSON instead of a human summary
        #[arg(long)]
        json: bool,
    },
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

type AppResult<T> = Result<T, AppError>;

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            params,
            max_iterations,
            abs_tol,
            json,
        } => cmd_solve(&params, max_iterations, abs_tol, json),
        Commands::Verify {
            params,
            c_d,
            c_s,
            c_sa,
            c_pv,
            c_pa,
            json,
        } => cmd_verify(
            &params,
            Compliances {
                c_d,
                c_s,
                c_sa,
                c_pv,
                c_pa,
            },
            json,
        ),
    }
}

fn cmd_solve(params: &ParamArgs, max_iterations: usize, abs_tol: f64, json: bool) -> AppResult<()> {
    let options = PipelineOptions {
        outer_config: NewtonConfig {
            max_iterations,
            abs_tol,
            ..NewtonConfig::default()
        },
        ..PipelineOptions::default()
    };

    let report = run_pipeline(params.circuit(), params.target_psa, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_solve_summary(&report);
    Ok(())
}

fn print_solve_summary(report: &PipelineReport) {
    let sol = &report.solution;

    println!(
        "Solving compliances for target P_sa = {:.3}",
        report.p_sa_target
    );
    if sol.converged {
        println!(
            "✓ Converged in {} outer iterations (residual {:.3e})",
            sol.iterations, sol.residual_norm
        );
    } else {
        println!(
            "⚠ Did not converge after {} outer iterations (residual {:.3e}); values below are best-effort",
            sol.iterations, sol.residual_norm
        );
    }
    if sol.inner_failures > 0 {
        println!(
            "⚠ {} inner flow solves failed to converge during the search",
            sol.inner_failures
        );
    }
    if !sol.compliances.is_physical() {
        println!("⚠ Solution contains non-positive compliances; physiologically invalid");
    }

    let c = &sol.compliances;
    println!("\nCompliance values:");
    println!("  C_d:  {:.6e}", c.c_d);
    println!("  C_s:  {:.6e}", c.c_s);
    println!("  C_sa: {:.6e}", c.c_sa);
    println!("  C_pv: {:.6e}", c.c_pv);
    println!("  C_pa: {:.6e}", c.c_pa);

    let v = &report.verification;
    println!("\nVerification:");
    if !v.flow.converged {
        println!(
            "⚠ Forward solve did not converge (residual {:.3e})",
            v.flow.residual_norm
        );
    }
    println!(
        "  P_sa = {:.4} (target {:.4}, error {:+.3e})",
        v.p_sa, report.p_sa_target, v.p_sa_error
    );
    if v.within_tolerance {
        println!("✓ Target reproduced within tolerance");
    } else {
        println!("⚠ Target NOT reproduced within tolerance");
    }
}

fn cmd_verify(params: &ParamArgs, compliances: Compliances, json: bool) -> AppResult<()> {
    let report = verify(params.circuit(), &compliances, params.target_psa, 0.01)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Forward flow solve at given compliances (target P_sa = {:.3})",
        params.target_psa
    );
    if report.flow.converged {
        println!(
            "✓ Converged in {} iterations (residual {:.3e})",
            report.flow.iterations, report.flow.residual_norm
        );
    } else {
        println!(
            "⚠ Did not converge (residual {:.3e}); state below is best-effort",
            report.flow.residual_norm
        );
    }

    let s = &report.flow.state;
    println!("\nFlow state:");
    println!("  Q_v:  {:.4}", s.q_v);
    println!("  Q_u:  {:.4}", s.q_u);
    println!("  Q_l:  {:.4}", s.q_l);
    println!("  Q_p:  {:.4}", s.q_p);
    println!("  P_sa: {:.4}", s.p_sa);
    println!("  P_pa: {:.4}", s.p_pa);
    println!("  P_pv: {:.4}", s.p_pv);

    println!(
        "\n  P_sa error vs target: {:+.3e} ({})",
        report.p_sa_error,
        if report.within_tolerance {
            "within tolerance"
        } else {
            "outside tolerance"
        }
    );
    Ok(())
}
