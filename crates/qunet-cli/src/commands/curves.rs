use qunet_core::{CurveFamily, Result, SweepEfficiencies, derive_curve_family};

pub fn run(depth: usize, sweep_step: f64) -> Result<()> {
    let sweep = SweepEfficiencies::new(0.0, 1.0, sweep_step)?;
    let family = derive_curve_family(&sweep, depth)?;
    print!("{}", format_table(&sweep, &family));
    Ok(())
}

/// One row per sweep efficiency: the input, then `(E_k, F_k)` per stage.
fn format_table(sweep: &SweepEfficiencies, family: &CurveFamily) -> String {
    let mut out = format!("{:>6}", "e");
    for curve in &family.curves {
        out.push_str(&format!(
            "  {:>10} {:>10}",
            format!("E{}", curve.stage),
            format!("F{}", curve.stage)
        ));
    }
    out.push('\n');

    for (i, e) in sweep.as_slice().iter().enumerate() {
        out.push_str(&format!("{e:>6.2}"));
        for curve in &family.curves {
            let p = curve.points[i];
            out.push_str(&format!("  {:>10.6} {:>10.6}", p.efficiency, p.fidelity));
        }
        out.push('\n');
    }
    out
}
