use anyhow::Context;
use structopt::*;

use credible::fit::LinearFit;
use credible::predict;
use credible::sample;

/// Contrast frequentist confidence bands with Bayesian credible intervals
/// for simple linear regression from the command line.
#[derive(StructOpt, Debug)]
pub enum Credible {

    /// Reduce a posterior draw table to per-point credible intervals
    Summary {

        /// CSV of posterior draws, with columns intercept,slope,noise_scale
        /// (alpha,beta,sigma also accepted)
        draws : String,

        /// Comma-separated query points
        #[structopt(short, default_value = "0,1,2,3,4,5")]
        grid : String,

        /// Probability mass of the two-sided interval
        #[structopt(short, default_value = "0.95")]
        coverage : f64,

        /// Keep every n-th draw before summarizing
        #[structopt(short, long)]
        thin : Option<usize>,

        /// Output file (stdout when absent)
        #[structopt(short)]
        output : Option<String>,

        /// Emit JSON instead of CSV
        #[structopt(long)]
        json : bool
    },

    /// Fit ordinary least squares to a dataset and report the confidence
    /// band for the regression mean over the observed inputs
    Fit {

        /// CSV dataset with x and y columns
        data : String,

        /// Probability mass of the two-sided interval
        #[structopt(short, default_value = "0.95")]
        coverage : f64,

        /// Output file (stdout when absent)
        #[structopt(short)]
        output : Option<String>,

        /// Emit JSON instead of CSV
        #[structopt(long)]
        json : bool
    }

}

fn parse_grid(grid : &str) -> anyhow::Result<Vec<f64>> {
    grid.split(',')
        .map(|tok| tok.trim().parse::<f64>()
            .with_context(|| format!("Invalid grid entry: {}", tok) ) )
        .collect()
}

fn print_or_save(content : String, opt_path : &Option<String>) -> anyhow::Result<()> {
    match opt_path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Could not write {}", path) ),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    match Credible::from_args() {
        Credible::Summary { draws, grid, coverage, thin, output, json } => {
            let mut draw_set = sample::load_draws(&draws)
                .with_context(|| format!("Could not read draw table {}", draws) )?;
            if let Some(step) = thin {
                anyhow::ensure!(step > 0, "Thinning step must be positive");
                draw_set = draw_set.thin(step);
            }
            let points = parse_grid(&grid)?;
            let table = predict::summarize(&draw_set, &points[..], coverage)?;
            let content = if json {
                serde_json::to_string_pretty(&table)? + "\n"
            } else {
                let mut buf = Vec::new();
                table.write_csv(&mut buf)?;
                String::from_utf8(buf)?
            };
            print_or_save(content, &output)
        },
        Credible::Fit { data, coverage, output, json } => {
            let (x, y) = sample::load_xy(&data)
                .with_context(|| format!("Could not read dataset {}", data) )?;
            let fit = LinearFit::simple(&x[..], &y[..])?;
            let band = fit.confidence_band(&x[..], coverage)?;
            let content = if json {
                serde_json::to_string_pretty(&band)? + "\n"
            } else {
                let mut buf = Vec::new();
                band.write_csv(&mut buf)?;
                String::from_utf8(buf)?
            };
            print_or_save(content, &output)
        }
    }
}
