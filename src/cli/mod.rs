// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands off to Layer 2, and is the only layer that
// prints results.
//
//   taxi-fare            - load Data/Model.zip, price the sample trip
//   taxi-fare train      - fit, save, evaluate, price the sample trip
//   taxi-fare evaluate   - score a saved model on the test file
//   taxi-fare predict    - price the sample trip, a JSON trip, or a CSV of trips

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, TrainArgs};

use crate::application::resolve_from_cwd;
use crate::domain::taxi_trip::{FarePrediction, SAMPLE_ACTUAL_FARE};
use crate::ml::evaluator::RegressionMetrics;

const RULE: &str = "**********************************************************************";

#[derive(Parser, Debug)]
#[command(
    name = "taxi-fare",
    version,
    about = "Train a gradient-boosted taxi fare regressor and predict fares."
)]
pub struct Cli {
    /// Omit to load the saved model and price the sample trip
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Route to the matching use case. Never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Train(args))    => run_train(args),
            Some(Commands::Evaluate(args)) => run_evaluate(args),
            Some(Commands::Predict(args))  => run_predict(args),
            None                           => run_predict(PredictArgs::defaults()),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training from data dir: {}", args.data_dir);
    let outcome = TrainUseCase::new(args.into()).execute()?;
    println!(
        "Model with {} stages trained on {} trips and saved.",
        outcome.model.stages().len(),
        outcome.training_rows
    );

    if let Some(evaluation) = outcome.evaluation {
        print_metrics(&evaluation.metrics);
    }
    if let Some(sample) = outcome.sample {
        print_sample(&sample);
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let outcome = EvaluateUseCase::new(args.into()).execute()?;
    print_metrics(&outcome.metrics);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new((&args).into())?;
    if let (Some(input), Some(output)) = (&args.trips_file, &args.output) {
        let input  = resolve_from_cwd(input)?;
        let output = resolve_from_cwd(output)?;
        let rows   = use_case.predict_file(&input, &output, args.separator)?;
        println!("Scored {rows} trips into '{}'.", output.display());
        return Ok(());
    }

    match args.trip_json.as_deref() {
        Some(json) => {
            let prediction = use_case.predict_json(json)?;
            println!("Predicted fare: {}", trimmed(prediction.fare_amount as f64, 4, true));
        }
        None => print_sample(&use_case.predict_sample()?),
    }
    Ok(())
}

fn print_metrics(metrics: &RegressionMetrics) {
    println!();
    print!("{}", metrics_report(metrics));
}

fn print_sample(prediction: &FarePrediction) {
    println!("{RULE}");
    println!(
        "Predicted fare: {}, actual fare: {}",
        trimmed(prediction.fare_amount as f64, 4, true),
        SAMPLE_ACTUAL_FARE
    );
    println!("{RULE}");
}

/// The metrics box. R² keeps its leading zero, RMSE does not.
fn metrics_report(metrics: &RegressionMetrics) -> String {
    let rule = &RULE[..49];
    format!(
        "{rule}\n\
         *       Model quality metrics evaluation\n\
         *------------------------------------------------\n\
         *       RSquared Score:      {}\n\
         *       Root Mean Squared Error:      {}\n",
        trimmed(metrics.r_squared, 2, true),
        trimmed(metrics.root_mean_squared_error, 2, false),
    )
}

/// Round to `places` decimals and drop trailing zeros, so 0.90 prints
/// as "0.9". Without `leading_zero` a zero integer part is omitted
/// too, so 0.5 prints as ".5".
fn trimmed(value: f64, places: usize, leading_zero: bool) -> String {
    let mut text = format!("{value:.places$}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if !leading_zero {
        if let Some(rest) = text.strip_prefix('0') {
            text = rest.to_string();
        } else if let Some(rest) = text.strip_prefix("-0") {
            text = format!("-{rest}");
        }
        if text == "-" {
            text.clear();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_drops_trailing_zeros() {
        assert_eq!(trimmed(0.9, 2, true), "0.9");
        assert_eq!(trimmed(0.904, 2, true), "0.9");
        assert_eq!(trimmed(0.916, 2, true), "0.92");
        assert_eq!(trimmed(1.0, 2, true), "1");
        assert_eq!(trimmed(15.62504, 4, true), "15.625");
    }

    #[test]
    fn test_trimmed_without_leading_zero() {
        assert_eq!(trimmed(3.126, 2, false), "3.13");
        assert_eq!(trimmed(0.5, 2, false), ".5");
        assert_eq!(trimmed(10.0, 2, false), "10");
        assert_eq!(trimmed(0.0, 2, false), "");
    }

    #[test]
    fn test_metrics_report_layout() {
        let metrics = RegressionMetrics {
            r_squared:               0.9,
            root_mean_squared_error: 3.1,
            mean_absolute_error:     1.0,
            mean_squared_error:      9.61,
        };
        let report = metrics_report(&metrics);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "*".repeat(49));
        assert_eq!(lines[1], "*       Model quality metrics evaluation");
        assert_eq!(lines[3], "*       RSquared Score:      0.9");
        assert_eq!(lines[4], "*       Root Mean Squared Error:      3.1");
    }
}
