// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate` and
// `predict`, with all their configurable flags. Running the
// binary with no subcommand behaves like `predict`.

use clap::{Args, Subcommand};

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::application::paths::{
    DEFAULT_DATA_DIR, DEFAULT_MODEL_FILE, DEFAULT_TEST_FILE, DEFAULT_TRAIN_FILE,
};
use crate::application::predict_use_case::PredictConfig;
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the fare pipeline on the training CSV and save it
    Train(TrainArgs),

    /// Score a saved model on the test CSV
    Evaluate(EvaluateArgs),

    /// Predict the fare of the sample trip, a JSON trip, or a CSV of trips
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding the CSV files and the model
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_TRAIN_FILE)]
    pub train_file: String,

    /// Held-out file used after training
    #[arg(long, default_value = DEFAULT_TEST_FILE)]
    pub test_file: String,

    #[arg(long, default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Seed for the ML context; same seed and data give the same model
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Number of boosting rounds (trees)
    #[arg(long, default_value_t = 100)]
    pub iterations: usize,

    /// Shrinkage applied to each tree's contribution
    #[arg(long, default_value_t = 0.2)]
    pub learning_rate: f32,

    #[arg(long, default_value_t = 5)]
    pub max_depth: usize,

    /// Single ASCII field separator of the CSV files
    #[arg(long, default_value_t = ',')]
    pub separator: char,

    /// Stop after saving the model
    #[arg(long)]
    pub skip_evaluation: bool,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:      a.data_dir,
            train_file:    a.train_file,
            test_file:     a.test_file,
            model_file:    a.model_file,
            separator:     a.separator,
            seed:          a.seed,
            iterations:    a.iterations,
            learning_rate: a.learning_rate,
            max_depth:     a.max_depth,
            evaluate:      !a.skip_evaluation,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_TEST_FILE)]
    pub test_file: String,

    #[arg(long, default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    #[arg(long, default_value_t = ',')]
    pub separator: char,
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvaluateConfig {
            data_dir:   a.data_dir,
            test_file:  a.test_file,
            model_file: a.model_file,
            separator:  a.separator,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Trip to price, e.g. '{"vendor_id":"VTS","rate_code":"1",...}'.
    /// The built-in sample trip is used when absent.
    #[arg(long, conflicts_with = "trips_file")]
    pub trip_json: Option<String>,

    /// CSV of trips to score in one pass
    #[arg(long, requires = "output")]
    pub trips_file: Option<String>,

    /// Where the scored copy of --trips-file is written
    #[arg(long, requires = "trips_file")]
    pub output: Option<String>,

    #[arg(long, default_value_t = ',')]
    pub separator: char,
}

impl PredictArgs {
    /// Arguments used when no subcommand is given
    pub fn defaults() -> Self {
        Self {
            data_dir:   DEFAULT_DATA_DIR.to_string(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            trip_json:  None,
            trips_file: None,
            output:     None,
            separator:  ',',
        }
    }
}

impl From<&PredictArgs> for PredictConfig {
    fn from(a: &PredictArgs) -> Self {
        PredictConfig {
            data_dir:   a.data_dir.clone(),
            model_file: a.model_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_no_subcommand_is_accepted() {
        let cli = Cli::try_parse_from(["taxi-fare"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["taxi-fare", "train"]).unwrap();
        let Some(Commands::Train(args)) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.data_dir, "Data");
        assert_eq!(cfg.model_file, "Model.zip");
        assert_eq!(cfg.iterations, 100);
        assert_eq!(cfg.seed, 0);
        assert!(cfg.evaluate);
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "taxi-fare", "train", "--seed", "7", "--separator", ";", "--skip-evaluation",
        ])
        .unwrap();
        let Some(Commands::Train(args)) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.separator, ';');
        assert!(!cfg.evaluate);
    }

    #[test]
    fn test_predict_trip_json() {
        let cli = Cli::try_parse_from(["taxi-fare", "predict", "--trip-json", "{}"]).unwrap();
        let Some(Commands::Predict(args)) = cli.command else { panic!("expected predict") };
        assert_eq!(args.trip_json.as_deref(), Some("{}"));
        assert_eq!(PredictConfig::from(&args).model_file, "Model.zip");
    }

    #[test]
    fn test_predict_trips_file_needs_output() {
        assert!(Cli::try_parse_from(["taxi-fare", "predict", "--trips-file", "in.csv"]).is_err());

        let cli = Cli::try_parse_from([
            "taxi-fare", "predict", "--trips-file", "in.csv", "--output", "out.csv",
        ])
        .unwrap();
        let Some(Commands::Predict(args)) = cli.command else { panic!("expected predict") };
        assert_eq!(args.output.as_deref(), Some("out.csv"));
        assert!(Cli::try_parse_from([
            "taxi-fare", "predict", "--trips-file", "a", "--output", "b", "--trip-json", "{}",
        ])
        .is_err());
    }
}
