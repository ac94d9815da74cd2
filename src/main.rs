//! Command-line harness: select a logistic regression model and optionally
//! classify new rows with it.

use std::path::PathBuf;

use logit_harness::config::{self, HarnessSettings};
use logit_harness::dataset::{load_prediction_csv, load_train_test_csv, parse_delimiter};
use logit_harness::logging;
use logit_harness::ml::persist::{SavedModel, save_model};
use logit_harness::ml::predict::predict;
use logit_harness::ml::selection::{
    BestModelRecord, GridPointReport, Hyperparameters, ModelSelector, SelectionMode,
};

const DEFAULT_MODEL_OUT: &str = "model.json";

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let mut settings = config::load_or_default().map_err(|err| err.to_string())?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| settings.data.delimiter_byte());
    let mode = selection_mode(&options, &settings)?;

    let data = load_train_test_csv(&options.train, &options.test, delimiter)
        .map_err(|err| err.to_string())?;
    let selector = ModelSelector::default()
        .with_learning_rate(settings.selection.learning_rate)
        .with_regularization(settings.selection.regularization);
    let record = match &mode {
        SelectionMode::Grid(grid) => selector
            .select_best_with_progress(data.train(), data.test(), grid, log_progress)
            .map_err(|err| err.to_string())?,
        SelectionMode::Fixed(point) => selector
            .train_fixed(data.train(), data.test(), *point)
            .map_err(|err| err.to_string())?,
    };
    report(&record);

    let model_out = options
        .model_out
        .clone()
        .or_else(|| settings.model.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_OUT));
    save_model(&model_out, &SavedModel::from(&record)).map_err(|err| err.to_string())?;
    println!("model written to {}", model_out.display());

    if options.remember {
        settings.selection.remember(record.hyperparameters);
        config::save(&settings).map_err(|err| err.to_string())?;
        println!(
            "remembered {} iterations / boundary {:.2} in {}",
            record.hyperparameters.iterations,
            record.hyperparameters.decision_boundary,
            config::config_path()
                .map(|path| path.display().to_string())
                .map_err(|err| err.to_string())?
        );
    }

    if let Some(path) = &options.predict {
        let rows = load_prediction_csv(path, delimiter, !options.unlabeled)
            .map_err(|err| err.to_string())?;
        let predictions = predict(&record, &rows).map_err(|err| err.to_string())?;
        println!("predictions: {predictions:?}");
    }
    Ok(())
}

/// Command-line points win over a remembered pair in the settings file.
fn selection_mode(options: &CliOptions, settings: &HarnessSettings) -> Result<SelectionMode, String> {
    match (options.iterations, options.decision_boundary) {
        (Some(iterations), Some(decision_boundary)) => {
            let point = Hyperparameters::new(iterations, decision_boundary)
                .map_err(|err| err.to_string())?;
            Ok(SelectionMode::Fixed(point))
        }
        (None, None) => Ok(settings.selection_mode()),
        _ => Err("--iterations and --decision-boundary must be given together".to_string()),
    }
}

fn log_progress(point: &GridPointReport) {
    if point.improved {
        tracing::info!(
            "[{}/{}] new best accuracy {:.4} at {} iterations, boundary {:.2}",
            point.index + 1,
            point.total,
            point.accuracy,
            point.hyperparameters.iterations,
            point.hyperparameters.decision_boundary
        );
    }
}

fn report(record: &BestModelRecord) {
    println!("iterations: {}", record.hyperparameters.iterations);
    println!(
        "decision boundary: {:.2}",
        record.hyperparameters.decision_boundary
    );
    println!("test accuracy: {:.4}", record.accuracy);
    println!("{}", record.confusion);
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    train: PathBuf,
    test: PathBuf,
    predict: Option<PathBuf>,
    model_out: Option<PathBuf>,
    iterations: Option<usize>,
    decision_boundary: Option<f64>,
    delimiter: Option<u8>,
    unlabeled: bool,
    remember: bool,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut train: Option<PathBuf> = None;
    let mut test: Option<PathBuf> = None;
    let mut options = CliOptions::default();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--train" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--train requires a value".to_string())?;
                train = Some(PathBuf::from(value));
            }
            "--test" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--test requires a value".to_string())?;
                test = Some(PathBuf::from(value));
            }
            "--predict" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--predict requires a value".to_string())?;
                options.predict = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.model_out = Some(PathBuf::from(value));
            }
            "--iterations" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--iterations requires a value".to_string())?;
                options.iterations = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --iterations value: {value}"))?,
                );
            }
            "--decision-boundary" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--decision-boundary requires a value".to_string())?;
                options.decision_boundary = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --decision-boundary value: {value}"))?,
                );
            }
            "--delimiter" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--delimiter requires a value".to_string())?;
                options.delimiter = Some(
                    parse_delimiter(value)
                        .ok_or_else(|| format!("Invalid --delimiter value: {value}"))?,
                );
            }
            "--unlabeled" => {
                options.unlabeled = true;
            }
            "--remember" => {
                options.remember = true;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    options.train = train.ok_or_else(help_text)?;
    options.test = test.ok_or_else(help_text)?;
    Ok(options)
}

fn help_text() -> String {
    [
        "logit-harness",
        "",
        "Selects logistic regression hyperparameters on a train/test split and",
        "optionally classifies new rows with the winning model.",
        "",
        "Usage:",
        "  logit-harness --train <csv> --test <csv> [options]",
        "",
        "Options:",
        "  --train <csv>              Training rows, label in the last column (required).",
        "  --test <csv>               Test rows, label in the last column (required).",
        "  --predict <csv>            Rows to classify with the selected model.",
        "  --unlabeled                The --predict file has no label column.",
        "  --out <file>               Output model path (default: model.json).",
        "  --iterations <n>           Fixed iteration count (needs --decision-boundary).",
        "  --decision-boundary <f64>  Fixed boundary in (0, 1) (needs --iterations).",
        "  --delimiter <char>         Column separator (default: ',').",
        "  --remember                 Store the chosen pair in config.toml.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_required_and_optional_flags() {
        let options = parse_args(args(&[
            "--train",
            "train.csv",
            "--test",
            "test.csv",
            "--iterations",
            "600",
            "--decision-boundary",
            "0.4",
            "--delimiter",
            ";",
            "--unlabeled",
        ]))
        .unwrap();
        assert_eq!(options.train, PathBuf::from("train.csv"));
        assert_eq!(options.iterations, Some(600));
        assert_eq!(options.decision_boundary, Some(0.4));
        assert_eq!(options.delimiter, Some(b';'));
        assert!(options.unlabeled);
        assert!(!options.remember);
    }

    #[test]
    fn missing_inputs_show_help() {
        let err = parse_args(args(&["--train", "train.csv"])).unwrap_err();
        assert!(err.starts_with("logit-harness"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_args(args(&["--iterations", "many"])).is_err());
        assert!(parse_args(args(&["--delimiter", "ab"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn half_override_is_an_error() {
        let options = CliOptions {
            iterations: Some(100),
            ..CliOptions::default()
        };
        assert!(selection_mode(&options, &HarnessSettings::default()).is_err());
    }

    #[test]
    fn cli_point_beats_settings() {
        let mut settings = HarnessSettings::default();
        settings
            .selection
            .remember(Hyperparameters::new(1100, 0.3).unwrap());
        let options = CliOptions {
            iterations: Some(100),
            decision_boundary: Some(0.5),
            ..CliOptions::default()
        };
        assert_eq!(
            selection_mode(&options, &settings).unwrap(),
            SelectionMode::Fixed(Hyperparameters::new(100, 0.5).unwrap())
        );
        assert_eq!(
            selection_mode(&CliOptions::default(), &settings).unwrap(),
            SelectionMode::Fixed(Hyperparameters::new(1100, 0.3).unwrap())
        );
    }
}
