//! Developer utility to classify rows with a saved model.

use std::path::PathBuf;

use logit_harness::config;
use logit_harness::dataset::{load_prediction_csv, parse_delimiter};
use logit_harness::logging;
use logit_harness::ml::logreg::LogisticModel;
use logit_harness::ml::persist::load_model;

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
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| settings.data.delimiter_byte());
    let saved = load_model(&options.model).map_err(|err| err.to_string())?;
    let model = LogisticModel::from_weights(saved.weights.clone()).map_err(|err| err.to_string())?;
    println!(
        "model: {} features, bias {:.4}, {} iterations, boundary {:.2}",
        model.feature_dim(),
        model.bias(),
        saved.iterations,
        saved.decision_boundary
    );
    let predictor = saved.into_predictor().map_err(|err| err.to_string())?;
    let rows = load_prediction_csv(&options.input, delimiter, !options.unlabeled)
        .map_err(|err| err.to_string())?;
    let predictions = predictor.predict(&rows).map_err(|err| err.to_string())?;
    for value in predictions {
        println!("{value}");
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct CliOptions {
    model: PathBuf,
    input: PathBuf,
    delimiter: Option<u8>,
    unlabeled: bool,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut model: Option<PathBuf> = None;
    let mut input: Option<PathBuf> = None;
    let mut delimiter: Option<u8> = None;
    let mut unlabeled = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                model = Some(PathBuf::from(value));
            }
            "--input" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--input requires a value".to_string())?;
                input = Some(PathBuf::from(value));
            }
            "--delimiter" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--delimiter requires a value".to_string())?;
                delimiter = Some(
                    parse_delimiter(value)
                        .ok_or_else(|| format!("Invalid --delimiter value: {value}"))?,
                );
            }
            "--unlabeled" => {
                unlabeled = true;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    Ok(CliOptions {
        model: model.ok_or_else(help_text)?,
        input: input.ok_or_else(help_text)?,
        delimiter,
        unlabeled,
    })
}

fn help_text() -> String {
    [
        "logit-predict",
        "",
        "Applies a saved model to a delimited file and prints one 0/1 per row.",
        "",
        "Usage:",
        "  logit-predict --model <json> --input <csv> [--unlabeled] [--delimiter <char>]",
        "",
        "Options:",
        "  --model <json>      Model written by logit-harness (required).",
        "  --input <csv>       Rows to classify (required).",
        "  --unlabeled         The input has no label column to drop.",
        "  --delimiter <char>  Column separator (default: [data] delimiter, else ',').",
    ]
    .join("\n")
}
