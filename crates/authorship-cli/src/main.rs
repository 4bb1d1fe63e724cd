use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use authorship_classifiers::preprocessing::DatasetSplit;
use authorship_cli::plot::run_plot;
use authorship_cli::preprocess::run_preprocess;
use authorship_cli::train::input::TrainConfig;
use authorship_cli::train::trainer;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("AUTHORSHIP_LOG", "error,authorship=info"))
        .init();

    let matches = Command::new("authorship")
        .version(clap::crate_version!())
        .about("Tweet authorship classifiers: preprocess, train, compare")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("preprocess")
                .about("Clean a raw tweet dump and write the processed table")
                .arg(
                    Arg::new("input")
                        .help("Headerless tab-separated tweet file")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test")
                        .long("test")
                        .help("Input uses the test layout (handle, text, timestamp)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output_file")
                        .help("Where to write the processed TSV")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("train")
                .about("Train, score and compare the configured classifiers")
                .arg(
                    Arg::new("config")
                        .help("Path to training configuration file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train_data")
                        .short('d')
                        .long("train_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to training tweets. Overrides the training data file \
                             specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("eval_data")
                        .short('e')
                        .long("eval_data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to labelled evaluation tweets. Overrides the evaluation \
                             data file specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Directory for best_model, scores.json and the charts")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("classifiers")
                        .short('c')
                        .long("classifiers")
                        .help("Comma-separated classifiers to train with default settings")
                        .value_delimiter(',')
                        .value_parser([
                            "lr",
                            "svm_linear",
                            "svm_rbf",
                            "svm_poly",
                            "dnn",
                            "lstm",
                            "lstm_text",
                        ]),
                ),
        )
        .subcommand(
            Command::new("plot")
                .about("Re-render comparison charts from a scores file")
                .arg(
                    Arg::new("scores")
                        .help("scores.json written by `train`")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("preprocess", sub_m)) => handle_preprocess(sub_m),
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("plot", sub_m)) => handle_plot(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_preprocess(matches: &ArgMatches) -> Result<()> {
    let input: &String = matches.get_one("input").unwrap();
    let output: &PathBuf = matches.get_one("output_file").unwrap();
    let split = if matches.get_flag("test") {
        DatasetSplit::Test
    } else {
        DatasetSplit::Train
    };
    log::info!("[authorship::preprocess] {} ({:?} layout)", input, split);
    run_preprocess(input, split, output)
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config_path: &PathBuf = matches.get_one("config").unwrap();
    log::info!("[authorship::train] Training from config: {:?}", config_path);

    let config = TrainConfig::from_arguments(config_path, matches)?;
    match trainer::run_training(&config) {
        Ok(results) => {
            for result in &results {
                println!(
                    "{}\taccuracy={:.3}\tprecision={:.3}\trecall={:.3}\tauc={:.3}\tf1={:.3}",
                    result.name,
                    result.scores.accuracy,
                    result.scores.precision,
                    result.scores.recall,
                    result.scores.auc,
                    result.scores.f1
                );
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_plot(matches: &ArgMatches) -> Result<()> {
    let scores: &PathBuf = matches.get_one("scores").unwrap();
    let output_dir: &PathBuf = matches.get_one("output_dir").unwrap();
    log::info!("[authorship::plot] Rendering charts from {:?}", scores);
    run_plot(scores, output_dir)
}
