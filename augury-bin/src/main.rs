use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use gumdrop::Options;
use serde::{Deserialize, Serialize};

use augury::corpus::AugerBuilder;
use augury::model::ModelConfig;
use augury::speller::{PrefixLookup, Suggestion};
use augury::tokenizer::Tokenize;
use augury::{Auger, Predictor, PredictorConfig};

trait OutputWriter {
    fn write_predictions(&mut self, input: &str, predictions: &[String]);
    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_predictions(&mut self, input: &str, predictions: &[String]) {
        println!("Input: {}", input);
        for prediction in predictions {
            println!("{}", prediction);
        }
        println!();
    }

    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]) {
        println!("Input: {}", word);
        for suggestion in suggestions {
            println!("{}\t\t{:.4}", suggestion.value, suggestion.similarity);
        }
        println!();
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    predictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<Vec<Suggestion>>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<Request>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_predictions(&mut self, input: &str, predictions: &[String]) {
        self.results.push(Request {
            input: input.to_owned(),
            predictions: Some(predictions.to_vec()),
            suggestions: None,
        });
    }

    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]) {
        self.results.push(Request {
            input: word.to_owned(),
            predictions: None,
            suggestions: Some(suggestions.to_vec()),
        });
    }

    fn finish(&mut self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("could not serialize results: {}", e),
        }
    }
}

/// Settings read from `--config`; missing sections keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    model: ModelConfig,
    predictor: PredictorConfig,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => return Ok(Config::default()),
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn writer(use_json: bool) -> Box<dyn OutputWriter> {
    if use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    }
}

/// Free arguments, or one input per stdin line when there are none.
fn inputs_or_stdin(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inputs.is_empty() {
        return Ok(inputs);
    }

    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading stdin")?;
    Ok(buffer
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect())
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "build a predictor from corpus text")]
    Build(BuildArgs),

    #[options(help = "predict the next or current word of each input")]
    Predict(PredictArgs),

    #[options(help = "list spelling candidates for partial words")]
    Suggest(SuggestArgs),

    #[options(help = "print input split into sentences of words")]
    Tokenize(TokenizeArgs),
}

#[derive(Debug, Options)]
struct BuildArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "use the symmetric-delete index instead of the word graph")]
    symmetric: bool,

    #[options(help = "JSON file with model and predictor settings")]
    config: Option<PathBuf>,

    #[options(help = "word list, one per line, to spell from instead of the corpus vocabulary")]
    words: Option<PathBuf>,

    #[options(help = "where to write the predictor", required)]
    output: PathBuf,

    #[options(free, help = "corpus text files")]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Options)]
struct PredictArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "predictor built with `build`", required)]
    model: PathBuf,

    #[options(help = "JSON file with predictor settings")]
    config: Option<PathBuf>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "text to predict from")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct SuggestArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "predictor built with `build`", required)]
    model: PathBuf,

    #[options(help = "maximum number of results")]
    nbest: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct TokenizeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(short = "l", long = "last", help = "show only the last sentence")]
    is_last_only: bool,

    #[options(free, help = "text to be tokenized")]
    inputs: Vec<String>,
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut builder = AugerBuilder::new();
    builder
        .model_config(config.model)
        .predictor_config(config.predictor)
        .symmetric(args.symmetric);

    for input in args.inputs.iter() {
        builder.add_file(input)?;
    }

    if let Some(words) = args.words.as_ref() {
        builder.add_word_file(words)?;
    }

    let auger = builder.build()?;
    auger
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    eprintln!(
        "Wrote {} ({} words in model)",
        args.output.display(),
        auger.model().vocabulary().len()
    );
    Ok(())
}

fn open(path: &Path, config: PredictorConfig) -> anyhow::Result<Arc<Auger>> {
    Auger::open_with_config(path, config).with_context(|| format!("opening {}", path.display()))
}

fn predict(args: PredictArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let auger = open(&args.model, config.predictor)?;
    let mut writer = writer(args.use_json);

    for input in inputs_or_stdin(args.inputs)? {
        let predictions = auger.clone().predict_text(&input);
        writer.write_predictions(&input, &predictions);
    }

    writer.finish();
    Ok(())
}

fn suggest(args: SuggestArgs) -> anyhow::Result<()> {
    let config = PredictorConfig::default();
    let nbest = args.nbest.unwrap_or(config.max_results);
    let auger = open(&args.model, config)?;
    let mut writer = writer(args.use_json);

    for word in inputs_or_stdin(args.inputs)? {
        let word = word.trim().to_lowercase();
        let suggestions = auger.speller().prefix_lookup(&word, nbest);
        writer.write_suggestions(&word, &suggestions);
    }

    writer.finish();
    Ok(())
}

fn tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let inputs: String = if args.inputs.is_empty() {
        eprintln!("Reading from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
    } else {
        args.inputs.join(" ")
    };

    if args.is_last_only {
        println!("{:?}", inputs.last_sentence());
    } else {
        for (index, sentence) in inputs.sentences().enumerate() {
            println!("{:>4}: {:?}", index, sentence);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Build(args)) => build(args),
        Some(Command::Predict(args)) => predict(args),
        Some(Command::Suggest(args)) => suggest(args),
        Some(Command::Tokenize(args)) => tokenize(args),
    }
}
