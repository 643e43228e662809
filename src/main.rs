use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use digitseq::config::{
    AreaBand, BinarizeConfig, Connectivity, ExchangeConfig, InputContract, InputRange,
    PipelineConfig, Polarity, RegionConfig, TensorLayout,
};
use digitseq::{
    DigitClassifier, DigitPipeline, PipelineError, PredictionReport, ResultReader, ResultWriter,
};

#[derive(Parser)]
#[command(name = "digitseq")]
#[command(about = "Read hand-drawn multi-digit numbers from images")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize the number in an image and write the result artifact
    Recognize(RecognizeArgs),
    /// Wait for a result artifact and print what it says
    Await(AwaitArgs),
}

#[derive(Args)]
struct RecognizeArgs {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Result artifact to (re)write
    #[arg(short, long, value_name = "FILE", default_value = "resultado_predicao.txt")]
    output: PathBuf,

    /// Digit classifier model (.rten)
    #[arg(short, long, value_name = "MODEL", default_value = "modelo_digitos_mnist.rten")]
    model: PathBuf,

    /// Smallest component area, in pixels, kept as a digit
    #[arg(long, default_value_t = 10)]
    min_area: u32,

    /// Largest component area, in pixels, kept as a digit
    #[arg(long, default_value_t = 20_000)]
    max_area: u32,

    /// Which tone counts as ink
    #[arg(long, value_enum, default_value_t = Polarity::Auto)]
    polarity: Polarity,

    /// Fixed binarization threshold instead of Otsu
    #[arg(long)]
    threshold: Option<u8>,

    /// Pixel adjacency used to group ink into components
    #[arg(long, value_enum, default_value_t = Connectivity::Eight)]
    connectivity: Connectivity,

    /// Numeric range the model expects
    #[arg(long, value_enum, default_value_t = InputRange::UnitFloat)]
    input_range: InputRange,

    /// Tensor layout the model expects
    #[arg(long, value_enum, default_value_t = TensorLayout::Nhwc)]
    layout: TensorLayout,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

#[derive(Args)]
struct AwaitArgs {
    /// Result artifact to poll
    #[arg(value_name = "FILE", default_value = "resultado_predicao.txt")]
    artifact: PathBuf,

    /// Number of reads before giving up
    #[arg(long, default_value_t = 5)]
    attempts: u32,

    /// Delay between reads, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Print the front-end JSON payload instead of the raw line
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Recognize(recognize) => run_recognize(recognize),
        Command::Await(wait) => run_await(wait),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "digitseq=debug" } else { "digitseq=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_recognize(args: RecognizeArgs) -> anyhow::Result<()> {
    let writer = ResultWriter::new(&args.output);
    let outcome = digitseq::produce(&writer, &args.image_path, || {
        let config = PipelineConfig {
            binarize: BinarizeConfig {
                polarity: args.polarity,
                threshold: args.threshold,
            },
            regions: RegionConfig {
                connectivity: args.connectivity,
            },
            area: AreaBand {
                min_area: args.min_area,
                max_area: args.max_area,
            },
            contract: InputContract {
                range: args.input_range,
                layout: args.layout,
            },
            ..Default::default()
        };

        let mut pipeline = DigitPipeline::new(config)?;
        if let Some(debug_dir) = &args.debug_out {
            pipeline = pipeline.with_debug(debug_dir.clone()).map_err(|err| {
                PipelineError::InvalidConfig(format!("debug output: {err}"))
            })?;
        }
        Ok((pipeline, load_classifier(&args.model)?))
    })?;

    println!("{outcome}");
    Ok(())
}

#[cfg(feature = "rten")]
fn load_classifier(path: &Path) -> Result<Box<dyn DigitClassifier>, PipelineError> {
    Ok(Box::new(digitseq::RtenClassifier::load(path)?))
}

#[cfg(not(feature = "rten"))]
fn load_classifier(path: &Path) -> Result<Box<dyn DigitClassifier>, PipelineError> {
    Err(PipelineError::ClassifierUnavailable(format!(
        "built without the rten feature, cannot load {}",
        path.display()
    )))
}

fn run_await(args: AwaitArgs) -> anyhow::Result<()> {
    let config = ExchangeConfig {
        max_attempts: args.attempts,
        retry_delay: Duration::from_millis(args.delay_ms),
    };
    config.validate()?;
    let result = ResultReader::new(&args.artifact, config).poll();

    if args.json {
        println!("{}", serde_json::to_string(&PredictionReport::from_poll(&result))?);
    } else if let Ok(outcome) = &result {
        println!("{outcome}");
    }

    result?;
    Ok(())
}
