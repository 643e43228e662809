use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageReader};
use tracing::{debug, info, warn};

use crate::classifier::{DigitClassifier, classify_sequence};
use crate::config::PipelineConfig;
use crate::detection::{Segmentation, Segmenter};
use crate::error::{ExchangeError, PipelineError};
use crate::exchange::ResultWriter;
use crate::models::PipelineOutcome;

/// Where intermediate images go when debugging a run
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    fn save(&self, step_dir_name: &str, index: usize, image: &GrayImage) -> anyhow::Result<()> {
        let step_dir = self.output_dir.join(step_dir_name);
        fs::create_dir_all(&step_dir)?;
        let filename = format!("{:02}.png", index + 1);
        image
            .save(step_dir.join(&filename))
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        debug!("Debug: saved {}/{}", step_dir_name, filename);
        Ok(())
    }
}

/// Image in, digit string out: segmentation, classification and result exchange.
#[derive(Debug, Clone)]
pub struct DigitPipeline {
    config: PipelineConfig,
    segmenter: Segmenter,
    debug: Option<DebugConfig>,
}

impl DigitPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            segmenter: Segmenter::new(&config),
            debug: None,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> io::Result<Self> {
        if output_dir.exists() {
            let entries = fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Debug directory is not empty: {}", output_dir.display()),
                ));
            }
        } else {
            fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Run segmentation only, returning canonical digits in left-to-right order.
    pub fn segment(&self, image: &DynamicImage) -> Result<Segmentation, PipelineError> {
        let gray = image.to_luma8();
        self.dump("00_input", 0, &gray);

        let segmentation = self.segmenter.segment(&gray)?;

        self.dump("01_binarize", 0, &segmentation.mask.to_ink_image());
        for (idx, digit) in segmentation.digits.iter().enumerate() {
            self.dump("02_canonicalize", idx, digit.pixels());
        }
        Ok(segmentation)
    }

    /// Recognize the number in a decoded image. Never fails: errors become
    /// [`PipelineOutcome::Failed`].
    pub fn recognize<C: DigitClassifier + ?Sized>(
        &self,
        image: &DynamicImage,
        classifier: &C,
    ) -> PipelineOutcome {
        match self.try_recognize(image, classifier) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "recognition failed");
                PipelineOutcome::failed(err)
            }
        }
    }

    pub fn recognize_file<C: DigitClassifier + ?Sized>(
        &self,
        path: &Path,
        classifier: &C,
    ) -> PipelineOutcome {
        match load_image(path) {
            Ok(image) => self.recognize(&image, classifier),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not load image");
                PipelineOutcome::failed(err)
            }
        }
    }

    /// One producer unit of work: clear the artifact, recognize, publish.
    pub fn run<C: DigitClassifier + ?Sized>(
        &self,
        image_path: &Path,
        writer: &ResultWriter,
        classifier: &C,
    ) -> Result<PipelineOutcome, ExchangeError> {
        writer.clear()?;
        info!(image = %image_path.display(), artifact = %writer.path().display(), "run started");
        let outcome = self.recognize_file(image_path, classifier);
        writer.publish(&outcome)?;
        Ok(outcome)
    }

    fn try_recognize<C: DigitClassifier + ?Sized>(
        &self,
        image: &DynamicImage,
        classifier: &C,
    ) -> Result<PipelineOutcome, PipelineError> {
        let segmentation = self.segment(image)?;
        if segmentation.digits.is_empty() {
            info!("no digits detected");
            return Ok(PipelineOutcome::NoDigitsFound);
        }

        let number = classify_sequence(classifier, &segmentation.digits)?;
        info!(number = %number, "number recognized");
        Ok(PipelineOutcome::recognized(number).unwrap_or(PipelineOutcome::NoDigitsFound))
    }

    fn dump(&self, step_dir_name: &str, index: usize, image: &GrayImage) {
        if let Some(debug_config) = &self.debug {
            if let Err(err) = debug_config.save(step_dir_name, index, image) {
                warn!(error = %err, "debug output skipped");
            }
        }
    }
}

/// A whole producer run, setup included.
///
/// The artifact is cleared before `prepare` builds the pipeline and loads the
/// classifier, so a run that fails or dies during setup leaves an empty
/// artifact rather than the previous run's line. Setup errors are published
/// as a failed outcome.
pub fn produce<C, F>(
    writer: &ResultWriter,
    image_path: &Path,
    prepare: F,
) -> Result<PipelineOutcome, ExchangeError>
where
    C: DigitClassifier,
    F: FnOnce() -> Result<(DigitPipeline, C), PipelineError>,
{
    writer.clear()?;
    let outcome = match prepare() {
        Ok((pipeline, classifier)) => {
            info!(
                image = %image_path.display(),
                artifact = %writer.path().display(),
                "run started"
            );
            pipeline.recognize_file(image_path, &classifier)
        }
        Err(err) => {
            warn!(error = %err, "run setup failed");
            PipelineOutcome::failed(err)
        }
    };
    writer.publish(&outcome)?;
    Ok(outcome)
}

/// Decode an image file, sniffing the format from its content.
pub fn load_image(path: &Path) -> Result<DynamicImage, PipelineError> {
    let unreadable = |err: &dyn std::fmt::Display| {
        PipelineError::UnreadableImage(format!("{}: {err}", path.display()))
    };
    let image = ImageReader::open(path)
        .map_err(|e| unreadable(&e))?
        .with_guessed_format()
        .map_err(|e| unreadable(&e))?
        .decode()
        .map_err(|e| unreadable(&e))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(unreadable(&"image has zero area"));
    }
    debug!(width = image.width(), height = image.height(), "image loaded");
    Ok(image)
}
