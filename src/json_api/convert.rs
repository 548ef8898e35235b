//! Conversion from JSON schema types to print intents.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use super::schema::{JsonImage, JsonJob};
use crate::error::{PrintLinkError, Result};
use crate::ir::{PrintIntent, PrintJob};
use crate::printer::DialectProfile;
use crate::render::Bitmap;

/// Errors from JSON → intent conversion.
#[derive(Debug)]
pub enum JsonApiError {
    /// `dialect` names no built-in dialect.
    UnknownDialect(String),
    /// An intent failed to parse or validate.
    InvalidIntent {
        index: usize,
        kind: String,
        message: String,
    },
    /// An image intent could not be loaded.
    Image {
        index: usize,
        path: String,
        message: String,
    },
}

impl fmt::Display for JsonApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonApiError::UnknownDialect(name) => write!(
                f,
                "unknown dialect '{}' (expected one of: {})",
                name,
                DialectProfile::ALL
                    .iter()
                    .map(|d| d.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            JsonApiError::InvalidIntent {
                index,
                kind,
                message,
            } => write!(f, "intents[{}] ({}): {}", index, kind, message),
            JsonApiError::Image {
                index,
                path,
                message,
            } => write!(f, "intents[{}] (image {}): {}", index, path, message),
        }
    }
}

impl std::error::Error for JsonApiError {}

impl From<JsonApiError> for PrintLinkError {
    fn from(e: JsonApiError) -> Self {
        PrintLinkError::Json(e.to_string())
    }
}

impl JsonJob {
    /// The job's dialect, or `fallback` when it names none.
    pub fn dialect(
        &self,
        fallback: &'static DialectProfile,
    ) -> std::result::Result<&'static DialectProfile, JsonApiError> {
        match &self.dialect {
            None => Ok(fallback),
            Some(name) => DialectProfile::by_name(name)
                .ok_or_else(|| JsonApiError::UnknownDialect(name.clone())),
        }
    }

    /// Convert to a [`PrintJob`], resolving image paths as given.
    pub fn to_print_job(&self) -> std::result::Result<PrintJob, JsonApiError> {
        self.to_print_job_in(Path::new(""))
    }

    /// Convert to a [`PrintJob`], resolving relative image paths against `base`.
    pub fn to_print_job_in(&self, base: &Path) -> std::result::Result<PrintJob, JsonApiError> {
        self.convert(Some(base))
    }

    /// Convert to a [`PrintJob`] without touching the filesystem.
    ///
    /// `image` intents are rejected; everything a job needs must be inline.
    pub fn to_print_job_inline(&self) -> std::result::Result<PrintJob, JsonApiError> {
        self.convert(None)
    }

    /// Convert and encode in one step.
    pub fn encode(&self, fallback: &'static DialectProfile, base: &Path) -> Result<Vec<u8>> {
        let dialect = self.dialect(fallback)?;
        let job = self.to_print_job_in(base)?;
        job.encode(dialect)
    }

    /// Like [`encode`](Self::encode), but for untrusted jobs: no file is read.
    pub fn encode_inline(&self, fallback: &'static DialectProfile) -> Result<Vec<u8>> {
        let dialect = self.dialect(fallback)?;
        let job = self.to_print_job_inline()?;
        job.encode(dialect)
    }

    fn convert(&self, image_base: Option<&Path>) -> std::result::Result<PrintJob, JsonApiError> {
        let mut job = if self.init {
            PrintJob::with_init()
        } else {
            PrintJob::new()
        };
        for (index, value) in self.intents.iter().enumerate() {
            job.push(convert_intent(index, value, image_base)?);
        }
        Ok(job)
    }
}

fn convert_intent(
    index: usize,
    value: &Value,
    image_base: Option<&Path>,
) -> std::result::Result<PrintIntent, JsonApiError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<missing type>")
        .to_string();
    let invalid = |message: String| JsonApiError::InvalidIntent {
        index,
        kind: kind.clone(),
        message,
    };

    if kind == "image" {
        let Some(base) = image_base else {
            return Err(invalid(
                "image files are not accepted here; send a raster_image".to_string(),
            ));
        };
        let image: JsonImage =
            serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;
        return load_image(index, &image, base);
    }

    let intent: PrintIntent =
        serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;
    intent.validate().map_err(|e| invalid(e.to_string()))?;
    Ok(intent)
}

fn load_image(
    index: usize,
    image: &JsonImage,
    base: &Path,
) -> std::result::Result<PrintIntent, JsonApiError> {
    let path = base.join(&image.path);
    let fail = |e: PrintLinkError| JsonApiError::Image {
        index,
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let bitmap = Bitmap::open(&path).map_err(fail)?;
    let width = image.width.unwrap_or(bitmap.width);
    PrintIntent::raster_image(bitmap, width, image.binarization, image.compression).map_err(fail)
}
