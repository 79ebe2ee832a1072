//! Off-thread conversion requests with cooperative cancellation
//!
//! Decoding is the only step that waits on an external source. A request
//! decodes on its own worker thread and then runs grid synthesis there, so
//! the caller's thread is never blocked.

use crate::algorithm::executor::GridSynthesizer;
use crate::analysis::palette::Palette;
use crate::io::configuration::MosaicConfig;
use crate::io::error::{MosaicError, Result};
use crate::io::image::{decode_bytes, decode_path};
use crate::spatial::grid::TileGrid;
use crate::spatial::source::SourceImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Shared flag used to abandon a conversion
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not fired
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once cancellation was requested
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token has fired
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(MosaicError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Where a conversion gets its pixels from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Encoded image file on disk
    Path(PathBuf),
    /// Encoded image bytes with a name for error reporting
    Bytes {
        /// Identifier used in decode errors
        id: String,
        /// Encoded data
        data: Vec<u8>,
    },
    /// Already decoded pixels
    Decoded(SourceImage),
}

impl ImageSource {
    /// Identifier used in logs and decode errors
    pub fn id(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { id, .. } => id.clone(),
            Self::Decoded(image) => format!("<decoded {}x{}>", image.width(), image.height()),
        }
    }

    /// Materialize the pixel buffer
    ///
    /// # Errors
    ///
    /// Returns `ImageDecode` if the source can't be decoded
    pub fn decode(self) -> Result<SourceImage> {
        match self {
            Self::Path(path) => decode_path(path),
            Self::Bytes { id, data } => decode_bytes(&id, &data),
            Self::Decoded(image) => Ok(image),
        }
    }
}

/// One image-to-mosaic request
#[derive(Debug, Clone)]
pub struct ConversionTask {
    /// Image to convert
    pub source: ImageSource,
    /// Palette shared with other requests
    pub palette: Palette,
    /// Grid size, strategy and calibration
    pub config: MosaicConfig,
}

impl ConversionTask {
    /// Create a request
    pub const fn new(source: ImageSource, palette: Palette, config: MosaicConfig) -> Self {
        Self {
            source,
            palette,
            config,
        }
    }

    /// Run the request on the current thread
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `cancel` fires before synthesis finishes, or
    /// any configuration, decode or sampling error
    pub fn run(self, cancel: &CancellationToken) -> Result<TileGrid> {
        let synthesizer = GridSynthesizer::new(&self.palette, self.config)?;
        let source_id = self.source.id();

        cancel.check()?;
        log::info!("Decoding {source_id}");
        let image = self.source.decode()?;

        // A cancel during decoding drops the decoded buffer here
        cancel.check()?;
        let grid = synthesizer.synthesize_with(&image, cancel, |_| {});

        if matches!(grid, Err(MosaicError::Cancelled)) {
            log::info!("Conversion of {source_id} cancelled");
        }
        grid
    }

    /// Run the request on a dedicated worker thread
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the operating system refuses to spawn a thread
    pub fn spawn(self) -> Result<ConversionHandle> {
        self.spawn_with(CancellationToken::new())
    }

    /// Run the request on a worker thread that observes an existing token
    ///
    /// One token can be shared by several requests to cancel them together.
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if the operating system refuses to spawn a thread
    pub fn spawn_with(self, token: CancellationToken) -> Result<ConversionHandle> {
        let worker_token = token.clone();

        let handle = std::thread::Builder::new()
            .name("mosaic-conversion".to_string())
            .spawn(move || self.run(&worker_token))
            .map_err(|e| MosaicError::FileSystem {
                path: PathBuf::from("<thread>"),
                operation: "spawn conversion worker",
                source: e,
            })?;

        Ok(ConversionHandle { token, handle })
    }
}

/// Handle to a conversion running on a worker thread
#[derive(Debug)]
pub struct ConversionHandle {
    token: CancellationToken,
    handle: JoinHandle<Result<TileGrid>>,
}

impl ConversionHandle {
    /// Ask the worker to stop at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token shared with the worker
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Whether the worker has finished
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and take its result
    ///
    /// # Errors
    ///
    /// Returns the worker's error, or `InvalidSourceData` if the worker panicked
    pub fn join(self) -> Result<TileGrid> {
        self.handle
            .join()
            .unwrap_or_else(|_panic| {
                Err(MosaicError::InvalidSourceData {
                    reason: "conversion worker panicked".to_string(),
                })
            })
    }
}
