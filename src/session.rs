//! Per-image session state.
//!
//! A [`Session`] owns the loaded [`OriginalImage`] together with the intents
//! seeded from it. Loading another image replaces everything; clearing drops
//! it. Operations on an empty session fail with [`OperationError::NoImage`].

use crate::imaging::OperationError;
use crate::resolver::DimensionResolver;
use crate::types::{CompressIntent, Mode, OriginalImage, OutputFormat, OutputSpec, SizeUnit};

#[derive(Debug, Clone)]
struct Loaded {
    original: OriginalImage,
    resolver: DimensionResolver,
    compress: CompressIntent,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: Mode,
    loaded: Option<Loaded>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current image and re-seed both intents from it.
    pub fn load(&mut self, original: OriginalImage) {
        log::debug!(
            "session loaded {}x{} {} ({} bytes)",
            original.width,
            original.height,
            original.mime_type,
            original.size_bytes
        );
        let resolver = match self.loaded.take() {
            Some(mut previous) => {
                previous.resolver.reset(&original);
                previous.resolver
            }
            None => DimensionResolver::new(&original),
        };
        self.loaded = Some(Loaded {
            compress: CompressIntent::seeded(&original),
            resolver,
            original,
        });
    }

    pub fn clear(&mut self) {
        self.loaded = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn original(&self) -> Result<&OriginalImage, OperationError> {
        Ok(&self.loaded()?.original)
    }

    pub fn resolver(&self) -> Result<&DimensionResolver, OperationError> {
        Ok(&self.loaded()?.resolver)
    }

    pub fn resolver_mut(&mut self) -> Result<&mut DimensionResolver, OperationError> {
        Ok(&mut self.loaded_mut()?.resolver)
    }

    pub fn compress_intent(&self) -> Result<&CompressIntent, OperationError> {
        Ok(&self.loaded()?.compress)
    }

    /// Output format, shared by both modes.
    pub fn set_format(&mut self, format: OutputFormat) -> Result<(), OperationError> {
        self.loaded_mut()?.compress.format = format;
        Ok(())
    }

    pub fn set_target(&mut self, size: f64, unit: SizeUnit) -> Result<(), OperationError> {
        let compress = &mut self.loaded_mut()?.compress;
        compress.target_size = size;
        compress.target_unit = unit;
        Ok(())
    }

    /// Dimensions to draw at: the resolver's in resize mode, the original's
    /// in compress mode.
    pub fn output_dimensions(&self) -> Result<(u32, u32), OperationError> {
        let loaded = self.loaded()?;
        Ok(match self.mode {
            Mode::Resize => loaded.resolver.dimensions(),
            Mode::Compress => (loaded.original.width, loaded.original.height),
        })
    }

    /// Output spec at a given quality for the current mode and format.
    pub fn output_spec(&self, quality: f32) -> Result<OutputSpec, OperationError> {
        let (width, height) = self.output_dimensions()?;
        Ok(OutputSpec {
            width,
            height,
            format: self.compress_intent()?.format,
            quality,
        })
    }

    fn loaded(&self) -> Result<&Loaded, OperationError> {
        self.loaded.as_ref().ok_or(OperationError::NoImage)
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, OperationError> {
        self.loaded.as_mut().ok_or(OperationError::NoImage)
    }
}
