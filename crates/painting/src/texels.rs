//! CPU texel buffer backing one splatmap
//!
//! Texels are stored row-major as `f32` channels. Row 0 is the bottom edge of
//! the tile (v = 0) and column 0 its left edge (u = 0), matching the UV
//! layout of the tile ground plane.

use glam::Vec2;
use surface_chain_config::TexelFormat;

/// A 2D splatmap with a fixed resolution and channel layout
#[derive(Debug, Clone, PartialEq)]
pub struct TexelBuffer {
    /// Buffer dimensions
    pub width: u32,
    pub height: u32,
    format: TexelFormat,
    /// Channel data in row-major order, `format.channels()` values per texel
    texels: Vec<f32>,
}

impl TexelBuffer {
    /// Create a new buffer with every channel set to zero
    pub fn new(width: u32, height: u32, format: TexelFormat) -> Self {
        let len = (width as usize) * (height as usize) * format.channels();
        Self {
            width,
            height,
            format,
            texels: vec![0.0; len],
        }
    }

    /// Storage format
    #[inline]
    pub fn format(&self) -> TexelFormat {
        self.format
    }

    /// Channels per texel
    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Whether another buffer has the same resolution and format
    #[inline]
    pub fn same_shape(&self, other: &TexelBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.format == other.format
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * self.channels()
    }

    #[inline]
    fn store(&self, value: f32) -> f32 {
        if self.format.is_normalized() {
            value.clamp(0.0, 1.0)
        } else {
            value
        }
    }

    /// Get a texel's channels.
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.texels[start..start + self.channels()])
    }

    /// Get the first channel of a texel
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> Option<f32> {
        self.get(x, y).map(|texel| texel[0])
    }

    /// Set a texel's channels, clamping for normalized formats.
    /// Does nothing if coordinates are out of bounds; extra values are ignored
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, values: &[f32]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let start = self.offset(x, y);
        let channels = self.channels();
        for (channel, value) in values.iter().take(channels).enumerate() {
            self.texels[start + channel] = self.store(*value);
        }
    }

    /// Set every channel of a texel to one value
    #[inline]
    pub fn set_all(&mut self, x: u32, y: u32, value: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let start = self.offset(x, y);
        let stored = self.store(value);
        let channels = self.channels();
        self.texels[start..start + channels].fill(stored);
    }

    /// Fill every channel of every texel
    pub fn fill(&mut self, value: f32) {
        let stored = self.store(value);
        self.texels.fill(stored);
    }

    /// Overwrite this buffer with the contents of a same-shaped buffer
    pub fn copy_from(&mut self, source: &TexelBuffer) {
        debug_assert!(self.same_shape(source), "copy_from requires matching shapes");
        self.texels.copy_from_slice(&source.texels);
    }

    /// Copy one column of `source` into one column of this buffer.
    /// Rows beyond either buffer's height are skipped
    pub fn copy_column_from(&mut self, source: &TexelBuffer, source_x: u32, target_x: u32) {
        if source_x >= source.width || target_x >= self.width {
            return;
        }
        let channels = self.channels().min(source.channels());
        for y in 0..self.height.min(source.height) {
            let src = source.offset(source_x, y);
            let dst = self.offset(target_x, y);
            self.texels[dst..dst + channels].copy_from_slice(&source.texels[src..src + channels]);
        }
    }

    /// Copy one row of `source` into one row of this buffer.
    /// Columns beyond either buffer's width are skipped
    pub fn copy_row_from(&mut self, source: &TexelBuffer, source_y: u32, target_y: u32) {
        if source_y >= source.height || target_y >= self.height {
            return;
        }
        let columns = self.width.min(source.width) as usize;
        if self.channels() == source.channels() {
            let len = columns * self.channels();
            let src = source.offset(0, source_y);
            let dst = self.offset(0, target_y);
            self.texels[dst..dst + len].copy_from_slice(&source.texels[src..src + len]);
            return;
        }
        let channels = self.channels().min(source.channels());
        for x in 0..columns as u32 {
            let src = source.offset(x, source_y);
            let dst = self.offset(x, target_y);
            self.texels[dst..dst + channels].copy_from_slice(&source.texels[src..src + channels]);
        }
    }

    /// Convert a UV coordinate to continuous texel space
    #[inline]
    pub fn uv_to_texel(&self, uv: Vec2) -> Vec2 {
        uv * Vec2::new(self.width as f32, self.height as f32)
    }

    /// UV coordinate of a texel's centre
    #[inline]
    pub fn texel_center_uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Sum of every channel of every texel
    pub fn total(&self) -> f32 {
        self.texels.iter().sum()
    }

    /// Get raw texel data for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Get direct access to channel data
    #[inline]
    pub fn texels(&self) -> &[f32] {
        &self.texels
    }
}
