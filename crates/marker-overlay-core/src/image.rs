//! Owned and borrowed RGB frame buffers.
//!
//! Every pipeline stage owns its own buffer; transforms allocate a fresh
//! image instead of mutating the previous stage in place.

/// Borrowed view of a row-major, 8-bit, 3-channel image.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    /// Interleaved channels, len = width * height * 3.
    pub data: &'a [u8],
}

/// Owned row-major, 8-bit, 3-channel image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Zero-filled (black) image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// The zero-sized "not yet initialized" buffer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True for buffers with no rows or no columns. Downstream consumers
    /// treat an empty buffer as "nothing to draw".
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// New image with the first and third channel of every pixel swapped.
    ///
    /// This is the fixed BGR <-> RGB conversion the blit API requires; the
    /// swap is its own inverse.
    pub fn swapped_channels(&self) -> RgbImage {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(3) {
            data.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl RgbImageView<'_> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_owned(&self) -> RgbImage {
        RgbImage {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

#[inline]
fn channel_clamped(src: &RgbImageView<'_>, x: i64, y: i64, c: usize) -> f32 {
    let x = x.clamp(0, src.width as i64 - 1) as usize;
    let y = y.clamp(0, src.height as i64 - 1) as usize;
    src.data[(y * src.width + x) * 3 + c] as f32
}

/// Bilinear resize to `width` x `height`.
///
/// Sample positions are pixel-center aligned. Empty sources and degenerate
/// targets produce an empty image.
pub fn resize_bilinear(src: &RgbImageView<'_>, width: usize, height: usize) -> RgbImage {
    if src.is_empty() || width == 0 || height == 0 {
        return RgbImage::empty();
    }

    let mut out = RgbImage::new(width, height);
    let sx = src.width as f32 / width as f32;
    let sy = src.height as f32 / height as f32;

    for y in 0..height {
        let fy = (y as f32 + 0.5) * sy - 0.5;
        let y0 = fy.floor() as i64;
        let wy = fy - y0 as f32;
        for x in 0..width {
            let fx = (x as f32 + 0.5) * sx - 0.5;
            let x0 = fx.floor() as i64;
            let wx = fx - x0 as f32;

            let mut rgb = [0u8; 3];
            for (c, out_c) in rgb.iter_mut().enumerate() {
                let p00 = channel_clamped(src, x0, y0, c);
                let p10 = channel_clamped(src, x0 + 1, y0, c);
                let p01 = channel_clamped(src, x0, y0 + 1, c);
                let p11 = channel_clamped(src, x0 + 1, y0 + 1, c);
                let top = p00 + wx * (p10 - p00);
                let bottom = p01 + wx * (p11 - p01);
                *out_c = (top + wy * (bottom - top)).clamp(0.0, 255.0) as u8;
            }
            out.set_pixel(x, y, rgb);
        }
    }
    out
}
