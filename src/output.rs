//! Image output sinks.
//!
//! Writers consume one combined pixel color per call in row-major,
//! top-to-bottom, left-to-right order and commit to disk on [`ImageWriter::finish`].
//! Also provides optional live export of the framebuffer to a running TEV
//! viewer over TCP.

use std::io::Write;
use std::net::TcpStream;
use std::path::PathBuf;

use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::material::Color;

/// Errors surfaced by image writers when committing to disk.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Underlying I/O failure (disk full, permissions, bad path).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding failure from the `image` crate.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Sink for finished pixels.
///
/// Colors arrive post-combine: averaged, gamma-corrected, clamped to [0, 1].
pub trait ImageWriter {
    /// Accept the next pixel in row-major order.
    fn write(&mut self, color: Color);

    /// Flush/encode the accumulated image to its destination.
    fn finish(&mut self) -> Result<(), OutputError>;
}

/// Stream every pixel of a framebuffer through a writer, then finish it.
pub fn write_image(
    image: &ImageBuffer<Rgb<f32>, Vec<f32>>,
    writer: &mut dyn ImageWriter,
) -> Result<(), OutputError> {
    for pixel in image.pixels() {
        writer.write(Color::new(pixel[0], pixel[1], pixel[2]));
    }
    writer.finish()
}

/// Plain-text P3 PPM writer.
///
/// Buffers the full image body in memory and writes it through the sink in
/// one pass on `finish`, so `write` itself never fails.
pub struct PpmWriter<W: Write> {
    sink: W,
    width: u32,
    height: u32,
    body: String,
}

impl<W: Write> PpmWriter<W> {
    /// Create a PPM writer targeting the given sink.
    pub fn new(sink: W, width: u32, height: u32) -> Self {
        Self {
            sink,
            width,
            height,
            body: String::new(),
        }
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> ImageWriter for PpmWriter<W> {
    fn write(&mut self, color: Color) {
        let rgb = to_rgb8(color);
        self.body
            .push_str(&format!("{} {} {}\n", rgb[0], rgb[1], rgb[2]));
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        write!(self.sink, "P3\n{} {}\n255\n{}", self.width, self.height, self.body)?;
        self.sink.flush()?;
        Ok(())
    }
}

/// Encoded image writer backed by the `image` crate.
///
/// The output format follows the path extension (`.png`, `.jpg`, ...);
/// unsupported extensions surface as an encoding error on `finish`.
pub struct ImageFileWriter {
    path: PathBuf,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageFileWriter {
    /// Create a writer targeting the given path.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            pixels: Vec::with_capacity((width * height * 3) as usize),
        }
    }

    /// View the accumulated pixels as an 8-bit RGB image buffer.
    fn to_image(&self) -> Option<ImageBuffer<Rgb<u8>, Vec<u8>>> {
        ImageBuffer::from_vec(self.width, self.height, self.pixels.clone())
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&mut self, color: Color) {
        self.pixels.extend_from_slice(&to_rgb8(color));
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        let image = self.to_image().ok_or_else(|| {
            OutputError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "pixel count does not match image dimensions",
            ))
        })?;
        image.save(&self.path)?;
        info!("Image saved as {}", self.path.display());
        Ok(())
    }
}

/// Quantize a combined [0, 1] color to 8-bit RGB.
fn to_rgb8(color: Color) -> [u8; 3] {
    [
        (color.x.clamp(0.0, 1.0) * 255.0) as u8,
        (color.y.clamp(0.0, 1.0) * 255.0) as u8,
        (color.z.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

/// Send an f32 RGB framebuffer to TEV for visualization.
///
/// Failures are logged as warnings; a missing viewer never affects the render.
pub fn send_image_to_tev(
    image: &ImageBuffer<Rgb<f32>, Vec<f32>>,
    tev_address: &str,
    width: u32,
    height: u32,
) {
    // Add default port if not specified
    let tev_address = if tev_address.contains(':') {
        tev_address.to_string()
    } else {
        format!("{}:14158", tev_address)
    };

    let stream = match TcpStream::connect(&tev_address) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect to TEV on {}: {}", tev_address, e);
            return;
        }
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    if let Err(e) = client.send(PacketCreateImage {
        image_name: "scanray_output",
        width,
        height,
        channel_names: &["R", "G", "B"],
        grab_focus: true,
    }) {
        warn!("Failed to create image in TEV: {}", e);
        return;
    }

    // TEV wants planar channel data (RRR...GGG...BBB...)
    let pixel_count = (width * height) as usize;
    let mut rgb_data = Vec::with_capacity(pixel_count * 3);
    for channel in 0..3 {
        for pixel in image.pixels() {
            rgb_data.push(pixel[channel]);
        }
    }

    match client.send(PacketUpdateImage {
        image_name: "scanray_output",
        grab_focus: false,
        channel_names: &["R", "G", "B"],
        x: 0,
        y: 0,
        width,
        height,
        channel_offsets: &[0, pixel_count as u64, 2 * pixel_count as u64],
        channel_strides: &[1, 1, 1],
        data: &rgb_data,
    }) {
        Ok(_) => info!("Image sent to TEV at {}", tev_address),
        Err(e) => warn!("Failed to send image data to TEV: {}", e),
    }
}
