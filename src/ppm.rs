use crate::color::RGB;
use crate::error::RtError;

use std::io::Write;
use std::path::Path;

const GAMMA: f32 = 1.25_f32;

// Netpbm PPM, ASCII (P3) variant: `P3\n<W> <H>\n255\n` followed by W*H byte
// triplets, rows top-to-bottom. `buffer[j * width + i]` holds the summed
// (not yet averaged) radiance for pixel (i, j) across `samples_per_pixel`
// samples; averaging and gamma correction both happen here, at the point
// the linear-light accumulator is serialized.
pub fn write_ppm<W: Write>(
    mut out: W,
    buffer: &[RGB],
    width: u32,
    height: u32,
    samples_per_pixel: u32,
) -> Result<(), RtError> {
    write!(out, "P3\n{} {}\n255\n", width, height)?;

    for pixel in buffer {
        let [r, g, b] = pixel.to_gamma_corrected_bytes(GAMMA, samples_per_pixel);
        writeln!(out, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

pub fn write_ppm_file<P: AsRef<Path>>(
    path: P,
    buffer: &[RGB],
    width: u32,
    height: u32,
    samples_per_pixel: u32,
) -> Result<(), RtError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    write_ppm(writer, buffer, width, height, samples_per_pixel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_the_netpbm_p3_format() {
        let buffer = vec![RGB::black(), RGB::white()];
        let mut out = Vec::new();
        write_ppm(&mut out, &buffer, 2, 1, 1).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("P3\n2 1\n255\n"));
    }

    #[test]
    fn emits_one_triplet_line_per_pixel() {
        let buffer = vec![RGB::black(), RGB::white(), RGB::new(0.5, 0.5, 0.5)];
        let mut out = Vec::new();
        write_ppm(&mut out, &buffer, 3, 1, 1).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 3 header lines + 3 pixel lines
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "0 0 0");
        assert_eq!(lines[4], "255 255 255");
    }
}
