use crate::{
    foundation::error::{PlatenError, PlatenResult},
    foundation::math::crc32,
    render::surface::Surface,
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Sane ceiling for a declared chunk length. Also rejects lengths that are
/// negative when reinterpreted as a signed 32-bit value.
const CHUNK_LEN_CEILING: u32 = 10 * 1024 * 1024;

/// Pixels-per-meter per DPI unit.
const PPM_PER_DPI: f64 = 39.3701;

/// Encode a composited surface as a PNG byte stream.
///
/// Encode failures are fatal to this unit's export; no fallback applies
/// here, unlike DPI tagging.
pub fn encode_png(surface: &Surface) -> PlatenResult<Vec<u8>> {
    let img = surface.to_rgba_image()?;
    let mut out = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut out);
    img.write_with_encoder(encoder)
        .map_err(|e| PlatenError::encode(format!("png encode: {e}")))?;
    Ok(out)
}

/// One scanned chunk record: `[len BE u32][type 4B][data][crc 4B]`.
#[derive(Clone, Copy, Debug)]
struct Chunk {
    offset: usize,
    data_len: usize,
    kind: [u8; 4],
}

impl Chunk {
    fn end(self) -> usize {
        self.offset + 12 + self.data_len
    }

    fn data_start(self) -> usize {
        self.offset + 8
    }
}

/// Scan the chunk starting at `offset`.
///
/// Returns `Ok(None)` at a clean stop: end of buffer, or a chunk whose
/// computed end would read past it (scanning stops rather than overreading).
/// A declared length above the ceiling is a hard format error.
fn next_chunk(bytes: &[u8], offset: usize) -> PlatenResult<Option<Chunk>> {
    if offset.saturating_add(8) > bytes.len() {
        return Ok(None);
    }
    let len = u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]);
    if len > CHUNK_LEN_CEILING {
        return Err(PlatenError::format(format!(
            "chunk length {len} exceeds ceiling at offset {offset}"
        )));
    }
    let kind = [
        bytes[offset + 4],
        bytes[offset + 5],
        bytes[offset + 6],
        bytes[offset + 7],
    ];
    let chunk = Chunk {
        offset,
        data_len: len as usize,
        kind,
    };
    if chunk.end() > bytes.len() {
        return Ok(None);
    }
    Ok(Some(chunk))
}

fn dpi_to_ppm(dpi: u32) -> u32 {
    (f64::from(dpi) * PPM_PER_DPI).round() as u32
}

fn ppm_to_dpi(ppm: u32) -> u32 {
    (f64::from(ppm) / PPM_PER_DPI).round() as u32
}

/// Assemble a `pHYs` chunk: 9-byte payload of pixels-per-meter X and Y plus
/// the unit byte (1 = meters), CRC-32 over type and payload.
fn build_phys_chunk(dpi: u32) -> [u8; 21] {
    let ppm = dpi_to_ppm(dpi);
    let mut out = [0u8; 21];
    out[0..4].copy_from_slice(&9u32.to_be_bytes());
    out[4..8].copy_from_slice(b"pHYs");
    out[8..12].copy_from_slice(&ppm.to_be_bytes());
    out[12..16].copy_from_slice(&ppm.to_be_bytes());
    out[16] = 1;
    let crc = crc32(&out[4..17]);
    out[17..21].copy_from_slice(&crc.to_be_bytes());
    out
}

fn try_write_dpi(bytes: &[u8], dpi: u32) -> PlatenResult<Vec<u8>> {
    if dpi == 0 {
        return Err(PlatenError::validation("dpi must be > 0"));
    }
    if bytes.len() < 8 || bytes[0..8] != PNG_SIGNATURE {
        return Err(PlatenError::format("missing png signature"));
    }

    let mut existing_phys: Option<Chunk> = None;
    let mut image_data: Option<Chunk> = None;
    let mut offset = 8;
    while let Some(chunk) = next_chunk(bytes, offset)? {
        match &chunk.kind {
            b"IDAT" => {
                image_data = Some(chunk);
                break;
            }
            b"pHYs" => {
                if existing_phys.is_none() {
                    existing_phys = Some(chunk);
                }
            }
            _ => {}
        }
        offset = chunk.end();
    }
    let insert_pos = image_data
        .ok_or_else(|| PlatenError::format("no image data chunk before buffer end"))?
        .offset;

    let phys = build_phys_chunk(dpi);
    let removed = existing_phys.map_or(0, |c| c.end() - c.offset);
    let mut out = Vec::with_capacity(bytes.len() + phys.len() - removed);
    match existing_phys {
        // Replace the prior tag rather than inserting a duplicate, so
        // re-export is idempotent for any consumer's chunk precedence.
        Some(old) => {
            out.extend_from_slice(&bytes[..old.offset]);
            out.extend_from_slice(&bytes[old.end()..insert_pos]);
        }
        None => out.extend_from_slice(&bytes[..insert_pos]),
    }
    out.extend_from_slice(&phys);
    out.extend_from_slice(&bytes[insert_pos..]);

    let expected = bytes.len() + phys.len() - removed;
    if out.len() != expected {
        return Err(PlatenError::format(format!(
            "size mismatch after chunk insertion: {} != {expected}",
            out.len()
        )));
    }
    Ok(out)
}

/// Patch a physical-pixel-density (`pHYs`) chunk into a PNG byte stream
/// without re-encoding pixel data.
///
/// DPI tagging is best-effort: on any failure (bad signature, malformed
/// chunk, size-mismatch assertion) the input buffer is returned unmodified
/// and a warning is logged so the quality loss is observable in testing.
pub fn write_dpi(bytes: &[u8], dpi: u32) -> Vec<u8> {
    match try_write_dpi(bytes, dpi) {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(error = %e, dpi, "dpi tagging failed; keeping untagged png");
            bytes.to_vec()
        }
    }
}

/// Read back the embedded DPI, if a density chunk is present.
///
/// Verification utility for the write path; returns `None` for non-PNG
/// buffers, malformed streams, or streams without a `pHYs` chunk.
pub fn read_dpi(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < 8 || bytes[0..8] != PNG_SIGNATURE {
        return None;
    }
    let mut offset = 8;
    while let Ok(Some(chunk)) = next_chunk(bytes, offset) {
        if &chunk.kind == b"pHYs" && chunk.data_len == 9 {
            let d = chunk.data_start();
            let ppm_x = u32::from_be_bytes([bytes[d], bytes[d + 1], bytes[d + 2], bytes[d + 3]]);
            return Some(ppm_to_dpi(ppm_x));
        }
        offset = chunk.end();
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
