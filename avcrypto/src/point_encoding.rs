//! Reversible embedding of byte strings into curve points.
//!
//! Each point carries `point_encoding_byte_size` bytes of payload in the low bytes of its
//! x-coordinate. The byte just above the payload is an adjustment counter that is bumped until
//! the x-coordinate lands on the curve.

use crate::*;

/// Payload bytes carried by a single point
pub fn point_encoding_byte_size<C: Curve>() -> usize {
    C::DEGREE / 8 - 1
}

/// Encode bytes as points, zero-padding the final chunk
pub fn bytes_to_points<C: Curve>(bytes: &[u8]) -> Result<Vec<C::Point>> {
    let chunk_size = point_encoding_byte_size::<C>();
    bytes
        .chunks(chunk_size)
        .map(|chunk| chunk_to_point::<C>(chunk, chunk_size))
        .collect()
}

fn chunk_to_point<C: Curve>(chunk: &[u8], chunk_size: usize) -> Result<C::Point> {
    let payload_start = C::BYTE_LENGTH - chunk_size;
    let mut x = vec![0u8; C::BYTE_LENGTH];
    x[payload_start..payload_start + chunk.len()].copy_from_slice(chunk);

    for adjustment in 0..=u8::MAX {
        x[payload_start - 1] = adjustment;
        if let Some(point) = C::point_from_x(&x, false) {
            return Ok(point);
        }
    }

    Err(Error::EncodingCapacity(format!(
        "no adjustment maps {} to a {} point",
        hex::encode(chunk),
        C::NAME
    )))
}

/// Decode points produced by [`bytes_to_points`]
pub fn points_to_bytes<C: Curve>(points: &[C::Point]) -> Result<Vec<u8>> {
    let chunk_size = point_encoding_byte_size::<C>();
    let mut bytes = Vec::with_capacity(points.len() * chunk_size);

    for point in points {
        if is_identity::<C>(point) {
            return Err(Error::InvalidEncoding(
                "cannot decode infinity point".to_owned(),
            ));
        }

        let compressed = C::compress(point);
        bytes.extend_from_slice(&compressed[compressed.len() - chunk_size..]);
    }

    Ok(bytes)
}
