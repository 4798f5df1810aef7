use framelink_buffer_utils::BytesMut;

pub mod rgb565_to_rgb888;

/// Widens RGB565 samples (big-endian `[hi, lo]` pairs) to RGB888. Bit-exact
/// shift-and-mask expansion, one-directional and lossy: the low bits of each
/// channel stay zero, so full-scale 0xFFFF becomes (0xF8, 0xFC, 0xF8).
pub fn rgb565_to_rgb888(src: &[u8], dst: &mut BytesMut) {
    for pair in src.chunks_exact(2) {
        let (hi, lo) = (pair[0], pair[1]);

        dst.extend_from_slice(&[
            hi & 0xF8,
            ((hi & 0x07) << 5) | ((lo & 0xE0) >> 3),
            lo << 3,
        ]);
    }
}
