use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use framelink_buffer_utils::BytesMut;
use framelink_core::traits::{FrameProcessor, PullableFrameProperties};

/// Start-of-frame marker. Its Base64 rendering is `/6D/`, which receivers
/// use to tell a framed image line apart from plain log text.
pub const SOF_MARKER: [u8; 3] = [0xFF, 0xA0, 0xFF];

pub const HEADER_SIZE: usize = 12;

/// Wire format tag carried in the header's fourth byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ImageFormat {
    Reserved = 0,
    Grayscale = 1,
    Rgb888 = 2,
}

/// The fixed 12-byte frame header: 3 marker bytes, 1 format byte, then
/// width and height as little-endian u32. Dimensions always describe the
/// frame as transmitted, after any crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl FrameHeader {
    pub fn new(format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[..3].copy_from_slice(&SOF_MARKER);
        bytes[3] = self.format as u8;
        bytes[4..8].copy_from_slice(&self.width.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.height.to_le_bytes());

        bytes
    }
}

/// Writes the Base64 of the frame header into a buffer slot. The header is
/// 12 bytes, a multiple of 3, so its rendering carries no `=` padding and
/// the body's Base64 can follow it with no separator; receivers decode the
/// concatenated line as a single message.
pub struct FrameHeaderSerializer<K> {
    header: FrameHeader,
    buffer_key: K,
}

impl<K> FrameHeaderSerializer<K> {
    pub fn new(header: FrameHeader, buffer_key: K) -> Self {
        Self { header, buffer_key }
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for FrameHeaderSerializer<K>
where
    K: Copy + Send,
    F: PullableFrameProperties<K, BytesMut> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        let mut buffer = frame_data.pull(&self.buffer_key).unwrap();

        buffer.clear();
        buffer.extend_from_slice(STANDARD.encode(self.header.to_bytes()).as_bytes());

        frame_data.push(self.buffer_key, buffer);

        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_byte_layout() {
        let header = FrameHeader::new(ImageFormat::Grayscale, 64, 64);

        assert_eq!(
            header.to_bytes(),
            [0xFF, 0xA0, 0xFF, 0x01, 0x40, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_dimensions_are_little_endian() {
        let header = FrameHeader::new(ImageFormat::Rgb888, 0x0102_0304, 0x0A0B_0C0D);
        let bytes = header.to_bytes();

        assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn test_encoded_header_is_padding_free_and_marked() {
        let header = FrameHeader::new(ImageFormat::Rgb888, 160, 120);
        let encoded = STANDARD.encode(header.to_bytes());

        assert_eq!(encoded.len(), 16);
        assert!(encoded.starts_with("/6D/"));
        assert!(!encoded.contains('='));
    }

    #[test]
    fn test_concatenated_header_and_body_decode_as_one_message() {
        let header = FrameHeader::new(ImageFormat::Rgb888, 2, 1);
        let body = [1u8, 2, 3, 4, 5, 6];

        let mut line = STANDARD.encode(header.to_bytes());
        line.push_str(&STANDARD.encode(body));

        let decoded = STANDARD.decode(line).unwrap();
        assert_eq!(&decoded[..HEADER_SIZE], &header.to_bytes());
        assert_eq!(&decoded[HEADER_SIZE..], &body);
    }
}
