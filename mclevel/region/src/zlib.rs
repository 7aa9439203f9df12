use flate2::read::ZlibDecoder;
use std::io::Read;

/// Compression scheme id of zlib-wrapped deflate, the only scheme supported.
pub const ZLIB: u8 = 2;

/// Inflates a complete zlib stream into a new buffer.
pub fn decompress(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
	// Chunk payloads usually inflate to several times their compressed size
	let mut data = Vec::with_capacity(compressed.len() * 4);

	ZlibDecoder::new(compressed).read_to_end(&mut data)?;

	Ok(data)
}
