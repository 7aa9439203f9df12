#![forbid(unsafe_code)]

//! Reader for region files: 32x32 grids of chunks, each stored as a zlib
//! compressed NBT payload in a run of 4096 byte sectors.
//!
//! The file starts with two 4096 byte tables indexed by `x + z * 32`. The
//! first holds the location of each chunk (a 3 byte sector offset followed by
//! a 1 byte sector count), the second the Unix time each chunk was last saved.

use log::{debug, trace};
use std::fmt::{self, Debug, Display, Formatter};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod zlib;

pub use zlib::{decompress, ZLIB};

pub const SECTOR_BYTES: u64 = 4096;
pub const HEADER_BYTES: usize = 8192;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("cannot open region file {}: {}", .path.display(), .source)]
	Open {
		path: PathBuf,
		source: io::Error
	},
	#[error("region file name {0:?} does not contain two integer coordinates")]
	FileName(PathBuf),
	#[error("region header is {0} bytes long, expected 8192")]
	ShortHeader(usize),
	#[error("chunk ({x}, {z}) uses unsupported compression scheme {scheme}")]
	UnsupportedCompression {
		x: u8,
		z: u8,
		scheme: u8
	},
	#[error("chunk ({x}, {z}) is truncated: expected {expected} byte(s), {available} available")]
	Truncated {
		x: u8,
		z: u8,
		expected: u64,
		available: u64
	},
	/// The chunk length does not even cover the compression byte.
	#[error("chunk ({x}, {z}) declares an invalid length of {length}")]
	MalformedLength {
		x: u8,
		z: u8,
		length: u32
	},
	#[error("chunk ({x}, {z}) has a corrupt zlib stream: {source}")]
	Decompress {
		x: u8,
		z: u8,
		source: io::Error
	},
	#[error(transparent)]
	Io(#[from] io::Error)
}

/// Extracts the region coordinates from a file name such as `r.-1.2.mca`: the
/// first two dot separated components that parse as integers.
pub fn parse_file_name(name: &str) -> Option<(i32, i32)> {
	let mut coordinates = name.split('.').filter_map(|component| component.parse::<i32>().ok());

	Some((coordinates.next()?, coordinates.next()?))
}

/// Reduces chunk coordinates to their slot within a region. Global chunk
/// coordinates, including negative ones, map to the slot that holds them.
pub fn wrap(x: i32, z: i32) -> (u8, u8) {
	(x.rem_euclid(32) as u8, z.rem_euclid(32) as u8)
}

fn index(x: i32, z: i32) -> usize {
	let (x, z) = wrap(x, z);

	((x as usize) | ((z as usize) << 5)) * 4
}

fn read_u32_be(slice: &[u8]) -> u32 {
	u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]])
}

/// Reads at most `len` bytes, stopping early at the end of the input.
fn read_up_to<R: Read>(reader: &mut R, len: u64) -> io::Result<Vec<u8>> {
	let mut buffer = Vec::new();
	reader.take(len).read_to_end(&mut buffer)?;

	Ok(buffer)
}

/// The location and timestamp tables at the start of a region file.
#[derive(Clone, Eq, PartialEq)]
pub struct RegionHeader(Box<[u8; HEADER_BYTES]>);

impl RegionHeader {
	pub fn new(data: Box<[u8; HEADER_BYTES]>) -> Self {
		RegionHeader(data)
	}

	/// Reads exactly 8192 bytes; anything shorter is `Error::ShortHeader`.
	pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let bytes = read_up_to(reader, HEADER_BYTES as u64)?;

		if bytes.len() != HEADER_BYTES {
			return Err(Error::ShortHeader(bytes.len()));
		}

		let mut data = Box::new([0; HEADER_BYTES]);
		data.copy_from_slice(&bytes);

		Ok(RegionHeader(data))
	}

	pub fn raw(&self) -> &[u8; HEADER_BYTES] {
		&self.0
	}

	/// Gets the location of this chunk in the file, or `None` if the chunk is absent.
	/// Coordinates wrap around modulo 32.
	pub fn location(&self, x: i32, z: i32) -> Option<ChunkLocation> {
		let idx = index(x, z);

		ChunkLocation::new(read_u32_be(&self.0[idx..idx + 4]))
	}

	/// Gets the timestamp this chunk was saved at. Coordinates wrap around modulo 32.
	pub fn timestamp(&self, x: i32, z: i32) -> ChunkTimestamp {
		let idx = index(x, z) + 4096;

		ChunkTimestamp::from_unix_seconds(read_u32_be(&self.0[idx..idx + 4]))
	}

	/// Lists the in-region coordinates of every present chunk, in header order.
	pub fn chunks(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
		(0..1024).filter_map(move |slot| {
			let (x, z) = (slot & 31, slot >> 5);

			self.location(x, z).map(|_| (x as u8, z as u8))
		})
	}
}

impl Debug for RegionHeader {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "RegionHeader {{ {} chunk(s) }}", self.chunks().count())
	}
}

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct ChunkLocation(u32);
impl ChunkLocation {
	pub fn from_parts(offset: u32, len: u8) -> Self {
		ChunkLocation((offset << 8) | (len as u32))
	}

	/// Returns `None` for a zero sector offset, which marks an absent chunk.
	pub fn new(loc: u32) -> Option<Self> {
		if loc >> 8 == 0 {
			None
		} else {
			Some(ChunkLocation(loc))
		}
	}

	/// Returns the contained raw value.
	pub fn inner(&self) -> u32 {
		self.0
	}

	/// Returns the offset in pages (4096 bytes) of this chunk from the start of the file.
	pub fn offset(&self) -> u32 {
		self.0 >> 8
	}

	/// Returns the offset in bytes of this chunk from the start of the file.
	pub fn offset_bytes(&self) -> u64 {
		(self.offset() as u64) * SECTOR_BYTES
	}

	/// Returns the size of the chunk in pages (4096 bytes), rounded up.
	pub fn len(&self) -> u8 {
		(self.0 & 0xFF) as u8
	}

	/// Returns the size of the chunk in bytes.
	pub fn len_bytes(&self) -> u64 {
		(self.len() as u64) * SECTOR_BYTES
	}
}

impl Display for ChunkLocation {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "at {}, len {} pages", self.offset(), self.len())
	}
}

impl Debug for ChunkLocation {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "ChunkLocation {{ offset: {}, len: {} }}", self.offset(), self.len())
	}
}

/// Unix time in seconds when the chunk was last saved.
/// Susceptible to the Year 2038 problem, and relatively useless.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct ChunkTimestamp(u32);
impl ChunkTimestamp {
	pub fn from_unix_seconds(seconds: u32) -> Self {
		ChunkTimestamp(seconds)
	}

	pub fn into_unix_seconds(self) -> u32 {
		self.0
	}

	pub fn into_system_time(self) -> SystemTime {
		UNIX_EPOCH + Duration::from_secs(self.0 as u64)
	}
}

/// The 5 bytes at the start of each chunk record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChunkHeader {
	/// Length of the compressed data plus the compression byte.
	pub len: u32,
	pub compression: u8
}

impl ChunkHeader {
	pub fn from_bytes(bytes: [u8; 5]) -> Self {
		ChunkHeader {
			len: read_u32_be(&bytes[0..4]),
			compression: bytes[4]
		}
	}
}

/// An open region file. Each `chunk_data` call seeks the underlying reader, so a
/// region can only serve one read at a time.
pub struct Region<R> where R: Read + Seek {
	x: i32,
	z: i32,
	header: RegionHeader,
	reader: R,
	start: u64
}

impl Region<File> {
	/// Opens a region file, taking its coordinates from the file name.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();

		let (x, z) = path.file_name()
			.and_then(|name| name.to_str())
			.and_then(parse_file_name)
			.ok_or_else(|| Error::FileName(path.to_path_buf()))?;

		let file = File::open(path).map_err(|source| Error::Open { path: path.to_path_buf(), source })?;
		let region = Region::new(file, x, z)?;

		debug!("Opened region ({}, {}) at {}: {:?}", x, z, path.display(), region.header);

		Ok(region)
	}
}

impl<R> Region<R> where R: Read + Seek {
	/// Reads the header of a region starting at the current position of `reader`.
	/// Sector offsets are relative to that position.
	pub fn new(mut reader: R, x: i32, z: i32) -> Result<Self> {
		let start = reader.seek(SeekFrom::Current(0))?;
		let header = RegionHeader::read(&mut reader)?;

		Ok(Region { x, z, header, reader, start })
	}

	/// Region X coordinate, in units of 32 chunks.
	pub fn x(&self) -> i32 {
		self.x
	}

	/// Region Z coordinate, in units of 32 chunks.
	pub fn z(&self) -> i32 {
		self.z
	}

	pub fn header(&self) -> &RegionHeader {
		&self.header
	}

	pub fn location(&self, x: i32, z: i32) -> Option<ChunkLocation> {
		self.header.location(x, z)
	}

	pub fn timestamp(&self, x: i32, z: i32) -> ChunkTimestamp {
		self.header.timestamp(x, z)
	}

	pub fn chunks(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
		self.header.chunks()
	}

	/// Reads and inflates the payload of a chunk. Returns `Ok(None)` if the
	/// chunk is absent. Nothing is cached: every call re-reads the file.
	pub fn chunk_data(&mut self, x: i32, z: i32) -> Result<Option<Vec<u8>>> {
		let location = match self.header.location(x, z) {
			Some(location) => location,
			None => return Ok(None)
		};

		let (x, z) = wrap(x, z);

		self.reader.seek(SeekFrom::Start(self.start + location.offset_bytes()))?;

		let bytes = read_up_to(&mut self.reader, 5)?;

		if bytes.len() != 5 {
			return Err(Error::Truncated { x, z, expected: 5, available: bytes.len() as u64 });
		}

		let header = ChunkHeader::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4]]);

		if header.compression != ZLIB {
			return Err(Error::UnsupportedCompression { x, z, scheme: header.compression });
		}

		if header.len == 0 {
			return Err(Error::MalformedLength { x, z, length: header.len });
		}

		let expected = (header.len - 1) as u64;
		let compressed = read_up_to(&mut self.reader, expected)?;

		if (compressed.len() as u64) < expected {
			return Err(Error::Truncated { x, z, expected, available: compressed.len() as u64 });
		}

		let data = zlib::decompress(&compressed).map_err(|source| Error::Decompress { x, z, source })?;

		trace!("Chunk ({}, {}) {}: {} compressed byte(s), {} inflated", x, z, location, compressed.len(), data.len());

		Ok(Some(data))
	}

	pub fn into_inner(self) -> R {
		self.reader
	}
}
