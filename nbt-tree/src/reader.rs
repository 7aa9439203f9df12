use crate::{Compound, Error, Kind, List, Result, Tag, Value};
use std::cmp;

/// Maximum nesting of lists and compounds accepted by the reader.
pub const MAX_DEPTH: usize = 512;

/// Parses the tag at the start of `data`. Bytes following the root tag are ignored.
pub fn parse(data: &[u8]) -> Result<Tag> {
	Reader::new(data).read_tag()?.ok_or(Error::UnexpectedEnd)
}

/// A cursor over an in-memory NBT stream.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
	data: &'a [u8],
	position: usize
}

impl<'a> Reader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Reader { data, position: 0 }
	}

	/// Byte offset of the next unread byte.
	pub fn position(&self) -> usize {
		self.position
	}

	pub fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	/// Decodes one complete tag and its subtree, advancing past everything consumed.
	///
	/// Returns `None` when the next tag is the End marker. On error the cursor
	/// position is unspecified, and nothing decoded so far is returned.
	pub fn read_tag(&mut self) -> Result<Option<Tag>> {
		self.tag(0)
	}

	fn tag(&mut self, depth: usize) -> Result<Option<Tag>> {
		let kind = self.kind()?;

		if kind == Kind::End {
			return Ok(None);
		}

		let name = self.string()?;
		let value = self.value(kind, depth)?;

		Ok(Some(Tag { name, value }))
	}

	fn value(&mut self, kind: Kind, depth: usize) -> Result<Value> {
		Ok(match kind {
			Kind::End => return Err(Error::InvalidKind { id: 0, position: self.position }),
			Kind::Byte => Value::Byte(self.u8()? as i8),
			Kind::Short => Value::Short(i16::from_be_bytes(self.array()?)),
			Kind::Int => Value::Int(i32::from_be_bytes(self.array()?)),
			Kind::Long => Value::Long(i64::from_be_bytes(self.array()?)),
			Kind::Float => Value::Float(f32::from_bits(u32::from_be_bytes(self.array()?))),
			Kind::Double => Value::Double(f64::from_bits(u64::from_be_bytes(self.array()?))),
			Kind::ByteArray => {
				let len = self.length()?;

				Value::ByteArray(self.take(len)?.to_vec())
			},
			Kind::String => Value::String(self.string()?),
			Kind::List => Value::List(self.list(depth)?),
			Kind::Compound => Value::Compound(self.compound(depth)?),
			Kind::IntArray => {
				let len = self.length()?;
				let bytes = self.take(len.checked_mul(4).unwrap_or(usize::MAX))?;

				Value::IntArray(
					bytes.chunks_exact(4)
						.map(|int| i32::from_be_bytes([int[0], int[1], int[2], int[3]]))
						.collect()
				)
			}
		})
	}

	fn list(&mut self, depth: usize) -> Result<List> {
		let depth = nested(depth)?;
		let element = self.kind()?;

		let position = self.position;
		let count = self.length()?;

		if element == Kind::End {
			// Only an empty list may omit its element kind
			return if count == 0 {
				Ok(List::from_parts(Kind::End, Vec::new()))
			} else {
				Err(Error::MalformedLength { length: count as i32, position })
			};
		}

		// Every element takes at least one byte, so a count larger than the
		// remaining input is bound to fail before the vector fills up.
		let mut values = Vec::with_capacity(cmp::min(count, self.remaining()));

		for _ in 0..count {
			values.push(self.value(element, depth)?);
		}

		Ok(List::from_parts(element, values))
	}

	fn compound(&mut self, depth: usize) -> Result<Compound> {
		let depth = nested(depth)?;
		let mut compound = Compound::new();

		while let Some(tag) = self.tag(depth)? {
			compound.push(tag);
		}

		Ok(compound)
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8]> {
		let available = self.remaining();

		if len > available {
			return Err(Error::Truncated { position: self.position, needed: len, available });
		}

		let slice = &self.data[self.position..self.position + len];
		self.position += len;

		Ok(slice)
	}

	fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut bytes = [0; N];
		bytes.copy_from_slice(self.take(N)?);

		Ok(bytes)
	}

	fn u8(&mut self) -> Result<u8> {
		Ok(self.take(1)?[0])
	}

	fn kind(&mut self) -> Result<Kind> {
		let position = self.position;
		let id = self.u8()?;

		Kind::from_id(id).ok_or(Error::InvalidKind { id, position })
	}

	/// Reads a signed 32-bit array length or list count.
	fn length(&mut self) -> Result<usize> {
		let position = self.position;
		let length = i32::from_be_bytes(self.array()?);

		if length < 0 {
			return Err(Error::MalformedLength { length, position });
		}

		Ok(length as usize)
	}

	fn string(&mut self) -> Result<String> {
		let len = u16::from_be_bytes(self.array()?) as usize;
		let bytes = self.take(len)?;

		Ok(String::from_utf8_lossy(bytes).into_owned())
	}
}

fn nested(depth: usize) -> Result<usize> {
	if depth >= MAX_DEPTH {
		Err(Error::DepthLimit(MAX_DEPTH))
	} else {
		Ok(depth + 1)
	}
}
