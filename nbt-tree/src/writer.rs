//! Streaming encoder used to build test fixtures.

use crate::Kind;

pub trait Output {
	fn push(&mut self, value: u8);
	fn extend_from_slice(&mut self, slice: &[u8]);
}

impl<T> Output for &mut T where T: Output {
	fn push(&mut self, value: u8) {
		T::push(self, value)
	}

	fn extend_from_slice(&mut self, slice: &[u8]) {
		T::extend_from_slice(self, slice);
	}
}

impl Output for Vec<u8> {
	fn push(&mut self, value: u8) {
		Vec::push(self, value)
	}

	fn extend_from_slice(&mut self, slice: &[u8]) {
		Vec::extend_from_slice(self, slice)
	}
}

fn string<T: Output>(out: &mut T, value: &str) {
	assert!(value.len() <= u16::MAX as usize, "String too long: {} bytes", value.len());

	out.extend_from_slice(&u16::to_be_bytes(value.len() as u16));
	out.extend_from_slice(value.as_bytes());
}

fn array_length<T: Output>(out: &mut T, len: usize) {
	assert!(len <= i32::MAX as usize, "Array too long: {} (maximum length: {})", len, i32::MAX);

	out.extend_from_slice(&u32::to_be_bytes(len as u32));
}

fn ints<T: Output>(out: &mut T, value: &[i32]) {
	array_length(out, value.len());

	for &entry in value {
		out.extend_from_slice(&entry.to_be_bytes());
	}
}

pub struct CompoundWriter<T: Output> {
	out: T
}

impl<T: Output> CompoundWriter<T> {
	/// Begins a new compound tag.
	pub fn start(name: &str, out: T) -> Self {
		let mut writer = CompoundWriter { out };

		writer.header(Kind::Compound, name);
		writer
	}

	pub fn write<F>(name: &str, out: T, filler: F) -> T where F: FnOnce(&mut CompoundWriter<T>) {
		let mut writer = CompoundWriter::start(name, out);

		filler(&mut writer);

		writer.end()
	}

	/// Ends the compound tag, returning the buffer.
	pub fn end(mut self) -> T {
		self.out.push(Kind::End.id());
		self.out
	}

	fn header(&mut self, kind: Kind, name: &str) {
		self.out.push(kind.id());
		string(&mut self.out, name);
	}

	pub fn i8(&mut self, name: &str, value: i8) -> &mut Self {
		self.header(Kind::Byte, name);
		self.out.push(value as u8);

		self
	}

	pub fn i16(&mut self, name: &str, value: i16) -> &mut Self {
		self.header(Kind::Short, name);
		self.out.extend_from_slice(&value.to_be_bytes());

		self
	}

	pub fn i32(&mut self, name: &str, value: i32) -> &mut Self {
		self.header(Kind::Int, name);
		self.out.extend_from_slice(&value.to_be_bytes());

		self
	}

	pub fn i64(&mut self, name: &str, value: i64) -> &mut Self {
		self.header(Kind::Long, name);
		self.out.extend_from_slice(&value.to_be_bytes());

		self
	}

	pub fn f32(&mut self, name: &str, value: f32) -> &mut Self {
		self.header(Kind::Float, name);
		self.out.extend_from_slice(&value.to_bits().to_be_bytes());

		self
	}

	pub fn f64(&mut self, name: &str, value: f64) -> &mut Self {
		self.header(Kind::Double, name);
		self.out.extend_from_slice(&value.to_bits().to_be_bytes());

		self
	}

	pub fn string(&mut self, name: &str, value: &str) -> &mut Self {
		self.header(Kind::String, name);
		string(&mut self.out, value);

		self
	}

	pub fn u8_array(&mut self, name: &str, value: &[u8]) -> &mut Self {
		self.header(Kind::ByteArray, name);
		array_length(&mut self.out, value.len());

		self.out.extend_from_slice(value);

		self
	}

	pub fn i32_array(&mut self, name: &str, value: &[i32]) -> &mut Self {
		self.header(Kind::IntArray, name);
		ints(&mut self.out, value);

		self
	}

	pub fn compound<F>(&mut self, name: &str, filler: F) -> &mut Self where F: FnOnce(&mut CompoundWriter<&mut T>) {
		let mut writer = CompoundWriter::start(name, &mut self.out);

		filler(&mut writer);

		writer.end();

		self
	}

	/// Writes a list of `len` elements of kind `element`. The filler must write
	/// exactly `len` elements. An empty list is written with the End element kind.
	pub fn list<F>(&mut self, name: &str, element: Kind, len: usize, filler: F) -> &mut Self where F: FnOnce(&mut ListWriter<T>) {
		self.header(Kind::List, name);
		list(&mut self.out, element, len, filler);

		self
	}
}

fn list<T: Output, F>(out: &mut T, element: Kind, len: usize, filler: F) where F: FnOnce(&mut ListWriter<T>) {
	if len == 0 {
		// Kind::End + length of 0
		out.extend_from_slice(&[0; 5]);

		return;
	}

	assert_ne!(element, Kind::End, "Only empty lists may have the End element kind");

	out.push(element.id());
	array_length(out, len);

	let mut writer = ListWriter {
		out,
		element,
		remaining: len
	};

	filler(&mut writer);

	assert_eq!(writer.remaining, 0, "Attempted to end an incomplete ListWriter, {} element(s) remaining", writer.remaining);
}

pub struct ListWriter<'w, T: Output> {
	out: &'w mut T,
	element: Kind,
	remaining: usize
}

impl<'w, T> ListWriter<'w, T> where T: Output {
	fn element(&mut self, kind: Kind) {
		assert_eq!(self.element, kind, "Wrong element kind for this list");
		assert_ne!(self.remaining, 0, "Too many elements written to list");

		self.remaining -= 1;
	}

	pub fn i8(&mut self, value: i8) -> &mut Self {
		self.element(Kind::Byte);
		self.out.push(value as u8);

		self
	}

	pub fn i16(&mut self, value: i16) -> &mut Self {
		self.element(Kind::Short);
		self.out.extend_from_slice(&value.to_be_bytes());

		self
	}

	pub fn i32(&mut self, value: i32) -> &mut Self {
		self.element(Kind::Int);
		self.out.extend_from_slice(&value.to_be_bytes());

		self
	}

	pub fn i64(&mut self, value: i64) -> &mut Self {
		self.element(Kind::Long);
		self.out.extend_from_slice(&value.to_be_bytes());

		self
	}

	pub fn f32(&mut self, value: f32) -> &mut Self {
		self.element(Kind::Float);
		self.out.extend_from_slice(&value.to_bits().to_be_bytes());

		self
	}

	pub fn f64(&mut self, value: f64) -> &mut Self {
		self.element(Kind::Double);
		self.out.extend_from_slice(&value.to_bits().to_be_bytes());

		self
	}

	pub fn string(&mut self, value: &str) -> &mut Self {
		self.element(Kind::String);
		string(self.out, value);

		self
	}

	pub fn u8_array(&mut self, value: &[u8]) -> &mut Self {
		self.element(Kind::ByteArray);
		array_length(self.out, value.len());
		self.out.extend_from_slice(value);

		self
	}

	pub fn i32_array(&mut self, value: &[i32]) -> &mut Self {
		self.element(Kind::IntArray);
		ints(self.out, value);

		self
	}

	pub fn list<F>(&mut self, element: Kind, len: usize, filler: F) -> &mut Self where F: FnOnce(&mut ListWriter<T>) {
		self.element(Kind::List);
		list(self.out, element, len, filler);

		self
	}

	pub fn compound<F>(&mut self, filler: F) -> &mut Self where F: FnOnce(&mut CompoundWriter<&mut T>) {
		self.element(Kind::Compound);

		let mut writer = CompoundWriter {
			// re-borrow the output
			out: &mut *self.out
		};

		filler(&mut writer);

		writer.end();

		self
	}
}
