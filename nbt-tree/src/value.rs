use crate::{Dump, Error, Kind, Result};
use std::slice;

/// A named node of the tree. Every tag except list elements and the End
/// sentinel has a name, which may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
	pub name: String,
	pub value: Value
}

impl Tag {
	pub fn new<N: Into<String>>(name: N, value: Value) -> Self {
		Tag { name: name.into(), value }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	pub fn kind(&self) -> Kind {
		self.value.kind()
	}

	/// Returns an adapter that prints the whole subtree, one node per line.
	pub fn dump(&self) -> Dump {
		Dump::new(self)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	ByteArray(Vec<u8>),
	String(String),
	List(List),
	Compound(Compound),
	IntArray(Vec<i32>)
}

macro_rules! copy_accessor {
	($name:ident, $variant:ident, $ty:ty) => {
		pub fn $name(&self) -> Result<$ty> {
			match *self {
				Value::$variant(value) => Ok(value),
				_ => Err(self.mismatch(Kind::$variant))
			}
		}
	};
}

impl Value {
	pub fn kind(&self) -> Kind {
		match self {
			Value::Byte(_) => Kind::Byte,
			Value::Short(_) => Kind::Short,
			Value::Int(_) => Kind::Int,
			Value::Long(_) => Kind::Long,
			Value::Float(_) => Kind::Float,
			Value::Double(_) => Kind::Double,
			Value::ByteArray(_) => Kind::ByteArray,
			Value::String(_) => Kind::String,
			Value::List(_) => Kind::List,
			Value::Compound(_) => Kind::Compound,
			Value::IntArray(_) => Kind::IntArray
		}
	}

	fn mismatch(&self, expected: Kind) -> Error {
		Error::TypeMismatch { expected, found: self.kind() }
	}

	copy_accessor!(as_i8, Byte, i8);
	copy_accessor!(as_i16, Short, i16);
	copy_accessor!(as_i32, Int, i32);
	copy_accessor!(as_i64, Long, i64);
	copy_accessor!(as_f32, Float, f32);
	copy_accessor!(as_f64, Double, f64);

	pub fn as_bytes(&self) -> Result<&[u8]> {
		match self {
			Value::ByteArray(bytes) => Ok(bytes),
			_ => Err(self.mismatch(Kind::ByteArray))
		}
	}

	pub fn as_str(&self) -> Result<&str> {
		match self {
			Value::String(string) => Ok(string),
			_ => Err(self.mismatch(Kind::String))
		}
	}

	pub fn as_list(&self) -> Result<&List> {
		match self {
			Value::List(list) => Ok(list),
			_ => Err(self.mismatch(Kind::List))
		}
	}

	pub fn as_compound(&self) -> Result<&Compound> {
		match self {
			Value::Compound(compound) => Ok(compound),
			_ => Err(self.mismatch(Kind::Compound))
		}
	}

	pub fn as_ints(&self) -> Result<&[i32]> {
		match self {
			Value::IntArray(ints) => Ok(ints),
			_ => Err(self.mismatch(Kind::IntArray))
		}
	}
}

/// A homogeneous sequence of anonymous values.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
	element: Kind,
	values: Vec<Value>
}

impl List {
	/// Creates a list, checking that every value has the declared element kind.
	/// An empty list may declare any element kind, including End.
	pub fn new(element: Kind, values: Vec<Value>) -> Result<Self> {
		if let Some(found) = values.iter().map(Value::kind).find(|&kind| kind != element) {
			return Err(Error::TypeMismatch { expected: element, found });
		}

		Ok(List { element, values })
	}

	pub fn empty() -> Self {
		List { element: Kind::End, values: Vec::new() }
	}

	/// Used by the reader, which only ever decodes values of the declared kind.
	pub(crate) fn from_parts(element: Kind, values: Vec<Value>) -> Self {
		List { element, values }
	}

	pub fn element_kind(&self) -> Kind {
		self.element
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	pub fn iter(&self) -> slice::Iter<'_, Value> {
		self.values.iter()
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// Iterates the elements of a list of compounds.
	///
	/// Empty lists are accepted regardless of their declared element kind.
	pub fn compounds(&self) -> Result<impl Iterator<Item = &Compound>> {
		if !self.values.is_empty() && self.element != Kind::Compound {
			return Err(Error::TypeMismatch { expected: Kind::Compound, found: self.element });
		}

		Ok(self.values.iter().filter_map(|value| match value {
			Value::Compound(compound) => Some(compound),
			_ => None
		}))
	}
}

impl<'a> IntoIterator for &'a List {
	type Item = &'a Value;
	type IntoIter = slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.values.iter()
	}
}

macro_rules! lookup {
	($name:ident, $accessor:ident, $ty:ty) => {
		pub fn $name(&self, name: &str) -> Result<Option<$ty>> {
			self.get(name).map(|tag| tag.value.$accessor()).transpose()
		}
	};
}

/// An ordered set of named children. The End marker that closes a compound on
/// the wire is never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
	children: Vec<Tag>
}

impl Compound {
	pub fn new() -> Self {
		Compound::default()
	}

	pub fn from_children(children: Vec<Tag>) -> Self {
		Compound { children }
	}

	pub fn push(&mut self, tag: Tag) {
		self.children.push(tag)
	}

	/// Finds the first child whose name is exactly `name`.
	pub fn get(&self, name: &str) -> Option<&Tag> {
		self.children.iter().find(|tag| tag.name == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.children.len()
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	pub fn iter(&self) -> slice::Iter<'_, Tag> {
		self.children.iter()
	}

	pub fn children(&self) -> &[Tag] {
		&self.children
	}

	lookup!(get_i8, as_i8, i8);
	lookup!(get_i16, as_i16, i16);
	lookup!(get_i32, as_i32, i32);
	lookup!(get_i64, as_i64, i64);
	lookup!(get_f32, as_f32, f32);
	lookup!(get_f64, as_f64, f64);
	lookup!(get_bytes, as_bytes, &[u8]);
	lookup!(get_str, as_str, &str);
	lookup!(get_list, as_list, &List);
	lookup!(get_compound, as_compound, &Compound);
	lookup!(get_ints, as_ints, &[i32]);
}

impl<'a> IntoIterator for &'a Compound {
	type Item = &'a Tag;
	type IntoIter = slice::Iter<'a, Tag>;

	fn into_iter(self) -> Self::IntoIter {
		self.children.iter()
	}
}

#[cfg(test)]
mod test {
	use super::{Compound, List, Tag, Value};
	use crate::{Error, Kind};

	fn chunk() -> Compound {
		let mut level = Compound::new();
		level.push(Tag::new("xPos", Value::Int(3)));

		let mut root = Compound::new();
		root.push(Tag::new("Level", Value::Compound(level)));
		root.push(Tag::new("Biomes", Value::ByteArray(vec![1, 2, 3])));
		root
	}

	#[test]
	fn test_child_by_name() {
		let root = chunk();

		assert_eq!(root.get("Level").unwrap().kind(), Kind::Compound);
		assert_eq!(root.get("Biomes").unwrap().value, Value::ByteArray(vec![1, 2, 3]));
		assert!(root.get("Missing").is_none());
	}

	#[test]
	fn test_names_are_case_sensitive() {
		let root = chunk();

		assert!(root.get("level").is_none());
		assert!(root.get("Level ").is_none());
	}

	#[test]
	fn test_first_duplicate_wins() {
		let root = Compound::from_children(vec![
			Tag::new("a", Value::Byte(1)),
			Tag::new("a", Value::Byte(2))
		]);

		assert_eq!(root.get_i8("a"), Ok(Some(1)));
	}

	#[test]
	fn test_absent_is_distinct_from_mismatch() {
		let root = chunk();

		assert_eq!(root.get_compound("Missing"), Ok(None));
		assert_eq!(root.get_bytes("Biomes"), Ok(Some(&[1u8, 2, 3][..])));
		assert_eq!(
			root.get_ints("Biomes"),
			Err(Error::TypeMismatch { expected: Kind::IntArray, found: Kind::ByteArray })
		);
	}

	#[test]
	fn test_no_numeric_coercion() {
		let value = Value::Short(7);

		assert_eq!(value.as_i16(), Ok(7));
		assert_eq!(value.as_i32(), Err(Error::TypeMismatch { expected: Kind::Int, found: Kind::Short }));
		assert_eq!(value.as_i8(), Err(Error::TypeMismatch { expected: Kind::Byte, found: Kind::Short }));
	}

	#[test]
	fn test_list_rejects_mixed_kinds() {
		let result = List::new(Kind::Int, vec![Value::Int(1), Value::Long(2)]);

		assert_eq!(result, Err(Error::TypeMismatch { expected: Kind::Int, found: Kind::Long }));
	}

	#[test]
	fn test_list_compounds() {
		let list = List::new(Kind::Compound, vec![Value::Compound(chunk()), Value::Compound(Compound::new())]).unwrap();

		assert_eq!(list.compounds().unwrap().count(), 2);

		let ints = List::new(Kind::Int, vec![Value::Int(1)]).unwrap();
		assert!(ints.compounds().is_err());

		assert_eq!(List::empty().compounds().unwrap().count(), 0);
	}

	#[test]
	fn test_iteration_order() {
		let root = chunk();
		let names: Vec<&str> = root.iter().map(Tag::name).collect();
		assert_eq!(names, ["Level", "Biomes"]);
		assert_eq!((&root).into_iter().count(), 2);

		let list = List::new(Kind::Short, vec![Value::Short(4), Value::Short(-2)]).unwrap();
		let shorts: Vec<i16> = list.iter().map(|value| value.as_i16().unwrap()).collect();
		assert_eq!(shorts, [4, -2]);
		assert_eq!((&list).into_iter().count(), 2);
	}
}
