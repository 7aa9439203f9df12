use crate::{Tag, Value};
use std::fmt::{self, Display, Formatter};

/// Prints a tag and its subtree, one node per line, indented by depth.
///
/// ```text
/// Compound(Level):
///  Int(xPos): 3
///  List(Pos) (Double): [
///   Double: 0.5
///  ]
/// ```
pub struct Dump<'a> {
	tag: &'a Tag
}

impl<'a> Dump<'a> {
	pub fn new(tag: &'a Tag) -> Self {
		Dump { tag }
	}
}

impl<'a> Display for Dump<'a> {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		node(f, Some(&self.tag.name), &self.tag.value, 0)
	}
}

fn node(f: &mut Formatter, name: Option<&str>, value: &Value, depth: usize) -> fmt::Result {
	write!(f, "{:indent$}{}", "", value.kind(), indent = depth)?;

	if let Some(name) = name {
		write!(f, "({})", name)?;
	}

	match value {
		Value::Byte(value) => writeln!(f, ": {}", value),
		Value::Short(value) => writeln!(f, ": {}", value),
		Value::Int(value) => writeln!(f, ": {}", value),
		Value::Long(value) => writeln!(f, ": {}", value),
		Value::Float(value) => writeln!(f, ": {}", value),
		Value::Double(value) => writeln!(f, ": {}", value),
		Value::String(value) => writeln!(f, ": {:?}", value),
		Value::ByteArray(values) => writeln!(f, ": {:?}", values),
		Value::IntArray(values) => writeln!(f, ": {:?}", values),
		Value::List(list) => {
			writeln!(f, " ({}): [", list.element_kind())?;

			for value in list {
				node(f, None, value, depth + 1)?;
			}

			writeln!(f, "{:indent$}]", "", indent = depth)
		},
		Value::Compound(compound) => {
			writeln!(f, ":")?;

			for child in compound {
				node(f, Some(&child.name), &child.value, depth + 1)?;
			}

			Ok(())
		}
	}
}
