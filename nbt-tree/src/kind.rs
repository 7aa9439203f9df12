use std::fmt::{self, Display, Formatter};

/// The kind of a tag, as stored in the leading byte of each tag.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
	End,
	Byte,
	Short,
	Int,
	Long,
	Float,
	Double,
	ByteArray,
	String,
	List,
	Compound,
	IntArray
}

impl Kind {
	pub fn from_id(id: u8) -> Option<Self> {
		Some(match id {
			0 => Kind::End,
			1 => Kind::Byte,
			2 => Kind::Short,
			3 => Kind::Int,
			4 => Kind::Long,
			5 => Kind::Float,
			6 => Kind::Double,
			7 => Kind::ByteArray,
			8 => Kind::String,
			9 => Kind::List,
			10 => Kind::Compound,
			11 => Kind::IntArray,
			_ => return None
		})
	}

	pub fn id(self) -> u8 {
		self as u8
	}

	pub fn name(self) -> &'static str {
		match self {
			Kind::End => "End",
			Kind::Byte => "Byte",
			Kind::Short => "Short",
			Kind::Int => "Int",
			Kind::Long => "Long",
			Kind::Float => "Float",
			Kind::Double => "Double",
			Kind::ByteArray => "ByteArray",
			Kind::String => "String",
			Kind::List => "List",
			Kind::Compound => "Compound",
			Kind::IntArray => "IntArray"
		}
	}
}

impl Display for Kind {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod test {
	use super::Kind;

	#[test]
	fn test_ids_round_trip() {
		for id in 0..=11 {
			let kind = Kind::from_id(id).unwrap();

			assert_eq!(kind.id(), id);
		}
	}

	#[test]
	fn test_unknown_ids() {
		assert_eq!(Kind::from_id(12), None);
		assert_eq!(Kind::from_id(0x7F), None);
		assert_eq!(Kind::from_id(0xFF), None);
	}
}
