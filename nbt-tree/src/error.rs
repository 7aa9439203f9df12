use crate::Kind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	/// The input ended before a value that a kind or length field promised.
	#[error("truncated stream at byte {position}: needed {needed} more byte(s), {available} available")]
	Truncated {
		position: usize,
		needed: usize,
		available: usize
	},
	#[error("invalid tag kind {id} at byte {position}")]
	InvalidKind {
		id: u8,
		position: usize
	},
	/// A length or count that no well-formed stream can contain.
	#[error("malformed length {length} at byte {position}")]
	MalformedLength {
		length: i32,
		position: usize
	},
	#[error("lists and compounds nested deeper than {0} levels")]
	DepthLimit(usize),
	/// The root of the stream was an End marker, so there is no tree to return.
	#[error("stream starts with an End marker")]
	UnexpectedEnd,
	#[error("expected a tag of kind {expected}, found {found}")]
	TypeMismatch {
		expected: Kind,
		found: Kind
	}
}
