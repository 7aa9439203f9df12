use crate::{required, Result};
use nbt_tree::Compound;

/// Numeric block id and 4-bit metadata, as stored in pre-flattening sections.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Block {
	/// Combination of the `Blocks` byte and the `Add` nibble.
	pub id: i16,
	/// Only the low 4 bits are used.
	pub data: i8
}

impl Block {
	pub const AIR: Block = Block { id: 0, data: 0 };

	pub fn new(id: i16, data: i8) -> Self {
		Block { id, data }
	}
}

/// Extracts the 4 bit value at `index` from an array holding two per byte,
/// low nibble first.
pub fn nibble(array: &[u8], index: usize) -> u8 {
	let byte = array[index / 2];

	if index % 2 == 0 {
		byte & 0x0F
	} else {
		byte >> 4
	}
}

/// A 16x16x16 slice of a column.
#[derive(Debug, Copy, Clone)]
pub struct Section<'t> {
	y: i8,
	blocks: &'t [u8],
	add: Option<&'t [u8]>,
	data: &'t [u8]
}

impl<'t> Section<'t> {
	pub fn new(compound: &'t Compound) -> Result<Self> {
		let y = required(compound.get_i8("Y"), "Y")?;
		let blocks = required(compound.get_bytes("Blocks"), "Blocks")?;
		let data = required(compound.get_bytes("Data"), "Data")?;
		let add = compound.get_bytes("Add")?;

		check_len("Blocks", blocks, 4096)?;
		check_len("Data", data, 2048)?;

		if let Some(add) = add {
			check_len("Add", add, 2048)?;
		}

		Ok(Section { y, blocks, add, data })
	}

	/// Index of this section within the column, counted in 16 block steps from the bottom.
	pub fn y(&self) -> i8 {
		self.y
	}

	pub fn blocks(&self) -> &'t [u8] {
		self.blocks
	}

	pub fn add(&self) -> Option<&'t [u8]> {
		self.add
	}

	pub fn data(&self) -> &'t [u8] {
		self.data
	}

	/// Gets the block at section-local coordinates.
	/// # Panics
	/// If X, Y, or Z is greater than or equal to 16, the function will panic.
	pub fn block(&self, x: usize, y: usize, z: usize) -> Block {
		if x >= 16 || y >= 16 || z >= 16 {
			panic!("Block position out of bounds in section: {}, {}, {}", x, y, z)
		}

		let index = (y * 16 + z) * 16 + x;
		let high = self.add.map(|add| nibble(add, index)).unwrap_or(0);

		Block {
			id: (self.blocks[index] as i16) | ((high as i16) << 8),
			data: nibble(self.data, index) as i8
		}
	}
}

fn check_len(name: &'static str, array: &[u8], expected: usize) -> Result<()> {
	if array.len() != expected {
		return Err(crate::ColumnError::Length { name, expected, found: array.len() });
	}

	Ok(())
}
