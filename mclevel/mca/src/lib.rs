//! Accessors for the `Level` layout of Anvil chunk columns, read from a parsed
//! NBT tree.

use nbt_tree::{Compound, Tag};

mod section;

pub use section::{nibble, Block, Section};

pub type Result<T> = std::result::Result<T, ColumnError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
	#[error("missing required tag {0}")]
	Missing(&'static str),
	#[error("tag {name} has {found} entries, expected {expected}")]
	Length {
		name: &'static str,
		expected: usize,
		found: usize
	},
	#[error(transparent)]
	Nbt(#[from] nbt_tree::Error)
}

pub(crate) fn required<T>(value: nbt_tree::Result<Option<T>>, name: &'static str) -> Result<T> {
	value?.ok_or(ColumnError::Missing(name))
}

/// A 16x256x16 column of blocks, borrowed from a chunk's root tag.
#[derive(Debug, Copy, Clone)]
pub struct Column<'t> {
	root: &'t Compound,
	x: i64,
	z: i64
}

impl<'t> Column<'t> {
	/// Wraps the root tag of a chunk located at global chunk coordinates `x`, `z`.
	pub fn new(root: &'t Tag, x: i64, z: i64) -> Result<Self> {
		Ok(Column { root: root.value.as_compound()?, x, z })
	}

	/// Wraps the root tag of the chunk in slot `x`, `z` of region `region_x`, `region_z`.
	pub fn in_region(root: &'t Tag, region_x: i32, region_z: i32, x: u8, z: u8) -> Result<Self> {
		Column::new(root, region_x as i64 * 32 + x as i64, region_z as i64 * 32 + z as i64)
	}

	/// Global X coordinate, in chunks.
	pub fn x(&self) -> i64 {
		self.x
	}

	/// Global Z coordinate, in chunks.
	pub fn z(&self) -> i64 {
		self.z
	}

	pub fn root(&self) -> &'t Compound {
		self.root
	}

	/// Patch version of the NBT structure; absent for columns saved by 1.8.9 or below.
	pub fn version(&self) -> Result<Option<i32>> {
		Ok(self.root.get_i32("DataVersion")?)
	}

	pub fn level(&self) -> Result<&'t Compound> {
		required(self.root.get_compound("Level"), "Level")
	}

	/// One biome id per block column, indexed by `z * 16 + x`.
	pub fn biomes(&self) -> Result<&'t [u8]> {
		required(self.level()?.get_bytes("Biomes"), "Biomes")
	}

	/// Lowest Y at which sky light is at full strength, indexed by `z * 16 + x`.
	pub fn height_map(&self) -> Result<&'t [i32]> {
		let heights = required(self.level()?.get_ints("HeightMap"), "HeightMap")?;

		if heights.len() != 256 {
			return Err(ColumnError::Length { name: "HeightMap", expected: 256, found: heights.len() });
		}

		Ok(heights)
	}

	pub fn height(&self, x: usize, z: usize) -> Result<i32> {
		assert!(x < 16 && z < 16, "Column position out of bounds: {}, {}", x, z);

		Ok(self.height_map()?[z * 16 + x])
	}

	pub fn sections(&self) -> Result<Vec<Section<'t>>> {
		let list = required(self.level()?.get_list("Sections"), "Sections")?;

		list.compounds()?.map(Section::new).collect()
	}

	/// Index of the highest section in this column; above it there is only air.
	/// Zero when the column has no sections.
	pub fn max_section(&self) -> Result<i8> {
		Ok(self.sections()?.iter().map(Section::y).fold(0, i8::max))
	}

	pub fn section(&self, y: i8) -> Result<Option<Section<'t>>> {
		Ok(self.sections()?.into_iter().find(|section| section.y() == y))
	}

	/// Gets the block at column-local coordinates. Blocks in sections that
	/// were never saved are air.
	///
	/// # Panics
	/// Panics if `x` or `z` is 16 or more, whether or not the section exists.
	pub fn block_at(&self, x: usize, y: u8, z: usize) -> Result<Block> {
		assert!(x < 16 && z < 16, "Column position out of bounds: {}, {}", x, z);

		let section = match self.section((y / 16) as i8)? {
			Some(section) => section,
			None => return Ok(Block::AIR)
		};

		Ok(section.block(x, (y % 16) as usize, z))
	}
}

#[cfg(test)]
mod test {
	use super::{Block, Column, ColumnError};
	use nbt_tree::writer::CompoundWriter;
	use nbt_tree::{Kind, Tag};

	fn column_data() -> Vec<u8> {
		let heightmap: Vec<i32> = (0..256).collect();
		let biomes: Vec<u8> = (0..=255).collect();

		let mut blocks = vec![0; 4096];
		// (x: 2, y: 5, z: 1) within the section
		blocks[(5 * 16 + 1) * 16 + 2] = 7;

		CompoundWriter::write("", Vec::new(), |writer| {
			writer.i32("DataVersion", 1343).compound("Level", |level| {
				level
					.i32("xPos", 33)
					.i32("zPos", -1)
					.u8_array("Biomes", &biomes)
					.i32_array("HeightMap", &heightmap)
					.list("Sections", Kind::Compound, 2, |sections| {
						sections
							.compound(|section| {
								section
									.i8("Y", 3)
									.u8_array("Blocks", &blocks)
									.u8_array("Data", &[0; 2048]);
							})
							.compound(|section| {
								section
									.i8("Y", 0)
									.u8_array("Blocks", &[1; 4096])
									.u8_array("Data", &[0; 2048]);
							});
					});
			});
		})
	}

	fn parse() -> Tag {
		nbt_tree::parse(&column_data()).unwrap()
	}

	#[test]
	fn test_child_by_name() {
		let tag = parse();
		let root = tag.value.as_compound().unwrap();
		let level = root.get("Level").unwrap().value.as_compound().unwrap();

		assert_eq!(level.get("Biomes").unwrap().kind(), Kind::ByteArray);
		assert_eq!(level.get("Biomes").unwrap().name(), "Biomes");
		assert!(level.get("Missing").is_none());
	}

	#[test]
	fn test_accessors() {
		let tag = parse();
		let column = Column::in_region(&tag, 1, -1, 1, 31).unwrap();

		assert_eq!((column.x(), column.z()), (33, -1));
		assert_eq!(column.version(), Ok(Some(1343)));
		assert_eq!(column.biomes().unwrap()[17], 17);
		assert_eq!(column.height(3, 2), Ok(35));
		assert_eq!(column.sections().unwrap().len(), 2);
		assert_eq!(column.max_section(), Ok(3));
	}

	#[test]
	fn test_block_at() {
		let tag = parse();
		let column = Column::new(&tag, 0, 0).unwrap();

		assert_eq!(column.block_at(2, 3 * 16 + 5, 1), Ok(Block::new(7, 0)));
		assert_eq!(column.block_at(2, 3 * 16 + 6, 1), Ok(Block::AIR));
		assert_eq!(column.block_at(9, 15, 9), Ok(Block::new(1, 0)));

		// Section 1 was never saved
		assert_eq!(column.block_at(0, 20, 0), Ok(Block::AIR));
	}

	#[test]
	fn test_missing_level() {
		let data = CompoundWriter::write("", Vec::new(), |writer| {
			writer.i32("DataVersion", 1);
		});
		let tag = nbt_tree::parse(&data).unwrap();
		let column = Column::new(&tag, 0, 0).unwrap();

		assert_eq!(column.level().unwrap_err(), ColumnError::Missing("Level"));
		assert_eq!(column.max_section().unwrap_err(), ColumnError::Missing("Level"));
	}

	#[test]
	fn test_wrong_kind() {
		let data = CompoundWriter::write("", Vec::new(), |writer| {
			writer.compound("Level", |level| {
				level.i32_array("Biomes", &[1, 2]);
			});
		});
		let tag = nbt_tree::parse(&data).unwrap();
		let column = Column::new(&tag, 0, 0).unwrap();

		assert_eq!(
			column.biomes().unwrap_err(),
			ColumnError::Nbt(nbt_tree::Error::TypeMismatch { expected: Kind::ByteArray, found: Kind::IntArray })
		);
	}

	#[test]
	fn test_empty_sections() {
		let data = CompoundWriter::write("", Vec::new(), |writer| {
			writer.compound("Level", |level| {
				level.list("Sections", Kind::Compound, 0, |_| ());
			});
		});
		let tag = nbt_tree::parse(&data).unwrap();
		let column = Column::new(&tag, 0, 0).unwrap();

		assert_eq!(column.max_section(), Ok(0));
		assert_eq!(column.block_at(4, 100, 4), Ok(Block::AIR));
	}

	#[test]
	fn test_far_region_coordinates() {
		let tag = parse();

		let column = Column::in_region(&tag, i32::MAX / 32 + 1, i32::MIN, 31, 0).unwrap();
		assert_eq!(column.x(), (i32::MAX as i64 / 32 + 1) * 32 + 31);
		assert_eq!(column.z(), i32::MIN as i64 * 32);

		let column = Column::in_region(&tag, i32::MAX, i32::MAX, 31, 31).unwrap();
		assert_eq!((column.x(), column.z()), (i32::MAX as i64 * 32 + 31, i32::MAX as i64 * 32 + 31));
	}

	#[test]
	#[should_panic]
	fn test_block_at_out_of_bounds_in_saved_section() {
		let tag = parse();
		let _ = Column::new(&tag, 0, 0).unwrap().block_at(16, 5, 0);
	}

	#[test]
	#[should_panic]
	fn test_block_at_out_of_bounds_in_missing_section() {
		let tag = parse();
		let _ = Column::new(&tag, 0, 0).unwrap().block_at(0, 20, 16);
	}
}
