use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::debug;
use region::Region;
use std::fs::File;
use std::str::FromStr;

fn validate_coordinate(number: String) -> std::result::Result<(), String> {
	i32::from_str(&number).map(|_| ()).map_err(|parse| parse.to_string())
}

fn region_arg() -> Arg<'static, 'static> {
	Arg::with_name("region")
		.value_name("REGION")
		.help("Region file, named like r.<X>.<Z>.mca")
		.required(true)
}

fn coordinate_args() -> [Arg<'static, 'static>; 2] {
	[
		Arg::with_name("x")
			.value_name("X")
			.help("Chunk X within the region, wrapped modulo 32")
			.required(true)
			.allow_hyphen_values(true)
			.validator(validate_coordinate),
		Arg::with_name("z")
			.value_name("Z")
			.help("Chunk Z within the region, wrapped modulo 32")
			.required(true)
			.allow_hyphen_values(true)
			.validator(validate_coordinate)
	]
}

fn main() -> Result<()> {
	env_logger::init();

	let matches = App::new("Region Mapper")
		.version("0.1.0")
		.author("coderbot16 <coderbot16@gmail.com>")
		.about("Inspects the chunks stored in region files")
		.setting(AppSettings::SubcommandRequiredElseHelp)
		.subcommand(SubCommand::with_name("info")
			.about("Lists the chunks present in a region")
			.arg(region_arg()))
		.subcommand(SubCommand::with_name("dump")
			.about("Prints the NBT tree of a chunk")
			.arg(region_arg())
			.args(&coordinate_args()))
		.subcommand(SubCommand::with_name("heightmap")
			.about("Prints the height map of a chunk")
			.arg(region_arg())
			.args(&coordinate_args()))
		.get_matches();

	match matches.subcommand() {
		("info", Some(matches)) => info(matches),
		("dump", Some(matches)) => dump(matches),
		("heightmap", Some(matches)) => heightmap(matches),
		_ => unreachable!("clap requires a subcommand")
	}
}

fn open(matches: &ArgMatches) -> Result<Region<File>> {
	let path = matches.value_of("region").context("missing region path")?;

	debug!("Opening {}", path);

	Ok(Region::open(path)?)
}

fn coordinates(matches: &ArgMatches) -> Result<(i32, i32)> {
	let x = matches.value_of("x").context("missing X")?.parse()?;
	let z = matches.value_of("z").context("missing Z")?.parse()?;

	Ok((x, z))
}

fn info(matches: &ArgMatches) -> Result<()> {
	let region = open(matches)?;
	let chunks: Vec<_> = region.chunks().collect();

	println!("Region ({}, {}): {} chunk(s)", region.x(), region.z(), chunks.len());

	for (x, z) in chunks {
		let (x, z) = (x as i32, z as i32);

		if let Some(location) = region.location(x, z) {
			println!(
				"  ({:2}, {:2}) {:>24} | saved at {}",
				x, z, location.to_string(), region.timestamp(x, z).into_unix_seconds()
			);
		}
	}

	Ok(())
}

/// Reads and parses a chunk, or prints a notice and returns `None` if it is absent.
fn chunk(matches: &ArgMatches) -> Result<Option<(Region<File>, nbt_tree::Tag)>> {
	let mut region = open(matches)?;
	let (x, z) = coordinates(matches)?;

	let data = match region.chunk_data(x, z)? {
		Some(data) => data,
		None => {
			println!("Chunk ({}, {}) is not present in region ({}, {})", x, z, region.x(), region.z());
			return Ok(None);
		}
	};

	let tag = nbt_tree::parse(&data)
		.with_context(|| format!("failed to parse chunk ({}, {})", x, z))?;

	Ok(Some((region, tag)))
}

fn dump(matches: &ArgMatches) -> Result<()> {
	if let Some((_, tag)) = chunk(matches)? {
		print!("{}", tag.dump());
	}

	Ok(())
}

fn heightmap(matches: &ArgMatches) -> Result<()> {
	let (region, tag) = match chunk(matches)? {
		Some(chunk) => chunk,
		None => return Ok(())
	};

	let (x, z) = coordinates(matches)?;
	let (x, z) = region::wrap(x, z);
	let column = mca::Column::in_region(&tag, region.x(), region.z(), x, z)?;

	println!("Column ({}, {}):", column.x(), column.z());

	for row in column.height_map()?.chunks(16) {
		let line: Vec<String> = row.iter().map(|height| format!("{:3}", height)).collect();

		println!("{}", line.join(" "));
	}

	Ok(())
}
