/// Stands in for every byte or code point that cannot be converted.
pub const SENTINEL: char = '?';

/// Decodes UTF-8 into code points, replacing each byte of a malformed sequence with [`SENTINEL`].
pub fn decode(bytes: &[u8]) -> Box<[char]> {
	let mut chars = Vec::with_capacity(bytes.len());
	for chunk in bytes.utf8_chunks() {
		chars.extend(chunk.valid().chars());
		chars.extend(std::iter::repeat(SENTINEL).take(chunk.invalid().len()));
	}
	chars.into_boxed_slice()
}

/// Encodes UTF-32 code units as UTF-8, replacing surrogates and out-of-range units with [`SENTINEL`].
pub fn encode(units: impl IntoIterator<Item = u32>) -> String {
	units.into_iter().map(|unit| char::from_u32(unit).unwrap_or(SENTINEL)).collect()
}
