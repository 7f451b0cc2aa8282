//! Helpers for inspecting written files in the integration tests.

use flate2::read::ZlibDecoder;
use std::io::Read;

/// One line of a cross-reference section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefLine {
    /// The object number the line belongs to.
    pub obj_number: u32,
    /// The byte offset for in-use entries, the next free object number for free ones.
    pub value: u64,
    /// The generation number.
    pub gen_number: u16,
    /// Whether the entry is an `n` entry.
    pub in_use: bool,
}

/// The byte offset stored after the last `startxref` keyword.
pub fn startxref(file: &[u8]) -> usize {
    let pos = rfind(file, b"startxref\n").expect("file has no startxref");
    let digits = &file[pos + b"startxref\n".len()..];
    let end = digits.iter().position(|b| !b.is_ascii_digit()).unwrap();

    std::str::from_utf8(&digits[..end]).unwrap().parse().unwrap()
}

/// Parse the cross-reference section starting at `offset`.
pub fn parse_xref(file: &[u8], offset: usize) -> Vec<XRefLine> {
    let text = std::str::from_utf8(&file[offset..]).expect("xref section is not ASCII");
    let mut lines = text.split('\n');
    assert_eq!(lines.next(), Some("xref"));

    let mut entries = Vec::new();

    while let Some(line) = lines.next() {
        if line == "trailer" {
            break;
        }

        let mut header = line.split(' ');
        let first: u32 = header.next().unwrap().parse().unwrap();
        let count: u32 = header.next().unwrap().parse().unwrap();

        for obj_number in first..first + count {
            let line = lines.next().unwrap();
            assert_eq!(line.len() + 1, folio_write::XREF_ENTRY_LEN);

            entries.push(XRefLine {
                obj_number,
                value: line[..10].parse().unwrap(),
                gen_number: line[11..16].parse().unwrap(),
                in_use: &line[17..18] == "n",
            });
        }
    }

    entries
}

/// The trailer dictionary following the cross-reference section at `offset`.
pub fn trailer(file: &[u8], offset: usize) -> String {
    let start = offset + find(&file[offset..], b"trailer\n").unwrap() + b"trailer\n".len();
    let end = start + find(&file[start..], b"\nstartxref").unwrap();

    String::from_utf8_lossy(&file[start..end]).into_owned()
}

/// The object written at `offset`, from its header up to and including `endobj`.
pub fn object_at(file: &[u8], offset: usize) -> &[u8] {
    let end = offset + find(&file[offset..], b"endobj\n").unwrap() + b"endobj".len();

    &file[offset..end]
}

/// The raw data between `stream` and `endstream` of a written object.
pub fn stream_data(object: &[u8]) -> &[u8] {
    let start = find(object, b"\nstream\n").unwrap() + b"\nstream\n".len();
    let end = rfind(object, b"\nendstream").unwrap();

    &object[start..end]
}

/// Decode zlib-compressed data.
pub fn inflate(data: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut decoded).unwrap();

    decoded
}

/// The position of the first occurrence of `needle`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
