use flate2::Compression;
use flate2::write::ZlibEncoder;
use folio_object::{Array, Dict, Name, Object, PdfString, Reference};
use std::io::Write;

pub(crate) trait WriteDirect {
    fn write_direct(&self, buf: &mut Vec<u8>);
}

impl WriteDirect for Object {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Null => buf.extend_from_slice(b"null"),
            Self::Boolean(b) => b.write_direct(buf),
            Self::Integer(i) => i.write_direct(buf),
            Self::Real(r) => r.write_direct(buf),
            Self::String(s) => s.write_direct(buf),
            Self::Name(n) => n.write_direct(buf),
            Self::Array(a) => a.write_direct(buf),
            Self::Dict(d) => d.write_direct(buf),
            Self::Reference(r) => r.write_direct(buf),
            Self::RawData(data) => buf.extend_from_slice(data),
        }
    }
}

impl WriteDirect for bool {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(if *self { b"true" } else { b"false" });
    }
}

impl WriteDirect for i64 {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.to_string().as_bytes());
    }
}

impl WriteDirect for f64 {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        // PDF has no exponent notation, which `Display` for floats never uses either.
        if self.is_finite() {
            buf.extend_from_slice(self.to_string().as_bytes());
        } else {
            buf.push(b'0');
        }
    }
}

impl WriteDirect for Reference {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.to_string().as_bytes());
    }
}

impl WriteDirect for Name {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        buf.push(b'/');

        for &b in self.iter() {
            if is_regular_name_byte(b) {
                buf.push(b);
            } else {
                buf.push(b'#');
                push_hex(buf, b);
            }
        }
    }
}

impl WriteDirect for PdfString {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        if self.is_hex() {
            buf.push(b'<');

            for &b in self.data() {
                push_hex(buf, b);
            }

            buf.push(b'>');
        } else {
            buf.push(b'(');

            for &b in self.data() {
                match b {
                    b'\\' | b'(' | b')' => buf.extend_from_slice(&[b'\\', b]),
                    b'\r' => buf.extend_from_slice(b"\\r"),
                    b'\n' => buf.extend_from_slice(b"\\n"),
                    _ => buf.push(b),
                }
            }

            buf.push(b')');
        }
    }
}

impl WriteDirect for Array {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        buf.push(b'[');

        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                buf.push(b' ');
            }

            item.write_direct(buf);
        }

        buf.push(b']');
    }
}

impl WriteDirect for Dict {
    fn write_direct(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(b"<<");

        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                buf.push(b' ');
            }

            key.write_direct(buf);
            buf.push(b' ');
            value.write_direct(buf);
        }

        buf.extend_from_slice(b">>");
    }
}

fn is_regular_name_byte(b: u8) -> bool {
    matches!(b, b'!'..=b'~')
        && !matches!(
            b,
            b'#' | b'%' | b'(' | b')' | b'/' | b'<' | b'>' | b'[' | b']' | b'{' | b'}'
        )
}

fn push_hex(buf: &mut Vec<u8>, b: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    buf.push(HEX[usize::from(b >> 4)]);
    buf.push(HEX[usize::from(b & 0xF)]);
}

pub(crate) fn deflate_encode(data: &[u8]) -> std::io::Result<Vec<u8>> {
    const COMPRESSION_LEVEL: u32 = 6;

    let mut e = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    e.write_all(data)?;
    e.finish()
}
