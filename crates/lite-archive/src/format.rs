use std::io::{self, Read, Seek};

/// Local file header signature every non-empty zip starts with.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Signature of the end-of-central-directory record; an empty zip is only this.
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

pub fn is_zip(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC) || data.starts_with(&ZIP_EMPTY_MAGIC)
}

/// Peek at the header and rewind. Inputs shorter than a signature are not zips.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    reader.rewind()?;
    Ok(filled == header.len() && is_zip(&header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detect_zip_format() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00];
        assert!(is_zip(&zip_header));
        assert!(is_zip(&ZIP_MAGIC));
        assert!(is_zip(&ZIP_EMPTY_MAGIC));
    }

    #[test]
    fn detect_unknown_format() {
        let random_data = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x00];
        assert!(!is_zip(&random_data));
        let gz_header = [0x1F, 0x8B, 0x08, 0x00];
        assert!(!is_zip(&gz_header));
    }

    #[test]
    fn detect_from_reader_rewinds() {
        let mut cursor = Cursor::new(vec![0x50, 0x4B, 0x03, 0x04, 0xAA]);
        assert!(detect_from_reader(&mut cursor).unwrap());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn detect_short_input() {
        let mut cursor = Cursor::new(vec![0x50, 0x4B]);
        assert!(!detect_from_reader(&mut cursor).unwrap());
        let mut empty = Cursor::new(Vec::new());
        assert!(!detect_from_reader(&mut empty).unwrap());
    }
}
