use crate::error::{Result, TranscribeError};
use crate::types::{FieldDescriptor, TableHeader};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::debug;

/// Size of the fixed table prefix and of every field descriptor
const BLOCK_SIZE: usize = 32;
/// Byte closing the field descriptor list
const DESCRIPTOR_TERMINATOR: u8 = 0x0D;
/// Length of the NUL-padded name inside a descriptor
const NAME_LENGTH: usize = 11;

/// Decode a table header and leave `reader` positioned at the first record.
pub fn decode_table_header<R: Read + Seek>(reader: &mut R) -> Result<TableHeader> {
    reader.seek(SeekFrom::Start(0))?;

    let mut prefix = [0u8; BLOCK_SIZE];
    read_block(reader, &mut prefix, "table prefix")?;

    let version = prefix[0];
    let declared_records = u32::from_le_bytes([prefix[4], prefix[5], prefix[6], prefix[7]]);
    let header_byte_length = u16::from_le_bytes([prefix[8], prefix[9]]) as usize;
    let record_length = u16::from_le_bytes([prefix[10], prefix[11]]) as usize;

    let mut fields = Vec::new();
    loop {
        let mut lead = [0u8; 1];
        read_block(reader, &mut lead, "field descriptor list")?;
        if lead[0] == DESCRIPTOR_TERMINATOR {
            break;
        }

        let mut descriptor = [0u8; BLOCK_SIZE];
        descriptor[0] = lead[0];
        read_block(reader, &mut descriptor[1..], "field descriptor")?;

        let consumed = BLOCK_SIZE * (fields.len() + 2);
        if consumed > header_byte_length {
            return Err(TranscribeError::malformed_header(format!(
                "field descriptors overrun the declared header length of {} bytes",
                header_byte_length
            )));
        }

        fields.push(parse_descriptor(&descriptor)?);
    }

    if fields.is_empty() {
        return Err(TranscribeError::malformed_header("table declares no fields"));
    }

    let descriptor_block = BLOCK_SIZE * (fields.len() + 1) + 1;
    if header_byte_length < descriptor_block {
        return Err(TranscribeError::malformed_header(format!(
            "declared header length {} is shorter than its {} byte descriptor block",
            header_byte_length, descriptor_block
        )));
    }

    let header = TableHeader {
        version,
        declared_records,
        header_byte_length,
        fields,
    };

    // Declared record length counts the marker byte
    if record_length != header.record_width() + 1 {
        return Err(TranscribeError::malformed_header(format!(
            "declared record length {} does not match field widths ({} + 1 marker byte)",
            record_length,
            header.record_width()
        )));
    }

    debug!(
        version,
        fields = header.fields.len(),
        header_bytes = header_byte_length,
        record_bytes = record_length,
        "decoded table header"
    );

    reader.seek(SeekFrom::Start(header_byte_length as u64))?;
    Ok(header)
}

fn parse_descriptor(descriptor: &[u8; BLOCK_SIZE]) -> Result<FieldDescriptor> {
    let raw_name = &descriptor[..NAME_LENGTH];
    let name_end = raw_name.iter().position(|&b| b == 0).unwrap_or(NAME_LENGTH);
    // Single-byte code page; map bytes straight to chars
    let name: String = raw_name[..name_end].iter().map(|&b| b as char).collect();
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(TranscribeError::malformed_header("field descriptor has an empty name"));
    }

    let field_type = descriptor[11] as char;
    let byte_length = descriptor[16] as usize;
    if byte_length == 0 {
        return Err(TranscribeError::malformed_header(format!(
            "field '{}' has zero length",
            name
        )));
    }

    Ok(FieldDescriptor::new(name, field_type, byte_length))
}

fn read_block<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            TranscribeError::malformed_header(format!("truncated {}", what))
        } else {
            TranscribeError::Io(err)
        }
    })
}

/// Build a table prefix plus descriptors for `(name, type, length)` fields
#[cfg(test)]
pub(crate) fn header_bytes(fields: &[(&str, u8, u8)]) -> Vec<u8> {
    let header_len = BLOCK_SIZE * (fields.len() + 1) + 1;
    let record_len: usize = 1 + fields.iter().map(|f| f.2 as usize).sum::<usize>();

    let mut bytes = vec![0u8; BLOCK_SIZE];
    bytes[0] = 0x03;
    bytes[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
    bytes[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());

    for (name, field_type, length) in fields {
        let mut descriptor = [0u8; BLOCK_SIZE];
        descriptor[..name.len()].copy_from_slice(name.as_bytes());
        descriptor[11] = *field_type;
        descriptor[16] = *length;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(DESCRIPTOR_TERMINATOR);
    bytes
}
