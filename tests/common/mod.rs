//! Builders for synthetic logger tables

use std::fs;
use std::path::{Path, PathBuf};

pub const ACTIVE: u8 = b' ';
pub const DELETED: u8 = b'*';
pub const END_OF_DATA: u8 = 0x1A;

/// Field layout of the logger's float table
pub const FLOAT_FIELDS: [(&str, u8, u8); 7] = [
    ("Date", b'D', 8),
    ("Time", b'C', 8),
    ("Millitm", b'N', 3),
    ("TagIndex", b'N', 5),
    ("Value", b'B', 8),
    ("Status", b'C', 1),
    ("Marker", b'C', 1),
];

/// Table prefix and field descriptors for `(name, type, length)` fields
pub fn table_header(fields: &[(&str, u8, u8)]) -> Vec<u8> {
    let header_len = 32 * (fields.len() + 1) + 1;
    let record_len: usize = 1 + fields.iter().map(|f| f.2 as usize).sum::<usize>();

    let mut bytes = vec![0u8; 32];
    bytes[0] = 0x03;
    bytes[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
    bytes[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());
    for (name, field_type, length) in fields {
        let mut descriptor = [0u8; 32];
        descriptor[..name.len()].copy_from_slice(name.as_bytes());
        descriptor[11] = *field_type;
        descriptor[16] = *length;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(0x0D);
    bytes
}

/// One float-table record for `tag` at `date`/`time`
pub fn float_record(marker: u8, date: &str, time: &str, tag: usize, value: f64) -> Vec<u8> {
    let mut bytes = vec![marker];
    bytes.extend_from_slice(date.as_bytes());
    bytes.extend_from_slice(time.as_bytes());
    bytes.extend_from_slice(b"000");
    bytes.extend_from_slice(format!("{:>5}", tag).as_bytes());
    bytes.extend_from_slice(&value.to_le_bytes());
    bytes.extend_from_slice(b"UM");
    bytes
}

/// Float table whose cycles hold `values[cycle][tag]`, one second apart
pub fn float_table(values: &[Vec<f64>]) -> Vec<u8> {
    let mut bytes = table_header(&FLOAT_FIELDS);
    for (cycle, readings) in values.iter().enumerate() {
        let time = format!("08:00:{:02}", cycle);
        for (tag, value) in readings.iter().enumerate() {
            bytes.extend(float_record(ACTIVE, "20261019", &time, tag, *value));
        }
    }
    bytes.push(END_OF_DATA);
    bytes
}

/// Tag-name table listing `names` in index order
pub fn tagname_table(names: &[&str]) -> Vec<u8> {
    let mut bytes = table_header(&[("Tagname", b'C', 40), ("TTagIndex", b'N', 5)]);
    for (index, name) in names.iter().enumerate() {
        bytes.push(ACTIVE);
        bytes.extend_from_slice(format!("{:<40}", name).as_bytes());
        bytes.extend_from_slice(format!("{:>5}", index).as_bytes());
    }
    bytes.push(END_OF_DATA);
    bytes
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("Failed to write test input");
    path
}
