//! Object-file loader: hex record parsing and error reporting.

use std::io::Write;

use mips_core::Memory;
use mips_core::sim::loader;

#[test]
fn parses_hex_records() {
    let mut mem = Memory::new();
    let text = "00400000 24020005\n00400004 2403000a\n\n10000000 deadbeef\n";

    let words = loader::load_object_str(&mut mem, text).unwrap();

    assert_eq!(words, 3);
    assert_eq!(mem.read_32(0x0040_0000), 0x2402_0005);
    assert_eq!(mem.read_32(0x0040_0004), 0x2403_000a);
    assert_eq!(mem.read_32(0x1000_0000), 0xdead_beef);
}

#[test]
fn rejects_malformed_records() {
    let mut mem = Memory::new();

    assert!(loader::load_object_str(&mut mem, "00400000\n").is_err());
    assert!(loader::load_object_str(&mut mem, "00400000 1 2\n").is_err());
    let err = loader::load_object_str(&mut mem, "00400000 xyz\n").unwrap_err();
    assert!(format!("{err:#}").contains("line 1"));
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "00400000 3c081000").unwrap();
    writeln!(file, "00400004 8d090000").unwrap();
    file.flush().unwrap();

    let mut mem = Memory::new();
    let words = loader::load_object(&mut mem, file.path()).unwrap();

    assert_eq!(words, 2);
    assert_eq!(mem.read_32(0x0040_0000), 0x3c08_1000);
}

#[test]
fn missing_file_reports_path() {
    let mut mem = Memory::new();
    let err = loader::load_object(&mut mem, std::path::Path::new("/no/such/image.hex"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("image.hex"));
}

/// Unmapped addresses load harmlessly: the write is dropped and reads
/// return zero.
#[test]
fn unmapped_records_are_dropped() {
    let mut mem = Memory::new();
    loader::load_object_str(&mut mem, "60000000 12345678\n").unwrap();
    assert_eq!(mem.read_32(0x6000_0000), 0);
}
