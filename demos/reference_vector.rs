//! Runs the reference self-test: encodes the T.82 test sequence, prints the
//! coded stream as hex, then decodes the stream back.
//!
//! Usage: cargo run --example reference_vector [HEX_INPUT]

use qm_coder::{decode_bytes, encode_bytes};

const TEST_INPUT: [u8; 32] = [
    0x00, 0x02, 0x00, 0x51, 0x00, 0x00, 0x00, 0xC0, 0x03, 0x52, 0x87, 0x2A, 0xAA, 0xAA, 0xAA,
    0xAA, 0x82, 0xC0, 0x20, 0x00, 0xFC, 0xD7, 0x9E, 0xF6, 0x74, 0xEA, 0xAB, 0xF7, 0x69, 0x7E,
    0xE7, 0x4C,
];

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    if !text.is_ascii() || text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = match std::env::args().nth(1) {
        Some(arg) => parse_hex(&arg).ok_or("input must be an even-length hex string")?,
        None => TEST_INPUT.to_vec(),
    };

    println!("input:   {}", to_hex(&input));

    let coded = encode_bytes(&input)?;
    println!("encoded: {}", to_hex(&coded));

    // The decoder stops short of the EOI marker
    let decoded = decode_bytes(&coded[..coded.len() - 2])?;
    println!("decoded: {}", to_hex(&decoded));

    if decoded.starts_with(&input) {
        println!("round trip OK");
    } else {
        println!("round trip MISMATCH (trailing zero bytes may have been trimmed)");
    }
    Ok(())
}
