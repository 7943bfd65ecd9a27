use super::*;

#[test]
fn crc32_known_answers() {
    // Standard check value for the reflected 0xEDB88320 polynomial.
    assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    assert_eq!(crc32(b""), 0);
    // The PNG spec's own example: CRC of the IEND chunk type with no data.
    assert_eq!(crc32(b"IEND"), 0xAE42_6082);
}

#[test]
fn crc32_streaming_matches_one_shot() {
    let mut c = Crc32::new();
    c.write_bytes(b"1234");
    c.write_bytes(b"56789");
    assert_eq!(c.finish(), crc32(b"123456789"));
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
}

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new(0xcbf2_9ce4_8422_2325);
    a.write_bytes(b"platen");
    let mut b = Fnv1a64::new(0xcbf2_9ce4_8422_2325);
    b.write_u8(b'p');
    b.write_bytes(b"laten");
    assert_eq!(a.finish(), b.finish());
}
