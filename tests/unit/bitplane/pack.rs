use super::*;

#[test]
fn packs_msb_first_across_rows() {
    let bits = [
        true, false, false, false, false, false, false, true, // 0x81
        false, true, true, true, true, true, true, true, // 0x7F
    ];
    assert_eq!(pack_bits(&bits).unwrap(), vec![0x81, 0x7F]);
    assert_eq!(unpack_bits(&[0x81, 0x7F], 16).unwrap(), bits.to_vec());
}

#[test]
fn rejects_lengths_that_do_not_pack() {
    assert!(matches!(pack_bits(&[true; 7]), Err(InkError::Input(_))));
    assert!(matches!(unpack_bits(&[0xFF], 7), Err(InkError::Input(_))));
    assert!(matches!(unpack_bits(&[0xFF], 16), Err(InkError::Input(_))));
    assert_eq!(pack_bits(&[]).unwrap(), Vec::<u8>::new());
}

#[test]
fn hex_listing_wraps_every_sixteen_bytes() {
    let bytes: Vec<u8> = (0..18).collect();
    let listing = to_hex_listing(&bytes);
    let lines: Vec<_> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0x00,0x01,"));
    assert!(lines[0].ends_with("0x0F,"));
    assert_eq!(lines[1], "0x10,0x11,");
    assert_eq!(to_hex_listing(&[0xAB]), "0xAB,\n");
}

#[test]
fn unpack_inverts_pack_for_varied_lengths() {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(7);
    for len in [0usize, 8, 64, 8 * 1024] {
        let bits: Vec<bool> = (0..len).map(|_| rng.r#gen::<bool>()).collect();
        let packed = pack_bits(&bits).unwrap();
        assert_eq!(packed.len(), len / 8);
        assert_eq!(unpack_bits(&packed, len).unwrap(), bits);
    }
}
