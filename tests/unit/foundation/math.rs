use super::*;

#[test]
fn fnv_split_writes_hash_like_one_write() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"colorlens");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'c');
    b.write_bytes(b"olorlens");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn str_writes_are_length_prefixed() {
    let mut a = Fnv1a64::new_default();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new_default();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn clamp_finite_replaces_non_finite() {
    assert_eq!(clamp_finite(250.0, 50.0, 200.0, 100.0), 200.0);
    assert_eq!(clamp_finite(10.0, 50.0, 200.0, 100.0), 50.0);
    assert_eq!(clamp_finite(f64::NAN, 50.0, 200.0, 100.0), 100.0);
    assert_eq!(clamp_finite(f64::INFINITY, 0.0, 200.0, 100.0), 100.0);
}

#[test]
fn fmt_number_is_minimal() {
    assert_eq!(fmt_number(100.0), "100");
    assert_eq!(fmt_number(0.0), "0");
    assert_eq!(fmt_number(75.5), "75.5");
    assert_eq!(fmt_number(0.567), "0.567");
    assert_eq!(fmt_number(1.0 / 3.0), "0.333333");
    assert_eq!(fmt_number(-0.0000001), "0");
}
