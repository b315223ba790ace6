use super::*;

#[test]
fn parses_hex_in_either_case() {
    assert_eq!(HexColor::parse("#ff0000").unwrap(), HexColor::RED);
    assert_eq!(HexColor::parse("#00FF00").unwrap(), HexColor::GREEN);
    assert_eq!(
        HexColor::parse("#1a2B3c").unwrap(),
        HexColor::rgb(0x1a, 0x2b, 0x3c)
    );
}

#[test]
fn requires_the_leading_hash() {
    for bad in ["00ff00", " #00ff00", "#00ff00 ", "##00ff0"] {
        assert!(
            matches!(
                HexColor::parse(bad),
                Err(ColorLensError::InvalidColorFormat(_))
            ),
            "{bad}"
        );
    }
}

#[test]
fn rejects_wrong_length_and_non_hex() {
    for bad in ["", "#fff", "#ff00000", "#ff00zz", "#ÿÿÿ", "red"] {
        let err = HexColor::parse(bad).unwrap_err();
        assert!(
            matches!(err, ColorLensError::InvalidColorFormat(_)),
            "{bad}: {err}"
        );
    }
}

#[test]
fn displays_lowercase_with_hash() {
    assert_eq!(HexColor::rgb(0xAB, 0x01, 0xFF).to_string(), "#ab01ff");
}

#[test]
fn unit_rgb_spans_zero_to_one() {
    assert_eq!(HexColor::RED.to_unit_rgb(), [1.0, 0.0, 0.0]);
    let [r, g, b] = HexColor::rgb(0x80, 0x80, 0x80).to_unit_rgb();
    assert!((r - 128.0 / 255.0).abs() < 1e-12);
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn serde_uses_hex_strings() {
    let c: HexColor = serde_json::from_value(serde_json::json!("#336699")).unwrap();
    assert_eq!(c, HexColor::rgb(0x33, 0x66, 0x99));
    assert_eq!(serde_json::to_value(c).unwrap(), serde_json::json!("#336699"));
    assert!(serde_json::from_value::<HexColor>(serde_json::json!("#33669")).is_err());
}
