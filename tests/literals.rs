//! Literal parser tests: integers, floats, booleans and strings.

use quson::{
    parse_bool_literal, parse_float_literal, parse_int_literal, parse_string_literal, ErrorKind,
};

#[cfg(test)]
mod int_tests {
    use super::*;

    #[test]
    fn integers_parse_across_the_full_range() {
        let cases: Vec<(&[u8], i64)> = vec![
            (b"0", 0),
            (b"42", 42),
            (b"-7", -7),
            (b"9223372036854775807", i64::MAX),
            (b"-9223372036854775808", i64::MIN),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_int_literal(input).expect("parse"), expected);
        }
    }

    #[test]
    fn integer_errors_name_their_cause() {
        let overflow = parse_int_literal(b"999999999999999999999").expect_err("overflow");
        assert_eq!(overflow.kind, ErrorKind::Overflow);

        let above_max = parse_int_literal(b"9223372036854775808").expect_err("overflow");
        assert_eq!(above_max.kind, ErrorKind::Overflow);

        assert!(parse_int_literal(b"").is_err());
        assert!(parse_int_literal(b"12a3").is_err());
        assert!(parse_int_literal(b"1.5").is_err());
    }

    #[test]
    fn integers_round_trip_through_their_text() {
        for value in [0i64, 1, -1, 999, i64::MAX, i64::MIN, 1 << 40] {
            let text = value.to_string();
            assert_eq!(parse_int_literal(text.as_bytes()).expect("parse"), value);
        }
    }
}

#[cfg(test)]
mod float_tests {
    use super::*;

    #[test]
    fn floats_parse_with_fractions_and_exponents() {
        let cases: Vec<(&[u8], f64)> = vec![
            (b"0", 0.0),
            (b"1e6", 1_000_000.0),
            (b"1E6", 1_000_000.0),
            (b"1e+3", 1_000.0),
            (b"-2.5e-2", -0.025),
            (b"10.25", 10.25),
            (b".5", 0.5),
            (b"-0.0", -0.0),
            (b"1e100", 1e100),
            (b"18446744073709551615", 18_446_744_073_709_551_615.0),
        ];
        for (input, expected) in cases {
            let got = parse_float_literal(input).expect("parse");
            assert_eq!(got, expected, "input: {input:?}");
        }
    }

    #[test]
    fn out_of_range_exponents_decode_to_zero() {
        // Fast-path misses are translated to 0.0, not an error.
        assert_eq!(parse_float_literal(b"1E400").expect("quirk"), 0.0);
        assert_eq!(parse_float_literal(b"1e-400").expect("quirk"), 0.0);
    }

    #[test]
    fn malformed_floats_are_rejected() {
        let cases: Vec<&[u8]> = vec![
            b"",
            b"123.45.6",
            b"12x",
            b"1e",
            b"1e1.5",
            b"1ee4",
        ];
        for input in cases {
            assert!(parse_float_literal(input).is_err(), "input: {input:?}");
        }
    }
}

#[cfg(test)]
mod bool_and_string_tests {
    use super::*;

    #[test]
    fn booleans_accept_exact_words_only() {
        assert!(parse_bool_literal(b"true").expect("true"));
        assert!(!parse_bool_literal(b"false").expect("false"));
        for bad in [&b"True"[..], b"TRUE", b"1", b"", b"truth"] {
            assert!(parse_bool_literal(bad).is_err());
        }
    }

    #[test]
    fn string_literals_decode_escapes() {
        assert_eq!(parse_string_literal(b"plain").expect("parse"), "plain");
        assert_eq!(parse_string_literal(br"a\nb").expect("parse"), "a\nb");
        assert_eq!(
            parse_string_literal("smile 😀".as_bytes()).expect("parse"),
            "smile \u{1F600}"
        );
        assert_eq!(
            parse_string_literal(br"pair \ud83d\ude00").expect("parse"),
            "pair \u{1F600}"
        );
        assert!(parse_string_literal(br"broken \q").is_err());
    }
}
