//! Decoder tests: tree shape, source fidelity and malformed input handling.

use bytes::Bytes;
use quson::{marshal, must, unmarshal, unmarshal_safe, ErrorKind, ValueType};

#[cfg(test)]
mod tree_shape_tests {
    use super::*;

    #[test]
    fn nested_arrays_keep_their_shape() {
        let root = must(unmarshal_safe(br#"[1,["1",[1,[1,2,3]]]]"#));

        assert_eq!(root.kind(), ValueType::Array);
        assert_eq!(root.size(), 2);
        assert_eq!(root.must_index(0).must_numeric(), 1.0);

        let inner = root.must_index(1);
        assert_eq!(inner.size(), 2);
        assert_eq!(inner.must_index(0).must_string(), "1");
        assert_eq!(inner.must_index(1).size(), 2);
    }

    #[test]
    fn scalar_roots_decode() {
        let cases: Vec<(&[u8], ValueType)> = vec![
            (b"null", ValueType::Null),
            (b"true", ValueType::Bool),
            (b"false", ValueType::Bool),
            (b"10.5", ValueType::Number),
            (b"-3", ValueType::Number),
            (br#""text""#, ValueType::String),
            (b"  42  ", ValueType::Number),
        ];

        for (input, expected) in cases {
            let root = must(unmarshal_safe(input));
            assert_eq!(root.kind(), expected, "input: {input:?}");
        }
    }

    #[test]
    fn object_members_are_indexed_by_name() {
        let root = must(unmarshal_safe(br#"{"a": 1, "b": {"c": [true, null]}}"#));

        assert!(root.has_key("a"));
        assert!(root.has_key("b"));
        assert!(!root.has_key("c"));
        assert_eq!(root.keys(), vec!["a".to_string(), "b".to_string()]);

        let c = root.must_key("b").must_key("c");
        assert_eq!(c.kind(), ValueType::Array);
        assert!(c.must_index(0).must_bool());
        assert!(c.must_index(1).is_null());
    }

    #[test]
    fn array_children_use_contiguous_index_keys() {
        let root = must(unmarshal_safe(b"[10, 20, 30]"));
        assert_eq!(
            root.keys(),
            vec!["0".to_string(), "1".to_string(), "2".to_string()]
        );
        for i in 0..3 {
            assert_eq!(root.must_index(i).index(), Some(i as usize));
        }
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let root = must(unmarshal_safe(br#"{"a": 1, "a": 2}"#));
        assert_eq!(root.size(), 1);
        assert_eq!(root.must_key("a").must_numeric(), 2.0);
    }

    #[test]
    fn keys_may_contain_escapes() {
        let root = must(unmarshal_safe(br#"{"a\nb": 1}"#));
        assert!(root.has_key("a\nb"));
    }
}

#[cfg(test)]
mod source_fidelity_tests {
    use super::*;

    #[test]
    fn unmodified_nodes_reproduce_their_source() {
        let data: &[u8] = br#"{"a": [1, 2e3],  "b" : "x"}"#;
        let root = must(unmarshal_safe(data));

        assert_eq!(root.source().expect("source").as_ref(), data);
        assert_eq!(marshal(&root).expect("marshal"), data);

        let a = root.must_key("a");
        assert_eq!(a.source().expect("source").as_ref(), b"[1, 2e3]");
        assert_eq!(marshal(&a).expect("marshal"), b"[1, 2e3]");
    }

    #[test]
    fn surrounding_whitespace_is_not_part_of_the_root() {
        let root = must(unmarshal_safe(b"  [1] \n"));
        assert_eq!(root.source().expect("source").as_ref(), b"[1]");
    }

    #[test]
    fn shared_buffer_decoding_is_zero_copy() {
        let data = Bytes::from_static(br#"{"n": 1234567890}"#);
        let root = must(unmarshal(data));
        assert_eq!(
            root.must_key("n").source().expect("source").as_ref(),
            b"1234567890"
        );
    }

    #[test]
    fn safe_decoding_survives_buffer_reuse() {
        let mut scratch = br#"{"k": "v"}"#.to_vec();
        let root = must(unmarshal_safe(&scratch));
        scratch.fill(b'!');
        assert_eq!(root.must_key("k").must_string(), "v");
    }
}

#[cfg(test)]
mod malformed_input_tests {
    use super::*;

    #[test]
    fn malformed_documents_are_rejected() {
        let cases: Vec<&[u8]> = vec![
            b"",
            b"   ",
            b"{",
            b"[1,",
            b"[1 2]",
            b"1 2",
            br#"{"a":}"#,
            br#"{"a" 1}"#,
            br#"{"a":1"#,
            b"[1,2,]x",
            b"tru",
            b"nul",
            br#""unterminated"#,
            b"{]",
            b"]",
            b",",
        ];

        for input in cases {
            assert!(unmarshal_safe(input).is_err(), "input: {input:?}");
        }
    }

    #[test]
    fn nesting_is_capped() {
        let too_deep = b"[".repeat(10_001);
        let err = unmarshal_safe(&too_deep).expect_err("depth limit");
        assert_eq!(err.kind, ErrorKind::NestingTooDeep);

        let mut deep_but_fine = b"[".repeat(2_000);
        deep_but_fine.extend_from_slice(b"1");
        deep_but_fine.extend(b"]".repeat(2_000));
        assert!(unmarshal_safe(&deep_but_fine).is_ok());
    }

    #[test]
    fn error_messages_carry_the_offset() {
        let err = unmarshal_safe(br#"{"a": 1} trailing"#).expect_err("trailing bytes");
        assert!(err.to_string().contains("index 9"), "{err}");
    }
}
