/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Concatenates provided byte slices and hashes result to a point on the curve. Returns as Affine coordinates.
/// Expects the digest type to be in scope as `D`.
#[macro_export]
macro_rules! affine_group_element_from_byte_slices {
    ($($arg: expr),+) => {
        $crate::hashing_utils::affine_group_elem_from_try_and_incr::<_, D>(&$crate::concat_slices!($($arg),+))
    };
}

/// Return `$error` if `$left` not equals `$right`
#[macro_export]
macro_rules! expect_equality {
    ($left: expr, $right: expr, $error: expr) => {
        if $left != $right {
            return Err($error($left, $right));
        }
    };
}

/// Sum of an iterator of group or field elements, parallel when the `parallel` feature is enabled
#[macro_export]
macro_rules! cfg_iter_sum {
    ($iter: expr, $zero: expr) => {{
        #[cfg(feature = "parallel")]
        let s = $iter.reduce($zero, |a, b| a + b);
        #[cfg(not(feature = "parallel"))]
        let s = $iter.fold($zero(), |a, b| a + b);
        s
    }};
}

/// Asserts that `$obj` is unchanged by a round trip through the compressed and uncompressed canonical encodings,
/// JSON and MessagePack. For tests, so the calling crate needs `serde_json` and `rmp-serde`.
#[macro_export]
macro_rules! test_serialization {
    ($obj_type: ty, $obj: expr) => {
        let compressed = ark_serialize::CanonicalSerialize::compressed_size(&$obj);
        let mut bytes = vec![];
        ark_serialize::CanonicalSerialize::serialize_compressed(&$obj, &mut bytes).unwrap();
        assert_eq!(bytes.len(), compressed);
        let decoded: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_compressed(&bytes[..]).unwrap();
        assert_eq!(decoded, $obj);

        let mut bytes = vec![];
        ark_serialize::CanonicalSerialize::serialize_uncompressed(&$obj, &mut bytes).unwrap();
        let decoded: $obj_type =
            ark_serialize::CanonicalDeserialize::deserialize_uncompressed(&bytes[..]).unwrap();
        assert_eq!(decoded, $obj);

        let json = serde_json::to_string(&$obj).unwrap();
        assert_eq!(serde_json::from_str::<$obj_type>(&json).unwrap(), $obj);

        let msgpack = rmp_serde::to_vec_named(&$obj).unwrap();
        assert_eq!(rmp_serde::from_slice::<$obj_type>(&msgpack).unwrap(), $obj);
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn equality() {
        #[derive(Debug)]
        enum Errr {
            #[allow(dead_code)]
            Unequal(usize, usize),
        }

        fn test_fn(s: usize) -> Result<usize, Errr> {
            let v = vec![1, 2, 4];
            expect_equality!(v.len(), s, Errr::Unequal);
            Ok(s)
        }

        assert!(test_fn(3).is_ok());
        assert!(test_fn(2).is_err());
    }

    #[test]
    fn concat() {
        let a = [1u8, 2];
        let b = vec![3u8];
        assert_eq!(concat_slices!(a, b, b"xy"), vec![1, 2, 3, b'x', b'y']);
    }
}
