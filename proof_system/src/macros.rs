/// Implements `Valid`, `CanonicalSerialize` and `CanonicalDeserialize` for an enum whose variants
/// each wrap a single serializable value. The encoding is the variant's `u8` tag followed by the
/// encoding of the wrapped value. Tags must be unique.
#[macro_export]
macro_rules! impl_tagged_serialization {
    ($name: ident $(<$gen: ident: $bound: path>)? { $($variant: ident = $tag: literal),+ $(,)? }) => {
        impl$(<$gen: $bound>)? ark_serialize::Valid for $name$(<$gen>)? {
            fn check(&self) -> Result<(), ark_serialize::SerializationError> {
                match self {
                    $(Self::$variant(v) => ark_serialize::Valid::check(v)),+
                }
            }
        }

        impl$(<$gen: $bound>)? ark_serialize::CanonicalSerialize for $name$(<$gen>)? {
            fn serialize_with_mode<W: ark_std::io::Write>(
                &self,
                mut writer: W,
                compress: ark_serialize::Compress,
            ) -> Result<(), ark_serialize::SerializationError> {
                match self {
                    $(Self::$variant(v) => {
                        ark_serialize::CanonicalSerialize::serialize_with_mode(&$tag, &mut writer, compress)?;
                        ark_serialize::CanonicalSerialize::serialize_with_mode(v, &mut writer, compress)
                    }),+
                }
            }

            fn serialized_size(&self, compress: ark_serialize::Compress) -> usize {
                match self {
                    $(Self::$variant(v) => {
                        ark_serialize::CanonicalSerialize::serialized_size(&$tag, compress)
                            + ark_serialize::CanonicalSerialize::serialized_size(v, compress)
                    }),+
                }
            }
        }

        impl$(<$gen: $bound>)? ark_serialize::CanonicalDeserialize for $name$(<$gen>)? {
            fn deserialize_with_mode<R: ark_std::io::Read>(
                mut reader: R,
                compress: ark_serialize::Compress,
                validate: ark_serialize::Validate,
            ) -> Result<Self, ark_serialize::SerializationError> {
                let tag: u8 = ark_serialize::CanonicalDeserialize::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?;
                match tag {
                    $($tag => Ok(Self::$variant(
                        ark_serialize::CanonicalDeserialize::deserialize_with_mode(
                            &mut reader,
                            compress,
                            validate,
                        )?,
                    )),)+
                    _ => Err(ark_serialize::SerializationError::InvalidData),
                }
            }
        }
    };
}

/// Closure for `ParamSource::resolve` returning the value of the given `SetupParams` variant
macro_rules! setup_param_of {
    ($variant: ident) => {
        |sp| match sp {
            SetupParams::$variant(p) => Some(p),
            _ => None,
        }
    };
}
