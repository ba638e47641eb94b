//! `record!`: declare a struct and its accessor table in one place

/// Declare a record struct
///
/// Each field may carry an annotation after `=>`. The macro emits the
/// struct unchanged (attributes and visibility included) plus `Record`,
/// `FieldValue` and `Wire` implementations.
///
/// ```
/// use structpack_core::record;
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Header {
///         pub magic: [u8; 4],
///         pub version: u16 => "little",
///         pub count: u8 => "sizeof=entries",
///         pub entries: Vec<u32>,
///     }
/// }
/// ```
///
/// Sequence element types must implement `Default`, so nested records used
/// in `Vec`s or behind `Option<Box<_>>` usually derive it.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )+
        }

        impl $crate::Record for $name {
            fn fields() -> ::std::vec::Vec<$crate::FieldDecl> {
                ::std::vec![
                    $(
                        $crate::FieldDecl::of::<$ty>(
                            ::std::stringify!($field),
                            ::std::concat!("" $(, $tag)?),
                        )
                    ),+
                ]
            }

            fn record_type(&self) -> $crate::RecordType {
                $crate::RecordType::of::<Self>()
            }

            fn field(&self, index: usize) -> ::std::option::Option<&dyn $crate::FieldValue> {
                let fields = [$(&self.$field as &dyn $crate::FieldValue),+];
                fields.into_iter().nth(index)
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::std::option::Option<&mut dyn $crate::FieldValue> {
                let fields = [$(&mut self.$field as &mut dyn $crate::FieldValue),+];
                fields.into_iter().nth(index)
            }
        }

        impl $crate::FieldValue for $name {
            fn record(&self) -> ::std::option::Option<&dyn $crate::Record> {
                ::std::option::Option::Some(self)
            }

            fn record_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Record> {
                ::std::option::Option::Some(self)
            }
        }

        impl $crate::Wire for $name {
            fn kind() -> $crate::Kind {
                $crate::Kind::Record($crate::RecordType::of::<Self>())
            }
        }
    };
}
