//! `FieldValue` / `Wire` for std types

use super::{FieldValue, Kind, Scalar, Wire};

impl FieldValue for () {}

impl Wire for () {
    fn kind() -> Kind {
        Kind::Unit
    }
}

impl FieldValue for bool {
    fn scalar(&self) -> Option<Scalar> {
        Some(Scalar::Bool(*self))
    }

    fn set_scalar(&mut self, value: Scalar) -> bool {
        match value {
            Scalar::Bool(b) => *self = b,
            Scalar::Int(v) => *self = v != 0,
            Scalar::Uint(v) => *self = v != 0,
            Scalar::Float(_) => return false,
        }
        true
    }
}

impl Wire for bool {
    fn kind() -> Kind {
        Kind::Bool
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $kind:ident, $variant:ident, $wide:ty);+ $(;)?) => {
        $(
            impl FieldValue for $ty {
                fn scalar(&self) -> Option<Scalar> {
                    Some(Scalar::$variant(*self as $wide))
                }

                fn set_scalar(&mut self, value: Scalar) -> bool {
                    // Truncating casts: the wire width decides, not the field.
                    match value {
                        Scalar::Int(v) => *self = v as $ty,
                        Scalar::Uint(v) => *self = v as $ty,
                        Scalar::Bool(b) => *self = b as $ty,
                        Scalar::Float(_) => return false,
                    }
                    true
                }
            }

            impl Wire for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }
            }
        )+
    };
}

impl_integer! {
    i8 => I8, Int, i64;
    i16 => I16, Int, i64;
    i32 => I32, Int, i64;
    i64 => I64, Int, i64;
    isize => Isize, Int, i64;
    u16 => U16, Uint, u64;
    u32 => U32, Uint, u64;
    u64 => U64, Uint, u64;
    usize => Usize, Uint, u64;
}

// u8 is spelled out: it is the one element type with a raw byte view.
impl FieldValue for u8 {
    fn scalar(&self) -> Option<Scalar> {
        Some(Scalar::Uint(*self as u64))
    }

    fn set_scalar(&mut self, value: Scalar) -> bool {
        match value {
            Scalar::Int(v) => *self = v as u8,
            Scalar::Uint(v) => *self = v as u8,
            Scalar::Bool(b) => *self = b as u8,
            Scalar::Float(_) => return false,
        }
        true
    }
}

impl Wire for u8 {
    fn kind() -> Kind {
        Kind::U8
    }

    fn slice_bytes(values: &[u8]) -> Option<&[u8]> {
        Some(values)
    }

    fn fill_from_bytes(values: &mut [u8], bytes: &[u8]) -> bool {
        if values.len() != bytes.len() {
            return false;
        }
        values.copy_from_slice(bytes);
        true
    }
}

macro_rules! impl_float {
    ($($ty:ty => $kind:ident);+ $(;)?) => {
        $(
            impl FieldValue for $ty {
                fn scalar(&self) -> Option<Scalar> {
                    Some(Scalar::Float(*self as f64))
                }

                fn set_scalar(&mut self, value: Scalar) -> bool {
                    match value {
                        Scalar::Float(v) => {
                            *self = v as $ty;
                            true
                        }
                        _ => false,
                    }
                }
            }

            impl Wire for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }
            }
        )+
    };
}

impl_float! {
    f32 => F32;
    f64 => F64;
}

impl FieldValue for String {
    fn bytes(&self) -> Option<&[u8]> {
        Some(self.as_bytes())
    }

    fn set_bytes(&mut self, bytes: &[u8]) -> bool {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                self.clear();
                self.push_str(s);
                true
            }
            Err(_) => false,
        }
    }

    fn seq_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Wire for String {
    fn kind() -> Kind {
        Kind::Str
    }
}

impl<T: Wire + Default> FieldValue for Vec<T> {
    fn bytes(&self) -> Option<&[u8]> {
        T::slice_bytes(self)
    }

    fn set_bytes(&mut self, bytes: &[u8]) -> bool {
        let mut values = Vec::with_capacity(bytes.len());
        values.resize_with(bytes.len(), T::default);
        if !T::fill_from_bytes(&mut values, bytes) {
            return false;
        }
        *self = values;
        true
    }

    fn seq_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn element(&self, index: usize) -> Option<&dyn FieldValue> {
        self.get(index).map(|v| v as &dyn FieldValue)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue> {
        self.get_mut(index).map(|v| v as &mut dyn FieldValue)
    }

    fn resize(&mut self, len: usize) -> bool {
        self.truncate(len);
        self.resize_with(len, T::default);
        true
    }
}

impl<T: Wire + Default> Wire for Vec<T> {
    fn kind() -> Kind {
        Kind::Slice(Box::new(T::kind()))
    }
}

impl<T: Wire + Default, const N: usize> FieldValue for [T; N] {
    fn bytes(&self) -> Option<&[u8]> {
        T::slice_bytes(self)
    }

    /// Copies up to `N` bytes and resets the remainder to defaults
    fn set_bytes(&mut self, bytes: &[u8]) -> bool {
        let n = bytes.len().min(N);
        if !T::fill_from_bytes(&mut self[..n], &bytes[..n]) {
            return false;
        }
        for value in &mut self[n..] {
            *value = T::default();
        }
        true
    }

    fn seq_len(&self) -> Option<usize> {
        Some(N)
    }

    fn element(&self, index: usize) -> Option<&dyn FieldValue> {
        self.get(index).map(|v| v as &dyn FieldValue)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue> {
        self.get_mut(index).map(|v| v as &mut dyn FieldValue)
    }

    fn resize(&mut self, len: usize) -> bool {
        len == N
    }
}

impl<T: Wire + Default, const N: usize> Wire for [T; N] {
    fn kind() -> Kind {
        Kind::Array(Box::new(T::kind()), N)
    }
}

impl<T: Wire> FieldValue for Box<T> {
    fn with_pointee(&self, f: &mut dyn FnMut(&dyn FieldValue)) -> bool {
        f(&**self);
        true
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn FieldValue> {
        Some(&mut **self)
    }
}

impl<T: Wire> Wire for Box<T> {
    fn kind() -> Kind {
        Kind::Pointer(Box::new(T::kind()))
    }
}

impl<T: Wire + Default> FieldValue for Option<Box<T>> {
    fn with_pointee(&self, f: &mut dyn FnMut(&dyn FieldValue)) -> bool {
        match self {
            Some(inner) => f(&**inner),
            None => {
                let placeholder = T::default();
                f(&placeholder);
            }
        }
        true
    }

    fn pointee_mut(&mut self) -> Option<&mut dyn FieldValue> {
        Some(&mut **self.get_or_insert_with(Box::default))
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: Wire + Default> Wire for Option<Box<T>> {
    fn kind() -> Kind {
        Kind::Pointer(Box::new(T::kind()))
    }
}
