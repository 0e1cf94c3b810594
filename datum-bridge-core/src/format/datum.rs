//! The tagged datum word
//!
//! A datum is a fixed-width word that either holds a primitive inline or
//! points at out-of-line storage. It can only be interpreted together with
//! its type identifier.

/// Opaque host value word
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Datum(u64);

impl Datum {
    /// The all-zero word
    pub const NULL: Datum = Datum(0);

    /// Wrap a raw word
    pub const fn from_word(word: u64) -> Self {
        Datum(word)
    }

    /// Get the raw word
    pub const fn word(self) -> u64 {
        self.0
    }

    /// Datum referring to out-of-line storage
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Datum(ptr as usize as u64)
    }

    /// Interpret the word as a pointer
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as usize as *const T
    }

    /// Interpret the word as a mutable pointer
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as usize as *mut T
    }

    pub const fn from_bool(value: bool) -> Self {
        Datum(value as u64)
    }

    // Signed values are sign-extended into the word.
    pub const fn from_i16(value: i16) -> Self {
        Datum(value as i64 as u64)
    }

    pub const fn from_i32(value: i32) -> Self {
        Datum(value as i64 as u64)
    }

    pub const fn from_i64(value: i64) -> Self {
        Datum(value as u64)
    }

    pub fn from_f32(value: f32) -> Self {
        Datum(value.to_bits() as u64)
    }

    pub fn from_f64(value: f64) -> Self {
        Datum(value.to_bits())
    }

    /// Any non-zero word is true
    pub const fn as_bool(self) -> bool {
        self.0 != 0
    }

    pub const fn as_i16(self) -> i16 {
        self.0 as i16
    }

    pub const fn as_i32(self) -> i32 {
        self.0 as i32
    }

    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub fn as_f32(self) -> f32 {
        f32::from_bits(self.0 as u32)
    }

    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}
