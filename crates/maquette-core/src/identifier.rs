//! Room identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`RoomId`] type with an efficient string-interner based approach.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Efficient room identifier using string interning.
///
/// Room identifiers are stable across a generation run: graph nodes, resolved
/// geometry, satisfaction entries, and exported elements all refer to rooms by
/// the same `RoomId`.
///
/// # Examples
///
/// ```
/// use maquette_core::identifier::RoomId;
///
/// // Create identifiers from names
/// let kitchen = RoomId::new("kitchen");
///
/// // Expand a requirement into numbered instances
/// let second_bedroom = RoomId::new("bedroom").instance(2);
/// assert_eq!(second_bedroom, "bedroom_2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(DefaultSymbol);

impl RoomId {
    /// Creates a `RoomId` from &str.
    ///
    /// # Examples
    ///
    /// ```
    /// use maquette_core::identifier::RoomId;
    ///
    /// let living = RoomId::new("living_room");
    /// assert_eq!(living, "living_room");
    /// ```
    pub fn new(name: &str) -> Self {
        let mut interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Creates the numbered instance of this identifier.
    ///
    /// Requirements that ask for several rooms of one type expand into
    /// `<name>_<index>` identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use maquette_core::identifier::RoomId;
    ///
    /// let bedroom = RoomId::new("bedroom");
    /// assert_eq!(bedroom.instance(1), "bedroom_1");
    /// assert_eq!(bedroom.instance(3), "bedroom_3");
    /// ```
    pub fn instance(&self, index: usize) -> Self {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let base = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let name = format!("{base}_{index}");
        drop(interner);
        Self::new(&name)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl std::str::FromStr for RoomId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for RoomId {
    /// Creates a `RoomId` from a string slice
    ///
    /// This is a convenience implementation that calls `RoomId::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for RoomId {
    /// Allows direct comparison with string slices: `id == "string"`
    ///
    /// # Examples
    ///
    /// ```
    /// use maquette_core::identifier::RoomId;
    ///
    /// let id = RoomId::new("kitchen");
    /// assert!(id == "kitchen");
    /// ```
    fn eq(&self, other: &str) -> bool {
        let interner = INTERNER
            .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
            .lock()
            .expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for RoomId {
    /// Allows direct comparison with string references: `id == &string`
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for RoomId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
