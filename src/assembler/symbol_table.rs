//! Label definitions collected while assembling.

use std::collections::BTreeMap;

/// A label bound to an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Label name, uppercased.
    pub name: String,

    /// Address of the byte that followed the label.
    pub address: u16,

    /// Source line where the label was defined (1-indexed).
    pub defined_at: usize,
}

/// Labels by name, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a label. An existing definition is kept and returned as the
    /// error.
    pub fn define(&mut self, name: &str, address: u16, defined_at: usize) -> Result<(), &Symbol> {
        if self.symbols.contains_key(name) {
            return Err(&self.symbols[name]);
        }

        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                address,
                defined_at,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn address_of(&self, name: &str) -> Option<u16> {
        self.get(name).map(|symbol| symbol.address)
    }

    /// First label (by name) bound to `address`, if any.
    pub fn name_at(&self, address: u16) -> Option<&str> {
        self.symbols
            .values()
            .find(|symbol| symbol.address == address)
            .map(|symbol| symbol.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
