//! Symbol table for labels

use std::collections::HashMap;

pub struct SymbolTable {
    labels: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Define a label. A second definition is rejected and the existing
    /// address is returned.
    pub fn insert(&mut self, name: String, addr: u32) -> Result<(), u32> {
        if let Some(&existing) = self.labels.get(&name) {
            return Err(existing);
        }
        self.labels.insert(name, addr);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    pub fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    /// Labels ordered by address, then name.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut all: Vec<(&str, u32)> = self
            .labels
            .iter()
            .map(|(name, &addr)| (name.as_str(), addr))
            .collect();
        all.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        all
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.insert("FIRST".to_string(), 0x1000).is_ok());
        assert!(table.insert("ALPHA".to_string(), 0x1003).is_ok());
        assert_eq!(table.get("ALPHA"), Some(0x1003));
        assert_eq!(table.get("BETA"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_first_definition() {
        let mut table = SymbolTable::new();
        table.insert("LOOP".to_string(), 0x10).unwrap();
        assert_eq!(table.insert("LOOP".to_string(), 0x20), Err(0x10));
        assert_eq!(table.get("LOOP"), Some(0x10));
    }

    #[test]
    fn test_sorted_by_address() {
        let mut table = SymbolTable::new();
        table.insert("Z".to_string(), 3).unwrap();
        table.insert("B".to_string(), 6).unwrap();
        table.insert("A".to_string(), 3).unwrap();
        assert_eq!(table.sorted(), vec![("A", 3), ("Z", 3), ("B", 6)]);
    }
}
