pub mod champions;
pub mod flows;
pub mod network;
pub mod teams;

/// Insertion-ordered tally; ties keep first-seen order.
#[derive(Debug, Clone)]
pub(crate) struct OrderedTally<K> {
    entries: Vec<(K, u32)>,
}

impl<K: PartialEq> OrderedTally<K> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K, amount: u32) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += amount,
            None => self.entries.push((key, amount)),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<u32> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    pub(crate) fn into_entries(self) -> Vec<(K, u32)> {
        self.entries
    }

    /// Entries sorted by count, highest first; ties keep insertion order.
    pub(crate) fn into_ranked(self) -> Vec<(K, u32)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedTally;
    use pretty_assertions::assert_eq;

    #[test]
    fn ranking_is_stable_for_ties() {
        let mut tally = OrderedTally::new();
        tally.add("b", 1);
        tally.add("a", 2);
        tally.add("c", 1);
        tally.add("b", 1);
        assert_eq!(tally.get(&"b"), Some(2));
        assert_eq!(tally.into_ranked(), vec![("a", 2), ("b", 2), ("c", 1)]);
    }
}
