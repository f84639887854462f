/// Addresses at which continuous execution pauses. Kept sorted, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Breakpoints(Vec<u8>);

impl Breakpoints {
    pub fn contains(&self, address: u8) -> bool {
        self.0.binary_search(&address).is_ok()
    }

    /// Returns `false` if a breakpoint already existed at `address`.
    pub fn insert(&mut self, address: u8) -> bool {
        match self.0.binary_search(&address) {
            Ok(_) => false,
            Err(index) => {
                self.0.insert(index, address);
                true
            }
        }
    }

    /// Returns whether a breakpoint was found at `address`.
    pub fn remove(&mut self, address: u8) -> bool {
        match self.0.binary_search(&address) {
            Ok(index) => {
                self.0.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u8> for Breakpoints {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut breakpoints = Breakpoints::default();
        for address in iter {
            breakpoints.insert(address);
        }
        breakpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut breakpoints = Breakpoints::default();
        assert!(breakpoints.insert(40));
        assert!(breakpoints.insert(3));
        assert!(!breakpoints.insert(40));
        assert_eq!(breakpoints.len(), 2);
        assert_eq!(breakpoints.iter().collect::<Vec<_>>(), vec![3, 40]);

        assert!(breakpoints.contains(3));
        assert!(breakpoints.remove(3));
        assert!(!breakpoints.remove(3));
        assert!(!breakpoints.contains(3));
        assert!(!breakpoints.is_empty());
    }

    #[test]
    fn collects_sorted() {
        let breakpoints: Breakpoints = [9, 1, 9, 5].into_iter().collect();
        assert_eq!(breakpoints.iter().collect::<Vec<_>>(), vec![1, 5, 9]);
    }
}
