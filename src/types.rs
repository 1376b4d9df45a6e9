/// The distinct point-type labels in a data set, in sorted order.
///
/// Pair-count tables refer to types by their position in this set, so sorting the labels up
/// front is what makes every table's key order reproducible from run to run.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypeSet<L> {
    labels: Vec<L>,
}

impl<L: Ord + Clone> TypeSet<L> {
    /// Creates the type set for the given labels.
    ///
    /// It's okay, and expected, for the provided slice to contain duplicates.
    ///
    /// ```
    /// use spatial_entropy::TypeSet;
    ///
    /// let types = TypeSet::new(&["b", "a", "b", "c", "a"]);
    /// assert_eq!(types.labels(), &["a", "b", "c"]);
    /// assert_eq!(types.index_of(&"c"), Some(2));
    /// assert_eq!(types.index_of(&"z"), None);
    /// ```
    pub fn new(labels: &[L]) -> Self {
        let mut labels = labels.to_vec();
        labels.sort_unstable();
        labels.dedup();
        TypeSet { labels }
    }

    /// Builds the type set and also maps every label to its index in that set.
    pub fn encode(labels: &[L]) -> (Self, Vec<usize>) {
        let types = TypeSet::new(labels);
        let codes = labels
            .iter()
            .map(|label| {
                // Every label came from the slice the set was built from.
                types
                    .labels
                    .binary_search(label)
                    .unwrap_or_else(|_| unreachable!("label missing from its own type set"))
            })
            .collect();
        (types, codes)
    }

    /// Returns the position of `label` in the sorted set, if it's present.
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.labels.binary_search(label).ok()
    }
}

impl<L> TypeSet<L> {
    /// The number of distinct types.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if there are no types at all.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The distinct labels, sorted.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Returns the label at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn label(&self, index: usize) -> &L {
        &self.labels[index]
    }
}
