use super::pairs::PairRecord;

struct Node {
    pair: PairRecord,
    next: Option<Box<Node>>,
}

/// Computed pairs kept in descending order of combined word count.
///
/// A new pair goes in front of the first entry whose combined count is less
/// than or equal to its own, so among equal counts the most recently inserted
/// pair comes first.
#[derive(Default)]
pub struct OrderedResultList {
    head: Option<Box<Node>>,
    len: usize,
}

impl OrderedResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: PairRecord) {
        let mut cursor = &mut self.head;
        while cursor
            .as_ref()
            .is_some_and(|node| node.pair.combined_word_count > pair.combined_word_count)
        {
            if let Some(node) = cursor {
                cursor = &mut node.next;
            }
        }

        let next = cursor.take();
        *cursor = Some(Box::new(Node { pair, next }));
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl FromIterator<PairRecord> for OrderedResultList {
    fn from_iter<I: IntoIterator<Item = PairRecord>>(iter: I) -> Self {
        let mut list = Self::new();
        for pair in iter {
            list.insert(pair);
        }
        list
    }
}

impl<'a> IntoIterator for &'a OrderedResultList {
    type Item = &'a PairRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Drop for OrderedResultList {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

impl std::fmt::Debug for OrderedResultList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PairRecord;

    fn next(&mut self) -> Option<&'a PairRecord> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.pair
        })
    }
}
