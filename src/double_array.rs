//! Double-array trie over token sequences.
//!
//! Query-string keys like `filter.name` are split on `.` and tested against a
//! set of recognized field paths. Instead of a pointer-based trie the set is
//! packed into two integer arrays so that the generated Go code can embed it
//! as a literal and walk it with plain indexing:
//!
//! ```text
//! child slot  = base[parent] + code(token)
//! valid iff     check[child] == parent + 1      (0 marks a vacant slot)
//! ```
//!
//! Every stored sequence ends with a terminator code (`encoding().len()`), so a
//! node is "complete" when its terminator slot is owned by it.

use std::collections::HashMap;

/// A compact, immutable set of token sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoubleArray {
    tokens: Vec<String>,
    encoding: HashMap<String, usize>,
    base: Vec<usize>,
    check: Vec<usize>,
}

impl DoubleArray {
    /// Build the trie for `seqs`. Duplicate sequences are stored once.
    pub fn new<S: AsRef<str>>(seqs: &[Vec<S>]) -> Self {
        let mut da = DoubleArray::default();
        if seqs.is_empty() {
            return da;
        }

        let mut encoded: Vec<Vec<usize>> = seqs
            .iter()
            .map(|seq| seq.iter().map(|t| da.register(t.as_ref())).collect())
            .collect();
        let terminator = da.tokens.len();
        for seq in &mut encoded {
            seq.push(terminator);
        }
        encoded.sort();
        encoded.dedup();

        da.insert(&encoded, 0, 0);

        let used = da.check.iter().rposition(|&c| c != 0).map_or(1, |i| i + 1);
        da.base.truncate(used);
        da.check.truncate(used);
        da
    }

    fn register(&mut self, token: &str) -> usize {
        if let Some(&code) = self.encoding.get(token) {
            return code;
        }
        let code = self.tokens.len();
        self.tokens.push(token.to_string());
        self.encoding.insert(token.to_string(), code);
        code
    }

    fn ensure_size(&mut self, idx: usize) {
        if self.base.len() <= idx {
            let len = (idx + 1).max(self.base.len() * 2);
            self.base.resize(len, 0);
            self.check.resize(len, 0);
        }
    }

    /// Place the children of the node at `pos`. `seqs` is the sorted slice of
    /// sequences sharing that node's prefix, `depth` the index of the next token.
    fn insert(&mut self, seqs: &[Vec<usize>], pos: usize, depth: usize) {
        self.ensure_size(pos);

        // seqs are sorted, so every child is a contiguous run
        let mut groups: Vec<(usize, &[Vec<usize>])> = Vec::new();
        let mut start = 0;
        while start < seqs.len() {
            let code = seqs[start][depth];
            let end = start
                + seqs[start..]
                    .iter()
                    .take_while(|s| s[depth] == code)
                    .count();
            groups.push((code, &seqs[start..end]));
            start = end;
        }

        let mut base = 1;
        loop {
            let fits = groups.iter().all(|(code, _)| {
                let slot = base + code;
                slot >= self.check.len() || self.check[slot] == 0
            });
            if fits {
                break;
            }
            base += 1;
        }

        self.base[pos] = base;
        for (code, _) in &groups {
            let slot = base + code;
            self.ensure_size(slot);
            self.check[slot] = pos + 1;
        }

        let terminator = self.tokens.len();
        for (code, group) in groups {
            if code != terminator {
                self.insert(group, base + code, depth + 1);
            }
        }
    }

    fn child(&self, node: usize, code: usize) -> Option<usize> {
        let slot = self.base.get(node)? + code;
        (self.check.get(slot) == Some(&(node + 1))).then_some(slot)
    }

    fn is_complete(&self, node: usize) -> bool {
        self.child(node, self.tokens.len()).is_some()
    }

    /// True when some prefix of `seq` (including `seq` itself) is a stored sequence.
    pub fn has_common_prefix<S: AsRef<str>>(&self, seq: &[S]) -> bool {
        if self.base.is_empty() {
            return false;
        }
        let mut node = 0;
        if self.is_complete(node) {
            return true;
        }
        for token in seq {
            let Some(&code) = self.encoding.get(token.as_ref()) else {
                return false;
            };
            match self.child(node, code) {
                Some(next) => node = next,
                None => return false,
            }
            if self.is_complete(node) {
                return true;
            }
        }
        false
    }

    /// True when `seq` itself is a stored sequence.
    pub fn contains<S: AsRef<str>>(&self, seq: &[S]) -> bool {
        if self.base.is_empty() {
            return false;
        }
        let mut node = 0;
        for token in seq {
            let Some(next) = self
                .encoding
                .get(token.as_ref())
                .and_then(|&code| self.child(node, code))
            else {
                return false;
            };
            node = next;
        }
        self.is_complete(node)
    }

    /// Token codes in ascending code order.
    pub fn encoding(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tokens.iter().enumerate().map(|(i, t)| (t.as_str(), i))
    }

    #[must_use]
    pub fn base(&self) -> &[usize] {
        &self.base
    }

    #[must_use]
    pub fn check(&self) -> &[usize] {
        &self.check
    }

    /// True when no sequence is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}
