//! Compressed prefix tree over candidate names
//!
//! Each edge holds a string rather than a single character, and siblings
//! never share a leading character. A node is marked `terminal` when the path
//! from the root to it spells a stored string. Completion returns the part of
//! every stored string that follows the typed term.
//!
//! A trie is built per completion request from a freshly fetched candidate
//! list; nothing is kept between requests.

/// Node of the tree; the root has an empty prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    prefix: String,
    terminal: bool,
    children: Vec<Node>,
}

/// Byte length of the longest common prefix, always on a char boundary
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

impl Node {
    fn leaf(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            terminal: true,
            children: Vec::new(),
        }
    }

    /// Edge label leading to this node
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the path to this node is a stored string
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Insert `s` below this node, returns false if it was already stored
    fn insert(&mut self, s: &str) -> bool {
        if s.is_empty() {
            let added = !self.terminal;
            self.terminal = true;
            return added;
        }

        for child in &mut self.children {
            let plen = common_prefix_len(&child.prefix, s);
            if plen == 0 {
                continue;
            }

            if plen < child.prefix.len() {
                child.split(plen);
            }
            return child.insert(&s[plen..]);
        }

        self.children.push(Node::leaf(s));
        true
    }

    /// Shrink the edge to `at` bytes; the rest moves to a new only child
    fn split(&mut self, at: usize) {
        let tail = Node {
            prefix: self.prefix.split_off(at),
            terminal: self.terminal,
            children: std::mem::take(&mut self.children),
        };

        self.terminal = false;
        self.children.push(tail);
    }

    fn contains(&self, s: &str) -> bool {
        if s.is_empty() {
            return self.terminal;
        }

        self.children
            .iter()
            .find(|child| s.starts_with(child.prefix.as_str()))
            .is_some_and(|child| child.contains(&s[child.prefix.len()..]))
    }

    /// Push `acc` + every stored tail below this node
    fn collect(&self, acc: &mut String, out: &mut Vec<String>) {
        if self.terminal {
            out.push(acc.clone());
        }

        for child in &self.children {
            let len = acc.len();
            acc.push_str(&child.prefix);
            child.collect(acc, out);
            acc.truncate(len);
        }
    }
}

/// Prefix tree of candidate strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trie {
    root: Node,
    len: usize,
}

impl Trie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of stored strings
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a string
    ///
    /// Empty strings are ignored.
    ///
    /// # Returns
    /// * `bool` - True if the string was not stored before
    pub fn insert(&mut self, s: &str) -> bool {
        if s.is_empty() {
            return false;
        }

        let added = self.root.insert(s);
        if added {
            self.len += 1;
        }
        added
    }

    /// Check whether exactly `s` was inserted
    pub fn contains(&self, s: &str) -> bool {
        !s.is_empty() && self.root.contains(s)
    }

    /// Every stored string, in tree order
    pub fn all(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(&mut String::new(), &mut out);
        out
    }

    /// Suffixes completing `term` to a stored string
    ///
    /// An exact match contributes the empty string. A term that is not a
    /// prefix of any stored string yields nothing.
    ///
    /// # Arguments
    /// * `term` - Typed prefix, matched case-sensitively
    ///
    /// # Returns
    /// * `Vec<String>` - Remaining suffixes, in tree order
    pub fn complete(&self, term: &str) -> Vec<String> {
        let mut node = &self.root;
        let mut rest = term;
        let mut out = Vec::new();

        loop {
            if rest.is_empty() {
                node.collect(&mut String::new(), &mut out);
                return out;
            }

            let Some((child, plen)) = node
                .children
                .iter()
                .map(|child| (child, common_prefix_len(&child.prefix, rest)))
                .find(|(_, plen)| *plen > 0)
            else {
                return out;
            };

            if plen == child.prefix.len() {
                node = child;
                rest = &rest[plen..];
            } else if plen == rest.len() {
                // Term ends inside this edge
                child.collect(&mut child.prefix[plen..].to_string(), &mut out);
                return out;
            } else {
                return out;
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}

impl<S: AsRef<str>> Extend<S> for Trie {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for s in iter {
            self.insert(s.as_ref());
        }
    }
}
