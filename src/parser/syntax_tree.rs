//! Arena-backed syntax tree.
//!
//! Nodes are plain [`Copy`] values stored in blocks. The children of a node
//! always occupy exactly one block, so a node only needs the index of that
//! block to enumerate its children. Blocks are checked out of a
//! [`NodeBlockPool`] and handed back once the tree is released.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError},
};

use derive_more::with_trait::Display;

use crate::parser::{SourceLocation, Span, Spanning, Token};

/// Kind of a [`SyntaxNode`], one per grammar production.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum SyntaxNodeType {
    Document,
    Operation,
    NamedFragment,
    VariableCollection,
    Variable,
    Directive,
    FieldCollection,
    Field,
    FragmentSpread,
    InlineFragment,
    InputItemCollection,
    InputItem,
    ScalarValue,
    EnumValue,
    BooleanValue,
    NullValue,
    ListValue,
    ComplexValue,
    VariableValue,
}

/// Lexical type of a scalar literal.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ScalarValueType {
    String,
    Int,
    Float,
}

/// Reference to a piece of source text held by a [`SyntaxNode`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SyntaxNodeValue {
    offset: usize,
    length: usize,
    value_type: Option<ScalarValueType>,
}

impl SyntaxNodeValue {
    /// Creates a value covering `length` bytes starting at `offset`.
    pub fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            value_type: None,
        }
    }

    /// Creates a value covering the provided [`Span`].
    pub fn from_span(span: &Span) -> Self {
        Self::new(span.start.index(), span.len())
    }

    /// Creates a value covering the provided token.
    pub fn from_token(token: &Spanning<Token<'_>>) -> Self {
        Self::from_span(&token.span)
    }

    /// Tags this value with the lexical type of its literal.
    #[must_use]
    pub fn with_type(mut self, value_type: ScalarValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Byte offset of this value in the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of this value in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Indicates whether this value covers no text.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Lexical type of the literal, if this value is a scalar literal.
    pub fn value_type(&self) -> Option<ScalarValueType> {
        self.value_type
    }

    /// Returns the text this value refers to in the `source` it was parsed
    /// from.
    pub fn resolve<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.offset..self.offset + self.length)
            .unwrap_or_default()
    }
}

/// Storage address of a [`SyntaxNode`] and of its children.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SyntaxNodeCoordinates {
    /// Index of the block holding the node.
    pub block_index: usize,

    /// Position of the node inside its block.
    pub block_position: usize,

    /// Index of the block holding the node's children, if it has any.
    pub child_block_index: Option<usize>,

    /// Number of the node's children.
    pub child_block_length: usize,
}

/// A single node of a [`SyntaxTree`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyntaxNode {
    /// Grammar production of this node.
    pub node_type: SyntaxNodeType,

    /// Location of the first token of this node.
    pub location: SourceLocation,

    /// First value slot (e.g. the name of a field).
    pub primary_value: Option<SyntaxNodeValue>,

    /// Second value slot (e.g. the alias of a field).
    pub secondary_value: Option<SyntaxNodeValue>,

    /// Where this node is stored.
    pub coordinates: SyntaxNodeCoordinates,
}

impl SyntaxNode {
    /// Creates a new detached node without values.
    pub fn new(node_type: SyntaxNodeType, location: SourceLocation) -> Self {
        Self {
            node_type,
            location,
            primary_value: None,
            secondary_value: None,
            coordinates: SyntaxNodeCoordinates::default(),
        }
    }

    /// Sets the primary value of this node.
    #[must_use]
    pub fn with_primary(mut self, value: SyntaxNodeValue) -> Self {
        self.primary_value = Some(value);
        self
    }

    /// Sets the secondary value of this node.
    #[must_use]
    pub fn with_secondary(mut self, value: SyntaxNodeValue) -> Self {
        self.secondary_value = Some(value);
        self
    }

    /// Indicates whether this node has any children.
    pub fn has_children(&self) -> bool {
        self.coordinates.child_block_length > 0
    }
}

/// Syntax tree of a single GraphQL source, stored in pooled node blocks.
pub struct SyntaxTree {
    blocks: Vec<Vec<SyntaxNode>>,
    pool: Arc<NodeBlockPool>,
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

const CHILD_BLOCK_CAPACITY: usize = 4;

impl SyntaxTree {
    /// Creates a tree rooted at a new [`SyntaxNodeType::Document`] node,
    /// using the [shared](NodeBlockPool::shared) pool.
    pub fn from_document_root() -> Self {
        Self::from_node(SyntaxNode::new(
            SyntaxNodeType::Document,
            SourceLocation::new_origin(),
        ))
    }

    /// Creates a tree rooted at the provided node, using the
    /// [shared](NodeBlockPool::shared) pool.
    pub fn from_node(root: SyntaxNode) -> Self {
        Self::from_node_with_pool(root, NodeBlockPool::shared())
    }

    /// Creates a tree rooted at a new [`SyntaxNodeType::Document`] node,
    /// checking its blocks out of the provided `pool`.
    pub fn from_document_root_with_pool(pool: Arc<NodeBlockPool>) -> Self {
        Self::from_node_with_pool(
            SyntaxNode::new(SyntaxNodeType::Document, SourceLocation::new_origin()),
            pool,
        )
    }

    /// Creates a tree rooted at the provided node, checking its blocks out of
    /// the provided `pool`.
    pub fn from_node_with_pool(mut root: SyntaxNode, pool: Arc<NodeBlockPool>) -> Self {
        let mut block = pool.rent(1);
        root.coordinates = SyntaxNodeCoordinates::default();
        block.push(root);

        Self {
            blocks: vec![block],
            pool,
        }
    }

    /// Returns a copy of the root node.
    pub fn root_node(&self) -> SyntaxNode {
        self.blocks[0][0]
    }

    /// Returns the stored node at the provided coordinates.
    pub fn node(&self, coordinates: &SyntaxNodeCoordinates) -> Option<&SyntaxNode> {
        self.blocks
            .get(coordinates.block_index)?
            .get(coordinates.block_position)
    }

    fn stored_mut(&mut self, node: &SyntaxNode) -> &mut SyntaxNode {
        &mut self.blocks[node.coordinates.block_index][node.coordinates.block_position]
    }

    /// Appends the `child` to the children of the `parent`, returning the
    /// child as stored.
    ///
    /// Both the stored `parent` and the provided copy of it are updated.
    ///
    /// # Panics
    ///
    /// If the `parent` doesn't belong to this tree.
    pub fn add_child_node(&mut self, parent: &mut SyntaxNode, mut child: SyntaxNode) -> SyntaxNode {
        let stored = *self.stored_mut(parent);
        let child_block_index = match stored.coordinates.child_block_index {
            Some(index) => index,
            None => {
                self.blocks.push(self.pool.rent(CHILD_BLOCK_CAPACITY));
                self.blocks.len() - 1
            }
        };

        let block = &mut self.blocks[child_block_index];
        child.coordinates = SyntaxNodeCoordinates {
            block_index: child_block_index,
            block_position: block.len(),
            child_block_index: None,
            child_block_length: 0,
        };
        block.push(child);

        let stored = self.stored_mut(parent);
        stored.coordinates.child_block_index = Some(child_block_index);
        stored.coordinates.child_block_length += 1;
        *parent = *stored;

        child
    }

    /// Returns the children of the provided `node`, as currently stored.
    pub fn children(&self, node: &SyntaxNode) -> &[SyntaxNode] {
        self.node(&node.coordinates)
            .and_then(|n| n.coordinates.child_block_index)
            .and_then(|i| self.blocks.get(i))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Total number of nodes in this tree, the root included.
    pub fn node_count(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// Number of blocks checked out by this tree.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of edges on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        fn depth_of(tree: &SyntaxTree, node: &SyntaxNode) -> usize {
            tree.children(node)
                .iter()
                .map(|child| depth_of(tree, child) + 1)
                .max()
                .unwrap_or(0)
        }

        depth_of(self, &self.root_node())
    }

    /// Releases this tree, returning all its blocks to the pool.
    pub fn release(self) {
        crate::__trace!(blocks = self.blocks.len(), "releasing syntax tree");

        for block in self.blocks {
            self.pool.give_back(block);
        }
    }
}

/// Thread-safe pool of reusable node blocks, bucketed by power of two
/// capacity.
#[derive(Debug)]
pub struct NodeBlockPool {
    buckets: Mutex<BTreeMap<usize, Vec<Vec<SyntaxNode>>>>,
    max_blocks_per_bucket: usize,
}

static SHARED_POOL: LazyLock<Arc<NodeBlockPool>> = LazyLock::new(|| Arc::new(NodeBlockPool::new()));

impl Default for NodeBlockPool {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBlockPool {
    /// Creates an empty pool retaining up to 64 blocks per capacity bucket.
    pub fn new() -> Self {
        Self::with_retention(64)
    }

    /// Creates an empty pool retaining up to `max_blocks_per_bucket` blocks
    /// per capacity bucket.
    pub fn with_retention(max_blocks_per_bucket: usize) -> Self {
        Self {
            buckets: Mutex::new(BTreeMap::new()),
            max_blocks_per_bucket,
        }
    }

    /// Returns the process-wide pool.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED_POOL)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<usize, Vec<Vec<SyntaxNode>>>> {
        // Blocks are always cleared before being stored, so a poisoned pool
        // is still consistent.
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks out an empty block able to hold at least `min_capacity` nodes.
    ///
    /// The block is taken from the smallest non-empty bucket fitting the
    /// request, so grown blocks keep being reused.
    pub fn rent(&self, min_capacity: usize) -> Vec<SyntaxNode> {
        let capacity = min_capacity.max(1).next_power_of_two();
        self.lock()
            .range_mut(capacity..)
            .find_map(|(_, blocks)| blocks.pop())
            .unwrap_or_else(|| Vec::with_capacity(capacity))
    }

    /// Returns a block to this pool.
    pub fn give_back(&self, mut block: Vec<SyntaxNode>) {
        block.clear();
        let capacity = block.capacity();
        if capacity == 0 {
            return;
        }

        // Largest power of two not exceeding the capacity.
        let bucket = 1 << (usize::BITS - 1 - capacity.leading_zeros());
        let mut buckets = self.lock();
        let blocks = buckets.entry(bucket).or_default();
        if blocks.len() < self.max_blocks_per_bucket {
            blocks.push(block);
        }
    }

    /// Number of blocks currently waiting in this pool.
    pub fn retained_blocks(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }
}
