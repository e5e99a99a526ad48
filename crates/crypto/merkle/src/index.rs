/// ``LeafIndex`` is the index of a leaf in the **bottom** layer of the ``tree``.
pub type LeafIndex = u64;

/// ``GeneralizedIndex`` is the index of a node in the ``tree``.
pub type GeneralizedIndex = u64;

/// Return the given bit of a generalized index.
/// Note: It is fine to pass ``LeafIndex`` to this function,
/// as the result will be the same.
pub(crate) fn get_generalized_index_bit(index: GeneralizedIndex, position: u64) -> bool {
    (index & (1 << position)) > 0
}

pub(crate) fn generalized_index_child(
    index: GeneralizedIndex,
    right_side: bool,
) -> GeneralizedIndex {
    index * 2 + right_side as GeneralizedIndex
}

/// Depth of a node in the tree, which is also the length of its branch.
pub fn floorlog2(generalized_index: GeneralizedIndex) -> u64 {
    generalized_index.checked_ilog2().unwrap_or_default() as u64
}

pub fn get_subtree_index(generalized_index: GeneralizedIndex) -> LeafIndex {
    generalized_index % (1 << floorlog2(generalized_index))
}

/// Return the generalized index of the leaf index with ``depth``.
pub fn generalized_index_from_leaf_index(leaf_index: LeafIndex, depth: u64) -> GeneralizedIndex {
    leaf_index + (1 << depth)
}

/// Generalized index of `child` inside a subtree rooted at `parent`.
pub fn concat_generalized_indices(
    parent: GeneralizedIndex,
    child: GeneralizedIndex,
) -> GeneralizedIndex {
    let child_depth = floorlog2(child);
    (parent << child_depth) | get_subtree_index(child)
}
