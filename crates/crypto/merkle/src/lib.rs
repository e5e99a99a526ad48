//! https://ethereum.github.io/consensus-specs/ssz/merkle-proofs

use alloy_primitives::B256;
use anyhow::ensure;

mod hash;
pub mod index;

use hash::hash_concat;
use index::{floorlog2, generalized_index_child, get_generalized_index_bit, get_subtree_index};

/// Build a full binary tree over `leaves` padded with zero hashes to `2^depth`.
///
/// The returned vector is indexed by generalized index, so `tree[1]` is the root and the leaves
/// start at `tree[1 << depth]`.
pub fn merkle_tree(leaves: &[B256], depth: u64) -> anyhow::Result<Vec<B256>> {
    let num_of_leaves = leaves.len();
    let bottom_length = 1 << depth;
    ensure!(
        num_of_leaves <= bottom_length,
        "Number of leaves is greater than the bottom length (depth too small)"
    );

    let mut tree = vec![B256::ZERO; bottom_length];
    tree.extend(leaves);
    tree.extend(vec![B256::ZERO; bottom_length - num_of_leaves]);

    for i in (1..bottom_length).rev() {
        let left = tree[i * 2].as_slice();
        let right = tree[i * 2 + 1].as_slice();
        tree[i] = hash_concat(left, right);
    }

    Ok(tree)
}

/// Sibling hashes from the leaf at `index` up to the root, leaf side first.
pub fn generate_proof(tree: &[B256], index: u64, depth: u64) -> anyhow::Result<Vec<B256>> {
    let bottom_length = 1 << depth;
    ensure!(index < bottom_length, "Index out of bounds");
    ensure!(
        tree.len() == 2 * bottom_length as usize,
        "Tree of {} nodes does not have depth {depth}",
        tree.len()
    );

    let mut proof = vec![];
    let mut current_index = 1;
    let mut current_depth = depth;

    while current_depth > 0 {
        let (left_child_index, right_child_index) = (
            generalized_index_child(current_index, false),
            generalized_index_child(current_index, true),
        );

        if get_generalized_index_bit(index, current_depth - 1) {
            proof.push(tree[left_child_index as usize]);
            current_index = right_child_index;
        } else {
            proof.push(tree[right_child_index as usize]);
            current_index = left_child_index;
        }

        current_depth -= 1;
    }

    proof.reverse();

    Ok(proof)
}

/// Recompute the root from `leaf` and `branch`. Branches shorter than `depth` never verify.
pub fn is_valid_merkle_branch(
    leaf: B256,
    branch: &[B256],
    depth: u64,
    index: u64,
    root: B256,
) -> bool {
    if branch.len() < depth as usize {
        return false;
    }

    let mut value = leaf;
    for i in 0..depth {
        if get_generalized_index_bit(index, i) {
            value = hash_concat(branch[i as usize].as_slice(), value.as_slice());
        } else {
            value = hash_concat(value.as_slice(), branch[i as usize].as_slice());
        }
    }
    value == root
}

pub fn is_valid_normalized_merkle_branch(
    leaf: B256,
    branch: &[B256],
    generalized_index: u64,
    root: B256,
) -> bool {
    let depth = floorlog2(generalized_index);
    let index = get_subtree_index(generalized_index);
    let Some(num_extra) = branch.len().checked_sub(depth as usize) else {
        return false;
    };
    if branch[..num_extra].iter().any(|node| *node != B256::ZERO) {
        return false;
    }
    is_valid_merkle_branch(leaf, &branch[num_extra..], depth, index, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_leaves() -> Vec<B256> {
        vec![
            B256::from_slice(&[0xAA; 32]),
            B256::from_slice(&[0xBB; 32]),
            B256::from_slice(&[0xCC; 32]),
            B256::from_slice(&[0xDD; 32]),
        ]
    }

    #[test]
    fn test_merkle_tree() {
        let leaves = sample_leaves();
        let depth = 2;

        let node_2: B256 = hash_concat(leaves[0].as_slice(), leaves[1].as_slice());
        let node_3: B256 = hash_concat(leaves[2].as_slice(), leaves[3].as_slice());

        let root: B256 = hash_concat(node_2.as_slice(), node_3.as_slice());

        let tree = merkle_tree(&leaves, depth).unwrap();

        assert_eq!(tree[1], root);

        for (index, leaf) in leaves.iter().enumerate() {
            let proof = generate_proof(&tree, index as u64, depth).unwrap();
            assert!(is_valid_merkle_branch(
                *leaf,
                &proof,
                depth,
                index as u64,
                root
            ));
            assert!(is_valid_normalized_merkle_branch(
                *leaf,
                &proof,
                index as u64 + (1 << depth),
                root
            ));
        }
    }

    #[test]
    fn test_padding_with_zero_leaves() {
        let leaves = sample_leaves();
        let tree = merkle_tree(&leaves[..3], 2).unwrap();
        let full = merkle_tree(&[leaves[0], leaves[1], leaves[2], B256::ZERO], 2).unwrap();
        assert_eq!(tree[1], full[1]);
    }

    #[test]
    fn test_too_many_leaves() {
        assert!(merkle_tree(&sample_leaves(), 1).is_err());
    }

    #[test]
    fn test_wrong_leaf_or_short_branch_fails() {
        let leaves = sample_leaves();
        let tree = merkle_tree(&leaves, 2).unwrap();
        let proof = generate_proof(&tree, 1, 2).unwrap();

        assert!(!is_valid_merkle_branch(leaves[0], &proof, 2, 1, tree[1]));
        assert!(!is_valid_merkle_branch(leaves[1], &proof[..1], 2, 1, tree[1]));
        assert!(!is_valid_normalized_merkle_branch(
            leaves[1],
            &proof[..1],
            5,
            tree[1]
        ));
    }

    #[test]
    fn test_normalized_branch_rejects_non_zero_padding() {
        let leaves = sample_leaves();
        let tree = merkle_tree(&leaves, 2).unwrap();
        let proof = generate_proof(&tree, 2, 2).unwrap();

        let mut padded = vec![B256::ZERO];
        padded.extend(&proof);
        assert!(is_valid_normalized_merkle_branch(leaves[2], &padded, 6, tree[1]));

        padded[0] = B256::repeat_byte(1);
        assert!(!is_valid_normalized_merkle_branch(leaves[2], &padded, 6, tree[1]));
    }
}
