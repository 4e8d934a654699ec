use hex_literal::hex;

use super::*;

fn leaf(byte: u8) -> Digest {
    Digest::new([byte; 32])
}

fn leaves(n: u8) -> Vec<Digest> {
    (1..=n).map(leaf).collect()
}

/// Folds `leaf` with the steps of `proof` using the recorded positions.
fn fold_with_positions(leaf: Digest, proof: &Proof) -> Digest {
    proof.steps().iter().fold(leaf, |node, step| match step.position {
        Position::Left => combine(&step.digest, &node),
        Position::Right => combine(&node, &step.digest),
        Position::Duplicate => combine(&node, &node),
    })
}

/// Folds `leaf` with the bare proof digests, rederiving each level's position
/// from the leaf index and the width of each level.
fn fold_with_index_path(leaf: Digest, digests: &[Digest], leaf_index: usize, n: usize) -> Digest {
    let mut node = leaf;
    let mut index = leaf_index;
    let mut width = n;
    for digest in digests {
        node = if index == width - 1 && width % 2 == 1 {
            combine(digest, digest)
        } else if index % 2 == 1 {
            combine(digest, &node)
        } else {
            combine(&node, digest)
        };
        index /= 2;
        width = width.div_ceil(2);
    }
    node
}

fn ceil_log2(n: usize) -> usize {
    n.next_power_of_two().trailing_zeros() as usize
}

#[test]
fn double_sha256_matches_reference_vectors() {
    assert_eq!(
        Digest::new(hex!(
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        )),
        double_sha256(b""),
    );
    assert_eq!(
        Digest::new(hex!(
            "4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358"
        )),
        double_sha256(b"abc"),
    );
}

#[test]
fn combine_is_double_sha256_of_concatenation() {
    let (a, b) = (leaf(1), leaf(2));
    let mut concatenated = a.to_bytes().to_vec();
    concatenated.extend_from_slice(b.as_bytes());
    assert_eq!(double_sha256(&concatenated), combine(&a, &b));
    assert_eq!(
        Digest::new(hex!(
            "39ce20bede82c96b8908bec4a157b09c549b3db90b9b474bda9ae9b9030310b4"
        )),
        combine(&a, &b),
    );
}

#[test]
fn combine_is_order_sensitive() {
    assert_ne!(combine(&leaf(1), &leaf(2)), combine(&leaf(2), &leaf(1)));
}

#[test]
fn empty_input_is_rejected() {
    let err = Tree::try_from_leaves(Vec::new()).unwrap_err();
    assert_eq!(ErrorKind::EmptyInput, err.kind());

    let err = Tree::try_from_hex_leaves(Vec::<String>::new()).unwrap_err();
    assert_eq!(ErrorKind::EmptyInput, err.kind());
}

#[test]
fn tree_without_leaves_is_not_ready() {
    let tree = Tree::from_leaves(Vec::new());
    assert!(!tree.is_ready());
    assert!(tree.is_empty());
    assert!(tree.levels().is_empty());
    assert_eq!(0, tree.depth());
    assert_eq!(ErrorKind::NotReady, tree.root().unwrap_err().kind());
    assert_eq!(
        ErrorKind::NotReady,
        tree.construct_proof(0).unwrap_err().kind()
    );
    assert_eq!(
        ErrorKind::NotReady,
        tree.construct_proof_signed(-1).unwrap_err().kind()
    );
}

#[test]
fn single_leaf_is_its_own_root() {
    let tree = Tree::try_from_leaves([leaf(7)]).unwrap();
    assert_eq!(1, tree.levels().len());
    assert_eq!(leaf(7), tree.root().unwrap());
    assert!(tree.construct_proof(0).unwrap().is_empty());
}

#[test]
fn two_leaves() {
    let (a, b) = (leaf(1), leaf(2));
    let tree = Tree::try_from_leaves([a, b]).unwrap();
    assert_eq!(combine(&a, &b), tree.root().unwrap());
    assert_eq!(vec![b], tree.construct_proof(0).unwrap().to_vec());
    assert_eq!(vec![a], tree.construct_proof(1).unwrap().to_vec());
    assert_eq!(
        Position::Right,
        tree.construct_proof(0).unwrap().steps()[0].position
    );
    assert_eq!(
        Position::Left,
        tree.construct_proof(1).unwrap().steps()[0].position
    );
}

#[test]
fn odd_level_pairs_last_node_with_itself() {
    let (a, b, c) = (leaf(1), leaf(2), leaf(3));
    let tree = Tree::try_from_leaves([a, b, c]).unwrap();
    assert_eq!(
        &[combine(&a, &b), combine(&c, &c)][..],
        tree.levels()[1].as_slice()
    );
    assert_eq!(
        Digest::new(hex!(
            "223e023fadf1f053df26988871f893c821c28edf77d64a955e6c2a02d547bdac"
        )),
        tree.root().unwrap(),
    );

    let proof = tree.construct_proof(2).unwrap();
    assert_eq!(vec![c, combine(&a, &b)], proof.to_vec());
    assert_eq!(
        Step {
            position: Position::Duplicate,
            digest: c,
        },
        proof.steps()[0],
    );
}

#[test]
fn odd_tail_is_duplicated_on_every_level() {
    let tree = Tree::try_from_leaves(leaves(5)).unwrap();
    let widths: Vec<_> = tree.levels().iter().map(Vec::len).collect();
    assert_eq!(vec![5, 3, 2, 1], widths);
    assert_eq!(
        Digest::new(hex!(
            "26e2870f72368b3f8baef83fa26282d95d9c194e1f33d90a12932e0f6022e5d3"
        )),
        tree.root().unwrap(),
    );

    let proof = tree.construct_proof(4).unwrap();
    let positions: Vec<_> = proof.steps().iter().map(|step| step.position).collect();
    assert_eq!(
        vec![Position::Duplicate, Position::Duplicate, Position::Left],
        positions
    );
    assert_eq!(leaf(5), proof.steps()[0].digest);
    assert_eq!(tree.levels()[1][2], proof.steps()[1].digest);
    assert_eq!(tree.levels()[2][0], proof.steps()[2].digest);
}

#[test]
fn perfect_tree_matches_reference_root() {
    let tree = Tree::try_from_leaves(leaves(4)).unwrap();
    assert_eq!(
        Digest::new(hex!(
            "085aabaef98668701b87c9a1986bdf116726a9949802326b69895697d4e8c812"
        )),
        tree.root().unwrap(),
    );
}

#[test]
fn root_is_deterministic() {
    for n in 1..=17 {
        let first = Tree::try_from_leaves(leaves(n)).unwrap();
        let second = Tree::try_from_leaves(leaves(n)).unwrap();
        assert_eq!(first.root().unwrap(), second.root().unwrap());
    }
}

#[test]
fn tree_has_ceil_log2_plus_one_levels() {
    for n in 1..=33u8 {
        let tree = Tree::try_from_leaves(leaves(n)).unwrap();
        assert_eq!(ceil_log2(n.into()) + 1, tree.levels().len(), "n = {n}");
        assert_eq!(1, tree.levels().last().unwrap().len());
    }
}

#[test]
fn proof_length_is_ceil_log2_of_leaf_count() {
    for n in 1..=33u8 {
        let tree = Tree::try_from_leaves(leaves(n)).unwrap();
        for i in 0..usize::from(n) {
            let proof = tree.construct_proof(i).unwrap();
            assert_eq!(ceil_log2(n.into()), proof.len(), "n = {n}, i = {i}");
            assert_eq!(tree.depth(), proof.len());
            assert_eq!(i, proof.leaf_index());
            assert_eq!(usize::from(n), proof.leaf_count());
        }
    }
}

#[test]
fn proofs_recompute_the_root() {
    for n in 1..=33u8 {
        let tree = Tree::try_from_leaves(leaves(n)).unwrap();
        let root = tree.root().unwrap();
        for i in 0..usize::from(n) {
            let proof = tree.construct_proof(i).unwrap();
            let leaf = tree.leaf(i).unwrap();
            assert_eq!(root, fold_with_positions(leaf, &proof), "n = {n}, i = {i}");
            assert_eq!(
                root,
                fold_with_index_path(leaf, &proof.to_vec(), i, n.into()),
                "n = {n}, i = {i}"
            );
        }
    }
}

#[test]
fn out_of_range_indices_are_rejected() {
    let tree = Tree::try_from_leaves(leaves(3)).unwrap();
    assert_eq!(
        ErrorKind::IndexOutOfRange,
        tree.construct_proof(3).unwrap_err().kind()
    );
    assert_eq!(
        ErrorKind::IndexOutOfRange,
        tree.construct_proof(usize::MAX).unwrap_err().kind()
    );
    assert_eq!(
        ErrorKind::IndexOutOfRange,
        tree.construct_proof_signed(-1).unwrap_err().kind()
    );
    assert_eq!(
        ErrorKind::IndexOutOfRange,
        tree.construct_proof_signed(3).unwrap_err().kind()
    );
    assert!(tree.construct_proof_signed(2).is_ok());
}

#[test]
fn leaves_are_copied_from_the_input() {
    let mut input = leaves(3);
    let tree = Tree::try_from_leaves(input.clone()).unwrap();
    let root = tree.root().unwrap();
    input[0] = leaf(42);
    assert_eq!(root, tree.root().unwrap());
    assert_eq!(Some(leaf(1)), tree.leaf(0));
}

#[test]
fn zero_sentinel_leaf_is_passed_through() {
    let tree = Tree::try_from_leaves([Digest::ZERO, leaf(1)]).unwrap();
    assert_eq!(Digest::ZERO, tree.leaves()[0]);
    assert_eq!(combine(&Digest::ZERO, &leaf(1)), tree.root().unwrap());
}

#[test]
fn hex_and_byte_leaves_build_the_same_tree() {
    let expected = Tree::try_from_leaves(leaves(3)).unwrap();
    let hex_leaves: Vec<_> = leaves(3).iter().map(Digest::to_hex).collect();
    let byte_leaves: Vec<_> = leaves(3).into_iter().map(Digest::to_bytes).collect();
    assert_eq!(expected, Tree::try_from_hex_leaves(&hex_leaves).unwrap());
    assert_eq!(expected, Tree::try_from_byte_leaves(&byte_leaves).unwrap());
}

#[test]
fn malformed_leaves_are_rejected() {
    let err = Tree::try_from_hex_leaves(["abcd"]).unwrap_err();
    assert_eq!(ErrorKind::MalformedDigest, err.kind());

    let err = Tree::try_from_hex_leaves(["zz".repeat(32)]).unwrap_err();
    assert_eq!(ErrorKind::MalformedDigest, err.kind());

    let err = Tree::try_from_byte_leaves([[0u8; 31].as_slice()]).unwrap_err();
    assert_eq!(ErrorKind::MalformedDigest, err.kind());
}

#[test]
fn digest_hex_round_trips_and_accepts_prefix() {
    let hex = "39ce20bede82c96b8908bec4a157b09c549b3db90b9b474bda9ae9b9030310b4";
    let digest: Digest = hex.parse().unwrap();
    assert_eq!(hex, digest.to_string());
    assert_eq!(digest, Digest::from_hex(&format!("0x{hex}")).unwrap());
}

#[test]
fn reversed_digest_flips_byte_order() {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xab;
    let reversed = Digest::new(bytes).reversed();
    assert_eq!(0xab, reversed.as_bytes()[31]);
    assert_eq!(Digest::new(bytes), reversed.reversed());
}

#[test]
fn proof_hex_blob_concatenates_digests() {
    let tree = Tree::try_from_leaves(leaves(3)).unwrap();
    let proof = tree.construct_proof(2).unwrap();
    let expected = format!("0x{}{}", leaf(3), combine(&leaf(1), &leaf(2)));
    assert_eq!(expected, proof.to_hex_blob());
    assert_eq!(proof.to_hex_vec().concat(), expected[2..]);

    let single = Tree::try_from_leaves([leaf(1)]).unwrap();
    assert_eq!("0x", single.construct_proof(0).unwrap().to_hex_blob());
}

#[test]
fn witness_commitment_matches_reference_vectors() {
    assert_eq!(
        Digest::new(hex!(
            "e2f61c3f71d1defd3fa999dfa36953755c690689799962b48bebd836974e8cf9"
        )),
        witness_commitment(&Digest::ZERO),
    );
    let root = Tree::try_from_leaves([leaf(1), leaf(2)])
        .unwrap()
        .root()
        .unwrap();
    assert_eq!(
        Digest::new(hex!(
            "ee3cf830eb71533ca681ba0b007c375dc4cbac94945feee5c725657cb091a9cc"
        )),
        witness_commitment(&root),
    );
}

#[test]
fn witness_commitment_requires_32_bytes() {
    assert_eq!(
        witness_commitment(&Digest::ZERO),
        witness_commitment_from_slice(&[0; 32]).unwrap()
    );
    assert_eq!(
        ErrorKind::MalformedDigest,
        witness_commitment_from_slice(&[0; 33]).unwrap_err().kind()
    );
}

#[cfg(feature = "serde")]
#[test]
fn digest_serializes_as_hex_string() {
    let json = serde_json::to_string(&leaf(1)).unwrap();
    assert_eq!(format!("\"{}\"", "01".repeat(32)), json);
    assert_eq!(leaf(1), serde_json::from_str::<Digest>(&json).unwrap());
}

#[cfg(feature = "serde")]
#[test]
fn proof_serializes_positions_and_digests() {
    let tree = Tree::try_from_leaves(leaves(3)).unwrap();
    let proof = tree.construct_proof(2).unwrap();
    let json = serde_json::to_value(&proof).unwrap();
    assert_eq!(2, json["leaf_index"]);
    assert_eq!(3, json["leaf_count"]);
    assert_eq!("duplicate", json["steps"][0]["position"]);
    assert_eq!(leaf(3).to_hex(), json["steps"][0]["digest"]);
    assert_eq!("left", json["steps"][1]["position"]);
    assert_eq!(proof, serde_json::from_value::<Proof>(json).unwrap());
}

/// Collects everything written by a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn build_and_prove_with_captured_logs() -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let tree = Tree::try_from_leaves(leaves(3)).unwrap();
        tree.construct_proof(2).unwrap();
    });
    logs.contents()
}

#[cfg(feature = "tracing")]
#[test]
fn building_and_proving_emit_events() {
    let logs = build_and_prove_with_captured_logs();
    assert!(logs.contains("built level"), "{logs}");
    assert!(logs.contains("built merkle tree"), "{logs}");
    assert!(
        logs.contains(
            "root=223e023fadf1f053df26988871f893c821c28edf77d64a955e6c2a02d547bdac"
        ),
        "{logs}"
    );
    assert!(logs.contains("took proof step"), "{logs}");
    assert!(logs.contains("position=\"duplicate\""), "{logs}");
    assert!(
        logs.contains(&format!("digest={}", leaf(3))),
        "{logs}"
    );
}

#[cfg(not(feature = "tracing"))]
#[test]
fn no_events_are_emitted_without_the_tracing_feature() {
    assert_eq!("", build_and_prove_with_captured_logs());
}
