use bitcoin::hashes::{Hash, HashEngine, sha256d};

/// Folds a merkle branch onto `leaf`: every step hashes the running value
/// followed by the next branch hash.
pub fn merkle_root_from_branches(leaf: sha256d::Hash, branches: &[sha256d::Hash]) -> sha256d::Hash {
    branches.iter().fold(leaf, |acc, branch| {
        let mut engine = sha256d::Hash::engine();
        engine.input(acc.as_byte_array());
        engine.input(branch.as_byte_array());
        sha256d::Hash::from_engine(engine)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn hash(s: &str) -> sha256d::Hash {
        sha256d::Hash::from_str(s).unwrap()
    }

    #[test]
    fn test_merkle_root_block_170() {
        let leaf = hash("b1fea52486ce0c62bb442b530a3f0132b826c74e473d1f2c220bfa78111c5082");
        let branches = [hash("f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16")];

        assert_eq!(
            merkle_root_from_branches(leaf, &branches),
            hash("7dac2c5666815c17a3b36427de37bb9d2e2c5ccec3f8633eb91a4205cb4c10ff")
        );
    }

    #[test]
    fn test_merkle_root_block_100000() {
        let leaf = hash("8c14f0db3df150123e6f3dbbf30f8b955a8249b62ac1d1ff16284aefa3d06d87");
        let branches = [
            hash("fff2525b8931402dd09222c50775608f75787bd2b87e56995a7bdd30f79702c4"),
            hash("8e30899078ca1813be036a073bbf80b86cdddde1c96e9e9c99e9e3782df4ae49"),
        ];

        assert_eq!(
            merkle_root_from_branches(leaf, &branches),
            hash("f3e94742aca4b5ef85488dc37c06c3282295ffec960994b2c0d5ac2a25a95766")
        );
    }

    #[test]
    fn test_no_branches() {
        let leaf = hash("8c14f0db3df150123e6f3dbbf30f8b955a8249b62ac1d1ff16284aefa3d06d87");
        assert_eq!(merkle_root_from_branches(leaf, &[]), leaf);
    }
}
