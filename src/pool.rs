// ============================================
// src/pool.rs
// まだ盤面に出していない組の集合
// ============================================

use rand::Rng;

use crate::catalog::{Catalog, GlyphPair};

/// ラウンド中に未出題の組を保持する。
/// 取り出しは「ランダムな位置を読む・削除する・返す」を1回の操作で行う。
#[derive(Debug, Clone, Default)]
pub struct Pool {
    pairs: Vec<GlyphPair>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 対応表の全組をコピーして作成
    pub fn fill_from(catalog: &Catalog) -> Self {
        Self {
            pairs: catalog.pairs().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, pair: &GlyphPair) -> bool {
        self.pairs.contains(pair)
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// 一様ランダムに1組取り出す。空のプールから取り出すのは呼び出し側のバグ
    pub fn extract_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GlyphPair {
        assert!(!self.pairs.is_empty(), "extract_random called on an empty pool");
        let idx = rng.random_range(0..self.pairs.len());
        // 順序は意味を持たないので swap_remove で O(1)
        self.pairs.swap_remove(idx)
    }

    pub fn try_extract_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<GlyphPair> {
        if self.pairs.is_empty() {
            None
        } else {
            Some(self.extract_random(rng))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Script;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn fill_copies_the_whole_catalog() {
        let pool = Pool::fill_from(Script::Hiragana.catalog());
        assert_eq!(pool.len(), 67);
        assert!(pool.contains(&GlyphPair { key: "ka", value: "か" }));
    }

    #[test]
    fn extraction_never_repeats_and_drains_the_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = Pool::fill_from(Script::Katakana.catalog());
        let mut seen = HashSet::new();
        let mut expected_len = pool.len();
        while let Some(pair) = pool.try_extract_random(&mut rng) {
            expected_len -= 1;
            assert_eq!(pool.len(), expected_len);
            assert!(!pool.contains(&pair));
            assert!(seen.insert(pair), "{:?} drawn twice", pair);
        }
        assert_eq!(seen.len(), 67);
        assert!(pool.is_empty());
    }

    #[test]
    #[should_panic(expected = "empty pool")]
    fn extracting_from_an_empty_pool_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        Pool::new().extract_random(&mut rng);
    }

    #[test]
    fn first_draw_is_roughly_uniform() {
        // 67組 × 300回 ≈ 1組あたり平均300回。極端な偏りが無いことだけ確認
        let mut rng = StdRng::seed_from_u64(42);
        let catalog = Script::Hiragana.catalog();
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let trials = catalog.len() as u32 * 300;
        for _ in 0..trials {
            let mut pool = Pool::fill_from(catalog);
            *counts.entry(pool.extract_random(&mut rng).key).or_default() += 1;
        }
        assert_eq!(counts.len(), catalog.len());
        for (key, count) in counts {
            assert!((150..=450).contains(&count), "{key}: {count}");
        }
    }

    #[test]
    fn clear_empties_the_pool() {
        let mut pool = Pool::fill_from(Script::Hiragana.catalog());
        pool.clear();
        assert!(pool.is_empty());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pool.try_extract_random(&mut rng), None);
    }
}
