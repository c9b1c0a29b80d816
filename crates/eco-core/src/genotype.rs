//! Animal genotypes: validation, random generation and crossover.

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct gene values; genes live in `0..GENE_TYPES`.
pub const GENE_TYPES: u8 = 8;

/// Genotype length used when nothing else is configured.
pub const DEFAULT_GENOTYPE_SIZE: usize = 32;

/// Fixed-length sequence of genes encoding an animal's movement policy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Genotype {
    genes: Vec<u8>,
}

impl Genotype {
    /// Build a genotype, checking the length and every gene value.
    pub fn new(genes: Vec<u8>, expected_len: usize) -> Result<Self> {
        if genes.len() != expected_len {
            return Err(Error::InvalidGenotype(format!(
                "expected {} genes, got {}",
                expected_len,
                genes.len()
            )));
        }

        if let Some((idx, gene)) = genes.iter().enumerate().find(|(_, g)| **g >= GENE_TYPES) {
            return Err(Error::InvalidGenotype(format!(
                "gene {} has value {}, must be below {}",
                idx, gene, GENE_TYPES
            )));
        }

        Ok(Self { genes })
    }

    /// Uniformly random genotype of `len` genes
    pub fn random(len: usize, rng: &mut impl Rng) -> Self {
        let genes = (0..len).map(|_| rng.gen_range(0..GENE_TYPES)).collect();
        Self { genes }
    }

    /// Combine two parents into one child genotype.
    ///
    /// The weaker parent contributes `round(len * weak_energy / total_energy)`
    /// genes and the stronger one the rest. A coin flip puts the weak share
    /// either at the front (`weak[..split] + strong[split..]`) or at the back
    /// (`strong[..len - split] + weak[len - split..]`). Every child gene keeps
    /// the index it had in the parent it came from.
    pub fn crossover(
        strong: &Genotype,
        weak: &Genotype,
        strong_energy: f64,
        weak_energy: f64,
        rng: &mut impl Rng,
    ) -> Genotype {
        debug_assert_eq!(strong.len(), weak.len());
        let len = strong.len();

        let total = strong_energy + weak_energy;
        let weak_share = if total > 0.0 { weak_energy / total } else { 0.5 };
        let split = ((len as f64 * weak_share).round() as usize).min(len);

        let genes = if rng.gen_bool(0.5) {
            weak.genes[..split]
                .iter()
                .chain(&strong.genes[split..])
                .copied()
                .collect()
        } else {
            let boundary = len - split;
            strong.genes[..boundary]
                .iter()
                .chain(&weak.genes[boundary..])
                .copied()
                .collect()
        };

        Genotype { genes }
    }

    pub fn genes(&self) -> &[u8] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Pick one gene uniformly at random
    pub fn sample(&self, rng: &mut impl Rng) -> Option<u8> {
        if self.genes.is_empty() {
            return None;
        }
        Some(self.genes[rng.gen_range(0..self.genes.len())])
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{}", gene)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_valid_genotype() {
        let genotype = Genotype::new(vec![0, 1, 2, 7], 4).unwrap();
        assert_eq!(genotype.len(), 4);
        assert_eq!(genotype.to_string(), "0127");
    }

    #[test]
    fn test_wrong_length_rejected() {
        let result = Genotype::new(vec![0, 1, 2], 4);
        assert!(matches!(result, Err(Error::InvalidGenotype(_))));
    }

    #[test]
    fn test_gene_out_of_range_rejected() {
        let result = Genotype::new(vec![0, 1, 8, 3], 4);
        assert!(matches!(result, Err(Error::InvalidGenotype(_))));
    }

    #[test]
    fn test_random_genotype() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let genotype = Genotype::random(DEFAULT_GENOTYPE_SIZE, &mut rng);
        assert_eq!(genotype.len(), DEFAULT_GENOTYPE_SIZE);
        assert!(genotype.genes().iter().all(|&g| g < GENE_TYPES));
        assert!(Genotype::new(genotype.genes().to_vec(), DEFAULT_GENOTYPE_SIZE).is_ok());
    }

    #[test]
    fn test_crossover_equal_energy_takes_half_from_each() {
        let strong = Genotype::new(vec![1; 8], 8).unwrap();
        let weak = Genotype::new(vec![2; 8], 8).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let child = Genotype::crossover(&strong, &weak, 20.0, 20.0, &mut rng);
            assert_eq!(child.genes().iter().filter(|&&g| g == 2).count(), 4);
            assert_eq!(child.genes().iter().filter(|&&g| g == 1).count(), 4);
        }
    }

    #[test]
    fn test_crossover_weak_share_follows_energy() {
        let strong = Genotype::new(vec![3; 10], 10).unwrap();
        let weak = Genotype::new(vec![5; 10], 10).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // 10 * 10 / 40 = 2.5, rounds away from zero to 3
        let child = Genotype::crossover(&strong, &weak, 30.0, 10.0, &mut rng);
        assert_eq!(child.genes().iter().filter(|&&g| g == 5).count(), 3);
    }

    proptest! {
        #[test]
        fn validation_matches_rules(genes in proptest::collection::vec(0u8..12, 0..40), expected in 0usize..40) {
            let valid = genes.len() == expected && genes.iter().all(|&g| g < GENE_TYPES);
            prop_assert_eq!(Genotype::new(genes, expected).is_ok(), valid);
        }

        #[test]
        fn crossover_keeps_length_and_provenance(
            seed in any::<u64>(),
            len in 1usize..40,
            strong_energy in 0.1f64..500.0,
            weak_energy in 0.1f64..500.0,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let strong = Genotype::random(len, &mut rng);
            let weak = Genotype::random(len, &mut rng);

            let child = Genotype::crossover(&strong, &weak, strong_energy, weak_energy, &mut rng);
            prop_assert_eq!(child.len(), len);
            for (idx, gene) in child.genes().iter().enumerate() {
                prop_assert!(*gene == strong.genes()[idx] || *gene == weak.genes()[idx]);
            }
        }
    }
}
