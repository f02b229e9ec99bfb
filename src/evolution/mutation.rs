use crate::agent::chromosome::{Chromosome, Gene};
use rand::Rng;

/// Single-point crossover at the midpoint: the first half of the genes
/// comes from `first`, the second half from `second`.
pub fn crossover(first: &Chromosome, second: &Chromosome) -> Chromosome {
    let len = first.len().min(second.len());
    let midpoint = len / 2;

    let genes = first.genes[..midpoint]
        .iter()
        .chain(&second.genes[midpoint..len])
        .copied()
        .collect();

    Chromosome::new(genes)
}

/// Independently replaces each gene with a fresh random one with
/// probability `mutation_rate`. Returns the number of genes replaced.
pub fn mutate<R: Rng + ?Sized>(
    chromosome: &mut Chromosome,
    mutation_rate: f64,
    state_count: usize,
    rng: &mut R,
) -> usize {
    let mut mutated = 0;
    for gene in &mut chromosome.genes {
        if rng.gen::<f64>() < mutation_rate {
            *gene = Gene::random(rng, state_count);
            mutated += 1;
        }
    }
    mutated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_crossover_halves() {
        let mut rng = StdRng::seed_from_u64(21);
        let first = Chromosome::random(&mut rng, 16);
        let second = Chromosome::random(&mut rng, 16);

        let child = crossover(&first, &second);

        assert_eq!(child.len(), 16);
        assert_eq!(&child.genes[..8], &first.genes[..8]);
        assert_eq!(&child.genes[8..], &second.genes[8..]);
    }

    #[test]
    fn test_self_crossover_is_identity() {
        let mut rng = StdRng::seed_from_u64(22);
        let parent = Chromosome::random(&mut rng, 10);
        assert_eq!(crossover(&parent, &parent), parent);
    }

    #[test]
    fn test_mutate_no_mutation() {
        let mut rng = StdRng::seed_from_u64(23);
        let original = Chromosome::random(&mut rng, 64);
        let mut chromosome = original.clone();

        assert_eq!(mutate(&mut chromosome, 0.0, 64, &mut rng), 0);
        assert_eq!(chromosome, original);
    }

    #[test]
    fn test_mutate_with_mutation() {
        let mut rng = StdRng::seed_from_u64(24);
        let original = Chromosome::random(&mut rng, 64);
        let mut chromosome = original.clone();

        let mutated = mutate(&mut chromosome, 1.0, 64, &mut rng);

        assert_eq!(mutated, 64);
        assert_eq!(chromosome.len(), 64);
        let differences = original
            .genes
            .iter()
            .zip(&chromosome.genes)
            .filter(|(a, b)| a != b)
            .count();
        assert!(differences > 32);
    }
}
