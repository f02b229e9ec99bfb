use super::action::AgentAction;
use crate::world::cell::Environment;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type AgentState = u32;

/// One rule of the automaton: in `current_state`, seeing `environment`,
/// perform `action` and move to `next_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub current_state: AgentState,
    pub environment: Environment,
    pub action: AgentAction,
    pub next_state: AgentState,
}

impl Gene {
    pub fn new(
        current_state: AgentState,
        environment: Environment,
        action: AgentAction,
        next_state: AgentState,
    ) -> Self {
        Self {
            current_state,
            environment,
            action,
            next_state,
        }
    }

    /// States are drawn from `[0, state_count)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, state_count: usize) -> Self {
        let state_count = state_count.max(1) as AgentState;
        Self {
            current_state: rng.gen_range(0..state_count),
            environment: Environment::random(rng),
            action: AgentAction::random(rng),
            next_state: rng.gen_range(0..state_count),
        }
    }

    pub fn matches(&self, state: AgentState, environment: Environment) -> bool {
        self.current_state == state && self.environment == environment
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.current_state, self.environment, self.action, self.next_state
        )
    }
}

/// Ordered gene table. Order is priority: the first matching gene wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub genes: Vec<Gene>,
}

impl Chromosome {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, genes_count: usize) -> Self {
        let genes = (0..genes_count)
            .map(|_| Gene::random(rng, genes_count))
            .collect();
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn first_match(&self, state: AgentState, environment: Environment) -> Option<&Gene> {
        self.genes.iter().find(|gene| gene.matches(state, environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_chromosome() {
        let mut rng = StdRng::seed_from_u64(3);
        let chromosome = Chromosome::random(&mut rng, 24);

        assert_eq!(chromosome.len(), 24);
        for gene in &chromosome.genes {
            assert!(gene.current_state < 24);
            assert!(gene.next_state < 24);
        }
    }

    #[test]
    fn test_first_match_wins() {
        let chromosome = Chromosome::new(vec![
            Gene::new(1, Environment::Food, AgentAction::TurnLeft, 9),
            Gene::new(0, Environment::Food, AgentAction::Step, 4),
            Gene::new(0, Environment::Food, AgentAction::TurnRight, 7),
        ]);

        let gene = chromosome.first_match(0, Environment::Food).unwrap();
        assert_eq!(gene.action, AgentAction::Step);
        assert_eq!(gene.next_state, 4);
    }

    #[test]
    fn test_no_match() {
        let chromosome = Chromosome::new(vec![Gene::new(
            0,
            Environment::Wall,
            AgentAction::Step,
            0,
        )]);

        assert!(chromosome.first_match(0, Environment::Nothing).is_none());
        assert!(chromosome.first_match(1, Environment::Wall).is_none());
    }

    #[test]
    fn test_gene_display() {
        let gene = Gene::new(2, Environment::Agent, AgentAction::Step, 5);
        assert_eq!(gene.to_string(), "(2, agent) -> (step, 5)");
    }
}
