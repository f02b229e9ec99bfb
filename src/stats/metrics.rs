use crate::simulation::Game;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub generation: u64,
    pub tick: u64,
    pub population: usize,
    pub alive: usize,
    pub avg_lifetime: f64,
    pub max_lifetime: u64,
    pub avg_hunger: f64,
    pub avg_health: f64,
    pub total_food: u64,
}

impl GenerationMetrics {
    pub fn compute(generation: u64, tick: u64, game: &Game) -> Self {
        let population = game.agents.len();
        let total_food = game.total_food();

        if population == 0 {
            return Self {
                generation,
                tick,
                population: 0,
                alive: 0,
                avg_lifetime: 0.0,
                max_lifetime: 0,
                avg_hunger: 0.0,
                avg_health: 0.0,
                total_food,
            };
        }

        let total_lifetime: u64 = game.agents.iter().map(|a| a.lifetime).sum();
        let avg_lifetime = total_lifetime as f64 / population as f64;

        let max_lifetime = game.agents.iter().map(|a| a.lifetime).max().unwrap_or(0);

        let total_hunger: i64 = game.agents.iter().map(|a| a.hunger() as i64).sum();
        let avg_hunger = total_hunger as f64 / population as f64;

        let total_health: i64 = game.agents.iter().map(|a| a.health() as i64).sum();
        let avg_health = total_health as f64 / population as f64;

        Self {
            generation,
            tick,
            population,
            alive: game.alive_count(),
            avg_lifetime,
            max_lifetime,
            avg_hunger,
            avg_health,
            total_food,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::{agent_with_genes, small_config};
    use crate::world::resources::Food;
    use crate::world::{Direction, Position};

    #[test]
    fn test_metrics_empty_population() {
        let game = Game::empty(10, 10);
        let metrics = GenerationMetrics::compute(3, 100, &game);

        assert_eq!(metrics.generation, 3);
        assert_eq!(metrics.tick, 100);
        assert_eq!(metrics.population, 0);
        assert_eq!(metrics.avg_lifetime, 0.0);
    }

    #[test]
    fn test_metrics_with_agents() {
        let config = small_config(10, 10, 2, 2);
        let mut a = agent_with_genes(0, Position::new(0, 0), Direction::Up, vec![], &config);
        let mut b = agent_with_genes(1, Position::new(1, 1), Direction::Up, vec![], &config);
        a.lifetime = 10;
        b.lifetime = 30;
        b.metabolism.kill();
        let food = vec![
            Food::new(Position::new(2, 2), 3),
            Food::new(Position::new(3, 3), 0),
        ];
        let game = Game::from_parts(10, 10, vec![a, b], food, vec![]);

        let metrics = GenerationMetrics::compute(7, 12, &game);

        assert_eq!(metrics.population, 2);
        assert_eq!(metrics.alive, 1);
        assert_eq!(metrics.avg_lifetime, 20.0);
        assert_eq!(metrics.max_lifetime, 30);
        assert_eq!(metrics.avg_hunger, 50.0);
        assert_eq!(metrics.avg_health, 50.0);
        assert_eq!(metrics.total_food, 3);
    }
}
