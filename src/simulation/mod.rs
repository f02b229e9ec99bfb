pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

use crate::agent::{chromosome::Chromosome, Agent};
use crate::config::Config;
use crate::error::SimError;
use crate::world::resources::{Food, Wall};
use crate::world::{Direction, Position};
use rand::Rng;
use serde::Serialize;

/// Retry budget for finding an unoccupied cell.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 250;

/// One generation's world: the three entity pools on a `width` x `height`
/// torus. Pool indices are entity identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    width: i32,
    height: i32,
    pub agents: Vec<Agent>,
    pub food: Vec<Food>,
    pub walls: Vec<Wall>,
}

/// Everything found at one grid cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub pos: Position,
    pub agent: Option<Agent>,
    pub food: Option<Food>,
    pub wall: Option<Wall>,
}

impl Game {
    /// Builds a fresh generation: agents first, then food, then walls, each
    /// on a cell nothing placed before it occupies.
    pub fn new<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<Self, SimError> {
        config.validate()?;

        let mut game = Self::empty(config.world.width, config.world.height);
        game.agents.reserve_exact(config.world.agents_count);
        game.food.reserve_exact(config.world.food_count);
        game.walls.reserve_exact(config.world.walls_count);

        for index in 0..config.world.agents_count {
            let chromosome = Chromosome::random(rng, config.evolution.genes_count);
            game.spawn_agent(index, chromosome, config, rng)?;
        }

        for _ in 0..config.world.food_count {
            let pos = game.place_randomly(rng)?;
            let quantity = rng.gen_range(1..=config.world.food_quantity_max);
            game.food.push(Food::new(pos, quantity));
        }

        for _ in 0..config.world.walls_count {
            let pos = game.place_randomly(rng)?;
            game.walls.push(Wall::new(pos));
        }

        log::debug!(
            "Initialized game with {} agents, {} food, {} walls",
            game.agents.len(),
            game.food.len(),
            game.walls.len()
        );

        Ok(game)
    }

    pub fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            agents: Vec::new(),
            food: Vec::new(),
            walls: Vec::new(),
        }
    }

    pub fn from_parts(
        width: i32,
        height: i32,
        agents: Vec<Agent>,
        food: Vec<Food>,
        walls: Vec<Wall>,
    ) -> Self {
        Self {
            width,
            height,
            agents,
            food,
            walls,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Places a new agent with fresh non-genetic state on a free cell.
    pub fn spawn_agent<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        chromosome: Chromosome,
        config: &Config,
        rng: &mut R,
    ) -> Result<(), SimError> {
        let pos = self.place_randomly(rng)?;
        let direction = Direction::random(rng);
        self.agents
            .push(Agent::new(index, pos, direction, chromosome, &config.agent));
        Ok(())
    }

    pub fn is_cell_free(&self, pos: Position) -> bool {
        !self.agents.iter().any(|a| a.pos == pos)
            && !self.food.iter().any(|f| f.pos == pos)
            && !self.walls.iter().any(|w| w.pos == pos)
    }

    pub fn place_randomly<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Position, SimError> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let pos = Position::random(rng, self.width, self.height);
            if self.is_cell_free(pos) {
                return Ok(pos);
            }
        }

        Err(SimError::NoFreeCell {
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    pub fn agent_at(&self, pos: Position) -> Option<&Agent> {
        self.agents.iter().find(|a| a.pos == pos)
    }

    pub fn food_at(&self, pos: Position) -> Option<&Food> {
        self.food.iter().find(|f| f.pos == pos)
    }

    pub fn wall_at(&self, pos: Position) -> Option<&Wall> {
        self.walls.iter().find(|w| w.pos == pos)
    }

    pub fn cell(&self, pos: Position) -> CellReport {
        CellReport {
            pos,
            agent: self.agent_at(pos).cloned(),
            food: self.food_at(pos).copied(),
            wall: self.wall_at(pos).copied(),
        }
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// The generation is over once no agent has positive health.
    pub fn is_everyone_dead(&self) -> bool {
        self.agents.iter().all(|a| !a.is_alive())
    }

    /// Longest-lived agent; the lowest index wins ties.
    pub fn oldest_agent(&self) -> Option<&Agent> {
        self.agents
            .iter()
            .reduce(|best, a| if a.lifetime > best.lifetime { a } else { best })
    }

    pub fn total_food(&self) -> u64 {
        self.food
            .iter()
            .filter(|f| f.is_available())
            .map(|f| f.quantity as u64)
            .sum()
    }
}
