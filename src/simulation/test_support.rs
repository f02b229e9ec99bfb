use crate::agent::chromosome::{Chromosome, Gene};
use crate::agent::Agent;
use crate::config::Config;
use crate::world::{Direction, Position};

pub(crate) fn small_config(width: i32, height: i32, agents: usize, food: usize) -> Config {
    let mut config = Config::default();
    config.world.width = width;
    config.world.height = height;
    config.world.agents_count = agents;
    config.world.food_count = food;
    config.world.walls_count = 0;
    config.evolution.genes_count = 4;
    config.evolution.mating_selection_pool = agents.max(1);
    config
}

pub(crate) fn agent_with_genes(
    index: usize,
    pos: Position,
    direction: Direction,
    genes: Vec<Gene>,
    config: &Config,
) -> Agent {
    Agent::new(index, pos, direction, Chromosome::new(genes), &config.agent)
}
