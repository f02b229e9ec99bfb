pub mod mutation;

use crate::config::Config;
use crate::error::SimError;
use crate::simulation::Game;
use rand::Rng;

/// Agent indices ordered by lifetime, longest first. Order among equal
/// lifetimes is unspecified.
pub fn rank_by_lifetime(game: &Game) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..game.agents.len()).collect();
    ranked.sort_unstable_by(|&a, &b| game.agents[b].lifetime.cmp(&game.agents[a].lifetime));
    ranked
}

/// Breeds the next generation from a finished one.
///
/// Terrain is copied as-is (food is not replenished). Each child takes the
/// first half of its chromosome from one parent and the second half from
/// another, both drawn with replacement from the longest-lived agents, then
/// goes through per-gene mutation and gets fresh non-genetic state.
pub fn prepare_next_generation<R: Rng + ?Sized>(
    previous: &Game,
    config: &Config,
    rng: &mut R,
) -> Result<Game, SimError> {
    let ranked = rank_by_lifetime(previous);
    let pool_size = config.evolution.mating_selection_pool.min(ranked.len());
    let mating_pool = &ranked[..pool_size];

    if mating_pool.is_empty() {
        return Err(SimError::InvalidConfig(
            "cannot breed from an empty generation".to_string(),
        ));
    }

    let mut next = Game::from_parts(
        previous.width(),
        previous.height(),
        Vec::with_capacity(config.world.agents_count),
        previous.food.clone(),
        previous.walls.clone(),
    );

    let mutation_rate = config.mutation_rate();
    let mut mutated_genes = 0;

    for index in 0..config.world.agents_count {
        let first = &previous.agents[mating_pool[rng.gen_range(0..pool_size)]];
        let second = &previous.agents[mating_pool[rng.gen_range(0..pool_size)]];

        let mut chromosome = mutation::crossover(&first.chromosome, &second.chromosome);
        mutated_genes += mutation::mutate(
            &mut chromosome,
            mutation_rate,
            config.evolution.genes_count,
            rng,
        );

        next.spawn_agent(index, chromosome, config, rng)?;
    }

    log::debug!(
        "Bred {} agents from a pool of {} (best lifetime {}), {} genes mutated",
        next.agents.len(),
        pool_size,
        previous.agents[mating_pool[0]].lifetime,
        mutated_genes
    );

    Ok(next)
}
