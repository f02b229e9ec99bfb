use super::Game;
use crate::agent::action::AgentAction;
use crate::config::{AgentConfig, Config};
use crate::world::cell::Environment;
use crate::world::Position;

impl Game {
    /// Advances the whole population by one tick.
    ///
    /// Agents act in index order against the live world, so later agents see
    /// what earlier agents did this tick. Only agents alive when the tick
    /// starts get a turn; damage dealt during the tick shows up in sensing
    /// right away but does not cancel a pending turn. Metabolism runs after
    /// every agent has acted.
    pub fn step(&mut self, config: &Config) {
        let alive_at_start: Vec<bool> = self.agents.iter().map(|a| a.is_alive()).collect();

        for (index, alive) in alive_at_start.into_iter().enumerate() {
            if !alive {
                continue;
            }

            let agent = &mut self.agents[index];
            agent.lifetime += 1;
            if agent.lifetime >= config.agent.max_lifetime {
                agent.metabolism.kill();
                continue;
            }

            self.run_automaton(index, &config.agent);
        }

        for agent in &mut self.agents {
            agent.metabolism.tick(&config.agent);
        }
    }

    /// Steps until the population is extinct. Returns the ticks taken.
    pub fn run_to_extinction(&mut self, config: &Config) -> u64 {
        let mut ticks = 0;
        while !self.is_everyone_dead() {
            self.step(config);
            ticks += 1;
        }
        ticks
    }

    /// Fires the first gene matching the agent's state and surroundings. An
    /// agent with no matching gene idles and keeps its state.
    fn run_automaton(&mut self, index: usize, rules: &AgentConfig) {
        let environment = self.sense(index);
        let agent = &self.agents[index];
        let Some(gene) = agent
            .chromosome
            .first_match(agent.current_state, environment)
            .copied()
        else {
            return;
        };

        self.execute_action(index, gene.action, rules);
        self.agents[index].current_state = gene.next_state;
    }

    pub fn position_ahead(&self, index: usize) -> Position {
        let agent = &self.agents[index];
        agent.pos.offset(agent.direction, self.width, self.height)
    }

    /// Classifies the cell ahead of an agent. Food outranks agents, agents
    /// outrank walls.
    pub fn sense(&self, index: usize) -> Environment {
        let ahead = self.position_ahead(index);

        if self.food_index_at(ahead).is_some() {
            Environment::Food
        } else if self.living_agent_index_at(ahead, index).is_some() {
            Environment::Agent
        } else if self.wall_at(ahead).is_some() {
            Environment::Wall
        } else {
            Environment::Nothing
        }
    }

    pub fn execute_action(&mut self, index: usize, action: AgentAction, rules: &AgentConfig) {
        self.agents[index].record_action(action);

        match action {
            AgentAction::Nothing => {}
            AgentAction::Step => self.step_forward(index, rules),
            AgentAction::TurnLeft => {
                let agent = &mut self.agents[index];
                agent.direction = agent.direction.turned_left();
            }
            AgentAction::TurnRight => {
                let agent = &mut self.agents[index];
                agent.direction = agent.direction.turned_right();
            }
        }
    }

    /// Eat, attack, bump into a wall or move, in that order of precedence.
    fn step_forward(&mut self, index: usize, rules: &AgentConfig) {
        let ahead = self.position_ahead(index);

        if let Some(food_index) = self.food_index_at(ahead) {
            let consumed = self.food[food_index].consume_unit();
            debug_assert!(consumed);
            self.agents[index].metabolism.eat(rules.food_hunger_recovery);
        } else if let Some(victim) = self.living_agent_index_at(ahead, index) {
            // No death check here; the result is visible from the next sensing on.
            self.agents[victim].metabolism.take_damage(rules.attack_damage);
            self.agents[index]
                .metabolism
                .take_damage(rules.retaliation_damage);
        } else if self.wall_at(ahead).is_none() {
            self.agents[index].pos = ahead;
        }
    }

    fn food_index_at(&self, pos: Position) -> Option<usize> {
        self.food
            .iter()
            .position(|f| f.is_available() && f.pos == pos)
    }

    fn living_agent_index_at(&self, pos: Position, except: usize) -> Option<usize> {
        self.agents
            .iter()
            .enumerate()
            .find(|(i, a)| *i != except && a.is_alive() && a.pos == pos)
            .map(|(i, _)| i)
    }
}
