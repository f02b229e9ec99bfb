pub mod action;
pub mod chromosome;
pub mod metabolism;

use crate::config::AgentConfig;
use crate::world::{Direction, Position};
use action::AgentAction;
use chromosome::{AgentState, Chromosome};
use metabolism::Metabolism;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub index: usize,
    pub pos: Position,
    pub direction: Direction,
    pub current_state: AgentState,
    pub metabolism: Metabolism,
    pub lifetime: u64,
    /// Action taken at each lifetime tick, pre-sized to the lifetime cap.
    pub history: Vec<AgentAction>,
    pub chromosome: Chromosome,
}

impl Agent {
    pub fn new(
        index: usize,
        pos: Position,
        direction: Direction,
        chromosome: Chromosome,
        config: &AgentConfig,
    ) -> Self {
        Self {
            index,
            pos,
            direction,
            current_state: 0,
            metabolism: Metabolism::starting(config),
            lifetime: 0,
            history: vec![AgentAction::Nothing; config.max_lifetime as usize],
            chromosome,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.metabolism.is_alive()
    }

    pub fn hunger(&self) -> i32 {
        self.metabolism.hunger()
    }

    pub fn health(&self) -> i32 {
        self.metabolism.health()
    }

    /// Stores `action` at the current lifetime slot. Slots past the cap are
    /// never written.
    pub fn record_action(&mut self, action: AgentAction) {
        if let Some(slot) = self.history.get_mut(self.lifetime as usize) {
            *slot = action;
        }
    }

    /// Actions recorded so far, oldest first. The action of lifetime tick
    /// `n` sits in slot `n`, so slot 0 is never part of it.
    pub fn lived_history(&self) -> &[AgentAction] {
        let end = (self.lifetime as usize).min(self.history.len().saturating_sub(1));
        self.history.get(1..=end).unwrap_or(&[])
    }

    pub fn report(&self) -> AgentReport<'_> {
        AgentReport { agent: self }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "agent {} at [{};{}] state {} facing {:?} hunger {} health {} lifetime {}",
            self.index,
            self.pos.x,
            self.pos.y,
            self.current_state,
            self.direction,
            self.hunger(),
            self.health(),
            self.lifetime
        )
    }
}

/// Multi-line description of an agent including its action history and
/// chromosome.
pub struct AgentReport<'a> {
    agent: &'a Agent,
}

impl fmt::Display for AgentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let agent = self.agent;
        writeln!(f, "{}", agent)?;
        writeln!(f, "history:")?;
        for (tick, action) in agent.lived_history().iter().enumerate() {
            writeln!(f, "  {:3}: {}", tick + 1, action)?;
        }
        writeln!(f, "chromosome:")?;
        for (index, gene) in agent.chromosome.genes.iter().enumerate() {
            writeln!(f, "  {:3}: {}", index, gene)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::world::cell::Environment;
    use chromosome::Gene;

    fn sample_agent() -> Agent {
        let config = Config::default();
        let chromosome = Chromosome::new(vec![
            Gene::new(0, Environment::Food, AgentAction::Step, 1),
            Gene::new(1, Environment::Nothing, AgentAction::TurnLeft, 0),
        ]);
        Agent::new(3, Position::new(4, 5), Direction::Up, chromosome, &config.agent)
    }

    #[test]
    fn test_agent_creation() {
        let agent = sample_agent();
        assert_eq!(agent.index, 3);
        assert_eq!(agent.pos, Position::new(4, 5));
        assert_eq!(agent.current_state, 0);
        assert_eq!(agent.lifetime, 0);
        assert_eq!(agent.hunger(), 50);
        assert_eq!(agent.health(), 100);
        assert_eq!(agent.history.len(), 100);
        assert!(agent.is_alive());
        assert!(agent.lived_history().is_empty());
    }

    #[test]
    fn test_record_action_is_bounded() {
        let mut agent = sample_agent();
        agent.lifetime = 2;
        agent.record_action(AgentAction::Step);
        assert_eq!(agent.history[2], AgentAction::Step);

        agent.lifetime = 100;
        agent.record_action(AgentAction::TurnLeft);
        assert_eq!(agent.history.len(), 100);
        assert!(!agent.history.contains(&AgentAction::TurnLeft));
        assert_eq!(agent.lived_history().len(), 99);
    }

    #[test]
    fn test_report_lists_genes() {
        let agent = sample_agent();

        let report = agent.report().to_string();
        assert!(report.starts_with("agent 3 at [4;5]"));
        assert!(report.contains("(1, nothing) -> (turn-left, 0)"));
    }
}
