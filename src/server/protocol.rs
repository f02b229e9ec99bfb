use crate::agent::action::AgentAction;
use crate::agent::chromosome::Gene;
use crate::agent::Agent;
use crate::simulation::{CellReport, Game};
use crate::stats::GenerationMetrics;
use crate::world::resources::{Food, Wall};
use crate::world::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "frame")]
    Frame {
        metrics: GenerationMetrics,
        width: i32,
        height: i32,
        agents: Vec<AgentSnapshot>,
        food: Vec<FoodSnapshot>,
        walls: Vec<WallSnapshot>,
    },
    #[serde(rename = "cell")]
    Cell(CellDetails),
    #[serde(rename = "error")]
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub alive: bool,
    pub hunger: i32,
    pub health: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSnapshot {
    pub x: i32,
    pub y: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDetails {
    pub index: usize,
    pub direction: Direction,
    pub state: u32,
    pub alive: bool,
    pub hunger: i32,
    pub health: i32,
    pub lifetime: u64,
    pub history: Vec<AgentAction>,
    pub genes: Vec<Gene>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDetails {
    pub x: i32,
    pub y: i32,
    pub agent: Option<AgentDetails>,
    pub food: Option<i32>,
    pub wall: bool,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            index: agent.index,
            x: agent.pos.x,
            y: agent.pos.y,
            direction: agent.direction,
            alive: agent.is_alive(),
            hunger: agent.hunger(),
            health: agent.health(),
        }
    }
}

impl From<&Food> for FoodSnapshot {
    fn from(food: &Food) -> Self {
        Self {
            x: food.pos.x,
            y: food.pos.y,
            quantity: food.quantity,
        }
    }
}

impl From<&Wall> for WallSnapshot {
    fn from(wall: &Wall) -> Self {
        Self {
            x: wall.pos.x,
            y: wall.pos.y,
        }
    }
}

impl From<&Agent> for AgentDetails {
    fn from(agent: &Agent) -> Self {
        Self {
            index: agent.index,
            direction: agent.direction,
            state: agent.current_state,
            alive: agent.is_alive(),
            hunger: agent.hunger(),
            health: agent.health(),
            lifetime: agent.lifetime,
            history: agent.lived_history().to_vec(),
            genes: agent.chromosome.genes.clone(),
        }
    }
}

impl From<&CellReport> for CellDetails {
    fn from(report: &CellReport) -> Self {
        Self {
            x: report.pos.x,
            y: report.pos.y,
            agent: report.agent.as_ref().map(AgentDetails::from),
            food: report.food.map(|food| food.quantity),
            wall: report.wall.is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "get_state")]
    GetState,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "step")]
    Step,
    #[serde(rename = "advance_generation")]
    AdvanceGeneration,
    #[serde(rename = "query_cell")]
    QueryCell { x: i32, y: i32 },
    /// Without a path, the trainer's snapshot path is used.
    #[serde(rename = "save")]
    Save {
        #[serde(default)]
        path: Option<String>,
    },
    #[serde(rename = "load")]
    Load {
        #[serde(default)]
        path: Option<String>,
    },
}

impl ServerMessage {
    pub fn frame(metrics: GenerationMetrics, game: &Game) -> Self {
        ServerMessage::Frame {
            metrics,
            width: game.width(),
            height: game.height(),
            agents: game.agents.iter().map(AgentSnapshot::from).collect(),
            food: game
                .food
                .iter()
                .filter(|food| food.is_available())
                .map(FoodSnapshot::from)
                .collect(),
            walls: game.walls.iter().map(WallSnapshot::from).collect(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
