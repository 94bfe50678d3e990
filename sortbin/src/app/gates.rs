use std::fmt;

use crate::config::{GateTiming, SorterConfig};
use crate::hal::gate::GateState;
use crate::hal::servo::Servo;
use crate::hal::GateServos;
use crate::svc::actuator::Actuator;
use crate::svc::clock::Clock;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Category {
    Plastic,
    Paper,
    Aluminium,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Plastic, Category::Paper, Category::Aluminium];

    /// Maps a wire token. Aluminium is requested as `can`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "plastic" => Some(Category::Plastic),
            "paper" => Some(Category::Paper),
            "can" => Some(Category::Aluminium),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Category::Plastic => "plastic",
            Category::Paper => "paper",
            Category::Aluminium => "can",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Plastic => "Plastic",
            Category::Paper => "Paper",
            Category::Aluminium => "Aluminium",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct GatePositions {
    pub entrance: GateState,
    pub plastic: GateState,
    pub paper: GateState,
    pub aluminium: GateState,
}

impl GatePositions {
    pub fn category(&self, category: Category) -> GateState {
        match category {
            Category::Plastic => self.plastic,
            Category::Paper => self.paper,
            Category::Aluminium => self.aluminium,
        }
    }

    pub fn all_closed(&self) -> bool {
        *self == GatePositions::default()
    }

    pub fn open_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.category(*c).is_open())
            .collect()
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Routing(Category),
}

/// Owns the four gates and sequences them.
///
/// Routing is close all, settle, open entrance + category, dwell, close
/// both, settle. There is no position feedback, the delays are what
/// guarantee the gates have moved. Calls block until the sequence is over,
/// so a single caller can never overlap two routings.
pub struct GateController<'a> {
    entrance: Actuator<'a>,
    categories: [Actuator<'a>; 3],
    clock: &'a dyn Clock,
    timing: GateTiming,
    state: ControllerState,
}

impl<'a> GateController<'a> {
    pub fn new(servos: GateServos<'a>, clock: &'a dyn Clock, config: &SorterConfig) -> Self {
        let GateServos {
            entrance,
            plastic,
            paper,
            aluminium,
        } = servos;

        let settle = config.timing.settle();
        let actuator = |name: &'static str, servo: Box<dyn Servo + 'a>| {
            Actuator::new(name, servo, clock, &config.servo, settle)
        };

        Self {
            entrance: actuator("entrance", entrance),
            categories: [
                actuator("plastic", plastic),
                actuator("paper", paper),
                actuator("aluminium", aluminium),
            ],
            clock,
            timing: config.timing.clone(),
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn positions(&self) -> GatePositions {
        GatePositions {
            entrance: self.entrance.state(),
            plastic: self.categories[Category::Plastic.index()].state(),
            paper: self.categories[Category::Paper.index()].state(),
            aluminium: self.categories[Category::Aluminium.index()].state(),
        }
    }

    /// Commands every gate closed and waits for them to settle.
    pub fn close_all(&mut self) {
        self.entrance.close();
        for actuator in self.categories.iter_mut() {
            actuator.close();
        }
        self.clock.sleep(self.timing.settle());
    }

    /// Returns to the startup state.
    pub fn reset(&mut self) {
        self.close_all();
        self.state = ControllerState::Idle;
    }

    pub fn route(&mut self, category: Category) {
        log::info!("Routing to {category}");
        self.state = ControllerState::Routing(category);

        self.close_all();
        self.clock.sleep(self.timing.settle());

        self.entrance.open();
        self.categories[category.index()].open();

        self.clock.sleep(self.timing.dwell());

        self.entrance.close();
        self.categories[category.index()].close();

        self.clock.sleep(self.timing.settle());

        self.state = ControllerState::Idle;
    }
}
